//! SPI Commands for the Waveshare 4.2" E-Ink Display in four gray mode
use crate::traits;

/// Epd4in2Gray commands
///
/// Should rarely (never?) be needed directly.
///
/// The description of the single commands is mostly taken from IL0398.pdf
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Set Resolution, LUT selection, BWR pixels, gate scan direction, source shift direction, booster switch, soft reset
    /// One Byte of Data:
    ///     0x0F Red Mode, LUT from OTP
    ///     0x1F B/W Mode, LUT from OTP
    ///     0x2F Red Mode, LUT set by registers
    ///     0x3F B/W Mode, LUT set by registers
    PanelSetting = 0x00,
    /// selecting internal and external power
    PowerSetting = 0x01,
    /// After the Power Off command, the driver will power off following the Power Off Sequence. This command will turn off charge
    /// pump, T-con, source driver, gate driver, VCOM, and temperature sensor, but register data will be kept until VDD becomes OFF.
    PowerOff = 0x02,
    /// Turning On the Power
    PowerOn = 0x04,
    /// Starting data transmission
    BoosterSoftStart = 0x06,
    /// After this command is transmitted, the chip would enter the deep-sleep mode to save power.
    ///
    /// The deep sleep mode would return to standby by hardware reset.
    ///
    /// The only one parameter is a check code, the command would be excuted if check code = 0xA5.
    DeepSleep = 0x07,
    /// Writes the "OLD" frame to SRAM. In four gray mode this carries plane A.
    DataStartTransmission1 = 0x10,
    /// While user sent this command, driver will refresh display (data/VCOM) according to SRAM data and LUT.
    ///
    /// After Display Refresh command, BUSY_N signal will become “0” and the refreshing of panel starts.
    DisplayRefresh = 0x12,
    /// Writes the "NEW" frame to SRAM. In four gray mode this carries plane B.
    DataStartTransmission2 = 0x13,
    /// VCOM Look-Up Table
    LutForVcom = 0x20,
    /// White-to-White Look-Up Table
    LutWhiteToWhite = 0x21,
    /// Black-to-White Look-Up Table
    LutBlackToWhite = 0x22,
    /// White-to-Black Look-Up Table
    LutWhiteToBlack = 0x23,
    /// Black-to-Black Look-Up Table
    LutBlackToBlack = 0x24,
    /// The command controls the PLL clock frequency.
    PllControl = 0x30,
    /// This command indicates the interval of Vcom and data output. When setting the vertical back porch, the total blanking will be kept (20 Hsync)
    VcomAndDataIntervalSetting = 0x50,
    /// This command defines alternative resolution and this setting is of higher priority than the RES\[1:0\] in R00H (PSR).
    ResolutionSetting = 0x61,
    /// Set VCM_DC
    VcmDcSetting = 0x82,
}

impl traits::Command for Command {
    /// Returns the address of the command
    fn address(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Command as CommandTrait;

    #[test]
    fn command_addr() {
        assert_eq!(Command::PanelSetting.address(), 0x00);
        assert_eq!(Command::DeepSleep.address(), 0x07);
        assert_eq!(Command::DisplayRefresh.address(), 0x12);
        assert_eq!(Command::DataStartTransmission2.address(), 0x13);
        assert_eq!(Command::LutBlackToBlack.address(), 0x24);
        assert_eq!(Command::VcmDcSetting.address(), 0x82);
    }
}
