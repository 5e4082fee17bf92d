use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin, PinState},
    spi::SpiBus,
};

use crate::config::Config;
use crate::error::ErrorKind;
use crate::traits::Command;

/// Linux refuses spidev transfers above 4096 bytes by default
const MAX_TRANSFER: usize = 4096;

pub(crate) type InterfaceError<SPI, CS, BUSY, DC, RST, LED> =
    ErrorKind<SPI, CS, BUSY, DC, RST, LED>;

/// The connection between the host and the panel
///
/// Owns the bus, the five lines and the delay provider. Dropping it parks the
/// lines: chip select released, reset held, data/command and indicator low.
pub(crate) struct DisplayInterface<SPI, CS, BUSY, DC, RST, LED, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    LED: OutputPin,
    DELAY: DelayNs,
{
    /// SPI
    spi: SPI,
    /// Chip select (Enable), active low
    cs: CS,
    /// Low for busy, Wait until display is ready!
    busy: BUSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Resetting
    rst: RST,
    /// Status LED, blinks while the panel is busy
    led: LED,
    delay: DELAY,
    /// number of ms the idle loop should sleep on
    settle_delay_ms: u32,
    reset_delay_ms: u32,
    busy_timeout_ms: Option<u32>,
}

impl<SPI, CS, BUSY, DC, RST, LED, DELAY> DisplayInterface<SPI, CS, BUSY, DC, RST, LED, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    LED: OutputPin,
    DELAY: DelayNs,
{
    /// Takes ownership of the lines, releases chip select and turns the indicator on
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        spi: SPI,
        cs: CS,
        busy: BUSY,
        dc: DC,
        rst: RST,
        led: LED,
        delay: DELAY,
        config: &Config,
    ) -> Result<Self, InterfaceError<SPI, CS, BUSY, DC, RST, LED>> {
        let mut interface = DisplayInterface {
            spi,
            cs,
            busy,
            dc,
            rst,
            led,
            delay,
            settle_delay_ms: config.settle_delay_ms,
            reset_delay_ms: config.reset_delay_ms,
            busy_timeout_ms: config.busy_timeout_ms,
        };

        interface.cs.set_high().map_err(ErrorKind::CsError)?;
        interface.led.set_high().map_err(ErrorKind::IndicatorError)?;

        Ok(interface)
    }

    /// Sends one command byte followed by its data bytes in a single chip select
    /// window, then waits for the panel.
    ///
    /// The data may be empty. The busy wait runs once per transaction, not per byte.
    pub(crate) fn send<T: Command>(
        &mut self,
        command: T,
        data: &[u8],
    ) -> Result<(), InterfaceError<SPI, CS, BUSY, DC, RST, LED>> {
        log::debug!(
            "Send 0x{:02X} command with {} data bytes",
            command.address(),
            data.len()
        );

        // low for commands
        self.dc.set_low().map_err(ErrorKind::DcError)?;
        self.cs.set_low().map_err(ErrorKind::CsError)?;

        let transfer = self.transfer(command.address(), data);

        // chip select goes back up even if the transfer broke down
        let release = self.cs.set_high().map_err(ErrorKind::CsError);
        transfer?;
        release?;

        self.wait_until_idle()
    }

    fn transfer(
        &mut self,
        address: u8,
        data: &[u8],
    ) -> Result<(), InterfaceError<SPI, CS, BUSY, DC, RST, LED>> {
        self.spi.write(&[address]).map_err(ErrorKind::SpiError)?;
        self.spi.flush().map_err(ErrorKind::SpiError)?;

        // high for data
        self.dc.set_high().map_err(ErrorKind::DcError)?;
        for chunk in data.chunks(MAX_TRANSFER) {
            self.spi.write(chunk).map_err(ErrorKind::SpiError)?;
        }
        self.spi.flush().map_err(ErrorKind::SpiError)
    }

    /// Waits until device isn't busy anymore (busy == HIGH)
    ///
    /// The indicator goes dark, then toggles on every poll and is lit again
    /// once the panel is ready. Gives up with [`ErrorKind::DeviceUnresponsive`]
    /// when a budget is configured and exhausted.
    pub(crate) fn wait_until_idle(
        &mut self,
    ) -> Result<(), InterfaceError<SPI, CS, BUSY, DC, RST, LED>> {
        self.led.set_low().map_err(ErrorKind::IndicatorError)?;
        self.delay_ms(self.settle_delay_ms);

        // never spin without sleeping, or the budget would never run out
        let poll_interval = self.settle_delay_ms.max(1);
        let mut waited_ms = 0u32;
        let mut lit = false;

        while self.is_busy()? {
            if let Some(budget) = self.busy_timeout_ms {
                if waited_ms >= budget {
                    log::warn!("Panel still busy after {} ms, giving up", waited_ms);
                    self.led.set_high().map_err(ErrorKind::IndicatorError)?;
                    return Err(ErrorKind::DeviceUnresponsive { waited_ms });
                }
            }

            lit = !lit;
            self.led
                .set_state(PinState::from(lit))
                .map_err(ErrorKind::IndicatorError)?;
            self.delay_ms(poll_interval);
            waited_ms = waited_ms.saturating_add(poll_interval);
            log::trace!("Busy for {} ms", waited_ms);
        }

        self.led.set_high().map_err(ErrorKind::IndicatorError)?;
        self.delay_ms(self.settle_delay_ms);
        Ok(())
    }

    /// Checks if device is still busy
    ///
    /// The busy line of this panel is active low.
    pub(crate) fn is_busy(&mut self) -> Result<bool, InterfaceError<SPI, CS, BUSY, DC, RST, LED>> {
        self.busy.is_low().map_err(ErrorKind::BusyError)
    }

    /// Resets the device.
    ///
    /// Often used to awake the module from deep sleep. Three equally long steps:
    /// high, low, high.
    pub(crate) fn reset(&mut self) -> Result<(), InterfaceError<SPI, CS, BUSY, DC, RST, LED>> {
        log::debug!("Reset");

        self.rst.set_high().map_err(ErrorKind::RstError)?;
        self.delay_ms(self.reset_delay_ms);

        self.rst.set_low().map_err(ErrorKind::RstError)?;
        self.delay_ms(self.reset_delay_ms);

        self.rst.set_high().map_err(ErrorKind::RstError)?;
        self.delay_ms(self.reset_delay_ms);

        Ok(())
    }

    pub(crate) fn delay_ms(&mut self, duration: u32) {
        if duration > 0 {
            self.delay.delay_ms(duration);
        }
    }
}

impl<SPI, CS, BUSY, DC, RST, LED, DELAY> Drop for DisplayInterface<SPI, CS, BUSY, DC, RST, LED, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    LED: OutputPin,
    DELAY: DelayNs,
{
    fn drop(&mut self) {
        log::debug!("Releasing panel lines");
        // best effort, there is nobody left to report to
        let _ = self.cs.set_high();
        let _ = self.rst.set_low();
        let _ = self.dc.set_low();
        let _ = self.led.set_low();
    }
}
