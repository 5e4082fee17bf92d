//! A Driver for the Waveshare 4.2" E-Ink Display in four level grayscale mode
//!
//! # References
//!
//! - [Datasheet](https://www.waveshare.com/wiki/4.2inch_e-Paper_Module)
//! - [Waveshare C driver](https://github.com/waveshare/e-Paper/blob/master/RaspberryPi_JetsonNano/c/lib/e-Paper/EPD_4in2.c)
//!
//! The controller (IL0398) is driven with register based waveform tables. A frame
//! goes out as two bit planes, the "old" and the "new" data, and the tables turn
//! each of the four old/new combinations into a different gray level.
//!
//! # Lifecycle
//!
//! ```text
//! new() -> Uninitialized --wake_up()--> Awake --sleep()--> Asleep
//!                                        |  ^                 |
//!                  display_frame() /     v  |                 |
//!                  clear_frame()    Displaying/Clearing       |
//!                                                             |
//!          Awake <---------------------wake_up()--------------+
//! ```
//!
//! Every transaction ends with a busy wait, bounded by [`Config::busy_timeout_ms`].

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

use crate::config::Config;
use crate::error::ErrorKind;
use crate::interface::DisplayInterface;
use crate::traits::{ErrorType, GrayscaleDisplay, PanelState};

pub(crate) mod command;
use self::command::Command;

mod constants;
use self::constants::*;

pub mod encoder;

/// Width of the display
pub const WIDTH: u32 = 400;
/// Height of the display
pub const HEIGHT: u32 = 300;
/// Bytes of an 8-bit grayscale frame
pub const FRAME_LEN: usize = WIDTH as usize * HEIGHT as usize;
/// Bytes of one of the two transmitted planes
pub const PLANE_LEN: usize = encoder::plane_len(WIDTH as usize, HEIGHT as usize);

/// Plane sent for both memories by [`Epd4in2Gray::clear_frame`]
static WHITE_PLANE: [u8; PLANE_LEN] = [0xFF; PLANE_LEN];

/// Full size grayscale buffer for use with the 4in2 EPD
#[cfg(feature = "graphics")]
pub type Display4in2Gray = crate::graphics::GrayDisplay<WIDTH, HEIGHT, FRAME_LEN>;

/// Result of every panel operation
pub type EpdResult<SPI, CS, BUSY, DC, RST, LED> =
    Result<(), ErrorKind<SPI, CS, BUSY, DC, RST, LED>>;

/// Epd4in2Gray driver
pub struct Epd4in2Gray<SPI, CS, BUSY, DC, RST, LED, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    LED: OutputPin,
    DELAY: DelayNs,
{
    /// Connection Interface
    interface: DisplayInterface<SPI, CS, BUSY, DC, RST, LED, DELAY>,
    config: Config,
    state: PanelState,
    /// Scratch space for the encoded planes
    plane_a: [u8; PLANE_LEN],
    plane_b: [u8; PLANE_LEN],
}

impl<SPI, CS, BUSY, DC, RST, LED, DELAY> Epd4in2Gray<SPI, CS, BUSY, DC, RST, LED, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    LED: OutputPin,
    DELAY: DelayNs,
{
    /// Creates a new driver from a SPI bus, the Enable (chip select) pin, the
    /// Busy input, DC, RST, the indicator LED and a delay provider.
    ///
    /// The bus must be configured for [`SPI_MODE`](crate::SPI_MODE). The panel
    /// is not touched yet, call [`wake_up`](GrayscaleDisplay::wake_up) before
    /// sending frames.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        spi: SPI,
        cs: CS,
        busy: BUSY,
        dc: DC,
        rst: RST,
        led: LED,
        delay: DELAY,
        config: Config,
    ) -> Result<Self, ErrorKind<SPI, CS, BUSY, DC, RST, LED>> {
        let interface = DisplayInterface::new(spi, cs, busy, dc, rst, led, delay, &config)?;

        Ok(Epd4in2Gray {
            interface,
            config,
            state: PanelState::Uninitialized,
            plane_a: [0u8; PLANE_LEN],
            plane_b: [0u8; PLANE_LEN],
        })
    }

    /// The configuration the driver was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn init(&mut self) -> EpdResult<SPI, CS, BUSY, DC, RST, LED> {
        self.interface.reset()?;

        self.interface
            .send(Command::PowerSetting, &[0x03, 0x00, 0x2B, 0x2B, 0x13])?;
        self.interface
            .send(Command::BoosterSoftStart, &[0x17, 0x17, 0x17])?;
        self.interface.send(Command::PowerOn, &[])?;
        // B/W mode, LUT set by registers
        self.interface.send(Command::PanelSetting, &[0x3F])?;
        // 50 Hz
        self.interface.send(Command::PllControl, &[0x3C])?;
        self.send_resolution()?;
        self.interface.send(Command::VcmDcSetting, &[0x12])?;
        self.interface
            .send(Command::VcomAndDataIntervalSetting, &[0x97])?;

        self.set_lut()
    }

    fn send_resolution(&mut self) -> EpdResult<SPI, CS, BUSY, DC, RST, LED> {
        let w = WIDTH;
        let h = HEIGHT;

        self.interface.send(
            Command::ResolutionSetting,
            &[(w >> 8) as u8, w as u8, (h >> 8) as u8, h as u8],
        )
    }

    /// Fill the look-up tables for the four gray waveforms
    fn set_lut(&mut self) -> EpdResult<SPI, CS, BUSY, DC, RST, LED> {
        log::debug!("Initialise LUT");

        self.interface.send(Command::LutForVcom, &LUT_VCOM)?;
        self.interface.send(Command::LutWhiteToWhite, &LUT_WW)?;
        self.interface.send(Command::LutBlackToWhite, &LUT_BW)?;
        self.interface.send(Command::LutWhiteToBlack, &LUT_WB)?;
        self.interface.send(Command::LutBlackToBlack, &LUT_BB)?;

        log::debug!("LUT initialised");
        Ok(())
    }

    fn expect_state(&self, expected: PanelState) -> EpdResult<SPI, CS, BUSY, DC, RST, LED> {
        if self.state == expected {
            Ok(())
        } else {
            log::warn!("Panel is {:?}, expected {:?}", self.state, expected);
            Err(ErrorKind::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    /// Runs a transition, moving to `done` on success and back to
    /// `Uninitialized` if the hardware failed half way.
    fn transition<F>(
        &mut self,
        during: PanelState,
        done: PanelState,
        f: F,
    ) -> EpdResult<SPI, CS, BUSY, DC, RST, LED>
    where
        F: FnOnce(&mut Self) -> EpdResult<SPI, CS, BUSY, DC, RST, LED>,
    {
        self.state = during;
        match f(self) {
            Ok(()) => {
                self.state = done;
                Ok(())
            }
            Err(err) => {
                log::debug!("Transition out of {:?} failed: {}", during, err);
                self.state = PanelState::Uninitialized;
                Err(err)
            }
        }
    }

    fn send_planes(
        interface: &mut DisplayInterface<SPI, CS, BUSY, DC, RST, LED, DELAY>,
        plane_a: &[u8],
        plane_b: &[u8],
    ) -> EpdResult<SPI, CS, BUSY, DC, RST, LED> {
        interface.send(Command::DataStartTransmission1, plane_a)?;
        interface.send(Command::DataStartTransmission2, plane_b)?;
        interface.send(Command::DisplayRefresh, &[])
    }
}

impl<SPI, CS, BUSY, DC, RST, LED, DELAY> ErrorType for Epd4in2Gray<SPI, CS, BUSY, DC, RST, LED, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    LED: OutputPin,
    DELAY: DelayNs,
{
    type Error = ErrorKind<SPI, CS, BUSY, DC, RST, LED>;
}

impl<SPI, CS, BUSY, DC, RST, LED, DELAY> GrayscaleDisplay
    for Epd4in2Gray<SPI, CS, BUSY, DC, RST, LED, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    LED: OutputPin,
    DELAY: DelayNs,
{
    fn wake_up(&mut self) -> Result<(), Self::Error> {
        log::debug!("Wake up");
        // always the same full sequence, wherever the panel was
        self.transition(PanelState::Uninitialized, PanelState::Awake, Self::init)?;
        log::debug!("Woken up");
        Ok(())
    }

    fn sleep(&mut self) -> Result<(), Self::Error> {
        self.expect_state(PanelState::Awake)?;
        log::debug!("Sleep");
        self.transition(PanelState::Awake, PanelState::Asleep, |epd| {
            epd.interface.send(Command::PowerOff, &[])?;
            epd.interface.send(Command::DeepSleep, &[0xA5])
        })?;
        log::debug!("Slept");
        Ok(())
    }

    fn display_frame(&mut self, image: &[u8]) -> Result<(), Self::Error> {
        if image.len() != FRAME_LEN {
            return Err(ErrorKind::InvalidBufferSize {
                expected: FRAME_LEN,
                actual: image.len(),
            });
        }
        self.expect_state(PanelState::Awake)?;
        log::debug!("Update");

        encoder::encode_into(
            image,
            WIDTH as usize,
            HEIGHT as usize,
            self.config.sampling,
            &mut self.plane_a,
            &mut self.plane_b,
        )?;

        self.transition(PanelState::Displaying, PanelState::Awake, |epd| {
            let Epd4in2Gray {
                interface,
                plane_a,
                plane_b,
                ..
            } = epd;
            Self::send_planes(interface, &plane_a[..], &plane_b[..])
        })?;
        log::debug!("Updated");
        Ok(())
    }

    fn clear_frame(&mut self) -> Result<(), Self::Error> {
        self.expect_state(PanelState::Awake)?;
        log::debug!("Clear");
        self.transition(PanelState::Clearing, PanelState::Awake, |epd| {
            Self::send_planes(&mut epd.interface, &WHITE_PLANE, &WHITE_PLANE)
        })?;
        log::debug!("Cleared");
        Ok(())
    }

    fn wait_until_idle(&mut self) -> Result<(), Self::Error> {
        self.interface.wait_until_idle()
    }

    fn state(&self) -> PanelState {
        self.state
    }

    fn width(&self) -> u32 {
        WIDTH
    }

    fn height(&self) -> u32 {
        HEIGHT
    }
}
