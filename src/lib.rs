//! A Driver for the Waveshare 4.2" E-Ink Display in four level grayscale mode via SPI
//!
//! This driver was built using [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1.0.0
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - 4 MHz works reliably on a Raspberry Pi
//! - Chip select is a plain output line driven by the driver, so the bus is a
//!   [`SpiBus`](embedded_hal::spi::SpiBus) and not a `SpiDevice`
//!
//! ### Other....
//!
//! - Frames are 8-bit grayscale, one byte per pixel, row major: `400 * 300` bytes.
//!   Only the two most significant bits of each sample reach the panel.
//! - A status LED line blinks while the panel is busy.
//!
//! # Examples
//!
//! ```ignore
//! use epd4in2_gray::{epd4in2_gray::*, prelude::*};
//!
//! let mut epd = Epd4in2Gray::new(spi, cs, busy, dc, rst, led, delay, Config::default())?;
//!
//! let mut display = Display4in2Gray::default();
//!
//! // draw something into the buffer
//!
//! epd.wake_up()?;
//! epd.display_frame(display.buffer())?;
//!
//! // wait and look at the image
//!
//! epd.clear_frame()?;
//!
//! epd.sleep()?;
//! ```
//!
//! With the `linux` feature, [`linux::open`] builds the driver from spidev and
//! sysfs GPIO lines.
#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "graphics")]
pub mod graphics;

pub mod traits;

pub mod color;

pub mod config;

pub mod error;

/// Interface for the physical connection between display and the controlling device
mod interface;

pub mod epd4in2_gray;

pub mod dashboard;

#[cfg(feature = "linux")]
pub mod linux;

#[cfg(test)]
pub(crate) mod testing;

pub mod prelude {
    pub use crate::color::Shade;
    pub use crate::config::{Config, Sampling};
    pub use crate::dashboard::{Dashboard, Renderer};
    pub use crate::error::ErrorKind;
    pub use crate::traits::{ErrorType, GrayscaleDisplay, PanelState};
    pub use crate::SPI_MODE;

    #[cfg(feature = "graphics")]
    pub use crate::graphics::{DisplayRotation, GrayDisplay};
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};
