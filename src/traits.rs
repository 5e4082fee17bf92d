use core::fmt::Debug;

/// All commands need to have this trait which gives the address of the command
/// which needs to be send via SPI with activated CommandsPin (Data/Command Pin in CommandMode)
pub(crate) trait Command: Copy {
    fn address(self) -> u8;
}

/// Where the panel is in its power cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    /// Lines are configured but the panel was never powered up (or a transfer
    /// failed half way and it has to be woken up again)
    #[default]
    Uninitialized,
    /// Powered up with the waveform tables loaded
    Awake,
    /// A frame is being transmitted and refreshed
    Displaying,
    /// The white frame is being transmitted and refreshed
    Clearing,
    /// In deep sleep, only a wake up gets it out of here
    Asleep,
}

/// Error type of a display
pub trait ErrorType {
    /// Error returned by every fallible display operation
    type Error: Debug;
}

/// All the functions to interact with a four-level grayscale panel
///
/// The driver owns the bus and lines, so none of the calls take them as arguments.
///
/// # Example
///
///```rust, ignore
///use epd4in2_gray::{epd4in2_gray::*, prelude::*};
///
///let mut epd = Epd4in2Gray::new(spi, cs, busy, dc, rst, led, delay, Config::default())?;
///
///let mut display = Display4in2Gray::default();
///// draw something with embedded-graphics
///
///epd.wake_up()?;
///epd.display_frame(display.buffer())?;
///epd.sleep()?;
///```
pub trait GrayscaleDisplay: ErrorType {
    /// Resets the panel, powers it up and loads the waveform tables.
    ///
    /// Valid from every state, this is the way out of deep sleep.
    fn wake_up(&mut self) -> Result<(), Self::Error>;

    /// Powers the panel off and puts it into deep sleep
    fn sleep(&mut self) -> Result<(), Self::Error>;

    /// Encodes a full 8-bit grayscale frame (row major, one byte per pixel),
    /// transmits it and refreshes the panel.
    fn display_frame(&mut self, image: &[u8]) -> Result<(), Self::Error>;

    /// Transmits an all white frame and refreshes the panel
    fn clear_frame(&mut self) -> Result<(), Self::Error>;

    /// Wait until the display has stopped processing data
    fn wait_until_idle(&mut self) -> Result<(), Self::Error>;

    /// Current power state as tracked by the driver
    fn state(&self) -> PanelState;

    /// Get the width of the display
    fn width(&self) -> u32;

    /// Get the height of the display
    fn height(&self) -> u32;
}
