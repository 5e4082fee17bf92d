//! Wiring for a Raspberry Pi running Linux: spidev for the bus, sysfs for the lines.
//!
//! Activate SPI in raspi-config. Exporting sysfs GPIOs usually needs root.

use std::{
    format,
    path::Path,
    string::{String, ToString},
    thread,
    time::Duration,
    vec::Vec,
};

use linux_embedded_hal::{
    spidev::{SpiModeFlags, SpidevOptions},
    sysfs_gpio::Direction,
    Delay, SpidevBus, SysfsPin,
};

use crate::config::Config;
use crate::epd4in2_gray::Epd4in2Gray;
use crate::traits::{ErrorType, GrayscaleDisplay, PanelState};

/// The driver on spidev and sysfs lines
pub type LinuxDriver =
    Epd4in2Gray<SpidevBus, SysfsPin, SysfsPin, SysfsPin, SysfsPin, SysfsPin, Delay>;

/// Errors raised while bringing up the hardware, before the panel is touched
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The GPIO kernel driver is missing, this isn't (or doesn't look like) a Pi
    #[error("GPIO driver not found at {0}")]
    HardwareAbsent(String),
    /// The SPI device couldn't be opened or configured
    #[error("SPI device {path}: {reason}")]
    Spi {
        /// Device node
        path: String,
        /// What went wrong
        reason: String,
    },
    /// A GPIO line couldn't be exported or configured
    #[error("GPIO {pin}: {reason}")]
    Gpio {
        /// BCM number of the line
        pin: u64,
        /// What went wrong
        reason: String,
    },
    /// The driver refused the lines
    #[error("driver setup failed: {0}")]
    Driver(String),
}

/// BCM numbers of the panel lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    /// Enable (chip select), driven by the driver, not by spidev
    pub enable: u64,
    /// Reset, pulsed on every wake up
    pub reset: u64,
    /// Busy input, low while the panel works
    pub busy: u64,
    /// Data/command select
    pub mode: u64,
    /// Status LED
    pub indicator: u64,
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            enable: 8,
            reset: 17,
            busy: 24,
            mode: 25,
            indicator: 27,
        }
    }
}

/// Where and how to reach the panel
#[derive(Debug, Clone)]
pub struct LinuxConfig {
    /// spidev device node
    pub spi_path: String,
    /// Bus clock
    pub spi_hz: u32,
    /// Line numbers
    pub pins: PinMap,
    /// Probed before any line is opened
    pub gpio_driver: String,
    /// Passed on to the driver
    pub driver: Config,
}

impl Default for LinuxConfig {
    fn default() -> Self {
        Self {
            spi_path: "/dev/spidev0.0".to_string(),
            spi_hz: 4_000_000,
            pins: PinMap::default(),
            gpio_driver: "/sys/bus/platform/drivers/gpiomem-bcm2835".to_string(),
            driver: Config::default(),
        }
    }
}

/// Fails with [`SetupError::HardwareAbsent`] unless the GPIO kernel driver is present
pub fn probe_gpio_driver(path: &str) -> Result<(), SetupError> {
    if Path::new(path).exists() {
        log::debug!("GPIO driver found at {}", path);
        Ok(())
    } else {
        log::warn!("GPIO driver not found at {}", path);
        Err(SetupError::HardwareAbsent(path.to_string()))
    }
}

/// The driver together with the sysfs lines it was built on.
///
/// Dropping it parks the lines first (see the driver) and then unexports all five.
pub struct LinuxEpd {
    // field order is drop order: park the lines, then give them back
    epd: LinuxDriver,
    _exported: ExportedLines,
}

impl LinuxEpd {
    /// The configuration the driver was built with
    pub fn config(&self) -> &Config {
        self.epd.config()
    }
}

impl ErrorType for LinuxEpd {
    type Error = <LinuxDriver as ErrorType>::Error;
}

impl GrayscaleDisplay for LinuxEpd {
    fn wake_up(&mut self) -> Result<(), Self::Error> {
        self.epd.wake_up()
    }

    fn sleep(&mut self) -> Result<(), Self::Error> {
        self.epd.sleep()
    }

    fn display_frame(&mut self, image: &[u8]) -> Result<(), Self::Error> {
        self.epd.display_frame(image)
    }

    fn clear_frame(&mut self) -> Result<(), Self::Error> {
        self.epd.clear_frame()
    }

    fn wait_until_idle(&mut self) -> Result<(), Self::Error> {
        self.epd.wait_until_idle()
    }

    fn state(&self) -> PanelState {
        self.epd.state()
    }

    fn width(&self) -> u32 {
        self.epd.width()
    }

    fn height(&self) -> u32 {
        self.epd.height()
    }
}

/// Line numbers exported so far, unexported again on drop
struct ExportedLines {
    pins: Vec<u64>,
    release: fn(u64),
}

impl ExportedLines {
    fn new(release: fn(u64)) -> Self {
        Self {
            pins: Vec::new(),
            release,
        }
    }
}

impl Drop for ExportedLines {
    fn drop(&mut self) {
        for &pin in self.pins.iter().rev() {
            (self.release)(pin);
        }
    }
}

/// The five lines in driver order
struct Lines<P> {
    cs: P,
    busy: P,
    dc: P,
    rst: P,
    led: P,
}

/// Exports the lines one by one, recording each success in `exported`
fn export_lines<P>(
    pins: &PinMap,
    exported: &mut ExportedLines,
    mut export: impl FnMut(u64, Direction) -> Result<P, SetupError>,
) -> Result<Lines<P>, SetupError> {
    let mut line = |pin: u64, direction: Direction| -> Result<P, SetupError> {
        let line = export(pin, direction)?;
        exported.pins.push(pin);
        Ok(line)
    };

    Ok(Lines {
        cs: line(pins.enable, Direction::High)?,
        busy: line(pins.busy, Direction::In)?,
        dc: line(pins.mode, Direction::Low)?,
        rst: line(pins.reset, Direction::High)?,
        led: line(pins.indicator, Direction::Low)?,
    })
}

/// Opens the bus and the five lines and builds the (still uninitialized) driver.
///
/// Lines exported before a failing step are unexported again.
pub fn open(config: &LinuxConfig) -> Result<LinuxEpd, SetupError> {
    probe_gpio_driver(&config.gpio_driver)?;

    let spi = open_spi(&config.spi_path, config.spi_hz)?;

    let mut exported = ExportedLines::new(unexport);
    let Lines {
        cs,
        busy,
        dc,
        rst,
        led,
    } = export_lines(&config.pins, &mut exported, export)?;

    let epd = Epd4in2Gray::new(spi, cs, busy, dc, rst, led, Delay {}, config.driver)
        .map_err(|err| SetupError::Driver(err.to_string()))?;

    Ok(LinuxEpd {
        epd,
        _exported: exported,
    })
}

fn open_spi(path: &str, hz: u32) -> Result<SpidevBus, SetupError> {
    let spi_error = |reason: String| SetupError::Spi {
        path: path.to_string(),
        reason,
    };

    let mut spi = SpidevBus::open(path).map_err(|err| spi_error(err.to_string()))?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(hz)
        // chip select is one of our lines
        .mode(SpiModeFlags::SPI_MODE_0 | SpiModeFlags::SPI_NO_CS)
        .build();
    spi.configure(&options)
        .map_err(|err| spi_error(err.to_string()))?;

    log::debug!("Opened {} at {} Hz", path, hz);
    Ok(spi)
}

fn export(pin: u64, direction: Direction) -> Result<SysfsPin, SetupError> {
    let gpio_error = |reason: String| SetupError::Gpio { pin, reason };

    let line = SysfsPin::new(pin);
    line.export().map_err(|err| gpio_error(err.to_string()))?;

    // udev needs a moment before the attribute files become writable
    let mut tries = 0;
    while !line.is_exported() {
        tries += 1;
        if tries > 100 {
            return Err(gpio_error(format!("not exported after {tries} tries")));
        }
        thread::sleep(Duration::from_millis(10));
    }
    line.set_direction(direction)
        .map_err(|err| gpio_error(err.to_string()))?;

    Ok(line)
}

fn unexport(pin: u64) {
    match SysfsPin::new(pin).unexport() {
        Ok(()) => log::debug!("Unexported GPIO {}", pin),
        Err(err) => log::warn!("Unexporting GPIO {} failed: {}", pin, err),
    }
}
