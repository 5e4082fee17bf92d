//! Recording fakes for the bus and the panel lines.
//!
//! The strict mocks of `embedded-hal-mock` get unwieldy for whole power cycles,
//! so the state machine tests run against these instead. The bus and every line
//! share one [`Wire`], which turns the Enable/Mode levels back into the
//! `(opcode, payload)` pairs that went out.

extern crate std;

use std::{cell::RefCell, rc::Rc, vec::Vec};

use embedded_hal::{
    digital::{self, InputPin, OutputPin},
    spi::{self, SpiBus},
};
use embedded_hal_mock::eh1::delay::NoopDelay;

use crate::config::Config;
use crate::epd4in2_gray::Epd4in2Gray;

#[derive(Default)]
struct Wire {
    cs_low: bool,
    dc_high: bool,
    rst_high: bool,
    open: Option<(u8, Vec<u8>)>,
    sends: Vec<(u8, Vec<u8>)>,
    resets: usize,
    stuck_busy: bool,
    failing_spi: bool,
}

#[derive(Clone, Copy)]
pub(crate) enum Line {
    Cs,
    Busy,
    Dc,
    Rst,
    Led,
}

/// Handle on the shared wire, kept by the test after the fakes moved into the driver
#[derive(Clone, Default)]
pub(crate) struct Recorder(Rc<RefCell<Wire>>);

impl Recorder {
    /// Every completed transaction so far
    pub(crate) fn sends(&self) -> Vec<(u8, Vec<u8>)> {
        self.0.borrow().sends.clone()
    }

    pub(crate) fn opcodes(&self) -> Vec<u8> {
        self.0.borrow().sends.iter().map(|(op, _)| *op).collect()
    }

    /// Falling edges seen on the reset line
    pub(crate) fn resets(&self) -> usize {
        self.0.borrow().resets
    }

    pub(crate) fn forget(&self) {
        self.0.borrow_mut().sends.clear();
    }

    pub(crate) fn set_stuck_busy(&self, stuck: bool) {
        self.0.borrow_mut().stuck_busy = stuck;
    }

    pub(crate) fn set_failing_spi(&self, failing: bool) {
        self.0.borrow_mut().failing_spi = failing;
    }

    pub(crate) fn spi(&self) -> FakeSpi {
        FakeSpi(self.clone())
    }

    pub(crate) fn pin(&self, line: Line) -> FakePin {
        FakePin {
            wire: self.clone(),
            line,
        }
    }
}

pub(crate) struct FakeSpi(Recorder);

impl spi::ErrorType for FakeSpi {
    type Error = spi::ErrorKind;
}

impl SpiBus for FakeSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let mut wire = self.0 .0.borrow_mut();
        if wire.failing_spi {
            return Err(spi::ErrorKind::Other);
        }
        assert!(wire.cs_low, "write outside of a chip select window");

        if wire.dc_high {
            wire.open
                .as_mut()
                .expect("data without a command")
                .1
                .extend_from_slice(words);
        } else {
            assert_eq!(words.len(), 1, "a command is a single byte");
            assert!(wire.open.is_none(), "two commands in one window");
            wire.open = Some((words[0], Vec::new()));
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.write(write)?;
        self.read(read)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.write(words)?;
        self.read(words)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub(crate) struct FakePin {
    wire: Recorder,
    line: Line,
}

impl FakePin {
    fn set(&mut self, high: bool) {
        let mut wire = self.wire.0.borrow_mut();
        match self.line {
            Line::Cs => {
                wire.cs_low = !high;
                if high {
                    if let Some(send) = wire.open.take() {
                        wire.sends.push(send);
                    }
                }
            }
            Line::Dc => wire.dc_high = high,
            Line::Rst => {
                if wire.rst_high && !high {
                    wire.resets += 1;
                }
                wire.rst_high = high;
            }
            Line::Busy | Line::Led => {}
        }
    }
}

impl digital::ErrorType for FakePin {
    type Error = digital::ErrorKind;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true);
        Ok(())
    }
}

impl InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.wire.0.borrow().stuck_busy)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.wire.0.borrow().stuck_busy)
    }
}

pub(crate) type FakeEpd = Epd4in2Gray<FakeSpi, FakePin, FakePin, FakePin, FakePin, FakePin, NoopDelay>;

/// A driver on fresh fakes, together with the recorder watching them
pub(crate) fn fake_epd(config: Config) -> (FakeEpd, Recorder) {
    let wire = Recorder::default();
    let epd = Epd4in2Gray::new(
        wire.spi(),
        wire.pin(Line::Cs),
        wire.pin(Line::Busy),
        wire.pin(Line::Dc),
        wire.pin(Line::Rst),
        wire.pin(Line::Led),
        NoopDelay::new(),
        config,
    )
    .unwrap();
    (epd, wire)
}
