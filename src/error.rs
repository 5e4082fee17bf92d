use core::fmt::{Debug, Display, Formatter};

use embedded_hal::{digital::ErrorType as PinErrorType, spi::ErrorType as SpiErrorType};

use crate::epd4in2_gray::encoder::SizeMismatch;
use crate::traits::PanelState;

/// Epd error type
pub enum ErrorKind<SPI, CS, BUSY, DC, RST, LED>
where
    SPI: SpiErrorType,
    CS: PinErrorType,
    BUSY: PinErrorType,
    DC: PinErrorType,
    RST: PinErrorType,
    LED: PinErrorType,
{
    /// Encountered an SPI error
    SpiError(SPI::Error),

    /// Encountered an error on the Enable (chip select) GPIO
    CsError(CS::Error),

    /// Encountered an error on Busy GPIO
    BusyError(BUSY::Error),

    /// Encountered an error on DC GPIO
    DcError(DC::Error),

    /// Encountered an error on RST GPIO
    RstError(RST::Error),

    /// Encountered an error on the indicator GPIO
    IndicatorError(LED::Error),

    /// The image handed over doesn't cover the full panel.
    ///
    /// Returned before anything is sent to the panel.
    InvalidBufferSize {
        /// Number of bytes a frame must have
        expected: usize,
        /// Number of bytes received
        actual: usize,
    },

    /// The busy line didn't report ready within the configured budget
    DeviceUnresponsive {
        /// Milliseconds spent waiting before giving up
        waited_ms: u32,
    },

    /// The operation isn't allowed in the current panel state
    InvalidState {
        /// State the operation needs
        expected: PanelState,
        /// State the driver was in
        actual: PanelState,
    },
}

impl<SPI, CS, BUSY, DC, RST, LED> ErrorKind<SPI, CS, BUSY, DC, RST, LED>
where
    SPI: SpiErrorType,
    CS: PinErrorType,
    BUSY: PinErrorType,
    DC: PinErrorType,
    RST: PinErrorType,
    LED: PinErrorType,
{
    /// True for errors raised by the bus or one of the lines.
    ///
    /// These leave the panel in an unknown state; the next step has to be a wake up.
    pub fn is_bus_failure(&self) -> bool {
        matches!(
            self,
            Self::SpiError(_)
                | Self::CsError(_)
                | Self::BusyError(_)
                | Self::DcError(_)
                | Self::RstError(_)
                | Self::IndicatorError(_)
        )
    }
}

impl<SPI, CS, BUSY, DC, RST, LED> From<SizeMismatch> for ErrorKind<SPI, CS, BUSY, DC, RST, LED>
where
    SPI: SpiErrorType,
    CS: PinErrorType,
    BUSY: PinErrorType,
    DC: PinErrorType,
    RST: PinErrorType,
    LED: PinErrorType,
{
    fn from(err: SizeMismatch) -> Self {
        Self::InvalidBufferSize {
            expected: err.expected,
            actual: err.actual,
        }
    }
}

impl<SPI, CS, BUSY, DC, RST, LED> Display for ErrorKind<SPI, CS, BUSY, DC, RST, LED>
where
    SPI: SpiErrorType,
    CS: PinErrorType,
    BUSY: PinErrorType,
    DC: PinErrorType,
    RST: PinErrorType,
    LED: PinErrorType,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => write!(f, "SPI error: {err:?}"),
            Self::CsError(err) => write!(f, "CS pin error: {err:?}"),
            Self::BusyError(err) => write!(f, "BUSY pin error: {err:?}"),
            Self::DcError(err) => write!(f, "DC pin error: {err:?}"),
            Self::RstError(err) => write!(f, "RST pin error: {err:?}"),
            Self::IndicatorError(err) => write!(f, "indicator pin error: {err:?}"),
            Self::InvalidBufferSize { expected, actual } => write!(
                f,
                "Buffer size mismatch: expected {expected} bytes, got {actual}"
            ),
            Self::DeviceUnresponsive { waited_ms } => {
                write!(f, "Panel still busy after {waited_ms} ms")
            }
            Self::InvalidState { expected, actual } => write!(
                f,
                "Panel must be {expected:?} for this operation, but is {actual:?}"
            ),
        }
    }
}

impl<SPI, CS, BUSY, DC, RST, LED> Debug for ErrorKind<SPI, CS, BUSY, DC, RST, LED>
where
    SPI: SpiErrorType,
    CS: PinErrorType,
    BUSY: PinErrorType,
    DC: PinErrorType,
    RST: PinErrorType,
    LED: PinErrorType,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => f.debug_tuple("SpiError").field(err).finish(),
            Self::CsError(err) => f.debug_tuple("CsError").field(err).finish(),
            Self::BusyError(err) => f.debug_tuple("BusyError").field(err).finish(),
            Self::DcError(err) => f.debug_tuple("DcError").field(err).finish(),
            Self::RstError(err) => f.debug_tuple("RstError").field(err).finish(),
            Self::IndicatorError(err) => f.debug_tuple("IndicatorError").field(err).finish(),
            Self::InvalidBufferSize { expected, actual } => f
                .debug_struct("InvalidBufferSize")
                .field("expected", expected)
                .field("actual", actual)
                .finish(),
            Self::DeviceUnresponsive { waited_ms } => f
                .debug_struct("DeviceUnresponsive")
                .field("waited_ms", waited_ms)
                .finish(),
            Self::InvalidState { expected, actual } => f
                .debug_struct("InvalidState")
                .field("expected", expected)
                .field("actual", actual)
                .finish(),
        }
    }
}

impl<SPI, CS, BUSY, DC, RST, LED> core::error::Error for ErrorKind<SPI, CS, BUSY, DC, RST, LED>
where
    SPI: SpiErrorType,
    CS: PinErrorType,
    BUSY: PinErrorType,
    DC: PinErrorType,
    RST: PinErrorType,
    LED: PinErrorType,
{
}
