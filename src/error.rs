//! Errors reported by the transport and the display driver.

use core::fmt;

/// The poll loop inside a byte exchange which ran out of budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollStage {
    /// Waiting for the transmit buffer to become empty before writing the byte.
    TransmitReady,
    /// Waiting for the byte clocked in during the exchange.
    ReceiveReady,
    /// Waiting for the bus to stop being busy after the exchange.
    BusIdle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A poll loop exceeded its `PollBudget`. The controller state is unknown afterwards and the
    /// display must be initialized again.
    TransportTimeout(PollStage),
    /// `draw_frame` was handed a buffer that is not exactly one frame long. Nothing was sent.
    SizeMismatch { expected: usize, actual: usize },
    /// Reserved for controllers which acknowledge their bring-up sequence. The SSD1306 is
    /// write-only, so this driver never reports it.
    InitializationFailed,
    /// The driver must be `Ready` (successfully initialized) for this operation.
    NotReady,
    /// A command parameter is outside the range the controller accepts.
    InvalidArgument,
    /// The SPI peripheral reported an error.
    Bus,
    /// A control line GPIO reported an error.
    Pin,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::TransportTimeout(stage) => write!(f, "transport timed out at {:?}", stage),
            Error::SizeMismatch { expected, actual } => write!(
                f,
                "frame buffer is {} bytes, expected {}",
                actual, expected
            ),
            Error::InitializationFailed => f.write_str("display initialization failed"),
            Error::NotReady => f.write_str("display is not initialized"),
            Error::InvalidArgument => f.write_str("command argument out of range"),
            Error::Bus => f.write_str("SPI bus error"),
            Error::Pin => f.write_str("control pin error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
