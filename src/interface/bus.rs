//! Non-blocking bus primitives and the bounded poll loop that turns them into a blocking
//! exchange.

use crate::error::{Error, PollStage};

/// The three status-flag waits of one SPI byte exchange, each as a non-blocking step which
/// returns `WouldBlock` until the hardware is ready.
pub trait SerialBus {
    type Error;

    /// Write `byte` once the transmit buffer is empty.
    fn send(&mut self, byte: u8) -> nb::Result<(), Self::Error>;
    /// Read the received byte once one is available.
    fn read(&mut self) -> nb::Result<u8, Self::Error>;
    /// Complete once the bus is no longer busy.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}

/// Adapts an embedded-hal full-duplex SPI peripheral to `SerialBus`. The HAL does not expose a
/// busy flag, and its `read` only completes after the frame has been clocked, so `flush` is
/// immediate.
pub struct FullDuplexBus<SPI> {
    spi: SPI,
}

impl<SPI> FullDuplexBus<SPI>
where
    SPI: hal::spi::FullDuplex<u8>,
{
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> SerialBus for FullDuplexBus<SPI>
where
    SPI: hal::spi::FullDuplex<u8>,
{
    type Error = SPI::Error;

    fn send(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.spi.send(byte)
    }

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        self.spi.read()
    }

    // FullDuplex has no view of BSY; the received byte is as close as it gets.
    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }
}

/// Bound on how many times a single status wait may observe `WouldBlock`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollBudget {
    /// Spin until the hardware is ready, however long that takes.
    Unbounded,
    /// Give up with `Error::TransportTimeout` after this many unsuccessful polls.
    Bounded(u32),
}

impl Default for PollBudget {
    fn default() -> Self {
        PollBudget::Bounded(100_000)
    }
}

/// Call `f` until it stops returning `WouldBlock` or the budget is spent.
pub(crate) fn poll<T, E, F>(budget: PollBudget, stage: PollStage, mut f: F) -> Result<T, Error>
where
    F: FnMut() -> nb::Result<T, E>,
{
    let mut remaining = match budget {
        PollBudget::Unbounded => None,
        PollBudget::Bounded(n) => Some(n),
    };
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(nb::Error::Other(_)) => return Err(Error::Bus),
            Err(nb::Error::WouldBlock) => match remaining {
                Some(0) => return Err(Error::TransportTimeout(stage)),
                Some(ref mut n) => *n -= 1,
                None => {}
            },
        }
    }
}
