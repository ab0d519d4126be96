//! The transport between the driver and the controller: a blocking full-duplex byte exchange
//! plus the chip-select, data/command and reset lines.
//!
//! The driver only ever talks to a `SpiLink`. `SpiInterface` is the provided implementation on
//! top of embedded-hal pins, a delay, and a `SerialBus`. Clock, pin-mode and SPI peripheral
//! setup are the caller's job and must be done before the transport is constructed.

pub mod bus;
pub mod spi;
#[cfg(test)]
pub mod test_spy;

use crate::error::Error;

/// A blocking transport to a command/data-streaming display controller.
///
/// Implementations hold no transaction state of their own; the driver is responsible for
/// bracketing every exchange with `select` and `deselect`.
pub trait SpiLink {
    /// Clock `byte` out and return the byte clocked in. Does not return until the bus is idle.
    fn exchange(&mut self, byte: u8) -> Result<u8, Error>;
    /// Assert chip-select (drive it low).
    fn select(&mut self) -> Result<(), Error>;
    /// Deassert chip-select (drive it high).
    fn deselect(&mut self) -> Result<(), Error>;
    /// Drive the data/command line high.
    fn set_data_mode(&mut self) -> Result<(), Error>;
    /// Drive the data/command line low.
    fn set_command_mode(&mut self) -> Result<(), Error>;
    /// Idle chip-select and data/command, hold reset low for `low_us`, then release it and wait
    /// `high_us` before returning.
    fn reset_pulse(&mut self, low_us: u32, high_us: u32) -> Result<(), Error>;

    /// Clock in one byte by sending a dummy `0xFF`.
    fn receive(&mut self) -> Result<u8, Error> {
        self.exchange(0xFF)
    }
}

impl<'a, L> SpiLink for &'a mut L
where
    L: SpiLink + ?Sized,
{
    fn exchange(&mut self, byte: u8) -> Result<u8, Error> {
        (**self).exchange(byte)
    }
    fn select(&mut self) -> Result<(), Error> {
        (**self).select()
    }
    fn deselect(&mut self) -> Result<(), Error> {
        (**self).deselect()
    }
    fn set_data_mode(&mut self) -> Result<(), Error> {
        (**self).set_data_mode()
    }
    fn set_command_mode(&mut self) -> Result<(), Error> {
        (**self).set_command_mode()
    }
    fn reset_pulse(&mut self, low_us: u32, high_us: u32) -> Result<(), Error> {
        (**self).reset_pulse(low_us, high_us)
    }
}
