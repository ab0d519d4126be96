//! The SPI interface supports the "4-wire" interface of the controller: 8-bit words on the bus,
//! a D/C GPIO selecting between command and data, plus chip-select and reset GPIOs.

use hal::blocking::delay::DelayUs;
use hal::digital::v2::OutputPin;

use super::bus::{poll, PollBudget, SerialBus};
use super::SpiLink;
use crate::error::{Error, PollStage};

pub struct SpiInterface<BUS, CS, DC, RST, DELAY> {
    /// The SPI master connected to the SSD1306.
    bus: BUS,
    /// Chip-select, active low.
    cs: CS,
    /// Data/command select: low for command, high for data.
    dc: DC,
    /// Hardware reset, active low.
    rst: RST,
    delay: DELAY,
    budget: PollBudget,
}

impl<BUS, CS, DC, RST, DELAY> SpiInterface<BUS, CS, DC, RST, DELAY>
where
    BUS: SerialBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayUs<u32>,
{
    /// Create a new SPI transport. The peripheral and pins must already be configured (SPI mode
    /// 3, 8-bit frames, MSB first; push-pull outputs for the three control lines).
    ///
    /// The busy wait at the end of each exchange is only as good as the bus's `flush`. A
    /// `FullDuplexBus` cannot see the peripheral's BSY flag and reports idle at once, so chip-select
    /// may rise while the last bit is still shifting out. On an MCU with a busy flag, implement
    /// `SerialBus` over the peripheral registers instead.
    pub fn new(bus: BUS, cs: CS, dc: DC, rst: RST, delay: DELAY) -> Self {
        Self {
            bus,
            cs,
            dc,
            rst,
            delay,
            budget: PollBudget::default(),
        }
    }

    /// Replace the bound applied to each status poll of an exchange.
    pub fn with_poll_budget(self, budget: PollBudget) -> Self {
        Self { budget, ..self }
    }

    /// Give back the bus, pins and delay.
    pub fn release(self) -> (BUS, CS, DC, RST, DELAY) {
        (self.bus, self.cs, self.dc, self.rst, self.delay)
    }
}

impl<BUS, CS, DC, RST, DELAY> SpiLink for SpiInterface<BUS, CS, DC, RST, DELAY>
where
    BUS: SerialBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayUs<u32>,
{
    fn exchange(&mut self, byte: u8) -> Result<u8, Error> {
        let budget = self.budget;
        let bus = &mut self.bus;
        poll(budget, PollStage::TransmitReady, || bus.send(byte))?;
        let received = poll(budget, PollStage::ReceiveReady, || bus.read())?;
        // Returning before BSY clears lets the caller raise CS while the last bit is still on
        // the wire.
        poll(budget, PollStage::BusIdle, || bus.flush())?;
        Ok(received)
    }

    fn select(&mut self) -> Result<(), Error> {
        self.cs.set_low().map_err(|_| Error::Pin)
    }

    fn deselect(&mut self) -> Result<(), Error> {
        self.cs.set_high().map_err(|_| Error::Pin)
    }

    fn set_data_mode(&mut self) -> Result<(), Error> {
        self.dc.set_high().map_err(|_| Error::Pin)
    }

    fn set_command_mode(&mut self) -> Result<(), Error> {
        self.dc.set_low().map_err(|_| Error::Pin)
    }

    fn reset_pulse(&mut self, low_us: u32, high_us: u32) -> Result<(), Error> {
        self.deselect()?;
        self.set_data_mode()?;
        self.rst.set_low().map_err(|_| Error::Pin)?;
        self.delay.delay_us(low_us);
        self.rst.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_us(high_us);
        Ok(())
    }
}
