//! Configuration for the bus, the reset pulse, and the panel-specific registers written during
//! bring-up.

use hal::spi::{Mode, MODE_3};

use crate::command::*;

/// The SPI mode the SSD1306 expects in this wiring: clock idle high, sample on the second edge.
pub const MODE: Mode = MODE_3;

/// Minimum reset-low pulse width from the SSD1306 datasheet (tRES), in microseconds.
pub const MIN_RESET_LOW_US: u32 = 3;
/// Minimum time to hold reset high before the first command, in microseconds.
pub const MIN_RESET_SETTLE_US: u32 = 3;

/// Divider applied to the peripheral clock to derive the SPI clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prescaler {
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
    Div256,
}

impl Prescaler {
    pub fn divisor(self) -> u32 {
        match self {
            Prescaler::Div2 => 2,
            Prescaler::Div4 => 4,
            Prescaler::Div8 => 8,
            Prescaler::Div16 => 16,
            Prescaler::Div32 => 32,
            Prescaler::Div64 => 64,
            Prescaler::Div128 => 128,
            Prescaler::Div256 => 256,
        }
    }
}

/// SPI settings to apply to the HAL peripheral before constructing the transport. Frames are
/// always 8 bits, MSB first.
#[derive(Clone, Copy, PartialEq)]
pub struct BusConfig {
    pub mode: Mode,
    pub prescaler: Prescaler,
}

impl BusConfig {
    pub fn new(prescaler: Prescaler) -> Self {
        BusConfig {
            mode: MODE,
            prescaler,
        }
    }

    /// The SCK rate that results from a peripheral clock of `pclk_hz`.
    pub fn bit_rate(&self, pclk_hz: u32) -> u32 {
        pclk_hz / self.prescaler.divisor()
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfig::new(Prescaler::Div256)
    }
}

/// Durations of the hardware reset pulse issued at the start of bring-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResetTiming {
    low_us: u32,
    settle_us: u32,
}

impl ResetTiming {
    /// Values below the datasheet minimums are raised to them.
    pub fn new(low_us: u32, settle_us: u32) -> Self {
        ResetTiming {
            low_us: low_us.max(MIN_RESET_LOW_US),
            settle_us: settle_us.max(MIN_RESET_SETTLE_US),
        }
    }

    /// How long reset is held low.
    pub fn low_us(&self) -> u32 {
        self.low_us
    }

    /// How long to wait after reset is released before the first command.
    pub fn settle_us(&self) -> u32 {
        self.settle_us
    }
}

impl Default for ResetTiming {
    fn default() -> Self {
        ResetTiming::new(10_000, 10_000)
    }
}

/// A configuration for the display. The defaults match the common 128x64 module with internal
/// charge pump; builder methods override individual registers.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) reset: ResetTiming,
    pub(crate) retries: u8,
    clock_divide: (u8, u8),
    charge_pump: bool,
    segment_remap: bool,
    com_scan_direction: ComScanDirection,
    com_pins: (ComPinLayout, bool),
    contrast: u8,
    precharge: (u8, u8),
    vcomh: u8,
}

impl Config {
    pub fn new() -> Self {
        Config {
            reset: ResetTiming::default(),
            retries: 0,
            clock_divide: (1, 8),
            charge_pump: true,
            segment_remap: true,
            com_scan_direction: ComScanDirection::Remapped,
            com_pins: (ComPinLayout::Alternative, false),
            contrast: 0xCF,
            precharge: (1, 15),
            vcomh: 0x40,
        }
    }

    pub fn reset_timing(self, reset: ResetTiming) -> Self {
        Self { reset, ..self }
    }

    /// Retry an operation which timed out up to `retries` more times before giving up. A frame is
    /// rewritten from its addressing window; a command byte is only resent if it never left the
    /// transmit buffer.
    pub fn transaction_retries(self, retries: u8) -> Self {
        Self { retries, ..self }
    }

    /// See `Command::SetClockDivide`.
    pub fn clock_divide(self, divide: u8, fosc: u8) -> Self {
        Self {
            clock_divide: (divide, fosc),
            ..self
        }
    }

    /// Disable for modules which supply VCC externally.
    pub fn charge_pump(self, enable: bool) -> Self {
        Self {
            charge_pump: enable,
            ..self
        }
    }

    pub fn segment_remap(self, remap: bool) -> Self {
        Self {
            segment_remap: remap,
            ..self
        }
    }

    pub fn com_scan_direction(self, dir: ComScanDirection) -> Self {
        Self {
            com_scan_direction: dir,
            ..self
        }
    }

    /// See `Command::SetComPins`.
    pub fn com_pins(self, layout: ComPinLayout, swap_halves: bool) -> Self {
        Self {
            com_pins: (layout, swap_halves),
            ..self
        }
    }

    pub fn contrast(self, contrast: u8) -> Self {
        Self { contrast, ..self }
    }

    /// See `Command::SetPrechargePeriod`.
    pub fn precharge_period(self, phase_1: u8, phase_2: u8) -> Self {
        Self {
            precharge: (phase_1, phase_2),
            ..self
        }
    }

    /// See `Command::SetVcomhDeselect`.
    pub fn vcomh_deselect(self, level: u8) -> Self {
        Self {
            vcomh: level,
            ..self
        }
    }

    /// The bring-up command sequence for this configuration, in the order the controller
    /// requires. Geometry and addressing mode are fixed by the driver.
    pub(crate) fn bring_up_sequence(&self) -> [Command; 16] {
        [
            Command::DisplayOn(false),
            Command::SetClockDivide(self.clock_divide.0, self.clock_divide.1),
            Command::SetMuxRatio(consts::HEIGHT),
            Command::SetDisplayOffset(0),
            Command::SetStartLine(0),
            Command::ChargePump(self.charge_pump),
            Command::SetAddressingMode(AddressingMode::Horizontal),
            Command::SetSegmentRemap(self.segment_remap),
            Command::SetComScanDirection(self.com_scan_direction),
            Command::SetComPins(self.com_pins.0, self.com_pins.1),
            Command::SetContrast(self.contrast),
            Command::SetPrechargePeriod(self.precharge.0, self.precharge.1),
            Command::SetVcomhDeselect(self.vcomh),
            Command::EntireDisplayOn(false),
            Command::Invert(false),
            Command::DisplayOn(true),
        ]
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_timing_clamps_to_minimums() {
        let t = ResetTiming::new(0, 1);
        assert_eq!(t.low_us(), MIN_RESET_LOW_US);
        assert_eq!(t.settle_us(), MIN_RESET_SETTLE_US);
        let t = ResetTiming::new(500, 20_000);
        assert_eq!((t.low_us(), t.settle_us()), (500, 20_000));
    }

    #[test]
    fn bus_config() {
        let bus = BusConfig::default();
        assert!(bus.mode == MODE_3);
        assert_eq!(bus.prescaler, Prescaler::Div256);
        assert_eq!(bus.bit_rate(72_000_000), 281_250);
        assert_eq!(BusConfig::new(Prescaler::Div8).bit_rate(8_000_000), 1_000_000);
    }

    #[test]
    fn bring_up_sequence_follows_builder() {
        let seq = Config::new()
            .contrast(0x10)
            .charge_pump(false)
            .com_scan_direction(ComScanDirection::Normal)
            .bring_up_sequence();
        assert_eq!(seq[0], Command::DisplayOn(false));
        assert_eq!(seq[5], Command::ChargePump(false));
        assert_eq!(seq[8], Command::SetComScanDirection(ComScanDirection::Normal));
        assert_eq!(seq[10], Command::SetContrast(0x10));
        assert_eq!(seq[15], Command::DisplayOn(true));
    }
}
