//! The command set for the SSD1306.
//!
//! The display RAM of the SSD1306 is 128 columns by 64 rows, grouped into 8 pages of 8 rows.
//! Each byte of image data covers one column of one page, with the least significant bit at the
//! top row of the page.

use crate::error::Error;

pub mod consts {
    pub const WIDTH: u8 = 128;
    pub const HEIGHT: u8 = 64;
    pub const PAGES: u8 = HEIGHT / 8;
    pub const COLUMN_MAX: u8 = WIDTH - 1;
    pub const PAGE_MAX: u8 = PAGES - 1;
    pub const ROW_MAX: u8 = HEIGHT - 1;
    /// Number of bytes in one full frame of image data.
    pub const FRAME_SIZE: usize = PAGES as usize * WIDTH as usize;
}

use self::consts::*;

/// Longest encoded command, in bytes.
pub const MAX_COMMAND_LEN: usize = 3;

/// How the RAM address pointer advances as image data is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    /// Column increments, wrapping to the next page at the end of the column window.
    Horizontal,
    /// Page increments, wrapping to the next column at the end of the page window.
    Vertical,
    /// Column increments within a single page and does not wrap.
    Page,
}

/// Direction of the COM line scan. Changing this setting flips the image vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComScanDirection {
    /// Scan from COM0 to COM[N-1].
    Normal,
    /// Scan from COM[N-1] to COM0.
    Remapped,
}

/// Hardware wiring of the COM pins to the panel rows. This is dictated by the display module;
/// see its datasheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComPinLayout {
    Sequential,
    Alternative,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Turn the panel on (`true`) or put it to sleep (`false`).
    DisplayOn(bool),
    /// Light every pixel regardless of RAM contents (`true`), or follow RAM (`false`).
    EntireDisplayOn(bool),
    /// Invert the meaning of RAM bits.
    Invert(bool),
    /// Set the contrast. Range 0-255.
    SetContrast(u8),
    /// Set the memory addressing mode. Must be set before image data is written.
    SetAddressingMode(AddressingMode),
    /// Set the column start and end address for horizontal or vertical addressing mode. Range
    /// 0-127, start <= end.
    SetColumnAddress(u8, u8),
    /// Set the page start and end address for horizontal or vertical addressing mode. Range
    /// 0-7, start <= end.
    SetPageAddress(u8, u8),
    /// Set the RAM row shown on the first display line. Range 0-63.
    SetStartLine(u8),
    /// Map column address 127 to SEG0 (`true`) instead of column address 0 (`false`).
    SetSegmentRemap(bool),
    /// Set the number of active COM lines. Range 16-64.
    SetMuxRatio(u8),
    SetComScanDirection(ComScanDirection),
    /// Set the vertical COM shift. Range 0-63.
    SetDisplayOffset(u8),
    /// Set the COM pin hardware layout and whether the left/right halves are swapped.
    SetComPins(ComPinLayout, bool),
    /// Set the display clock divide ratio (1-16) and oscillator frequency setting (0-15).
    SetClockDivide(u8, u8),
    /// Set the pre-charge phase 1 and phase 2 lengths, each 1-15 DCLKs.
    SetPrechargePeriod(u8, u8),
    /// Set the raw VCOMH deselect level register. Only bits 6:4 are meaningful; 0x00, 0x20 and
    /// 0x30 are the documented levels, 0x40 is the level most module vendors use.
    SetVcomhDeselect(u8),
    /// Enable or disable the internal charge pump.
    ChargePump(bool),
}

macro_rules! ok_command {
    ($buf:ident, [$($byte:expr),+]) => {{
        let mut len = 0;
        $(
            $buf[len] = $byte;
            len += 1;
        )+
        Ok(&$buf[..len])
    }};
}

impl Command {
    /// Encode the command into `buf`, returning the bytes to send in order. Out of range
    /// arguments are rejected with `Error::InvalidArgument`.
    pub fn encode(self, buf: &mut [u8; MAX_COMMAND_LEN]) -> Result<&[u8], Error> {
        match self {
            Command::DisplayOn(on) => ok_command!(buf, [if on { 0xAF } else { 0xAE }]),
            Command::EntireDisplayOn(on) => ok_command!(buf, [if on { 0xA5 } else { 0xA4 }]),
            Command::Invert(inv) => ok_command!(buf, [if inv { 0xA7 } else { 0xA6 }]),
            Command::SetContrast(contrast) => ok_command!(buf, [0x81, contrast]),
            Command::SetAddressingMode(mode) => {
                let m = match mode {
                    AddressingMode::Horizontal => 0x00,
                    AddressingMode::Vertical => 0x01,
                    AddressingMode::Page => 0x02,
                };
                ok_command!(buf, [0x20, m])
            }
            Command::SetColumnAddress(start, end) => match (start, end) {
                (0..=COLUMN_MAX, 0..=COLUMN_MAX) if start <= end => {
                    ok_command!(buf, [0x21, start, end])
                }
                _ => Err(Error::InvalidArgument),
            },
            Command::SetPageAddress(start, end) => match (start, end) {
                (0..=PAGE_MAX, 0..=PAGE_MAX) if start <= end => ok_command!(buf, [0x22, start, end]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetStartLine(line) => match line {
                0..=ROW_MAX => ok_command!(buf, [0x40 | line]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetSegmentRemap(remap) => ok_command!(buf, [if remap { 0xA1 } else { 0xA0 }]),
            Command::SetMuxRatio(ratio) => match ratio {
                16..=HEIGHT => ok_command!(buf, [0xA8, ratio - 1]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetComScanDirection(dir) => ok_command!(
                buf,
                [match dir {
                    ComScanDirection::Normal => 0xC0,
                    ComScanDirection::Remapped => 0xC8,
                }]
            ),
            Command::SetDisplayOffset(offset) => match offset {
                0..=ROW_MAX => ok_command!(buf, [0xD3, offset]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetComPins(layout, swap_halves) => {
                let alt = match layout {
                    ComPinLayout::Sequential => 0x00,
                    ComPinLayout::Alternative => 0x10,
                };
                let swap = if swap_halves { 0x20 } else { 0x00 };
                ok_command!(buf, [0xDA, 0x02 | alt | swap])
            }
            Command::SetClockDivide(divide, fosc) => match (divide, fosc) {
                (1..=16, 0..=15) => ok_command!(buf, [0xD5, fosc << 4 | (divide - 1)]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetPrechargePeriod(phase_1, phase_2) => match (phase_1, phase_2) {
                (1..=15, 1..=15) => ok_command!(buf, [0xD9, phase_2 << 4 | phase_1]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetVcomhDeselect(level) => match level & !0x70 {
                0 => ok_command!(buf, [0xDB, level]),
                _ => Err(Error::InvalidArgument),
            },
            Command::ChargePump(enable) => {
                ok_command!(buf, [0x8D, if enable { 0x14 } else { 0x10 }])
            }
        }
    }
}
