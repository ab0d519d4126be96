//! Driver library for the Solomon Systech SSD1306 128x64 monochrome OLED controller over 4-wire
//! SPI.
//!
//! The caller configures clocks, pins and the SPI peripheral, wraps them in a transport such as
//! `SpiInterface`, and hands it to a `DisplayDriver`. After `initialize()`, full frames are written
//! with `draw_frame()`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate embedded_hal as hal;

pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod interface;
pub mod pattern;

// Re-exports for primary API.
pub use command::consts;
pub use command::{ComPinLayout, ComScanDirection};
pub use config::{BusConfig, Config, Prescaler, ResetTiming};
pub use display::{DisplayDriver, FrameBuffer, State};
pub use error::{Error, PollStage};
pub use interface::bus::{FullDuplexBus, PollBudget, SerialBus};
pub use interface::spi::SpiInterface;
pub use interface::SpiLink;
