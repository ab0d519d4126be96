//! The main API to the display driver. It runs the bring-up sequence, frames every command and
//! data transaction on the link, and streams full frames of image data.

use log::{debug, error, trace, warn};

use crate::command::consts::*;
use crate::command::*;
use crate::config::Config;
use crate::error::{Error, PollStage};
use crate::interface::SpiLink;

/// One full frame of image data: all 128 column bytes of page 0, then page 1, and so on.
pub type FrameBuffer = [u8; FRAME_SIZE];

/// Lifecycle of the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// `initialize` has not completed yet.
    Uninitialized,
    /// The controller is configured and accepts frames.
    Ready,
    /// The transport failed part way through an operation. The controller state is unknown
    /// until `initialize` is called again.
    Faulted,
}

#[derive(Clone, Copy)]
enum Framing {
    Command,
    Data,
}

/// A driver for an SSD1306 display. It owns its link exclusively; sharing the bus with other
/// devices must be arbitrated outside the driver, around whole calls.
pub struct DisplayDriver<L>
where
    L: SpiLink,
{
    link: L,
    config: Config,
    state: State,
}

impl<L> DisplayDriver<L>
where
    L: SpiLink,
{
    /// Construct a new display driver talking to the controller over `link`. Nothing is sent
    /// until `initialize`.
    pub fn new(link: L, config: Config) -> Self {
        DisplayDriver {
            link,
            config,
            state: State::Uninitialized,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Hand the link back, consuming the driver.
    pub fn release(self) -> L {
        self.link
    }

    /// Reset the controller and send the bring-up sequence. Safe to call again from any state,
    /// since it always starts with a hardware reset.
    ///
    /// Configuration values the controller cannot accept are reported as
    /// `Error::InvalidArgument` before the reset pulse, leaving the state unchanged.
    pub fn initialize(&mut self) -> Result<(), Error> {
        let sequence = self.config.bring_up_sequence();
        let mut buf = [0u8; MAX_COMMAND_LEN];
        for cmd in sequence.iter() {
            cmd.encode(&mut buf)?;
        }

        let result = self.bring_up(&sequence);
        self.track(result)?;
        self.state = State::Ready;
        debug!("display ready");
        Ok(())
    }

    fn bring_up(&mut self, sequence: &[Command]) -> Result<(), Error> {
        let reset = self.config.reset;
        debug!(
            "reset pulse: low {}us, settle {}us",
            reset.low_us(),
            reset.settle_us()
        );
        self.link.reset_pulse(reset.low_us(), reset.settle_us())?;
        for cmd in sequence {
            self.command(*cmd)?;
        }
        Ok(())
    }

    /// Write one full frame to the display RAM. The frame must be exactly `FRAME_SIZE` bytes,
    /// page-major; anything else is rejected before the bus is touched.
    ///
    /// A write that times out is started over from the addressing window, since the controller's
    /// RAM pointer has already advanced past whatever got through.
    pub fn draw_frame(&mut self, frame: &[u8]) -> Result<(), Error> {
        if frame.len() != FRAME_SIZE {
            return Err(Error::SizeMismatch {
                expected: FRAME_SIZE,
                actual: frame.len(),
            });
        }
        self.ensure_ready()?;
        let mut attempt = 0;
        let result = loop {
            match self.write_frame(frame) {
                Err(Error::TransportTimeout(stage)) if attempt < self.config.retries => {
                    attempt += 1;
                    warn!(
                        "frame write timed out at {:?}, rewriting window, retry {}/{}",
                        stage, attempt, self.config.retries
                    );
                }
                result => break result,
            }
        };
        self.track(result)
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<(), Error> {
        self.send_command(Command::SetColumnAddress(0, COLUMN_MAX), 0)?;
        self.send_command(Command::SetPageAddress(0, PAGE_MAX), 0)?;
        framed(&mut self.link, Framing::Data, frame)
    }

    /// Control the contrast.
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), Error> {
        self.ready_command(Command::SetContrast(contrast))
    }

    /// Turn the panel on, or put it to sleep. Display RAM is retained while asleep.
    pub fn set_display_on(&mut self, on: bool) -> Result<(), Error> {
        self.ready_command(Command::DisplayOn(on))
    }

    /// Show the RAM contents inverted.
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), Error> {
        self.ready_command(Command::Invert(inverted))
    }

    fn ready_command(&mut self, cmd: Command) -> Result<(), Error> {
        self.ensure_ready()?;
        let result = self.command(cmd);
        self.track(result)
    }

    fn ensure_ready(&self) -> Result<(), Error> {
        match self.state {
            State::Ready => Ok(()),
            _ => Err(Error::NotReady),
        }
    }

    /// Move to `Faulted` if `result` is a transport failure.
    fn track(&mut self, result: Result<(), Error>) -> Result<(), Error> {
        if let Err(e) = result {
            if let Error::TransportTimeout(_) | Error::Bus | Error::Pin = e {
                error!("display faulted: {}", e);
                self.state = State::Faulted;
            }
        }
        result
    }

    fn command(&mut self, cmd: Command) -> Result<(), Error> {
        let retries = self.config.retries;
        self.send_command(cmd, retries)
    }

    /// Send every byte of `cmd` as its own command transaction. A byte is only sent again when it
    /// timed out waiting for the transmit buffer: past that point it has been clocked out, and a
    /// second copy would be taken as the next command byte.
    fn send_command(&mut self, cmd: Command, retries: u8) -> Result<(), Error> {
        let mut buf = [0u8; MAX_COMMAND_LEN];
        let bytes = cmd.encode(&mut buf)?;
        trace!("{:?} -> {:02X?}", cmd, bytes);
        for &byte in bytes {
            let mut attempt = 0;
            loop {
                match framed(&mut self.link, Framing::Command, &[byte]) {
                    Err(Error::TransportTimeout(PollStage::TransmitReady)) if attempt < retries => {
                        attempt += 1;
                        warn!(
                            "command byte {:02X} not sent, retry {}/{}",
                            byte, attempt, retries
                        );
                    }
                    result => {
                        result?;
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

/// select, set mode, exchange `bytes`, deselect.
fn framed<L>(link: &mut L, framing: Framing, bytes: &[u8]) -> Result<(), Error>
where
    L: SpiLink,
{
    link.select()?;
    let sent = match framing {
        Framing::Command => link.set_command_mode(),
        Framing::Data => link.set_data_mode(),
    }
    .and_then(|_| bytes.iter().try_for_each(|&b| link.exchange(b).map(|_| ())));
    // Chip-select is released even when the exchange failed.
    let released = link.deselect();
    sent.and(released)
}
