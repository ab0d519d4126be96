//! An interface for use in unit tests to spy on whatever was sent to it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::SpiLink;
use crate::error::{Error, PollStage};

/// One raw call made on the link.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Call {
    Select,
    Deselect,
    CommandMode,
    DataMode,
    Exchange(u8),
    Reset(u32, u32),
}

/// A decoded unit of bus traffic: a reset pulse, or one bracketed transaction.
#[derive(Clone, Debug, PartialEq)]
pub enum Sent {
    Reset(u32, u32),
    Cmd(Vec<u8>),
    Data(Vec<u8>),
}

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Command,
    Data,
}

pub struct TestSpyInterface {
    calls: Rc<RefCell<Vec<Call>>>,
    /// Exchanges left to succeed before injected failures begin, if any are armed.
    ok_before_fault: Rc<Cell<Option<usize>>>,
    faults: Rc<Cell<usize>>,
    fail_stage: Rc<Cell<PollStage>>,
}

impl TestSpyInterface {
    pub fn new() -> Self {
        TestSpyInterface {
            calls: Rc::new(RefCell::new(Vec::new())),
            ok_before_fault: Rc::new(Cell::new(None)),
            faults: Rc::new(Cell::new(0)),
            fail_stage: Rc::new(Cell::new(PollStage::ReceiveReady)),
        }
    }

    /// Another handle onto the same spy, so one can be moved into the driver and the other kept
    /// for inspection.
    pub fn split(&self) -> Self {
        TestSpyInterface {
            calls: self.calls.clone(),
            ok_before_fault: self.ok_before_fault.clone(),
            faults: self.faults.clone(),
            fail_stage: self.fail_stage.clone(),
        }
    }

    /// Let `ok` more exchanges through, then time out the following `faults` exchanges after
    /// their byte has gone out.
    pub fn fail_exchanges(&self, ok: usize, faults: usize) {
        self.fail_exchanges_at(ok, faults, PollStage::ReceiveReady)
    }

    /// As `fail_exchanges`, timing out at `stage`. Failed bytes are recorded unless the failure
    /// is at `TransmitReady`, where nothing reached the wire.
    pub fn fail_exchanges_at(&self, ok: usize, faults: usize, stage: PollStage) {
        self.ok_before_fault.set(Some(ok));
        self.faults.set(faults);
        self.fail_stage.set(stage);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear()
    }

    /// Decode the raw calls into transactions, panicking on any framing violation: a byte sent
    /// outside chip-select or before the mode line was set, the mode changing mid-transaction,
    /// or nested/unbalanced select and deselect.
    pub fn sent(&self) -> Vec<Sent> {
        let mut out = Vec::new();
        let mut open: Option<(Option<Mode>, Vec<u8>)> = None;
        for call in self.calls.borrow().iter() {
            match (*call, open.as_mut()) {
                (Call::Reset(low, high), None) => out.push(Sent::Reset(low, high)),
                (Call::Reset(..), Some(_)) => panic!("reset inside a transaction"),
                (Call::Select, None) => open = Some((None, Vec::new())),
                (Call::Select, Some(_)) => panic!("nested select"),
                (Call::CommandMode, Some((mode, bytes))) => {
                    if *mode == Some(Mode::Data) && !bytes.is_empty() {
                        panic!("mode changed mid-transaction");
                    }
                    *mode = Some(Mode::Command);
                }
                (Call::DataMode, Some((mode, bytes))) => {
                    if *mode == Some(Mode::Command) && !bytes.is_empty() {
                        panic!("mode changed mid-transaction");
                    }
                    *mode = Some(Mode::Data);
                }
                (Call::CommandMode, None) | (Call::DataMode, None) => {}
                (Call::Exchange(b), Some((Some(_), bytes))) => bytes.push(b),
                (Call::Exchange(_), Some((None, _))) => panic!("byte sent before mode was set"),
                (Call::Exchange(_), None) => panic!("byte sent without chip-select"),
                (Call::Deselect, Some(_)) => {
                    let (mode, bytes) = open.take().unwrap();
                    out.push(match mode {
                        Some(Mode::Data) => Sent::Data(bytes),
                        _ => Sent::Cmd(bytes),
                    });
                }
                (Call::Deselect, None) => panic!("deselect without select"),
            }
        }
        assert!(open.is_none(), "transaction left open");
        out
    }

    /// All command bytes, in order, ignoring how they were split into transactions.
    pub fn command_bytes(&self) -> Vec<u8> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Cmd(bytes) => Some(bytes),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn check_multi(&self, expect: &[Sent]) {
        assert_eq!(self.sent(), expect);
    }
}

impl SpiLink for TestSpyInterface {
    fn exchange(&mut self, byte: u8) -> Result<u8, Error> {
        match self.ok_before_fault.get() {
            Some(0) if self.faults.get() > 0 => {
                self.faults.set(self.faults.get() - 1);
                let stage = self.fail_stage.get();
                if stage != PollStage::TransmitReady {
                    self.calls.borrow_mut().push(Call::Exchange(byte));
                }
                return Err(Error::TransportTimeout(stage));
            }
            Some(0) => self.ok_before_fault.set(None),
            Some(n) => self.ok_before_fault.set(Some(n - 1)),
            None => {}
        }
        self.calls.borrow_mut().push(Call::Exchange(byte));
        Ok(0x00)
    }

    fn select(&mut self) -> Result<(), Error> {
        self.calls.borrow_mut().push(Call::Select);
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), Error> {
        self.calls.borrow_mut().push(Call::Deselect);
        Ok(())
    }

    fn set_data_mode(&mut self) -> Result<(), Error> {
        self.calls.borrow_mut().push(Call::DataMode);
        Ok(())
    }

    fn set_command_mode(&mut self) -> Result<(), Error> {
        self.calls.borrow_mut().push(Call::CommandMode);
        Ok(())
    }

    fn reset_pulse(&mut self, low_us: u32, high_us: u32) -> Result<(), Error> {
        self.calls.borrow_mut().push(Call::Reset(low_us, high_us));
        Ok(())
    }
}
