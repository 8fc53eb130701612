//! In-memory fakes for every collaborator trait (spec §9 test tooling
//! expansion), gated behind a `test-support` feature the same way
//! `bandwidth::limiter::test_support` is gated elsewhere in this workspace:
//! available to this crate's own unit tests unconditionally, and to
//! downstream integration tests via the `cfdp-receive = { path = ".",
//! features = ["test-support"] }` dev-dependency self-reference.

use std::ops::Range;

use crate::collab::{ChunkStore, FileStore, PduTransmitter, SendError, Teardown, TimerSource};
use crate::events::{Event, EventSink};
use crate::pdu::{FinPdu, NakPdu};
use crate::transaction::TransactionId;

/// In-memory backing file, recording seek/write/read/rename call counts so
/// tests can assert on I/O shape (spec §8 "File sink" property).
#[derive(Debug, Default)]
pub struct FakeFileStore {
    pub buffer: Vec<u8>,
    pub position: u64,
    pub seek_count: u32,
    pub write_count: u32,
    pub read_count: u32,
    pub open_count: u32,
    pub rename_count: u32,
    pub opened_name: Option<String>,
    pub renamed_to: Option<String>,
    pub fail_next_open: bool,
    pub fail_next_seek: bool,
    pub fail_next_write: bool,
    pub fail_next_read: bool,
    pub fail_next_rename: bool,
}

impl FakeFileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn io_err(message: &str) -> std::io::Error {
    std::io::Error::other(message.to_owned())
}

impl FileStore for FakeFileStore {
    fn open_or_create(&mut self, temp_name: &str) -> std::io::Result<()> {
        self.open_count += 1;
        if self.fail_next_open {
            self.fail_next_open = false;
            return Err(io_err("fake open failure"));
        }
        self.opened_name = Some(temp_name.to_owned());
        Ok(())
    }

    fn seek(&mut self, offset: u64) -> std::io::Result<()> {
        self.seek_count += 1;
        if self.fail_next_seek {
            self.fail_next_seek = false;
            return Err(io_err("fake seek failure"));
        }
        self.position = offset;
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.write_count += 1;
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(io_err("fake write failure"));
        }
        let start = self.position as usize;
        if self.buffer.len() < start + data.len() {
            self.buffer.resize(start + data.len(), 0);
        }
        self.buffer[start..start + data.len()].copy_from_slice(data);
        self.position += data.len() as u64;
        Ok(data.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.read_count += 1;
        if self.fail_next_read {
            self.fail_next_read = false;
            return Err(io_err("fake read failure"));
        }
        let start = self.position as usize;
        let available = self.buffer.len().saturating_sub(start);
        let to_copy = buf.len().min(available);
        buf[..to_copy].copy_from_slice(&self.buffer[start..start + to_copy]);
        self.position += to_copy as u64;
        Ok(to_copy)
    }

    fn rename(&mut self, destination_filename: &str) -> std::io::Result<()> {
        self.rename_count += 1;
        if self.fail_next_rename {
            self.fail_next_rename = false;
            return Err(io_err("fake rename failure"));
        }
        self.renamed_to = Some(destination_filename.to_owned());
        Ok(())
    }
}

/// Records every outgoing control PDU, optionally rejecting the next send
/// with a configurable [`SendError`].
#[derive(Debug, Default)]
pub struct FakePduTransmitter {
    pub acks_sent: u32,
    pub naks_sent: Vec<NakPdu>,
    pub fins_sent: Vec<FinPdu>,
    pub fail_next_ack: Option<SendError>,
    pub fail_next_nak: Option<SendError>,
    pub fail_next_fin: Option<SendError>,
}

impl FakePduTransmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PduTransmitter for FakePduTransmitter {
    fn send_ack(&mut self, _txn_id: TransactionId) -> Result<(), SendError> {
        if let Some(err) = self.fail_next_ack.take() {
            return Err(err);
        }
        self.acks_sent += 1;
        Ok(())
    }

    fn send_nak(&mut self, _txn_id: TransactionId, nak: &NakPdu) -> Result<(), SendError> {
        if let Some(err) = self.fail_next_nak.take() {
            return Err(err);
        }
        self.naks_sent.push(nak.clone());
        Ok(())
    }

    fn send_fin(&mut self, _txn_id: TransactionId, fin: &FinPdu) -> Result<(), SendError> {
        if let Some(err) = self.fail_next_fin.take() {
            return Err(err);
        }
        self.fins_sent.push(*fin);
        Ok(())
    }
}

/// Manually-driven inactivity/ACK timers: tests set `*_expires_next` before
/// calling `Tick` to control exactly when a timer fires.
#[derive(Debug, Default)]
pub struct FakeTimerSource {
    pub inactivity_expires_next: bool,
    pub ack_expires_next: bool,
    pub inactivity_ticks: u32,
    pub ack_ticks: u32,
    pub arm_ack_count: u32,
}

impl FakeTimerSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimerSource for FakeTimerSource {
    fn tick_inactivity(&mut self, _txn_id: TransactionId) -> bool {
        self.inactivity_ticks += 1;
        std::mem::take(&mut self.inactivity_expires_next)
    }

    fn tick_ack(&mut self, _txn_id: TransactionId) -> bool {
        self.ack_ticks += 1;
        std::mem::take(&mut self.ack_expires_next)
    }

    fn arm_ack(&mut self, _txn_id: TransactionId) {
        self.arm_ack_count += 1;
    }
}

/// Records every emitted event for assertion.
#[derive(Debug, Default)]
pub struct FakeEventSink {
    pub events: Vec<(TransactionId, Event)>,
}

impl FakeEventSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn count(&self, event: Event) -> usize {
        self.events.iter().filter(|(_, e)| *e == event).count()
    }
}

impl EventSink for FakeEventSink {
    fn emit(&mut self, txn_id: TransactionId, event: Event) {
        self.events.push((txn_id, event));
    }
}

/// Trivial [`ChunkStore`] that discards everything; useful when a test
/// exercises the File Sink in isolation and the chunk list is irrelevant.
#[derive(Debug, Default)]
pub struct NullChunkStore;

impl ChunkStore for NullChunkStore {
    fn add(&mut self, _range: Range<u64>) {}
    fn compute_gaps(&self, _scope: Range<u64>, _callback: &mut dyn FnMut(Range<u64>)) {}
}

/// Records every teardown call for assertion, instead of actually freeing
/// anything (there is nothing to free in a unit test).
#[derive(Debug, Default)]
pub struct FakeTeardown {
    pub calls: Vec<(TransactionId, bool)>,
}

impl FakeTeardown {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.len()
    }
}

impl Teardown for FakeTeardown {
    fn teardown(&mut self, txn_id: TransactionId, keep: bool) {
        self.calls.push((txn_id, keep));
    }
}
