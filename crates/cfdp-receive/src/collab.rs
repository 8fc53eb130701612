//! Trait boundary for the external collaborators named in spec §6.
//!
//! PDU wire encoding/decoding, the filesystem wrapper, timers, the chunk
//! list and event logging are all out of scope for this crate (spec §1);
//! what *is* in scope is the shape of the contract between the receive
//! state machine and those collaborators. Each one becomes a trait here so
//! tests can substitute in-memory fakes (see
//! [`crate::testutil`]) without touching the state machine.

use std::ops::Range;

use crate::events::{Event, EventSink};
use crate::pdu::{FinPdu, NakPdu};
use crate::transaction::TransactionId;

/// A file-data or control-PDU transmit failure.
///
/// [`SendError::WouldBlock`] models `NO_BUF_AVAIL` from spec §7: it is
/// transient, so the caller must leave the corresponding pending-send flag
/// set and retry on the next `Tick`. Any other variant is treated as
/// transaction-fatal by the caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SendError {
    /// No transmit buffer was available; retry later.
    #[error("no transmit buffer available")]
    WouldBlock,
    /// The transport rejected or failed to send the PDU outright.
    #[error("PDU transmit failed")]
    TransportFailure,
}

/// Backing-file operations used by the File Sink (spec §4.4) and the
/// chunked CRC verifier (spec §4.8).
///
/// Implementations must not return before the operation's logical effect is
/// complete (spec §5 "Suspension points") — buffering internally is fine,
/// returning early is not.
pub trait FileStore {
    /// Opens the destination file, creating it if necessary. `temp_name` is
    /// the temporary filename to use when no destination name is known yet
    /// (spec §4.1).
    fn open_or_create(&mut self, temp_name: &str) -> std::io::Result<()>;

    /// Seeks to `offset` within the backing file.
    fn seek(&mut self, offset: u64) -> std::io::Result<()>;

    /// Writes `data` at the current file position, returning the number of
    /// bytes actually written.
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize>;

    /// Reads up to `buf.len()` bytes from the current file position,
    /// returning the number of bytes actually read.
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;

    /// Renames the backing file to `destination_filename`, flushing any
    /// buffered writes first (spec §9 "Temporary-file protocol").
    fn rename(&mut self, destination_filename: &str) -> std::io::Result<()>;
}

/// Outgoing control-PDU transmission (spec §4.5, §4.8).
pub trait PduTransmitter {
    /// Sends an ACK in response to EOF.
    fn send_ack(&mut self, txn_id: TransactionId) -> Result<(), SendError>;

    /// Sends a NAK requesting missing file-data (or a blank NAK requesting
    /// metadata).
    fn send_nak(&mut self, txn_id: TransactionId, nak: &NakPdu) -> Result<(), SendError>;

    /// Sends a FIN closing out the transaction.
    fn send_fin(&mut self, txn_id: TransactionId, fin: &FinPdu) -> Result<(), SendError>;
}

/// Inactivity and ACK timers (spec §4.9).
///
/// Both timers are advanced once per `Tick`; `tick_inactivity`/`tick_ack`
/// return whether the timer expired on this advance.
pub trait TimerSource {
    /// Advances the inactivity timer by one wakeup, returning `true` if it
    /// has now expired.
    fn tick_inactivity(&mut self, txn_id: TransactionId) -> bool;

    /// Advances the ACK timer by one wakeup, returning `true` if it has now
    /// expired.
    fn tick_ack(&mut self, txn_id: TransactionId) -> bool;

    /// Arms (or re-arms) the ACK timer.
    fn arm_ack(&mut self, txn_id: TransactionId);
}

/// The received-byte-range tracker for a single transaction (spec §3 "Chunk
/// list", §4.5).
///
/// Unlike [`PduTransmitter`]/[`TimerSource`]/[`EventSink`], which are
/// naturally channel-wide services keyed by [`TransactionId`], a chunk store
/// is constructed one-per-transaction (mirroring `cached_pos` and
/// `crc_accum` living directly on [`crate::transaction::Transaction`]), so
/// its methods do not repeat the transaction identity.
pub trait ChunkStore {
    /// Adds `range` to the set of received byte ranges, coalescing with
    /// adjacent or overlapping ranges.
    fn add(&mut self, range: Range<u64>);

    /// Invokes `callback` once per gap within `scope`, in increasing order
    /// of offset.
    fn compute_gaps(&self, scope: Range<u64>, callback: &mut dyn FnMut(Range<u64>));
}

/// External teardown invoked when a transaction reaches a terminal state
/// (spec §3 "Lifecycle", §4.10).
///
/// Reset does not itself close the backing file or free the transaction
/// record — both are owned by the embedding engine — so this is a trait
/// rather than logic living on [`crate::transaction::Transaction`].
pub trait Teardown {
    /// Tears down the transaction identified by `txn_id`. `keep` reports
    /// whether the received file should be retained, as recorded on
    /// [`crate::transaction::Transaction::keep`].
    fn teardown(&mut self, txn_id: TransactionId, keep: bool);
}

/// Bundle of every collaborator the receive core's entry points need.
///
/// Bundling avoids threading five independent `&mut dyn Trait` parameters
/// through every `R_*`/`R1_*`/`R2_*` function (spec §4), the same way this
/// workspace's CLI layer bundles parsed settings into a single struct
/// (`ParsedArgs`) rather than passing them individually down the call
/// stack.
pub struct Collaborators<'a> {
    /// Backing-file operations for the active transaction.
    pub fs: &'a mut dyn FileStore,
    /// Outgoing control-PDU transmission.
    pub pdu: &'a mut dyn PduTransmitter,
    /// Inactivity and ACK timers.
    pub timers: &'a mut dyn TimerSource,
    /// Received-byte-range tracker.
    pub chunks: &'a mut dyn ChunkStore,
    /// Event log.
    pub events: &'a mut dyn EventSink,
    /// Terminal-state teardown.
    pub teardown: &'a mut dyn Teardown,
}

impl Collaborators<'_> {
    pub(crate) fn emit(&mut self, txn_id: TransactionId, event: Event) {
        self.events.emit(txn_id, event);
    }
}
