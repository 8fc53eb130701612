//! Event taxonomy and logging sink (spec §7 "User-visible behavior").
//!
//! Every non-transient error produces exactly one [`Event`] with a specific
//! ID and updates exactly one fault counter (see [`crate::counters`]). The
//! severity of each event is implied by its upstream suffix (`_ERR` vs
//! `_INF`), mirrored here in [`Event::severity`].

use std::fmt;

use crate::transaction::TransactionId;

/// Severity of an [`Event`], following the `_ERR`/`_INF` suffix convention
/// in spec §7's event enumeration.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Severity {
    /// Informational; no counter is incremented.
    Info,
    /// A fault occurred; exactly one counter in [`crate::counters::ChannelCounters`]
    /// is incremented alongside this event.
    Error,
}

/// One of the seventeen event IDs enumerated in spec §7.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Event {
    /// Destination file could not be opened or created.
    CreatErr,
    /// EOF CRC did not match the accumulated/recomputed CRC.
    CrcErr,
    /// A file-data write failed or was short.
    WriteErr,
    /// Seeking the backing file for a file-data write failed.
    SeekFdErr,
    /// Seeking the backing file during chunked CRC verification failed.
    SeekCrcErr,
    /// Reading the backing file during chunked CRC verification failed.
    ReadErr,
    /// The EOF PDU could not be parsed or validated.
    PduEofErr,
    /// The size reported by EOF disagreed with the size tracked by the sink.
    SizeMismatchErr,
    /// The size reported by EOF disagreed with the size declared in metadata.
    EofMdSizeErr,
    /// Renaming the temporary file to its declared destination name failed.
    RenameErr,
    /// Reopening the file after rename failed.
    OpenErr,
    /// The metadata PDU could not be parsed.
    PduMdErr,
    /// The FIN-ACK PDU could not be parsed.
    PduFinAckErr,
    /// NAK retransmission limit was reached without full coverage.
    NakLimitErr,
    /// The inactivity timer expired.
    InactTimerErr,
    /// Informational: a blank NAK was sent to request metadata.
    RequestMdInf,
    /// Informational: file-data arrived before metadata, so a temporary
    /// filename was used.
    TempFileInf,
}

impl Event {
    /// Severity implied by this event's upstream `_ERR`/`_INF` suffix.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::RequestMdInf | Self::TempFileInf => Severity::Info,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CreatErr => "unable to open or create destination file",
            Self::CrcErr => "received file failed CRC validation",
            Self::WriteErr => "file-data write failed",
            Self::SeekFdErr => "seek failed while writing file data",
            Self::SeekCrcErr => "seek failed during CRC verification",
            Self::ReadErr => "read failed during CRC verification",
            Self::PduEofErr => "EOF PDU failed validation",
            Self::SizeMismatchErr => "EOF size disagreed with received size",
            Self::EofMdSizeErr => "EOF size disagreed with metadata size",
            Self::RenameErr => "rename of temporary file failed",
            Self::OpenErr => "reopen of renamed file failed",
            Self::PduMdErr => "metadata PDU failed to parse",
            Self::PduFinAckErr => "FIN-ACK PDU failed to parse",
            Self::NakLimitErr => "NAK retransmission limit reached",
            Self::InactTimerErr => "inactivity timer expired",
            Self::RequestMdInf => "requesting metadata via blank NAK",
            Self::TempFileInf => "using temporary filename pending metadata",
        };
        f.write_str(label)
    }
}

/// Receives [`Event`]s raised for a given transaction.
///
/// The production implementation, [`TracingEventSink`], logs through
/// `tracing`; tests substitute [`crate::testutil::FakeEventSink`] to
/// assert on exactly which events were raised.
pub trait EventSink {
    /// Records that `event` occurred for `txn_id`.
    fn emit(&mut self, txn_id: TransactionId, event: Event);
}

/// Default [`EventSink`] that logs through `tracing` at a level derived from
/// [`Event::severity`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&mut self, txn_id: TransactionId, event: Event) {
        #[cfg(feature = "tracing")]
        match event.severity() {
            Severity::Info => {
                tracing::info!(txn = txn_id.0, event = %event, "cfdp receive event");
            }
            Severity::Error => {
                tracing::warn!(txn = txn_id.0, event = %event, "cfdp receive event");
            }
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = (txn_id, event);
        }
    }
}
