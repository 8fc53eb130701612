//! The per-reception transaction record (spec §3 "Data model").

use crate::crc::Crc32;
use crate::pdu::ConditionCode;
use crate::status::TransactionStatus;

/// Identifies a transaction to channel-wide collaborators
/// ([`crate::collab::PduTransmitter`], [`crate::collab::TimerSource`],
/// [`crate::collab::EventSink`]).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TransactionId(pub u32);

/// CFDP transmission class (spec §1).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Class {
    /// Unreliable, unacknowledged: one-way ingest.
    Class1,
    /// Reliable, acknowledged: NAK/ACK/FIN handshake.
    Class2,
}

/// Sub-state progression shared by both classes (spec §3).
///
/// Class-1 transactions never leave `FileData` before `Reset` — they have
/// no handshake to progress through — but the field still exists on every
/// transaction because spec §3 lists it as a top-level `Transaction`
/// attribute, not as part of the Class-2-only receive-state block.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Default)]
pub enum SubState {
    /// Receiving file data (and, for Class-2, NAKing gaps).
    #[default]
    FileData,
    /// EOF has been received; finishing up before FIN.
    Eof,
    /// FIN has been sent; waiting for FIN-ACK (Class-2 only).
    WaitForFinAck,
}

/// The transaction's historical record, holding its final status.
///
/// In the embedding engine this is typically a long-lived record that
/// outlives the transaction's working state; here it is a plain struct the
/// caller owns and passes a mutable reference to alongside the transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct History {
    /// Final (or current, if still in progress) disposition.
    pub status: TransactionStatus,
}

/// Class-2-only receive-state block (spec §3 "Receive-state block").
#[derive(Clone, Copy, Debug)]
pub struct Class2State {
    /// EOF PDU has been processed.
    pub eof_recv: bool,
    /// Metadata PDU has been processed.
    pub md_recv: bool,
    /// CRC extracted from the EOF PDU.
    pub eof_crc: u32,
    /// File size extracted from the EOF PDU.
    pub eof_size: u64,
    /// Condition code extracted from the EOF PDU.
    pub eof_cc: ConditionCode,
    /// An ACK is pending transmission.
    pub send_ack: bool,
    /// A NAK is pending transmission.
    pub send_nak: bool,
    /// A FIN is pending transmission.
    pub send_fin: bool,
    /// At least one NAK covering file-data gaps has been attempted
    /// (spec §9 open question: set even on transmit failure).
    pub fd_nak_sent: bool,
    /// All data has been received, or the NAK limit was exhausted.
    pub complete: bool,
    /// The inactivity timer has already fired once for this transaction.
    pub inactivity_fired: bool,
    /// Retransmission counter: NAKs in `FileData`, FINs in `WaitForFinAck`.
    pub acknak_count: u32,
    /// Bytes of the file already digested by the chunked CRC verifier.
    pub rx_crc_calc_bytes: u64,
    /// The ACK timer is currently armed.
    pub ack_timer_armed: bool,
    /// The full-file CRC has been recomputed and compared.
    pub crc_calc: bool,
    /// A cancel request has been received.
    pub canceled: bool,
}

impl Default for Class2State {
    fn default() -> Self {
        Self {
            eof_recv: false,
            md_recv: false,
            eof_crc: 0,
            eof_size: 0,
            eof_cc: ConditionCode::NoError,
            send_ack: false,
            send_nak: false,
            send_fin: false,
            fd_nak_sent: false,
            complete: false,
            inactivity_fired: false,
            acknak_count: 0,
            rx_crc_calc_bytes: 0,
            ack_timer_armed: false,
            crc_calc: false,
            canceled: false,
        }
    }
}

/// Per-class state, modeling the sum type called for in spec §9
/// ("Polymorphism over class").
#[derive(Clone, Copy, Debug)]
pub enum ClassState {
    /// Class-1 carries no extra state beyond the shared `Transaction` fields.
    Class1,
    /// Class-2 carries the receive-state block.
    Class2(Class2State),
}

impl ClassState {
    /// The CFDP class this state belongs to.
    #[must_use]
    pub const fn class(&self) -> Class {
        match self {
            Self::Class1 => Class::Class1,
            Self::Class2(_) => Class::Class2,
        }
    }

    /// Returns the Class-2 receive-state block, if this is a Class-2
    /// transaction.
    #[must_use]
    pub const fn as_class2(&self) -> Option<&Class2State> {
        match self {
            Self::Class1 => None,
            Self::Class2(state) => Some(state),
        }
    }

    /// Mutable variant of [`Self::as_class2`].
    #[must_use]
    pub fn as_class2_mut(&mut self) -> Option<&mut Class2State> {
        match self {
            Self::Class1 => None,
            Self::Class2(state) => Some(state),
        }
    }
}

/// The per-reception record (spec §3 "Transaction").
pub struct Transaction {
    /// Identity used when talking to channel-wide collaborators.
    pub id: TransactionId,
    /// CFDP class and its associated receive-state block.
    pub class_state: ClassState,
    /// Sub-state progression (spec §3).
    pub sub_state: SubState,
    /// Current known file size in bytes.
    pub fsize: u64,
    /// Last known file-write offset; avoids redundant seeks.
    pub cached_pos: u64,
    /// Running CRC-32 digest over received file data.
    pub crc_accum: Crc32,
    /// Owning channel index.
    pub chan_num: u16,
    /// Historical record holding the final status.
    pub history: History,
    /// Whether the received file should be retained on teardown.
    pub keep: bool,
    /// Temporary filename in use until metadata renames the file.
    pub temp_filename: String,
    /// Destination filename, once known from metadata.
    pub destination_filename: Option<String>,
}

impl Transaction {
    /// Creates a newly-identified transaction with populated identity and
    /// class, ready for [`crate::init::r_init`].
    #[must_use]
    pub fn new(id: TransactionId, class: Class, chan_num: u16, temp_filename: String) -> Self {
        Self {
            id,
            class_state: match class {
                Class::Class1 => ClassState::Class1,
                Class::Class2 => ClassState::Class2(Class2State::default()),
            },
            sub_state: SubState::default(),
            fsize: 0,
            cached_pos: 0,
            crc_accum: Crc32::new(),
            chan_num,
            history: History::default(),
            keep: false,
            temp_filename,
            destination_filename: None,
        }
    }

    /// The CFDP class of this transaction.
    #[must_use]
    pub const fn class(&self) -> Class {
        self.class_state.class()
    }

    /// Records `status` as the transaction's disposition, unless it is
    /// already carrying an earlier error (the first fault recorded wins,
    /// matching upstream's "don't clobber an existing failure" behavior).
    pub fn set_status(&mut self, status: TransactionStatus) {
        if !self.history.status.is_error() {
            self.history.status = status;
        }
    }
}
