//! Logical PDU records (spec §6 "No wire format is defined here").
//!
//! These are the parsed shapes the out-of-scope PDU decoder hands to
//! [`crate::class1::r1_recv`] / [`crate::class2::r2_recv`], and the
//! shapes [`crate::collab::PduTransmitter`] methods consume to build outgoing
//! PDUs. No encoding or decoding logic lives in this crate.

/// Condition code carried by EOF and FIN PDUs.
///
/// Only the values this crate branches on are named explicitly; any other
/// upstream condition code is represented by [`ConditionCode::Other`] so the
/// receive core does not need to track the full CFDP condition-code table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ConditionCode {
    /// No error; normal completion.
    NoError,
    /// The sender (or an intermediate entity) requested cancellation.
    CancelRequestReceived,
    /// Any other condition code, carried through unchanged so it can be
    /// echoed on the FIN if the transaction is otherwise healthy.
    Other(u8),
}

impl ConditionCode {
    /// Reports whether this condition code represents successful completion.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::NoError)
    }
}

/// A parsed file-data PDU (spec §4.4 "File Sink").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileDataPdu<'a> {
    /// Byte offset within the file where `data` begins.
    pub offset: u64,
    /// File bytes carried by this PDU.
    pub data: &'a [u8],
}

/// A parsed EOF PDU (spec §4.3, §4.6).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EofPdu {
    /// CRC-32 of the complete file, as computed by the sender.
    pub crc: u32,
    /// Total file size, as declared by the sender.
    pub size: u64,
    /// Condition code carried by this EOF.
    pub condition_code: ConditionCode,
}

/// A parsed metadata (MD) PDU (spec §4.7).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataPdu {
    /// Total file size declared by the sender, if known at metadata time.
    pub file_size: Option<u64>,
    /// Destination filename the temporary file should be renamed to.
    pub destination_filename: String,
}

/// A parsed FIN-ACK PDU (spec §4.8).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinAckPdu {
    /// Condition code the peer echoed back on the FIN-ACK.
    pub condition_code: ConditionCode,
}

/// One gap segment within an outgoing NAK, offsets relative to the NAK's
/// scope-start (spec §4.5, §6 "NAK segment encoding").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NakSegment {
    /// Start of the gap, relative to the NAK's `scope_start`.
    pub offset_start: u64,
    /// End of the gap (exclusive), relative to the NAK's `scope_start`.
    pub offset_end: u64,
}

/// An outgoing NAK PDU under construction (spec §4.5).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NakPdu {
    /// Scope this NAK's gaps were computed within; `None` for a blank NAK
    /// requesting metadata (spec §4.5 "blank NAK").
    pub scope: Option<(u64, u64)>,
    /// Gap segments, ordered by increasing offset, clamped to
    /// `CF_PDU_MAX_SEGMENTS` (spec §6).
    pub segments: Vec<NakSegment>,
}

impl NakPdu {
    /// Reports whether this NAK carries no gap segments.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.segments.is_empty()
    }
}

/// An outgoing FIN PDU under construction (spec §4.8).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinPdu {
    /// Condition code to report; carries the transaction's recorded status
    /// when it is already an error, `NoError` otherwise.
    pub condition_code: ConditionCode,
}

/// The tagged union of inbound PDU kinds the decoder hands to
/// [`crate::class1::r1_recv`] / [`crate::class2::r2_recv`] (spec §4.2,
/// §4.3). Dispatch on this, not on a raw wire tag, is the extent of this
/// crate's involvement with PDU framing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundPdu<'a> {
    /// File-data segment.
    FileData(FileDataPdu<'a>),
    /// End-of-file.
    Eof(EofPdu),
    /// Metadata.
    Metadata(MetadataPdu),
    /// Acknowledgement of a previously-sent FIN.
    FinAck(FinAckPdu),
}
