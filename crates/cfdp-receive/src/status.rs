//! Transaction status / condition-code taxonomy (spec §7).
//!
//! [`TransactionStatus`] is a status code, not a Rust error: it is stored on
//! the transaction's [`crate::transaction::History`] and consulted by the
//! state machine to decide whether a FIN should carry a failure condition
//! code. It deliberately does not implement [`std::error::Error`], mirroring
//! how this workspace's own exit-code type is consumed as data rather than
//! propagated with `?`.

use std::fmt;

use crate::pdu::ConditionCode;

/// Final or in-progress disposition of a receive transaction.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Default)]
pub enum TransactionStatus {
    /// No error has been observed; the transaction may still be in progress.
    #[default]
    NoError,
    /// A filestore operation (open, write, rename) was rejected.
    FilestoreRejection,
    /// The declared or observed file size disagreed with another source.
    FileSizeError,
    /// The final CRC recomputed from the reconstructed file did not match
    /// the CRC reported in the EOF PDU.
    FileChecksumFailure,
    /// The inactivity timer expired before further progress was observed.
    InactivityDetected,
    /// The FIN PDU was retransmitted `ack_limit` times without a FIN-ACK.
    AckLimitReached,
    /// NAKs were retransmitted `nak_limit` times without full coverage.
    NakLimitReached,
    /// A PDU was malformed or violated the expected sub-state sequence.
    InvalidFileStructure,
    /// The peer requested cancellation of the transaction.
    CancelRequestReceived,
}

impl TransactionStatus {
    /// Reports whether this status represents a failure.
    ///
    /// The receive core uses this to decide whether a pending FIN should
    /// carry the recorded condition code instead of `NO_ERROR`, and whether
    /// CRC verification may be skipped (spec §4.8).
    #[must_use]
    pub const fn is_error(self) -> bool {
        !matches!(self, Self::NoError)
    }

    /// Maps this status to the condition code a FIN should carry (spec §4.8
    /// "FIN carries the error condition code").
    ///
    /// The numeric values behind [`ConditionCode::Other`] are a crate-internal
    /// bucketing, not the CCSDS wire value — assigning the real condition
    /// code table is the out-of-scope PDU encoder's job (spec §1).
    #[must_use]
    pub const fn condition_code(self) -> ConditionCode {
        match self {
            Self::NoError => ConditionCode::NoError,
            Self::CancelRequestReceived => ConditionCode::CancelRequestReceived,
            Self::FilestoreRejection => ConditionCode::Other(1),
            Self::FileSizeError => ConditionCode::Other(2),
            Self::FileChecksumFailure => ConditionCode::Other(3),
            Self::InactivityDetected => ConditionCode::Other(4),
            Self::AckLimitReached => ConditionCode::Other(5),
            Self::NakLimitReached => ConditionCode::Other(6),
            Self::InvalidFileStructure => ConditionCode::Other(7),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NoError => "no error",
            Self::FilestoreRejection => "filestore rejection",
            Self::FileSizeError => "file size error",
            Self::FileChecksumFailure => "file checksum failure",
            Self::InactivityDetected => "inactivity detected",
            Self::AckLimitReached => "ack limit reached",
            Self::NakLimitReached => "nak limit reached",
            Self::InvalidFileStructure => "invalid file structure",
            Self::CancelRequestReceived => "cancel request received",
        };
        f.write_str(label)
    }
}
