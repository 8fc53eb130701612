//! Per-channel fault and receive counters (spec §3 "Counters (per channel)").

/// Counters owned by a channel, written only from the owning channel's
/// thread (spec §5 "Shared resources").
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelCounters {
    /// Destination file could not be opened or created.
    pub file_open: u64,
    /// A file read failed (CRC verification slice).
    pub file_read: u64,
    /// A file write failed.
    pub file_write: u64,
    /// A file seek failed.
    pub file_seek: u64,
    /// EOF-reported size disagreed with the size tracked by the sink.
    pub file_size_mismatch: u64,
    /// Final CRC comparison failed.
    pub crc_mismatch: u64,
    /// NAK retransmission limit reached.
    pub nak_limit: u64,
    /// FIN retransmission (ACK) limit reached.
    pub ack_limit: u64,
    /// Inactivity timer expired.
    pub inactivity_timer: u64,
    /// Total file-data bytes successfully written.
    pub file_data_bytes: u64,
    /// Unknown or out-of-sequence PDUs dropped.
    pub error: u64,
}
