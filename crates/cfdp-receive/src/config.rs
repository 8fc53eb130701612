//! Per-channel configuration table (spec §3 "Configuration (per channel)").

use std::time::Duration;

/// Read-only configuration consulted by a channel's transactions.
///
/// The configuration table is read-only during transaction execution
/// (spec §5 "Shared resources"); entry points take `&ChannelConfig` rather
/// than mutating it.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelConfig {
    /// Maximum number of FIN retransmissions in `WAIT_FOR_FIN_ACK` before
    /// the transaction is abandoned (`CF_ack_limit` in spec §4.9).
    pub ack_limit: u32,
    /// Maximum number of NAK retransmissions in `FILEDATA` before the
    /// transaction gives up on full coverage (spec §4.6).
    pub nak_limit: u32,
    /// Bytes of the file digested per `Tick` during chunked CRC
    /// verification (spec §4.8), bounded per call by [`Self::crc_chunk_size`].
    pub rx_crc_calc_bytes_per_wakeup: u64,
    /// Hard per-call ceiling on CRC verification work
    /// (`CF_R2_CRC_CHUNK_SIZE`), independent of the configured wakeup size.
    pub crc_chunk_size: u64,
    /// Interval between inactivity-timer wakeups.
    pub inactivity_timeout: Duration,
    /// Interval between ACK-timer wakeups (re-armed on every expiry).
    pub ack_timer_interval: Duration,
    /// Capacity bound on the chunk list (spec §3 "Chunk list").
    pub max_chunks: usize,
    /// Maximum number of segments in a single outgoing NAK
    /// (`CF_PDU_MAX_SEGMENTS`, spec §4.5/§8 scenario 6).
    pub max_nak_segments: usize,
}

impl Default for ChannelConfig {
    /// Conservative defaults modeled on the NASA cFS CF application's stock
    /// channel configuration.
    fn default() -> Self {
        Self {
            ack_limit: 3,
            nak_limit: 3,
            rx_crc_calc_bytes_per_wakeup: 65_536,
            crc_chunk_size: 1_048_576,
            inactivity_timeout: Duration::from_secs(30),
            ack_timer_interval: Duration::from_secs(5),
            max_chunks: 100,
            max_nak_segments: 58,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = ChannelConfig::default();
        assert!(cfg.ack_limit > 0);
        assert!(cfg.nak_limit > 0);
        assert!(cfg.max_chunks > 0);
        assert!(cfg.max_nak_segments > 0);
    }
}
