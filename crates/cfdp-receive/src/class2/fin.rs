//! FIN transmission, FIN-ACK reception, and chunked CRC verification
//! (spec §4.8 "R2_SubstateSendFin", "R2_Recv_fin_ack", "R2_CalcCrcChunk").

use crate::class2::reset;
use crate::collab::{Collaborators, PduTransmitter, SendError};
use crate::config::ChannelConfig;
use crate::counters::ChannelCounters;
use crate::crc;
use crate::events::Event;
use crate::pdu::FinPdu;
use crate::status::TransactionStatus;
use crate::transaction::{SubState, Transaction};

/// Largest single read issued per CRC-slice call, independent of the
/// configured wakeup budget; keeps one `Tick` from blocking on an
/// unreasonably large in-memory buffer even if a channel is misconfigured.
const MAX_READ_BUF: usize = 64 * 1024;

/// Advances the chunked CRC verifier by up to one wakeup's worth of bytes
/// (spec §4.8 "R2_CalcCrcChunk").
///
/// Re-reads the reconstructed file rather than trusting bytes digested as
/// they arrived out of order, since Class-2 file data can arrive in any
/// order. Bounded per call by `min(rx_crc_calc_bytes_per_wakeup,
/// crc_chunk_size)`; the remainder is picked up on the next `Tick`.
pub fn calc_crc_chunk(
    txn: &mut Transaction,
    config: &ChannelConfig,
    counters: &mut ChannelCounters,
    collab: &mut Collaborators<'_>,
) {
    let rx_crc_calc_bytes = txn.class_state.as_class2().expect("class-2 transaction").rx_crc_calc_bytes;

    if rx_crc_calc_bytes != txn.cached_pos {
        if collab.fs.seek(rx_crc_calc_bytes).is_err() {
            txn.set_status(TransactionStatus::FileSizeError);
            collab.emit(txn.id, Event::SeekCrcErr);
            counters.file_seek += 1;
            return;
        }
        txn.cached_pos = rx_crc_calc_bytes;
    }

    let mut budget = config
        .rx_crc_calc_bytes_per_wakeup
        .min(config.crc_chunk_size);
    let mut buf = vec![0u8; (budget as usize).min(MAX_READ_BUF).max(1)];

    while budget > 0 {
        let state = txn.class_state.as_class2().expect("class-2 transaction");
        let remaining_in_file = txn.fsize.saturating_sub(state.rx_crc_calc_bytes);
        if remaining_in_file == 0 {
            break;
        }

        let want = (budget.min(remaining_in_file) as usize).min(buf.len());
        let read = match collab.fs.read(&mut buf[..want]) {
            Ok(n) => n,
            Err(_) => {
                txn.set_status(TransactionStatus::FileSizeError);
                collab.emit(txn.id, Event::ReadErr);
                counters.file_read += 1;
                return;
            }
        };
        if read == 0 {
            break;
        }

        txn.crc_accum.update(&buf[..read]);
        txn.cached_pos += read as u64;

        let state = txn.class_state.as_class2_mut().expect("class-2 transaction");
        state.rx_crc_calc_bytes += read as u64;
        budget -= read as u64;
    }

    let (done, eof_crc) = {
        let state = txn.class_state.as_class2().expect("class-2 transaction");
        (state.rx_crc_calc_bytes == txn.fsize, state.eof_crc)
    };

    if done {
        txn.class_state.as_class2_mut().expect("class-2 transaction").crc_calc = true;
        if crc::r_check_crc(txn.crc_accum.current(), eof_crc).is_err() {
            txn.set_status(TransactionStatus::FileChecksumFailure);
            collab.emit(txn.id, Event::CrcErr);
            counters.crc_mismatch += 1;
        }
    }
}

/// Outcome of one `R2_SubstateSendFin` attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FinOutcome {
    /// CRC verification has not finished yet; retry on the next `Tick`.
    InProgress,
    /// The FIN was transmitted and the transaction moved to
    /// `WAIT_FOR_FIN_ACK`.
    Sent,
}

/// Sends (or defers) the FIN that closes out a Class-2 transaction
/// (spec §4.8 "R2_SubstateSendFin").
///
/// A FIN is never sent ahead of CRC verification unless the transaction is
/// already in an error state, in which case the FIN carries that status's
/// condition code instead (spec §4.8 "skips ... FIN carries the error
/// condition code").
pub fn r2_substate_send_fin(
    txn: &mut Transaction,
    collab: &mut Collaborators<'_>,
) -> Result<FinOutcome, SendError> {
    let status = txn.history.status;
    if !status.is_error() {
        let crc_calc = txn.class_state.as_class2().expect("class-2 transaction").crc_calc;
        if !crc_calc {
            return Ok(FinOutcome::InProgress);
        }
    }

    let fin = FinPdu {
        condition_code: status.condition_code(),
    };
    collab.pdu.send_fin(txn.id, &fin)?;

    let state = txn.class_state.as_class2_mut().expect("class-2 transaction");
    state.send_fin = false;
    state.acknak_count = 0;
    state.ack_timer_armed = true;
    txn.sub_state = SubState::WaitForFinAck;
    collab.timers.arm_ack(txn.id);

    Ok(FinOutcome::Sent)
}

/// Processes an inbound FIN-ACK (spec §4.8 "R2_Recv_fin_ack").
///
/// Only valid in `WAIT_FOR_FIN_ACK`; dispatch in [`crate::class2::r2_recv`]
/// guards that before calling this. On arrival the pending FIN send is
/// cancelled, the ACK timer is disarmed, and the transaction is torn down —
/// spec §4.8 describes this as "schedule terminal Reset on next tick", which
/// this crate implements as an immediate call since `Recv` and `Tick` never
/// run concurrently (spec §5) and `sub_state == WAIT_FOR_FIN_ACK` already
/// satisfies [`reset::r2_reset`]'s unconditional-teardown condition, making
/// the two observably identical.
pub fn r2_recv_fin_ack(txn: &mut Transaction, collab: &mut Collaborators<'_>) {
    let state = txn.class_state.as_class2_mut().expect("class-2 transaction");
    state.send_fin = false;
    state.ack_timer_armed = false;
    reset::r2_reset(txn, collab);
}
