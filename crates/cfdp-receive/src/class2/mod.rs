//! Class-2 Receiver: sub-state machine, NAK generation, FIN emission with
//! ACK-timer retransmission, metadata reception, cancellation
//! (spec §4.3 "R2_Recv" and its sub-operations).

pub mod complete;
pub mod fin;
pub mod metadata;
pub mod nak;
pub mod reset;

use crate::collab::Collaborators;
use crate::config::ChannelConfig;
use crate::counters::ChannelCounters;
use crate::events::Event;
use crate::pdu::{ConditionCode, InboundPdu};
use crate::sink;
use crate::status::TransactionStatus;
use crate::transaction::{SubState, Transaction};

/// Dispatches one inbound PDU to a Class-2 transaction, by PDU type and
/// current sub-state (spec §4.3).
pub fn r2_recv(
    txn: &mut Transaction,
    pdu: &InboundPdu<'_>,
    config: &ChannelConfig,
    counters: &mut ChannelCounters,
    collab: &mut Collaborators<'_>,
) {
    match pdu {
        InboundPdu::FileData(fd) => {
            if !matches!(txn.sub_state, SubState::FileData | SubState::Eof) {
                counters.error += 1;
                return;
            }
            match sink::process_fd(txn, fd, counters, collab) {
                Ok(()) => {
                    collab
                        .chunks
                        .add(fd.offset..fd.offset + fd.data.len() as u64);
                    let state = txn.class_state.as_class2().expect("class-2 transaction");
                    if state.fd_nak_sent || !state.complete {
                        collab.timers.arm_ack(txn.id);
                        let state =
                            txn.class_state.as_class2_mut().expect("class-2 transaction");
                        state.ack_timer_armed = true;
                    }
                    let state =
                        txn.class_state.as_class2_mut().expect("class-2 transaction");
                    state.acknak_count = 0;
                }
                Err(()) => {
                    reset::r2_reset(txn, collab);
                }
            }
        }
        InboundPdu::Eof(eof) => recv_eof(txn, eof, config, counters, collab),
        InboundPdu::Metadata(md) => metadata::r2_recv_md(txn, md, counters, collab),
        InboundPdu::FinAck(_) => {
            if txn.sub_state == SubState::WaitForFinAck {
                fin::r2_recv_fin_ack(txn, collab);
            } else {
                counters.error += 1;
            }
        }
    }
}

fn recv_eof(
    txn: &mut Transaction,
    eof: &crate::pdu::EofPdu,
    config: &ChannelConfig,
    counters: &mut ChannelCounters,
    collab: &mut Collaborators<'_>,
) {
    if txn.class_state.as_class2().expect("class-2 transaction").eof_recv {
        return;
    }

    {
        let state = txn.class_state.as_class2_mut().expect("class-2 transaction");
        state.eof_crc = eof.crc;
        state.eof_size = eof.size;
        state.eof_cc = eof.condition_code;
        state.eof_recv = true;
        state.send_ack = true;
    }

    if !eof.condition_code.is_success() {
        r2_set_fin_txn_status(txn, eof.condition_code);
        if eof.condition_code == ConditionCode::CancelRequestReceived {
            txn.class_state.as_class2_mut().expect("class-2 transaction").canceled = true;
        }
        // A non-success condition code is itself a terminal condition
        // (`eof_cc != NO_ERROR`, spec §4.10 "R2_Reset"): invoke the terminal
        // path directly rather than the Completion Check, which would only
        // ever schedule a FIN and keep the transaction alive through the
        // handshake.
        reset::r2_reset(txn, collab);
        return;
    }

    let md_recv = txn.class_state.as_class2().expect("class-2 transaction").md_recv;
    if md_recv && txn.fsize != eof.size {
        txn.set_status(TransactionStatus::FileSizeError);
        collab.emit(txn.id, Event::SizeMismatchErr);
        counters.file_size_mismatch += 1;
    }

    complete::r2_complete(txn, config, counters, collab, false);
}

/// Records a non-success EOF condition code as the transaction's disposition
/// (spec §6 "`R2_SetFinTxnStatus(txn, cc)`").
///
/// Used when EOF arrives with a non-`NO_ERROR` condition code so the
/// eventual FIN echoes it back to the sender.
pub fn r2_set_fin_txn_status(txn: &mut Transaction, cc: ConditionCode) {
    match cc {
        ConditionCode::NoError => {}
        ConditionCode::CancelRequestReceived => {
            txn.set_status(TransactionStatus::CancelRequestReceived);
        }
        ConditionCode::Other(_) => {
            txn.set_status(TransactionStatus::InvalidFileStructure);
        }
    }
}
