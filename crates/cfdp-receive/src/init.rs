//! Initialization (spec §4.1 "R_Init").

use crate::class1;
use crate::collab::{Collaborators, FileStore, TimerSource};
use crate::counters::ChannelCounters;
use crate::events::Event;
use crate::status::TransactionStatus;
use crate::transaction::{Class, SubState, Transaction};

/// Prepares a newly-created transaction to begin receiving.
///
/// Opens (or creates) the destination file using `txn.temp_filename` — for a
/// Class-2 transaction with no metadata yet, this is a temporary name derived
/// from transaction identity by the caller, and an informational event is
/// raised to record that substitution (spec §4.1 step 2). On open failure,
/// Class-1 transactions reset immediately; Class-2 transactions record
/// `FilestoreRejection` and schedule a FIN instead, so the sender still
/// learns the transfer failed. Class-2 transactions always arm the ACK timer
/// before returning (spec §4.1 step 4).
pub fn r_init(
    txn: &mut Transaction,
    counters: &mut ChannelCounters,
    collab: &mut Collaborators<'_>,
) {
    txn.sub_state = SubState::FileData;

    let temp_name = txn.temp_filename.clone();
    match collab.fs.open_or_create(&temp_name) {
        Ok(()) => {
            if txn.class() == Class::Class2 {
                collab.emit(txn.id, Event::TempFileInf);
            }
        }
        Err(_) => {
            counters.file_open += 1;
            collab.emit(txn.id, Event::CreatErr);
            match txn.class() {
                Class::Class1 => {
                    class1::r1_reset(txn, collab);
                    return;
                }
                Class::Class2 => {
                    txn.set_status(TransactionStatus::FilestoreRejection);
                    if let Some(state) = txn.class_state.as_class2_mut() {
                        state.send_fin = true;
                    }
                }
            }
        }
    }

    if txn.class() == Class::Class2 {
        collab.timers.arm_ack(txn.id);
        if let Some(state) = txn.class_state.as_class2_mut() {
            state.ack_timer_armed = true;
        }
    }
}
