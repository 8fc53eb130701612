//! Terminal teardown for Class-2 transactions (spec §4.10 "R2_Reset").

use crate::collab::Collaborators;
use crate::pdu::ConditionCode;
use crate::transaction::{SubState, Transaction};

/// Tears down a Class-2 transaction if it has reached one of the conditions
/// spec §4.10 lists as unconditionally terminal; otherwise schedules a FIN
/// instead, which will eventually drive the transaction back through this
/// same function once it lands in `WAIT_FOR_FIN_ACK` or an error status.
///
/// Returns `true` if teardown actually ran.
pub fn r2_reset(txn: &mut Transaction, collab: &mut Collaborators<'_>) -> bool {
    let state = txn.class_state.as_class2().expect("class-2 transaction");
    let terminal = txn.sub_state == SubState::WaitForFinAck
        || state.eof_cc != ConditionCode::NoError
        || txn.history.status.is_error()
        || state.canceled;

    if terminal {
        collab.teardown.teardown(txn.id, txn.keep);
        true
    } else {
        txn.class_state.as_class2_mut().expect("class-2 transaction").send_fin = true;
        false
    }
}
