//! Completion Check (spec §4.6 "R2_Complete").

use crate::collab::{ChunkStore, Collaborators};
use crate::config::ChannelConfig;
use crate::counters::ChannelCounters;
use crate::events::Event;
use crate::transaction::{SubState, Transaction};

/// Decides whether a Class-2 transaction is done receiving and, if not,
/// whether it should request retransmission.
///
/// `ok_to_send_nak` mirrors the parameter of the same name in spec §4.6: the
/// EOF path calls this with `false` (an EOF alone never triggers a NAK
/// retransmission round; [`crate::class2::nak`] handles that from `Tick`
/// instead), while the file-data forward-progress path would call it with
/// `true`. Errors always win over completeness: a transaction that is
/// already in an error state moves straight to FIN.
pub fn r2_complete(
    txn: &mut Transaction,
    config: &ChannelConfig,
    counters: &mut ChannelCounters,
    collab: &mut Collaborators<'_>,
    ok_to_send_nak: bool,
) {
    if txn.history.status.is_error() {
        let state = txn.class_state.as_class2_mut().expect("class-2 transaction");
        state.send_fin = true;
        state.complete = true;
        txn.sub_state = SubState::FileData;
        return;
    }

    let (md_recv, eof_recv) = {
        let state = txn.class_state.as_class2().expect("class-2 transaction");
        (state.md_recv, state.eof_recv)
    };

    if md_recv && eof_recv && covers(txn.fsize, collab) {
        let state = txn.class_state.as_class2_mut().expect("class-2 transaction");
        state.complete = true;
        state.send_fin = true;
        return;
    }

    if ok_to_send_nak {
        let state = txn.class_state.as_class2_mut().expect("class-2 transaction");
        state.acknak_count += 1;
        if state.acknak_count > config.nak_limit {
            counters.nak_limit += 1;
            collab.emit(txn.id, Event::NakLimitErr);
            let state = txn.class_state.as_class2_mut().expect("class-2 transaction");
            state.complete = true;
            state.send_fin = true;
        } else {
            state.send_nak = true;
        }
    }
}

fn covers(fsize: u64, collab: &mut Collaborators<'_>) -> bool {
    let mut fully_covered = true;
    collab.chunks.compute_gaps(0..fsize, &mut |_| fully_covered = false);
    fully_covered
}
