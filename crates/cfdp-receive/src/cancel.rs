//! Externally-requested cancellation (spec §4.10 "R_Cancel").
//!
//! Distinct from a peer-originated cancel arriving as an EOF condition code
//! (handled by [`crate::class2::r2_set_fin_txn_status`]): this is the local
//! engine asking the receive core to abandon a transaction it owns.

use crate::class1;
use crate::class2::reset;
use crate::collab::Collaborators;
use crate::counters::ChannelCounters;
use crate::status::TransactionStatus;
use crate::transaction::{Class, SubState, Transaction};

/// Cancels `txn`. Class-1 has no handshake to unwind, so it tears down
/// immediately; Class-2 marks itself canceled and either tears down right
/// away (if already in `WAIT_FOR_FIN_ACK`) or schedules a FIN carrying
/// `CANCEL_REQUEST_RECEIVED` instead, to be sent out through the ordinary
/// FIN handshake (spec §4.10 "Cancel ... if already in WAIT_FOR_FIN_ACK,
/// Reset; otherwise set send_fin").
///
/// A `FILEDATA`-sub-state cancel deliberately does not go through
/// [`reset::r2_reset`]: that function's own terminal check treats `canceled`
/// as unconditionally terminal (spec §4.10 "R2_Reset"), which would tear the
/// transaction down immediately here instead of letting it pass through the
/// FIN handshake as spec §4.10's `R_Cancel` clause requires.
pub fn r_cancel(
    txn: &mut Transaction,
    _counters: &mut ChannelCounters,
    collab: &mut Collaborators<'_>,
) {
    txn.set_status(TransactionStatus::CancelRequestReceived);

    match txn.class() {
        Class::Class1 => {
            class1::r1_reset(txn, collab);
        }
        Class::Class2 => {
            txn.class_state.as_class2_mut().expect("class-2 transaction").canceled = true;
            if txn.sub_state == SubState::WaitForFinAck {
                reset::r2_reset(txn, collab);
            } else {
                txn.class_state.as_class2_mut().expect("class-2 transaction").send_fin = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::ChunkList;
    use crate::config::ChannelConfig;
    use crate::testutil::{
        FakeEventSink, FakeFileStore, FakePduTransmitter, FakeTeardown, FakeTimerSource,
    };
    use crate::transaction::{SubState, TransactionId};

    #[allow(clippy::too_many_arguments)]
    fn collab<'a>(
        fs: &'a mut FakeFileStore,
        pdu: &'a mut FakePduTransmitter,
        timers: &'a mut FakeTimerSource,
        chunks: &'a mut ChunkList,
        events: &'a mut FakeEventSink,
        teardown: &'a mut FakeTeardown,
    ) -> Collaborators<'a> {
        Collaborators {
            fs,
            pdu,
            timers,
            chunks,
            events,
            teardown,
        }
    }

    #[test]
    fn class1_cancel_tears_down_immediately() {
        let mut txn = Transaction::new(TransactionId(1), Class::Class1, 0, "tmp".into());
        let config = ChannelConfig::default();
        let mut fs = FakeFileStore::new();
        let mut pdu_tx = FakePduTransmitter::new();
        let mut timers = FakeTimerSource::new();
        let mut chunks = ChunkList::new(config.max_chunks);
        let mut events = FakeEventSink::new();
        let mut teardown = FakeTeardown::new();
        let mut counters = ChannelCounters::default();
        let mut c = collab(
            &mut fs,
            &mut pdu_tx,
            &mut timers,
            &mut chunks,
            &mut events,
            &mut teardown,
        );

        r_cancel(&mut txn, &mut counters, &mut c);

        assert_eq!(teardown.call_count(), 1);
        assert_eq!(txn.history.status, TransactionStatus::CancelRequestReceived);
    }

    #[test]
    fn class2_cancel_in_filedata_schedules_fin() {
        let mut txn = Transaction::new(TransactionId(2), Class::Class2, 0, "tmp".into());
        let config = ChannelConfig::default();
        let mut fs = FakeFileStore::new();
        let mut pdu_tx = FakePduTransmitter::new();
        let mut timers = FakeTimerSource::new();
        let mut chunks = ChunkList::new(config.max_chunks);
        let mut events = FakeEventSink::new();
        let mut teardown = FakeTeardown::new();
        let mut counters = ChannelCounters::default();
        let mut c = collab(
            &mut fs,
            &mut pdu_tx,
            &mut timers,
            &mut chunks,
            &mut events,
            &mut teardown,
        );

        r_cancel(&mut txn, &mut counters, &mut c);

        assert_eq!(teardown.call_count(), 0);
        assert!(txn.class_state.as_class2().unwrap().canceled);
        assert!(txn.class_state.as_class2().unwrap().send_fin);
    }

    #[test]
    fn class2_cancel_in_wait_for_fin_ack_tears_down() {
        let mut txn = Transaction::new(TransactionId(3), Class::Class2, 0, "tmp".into());
        txn.sub_state = SubState::WaitForFinAck;
        let config = ChannelConfig::default();
        let mut fs = FakeFileStore::new();
        let mut pdu_tx = FakePduTransmitter::new();
        let mut timers = FakeTimerSource::new();
        let mut chunks = ChunkList::new(config.max_chunks);
        let mut events = FakeEventSink::new();
        let mut teardown = FakeTeardown::new();
        let mut counters = ChannelCounters::default();
        let mut c = collab(
            &mut fs,
            &mut pdu_tx,
            &mut timers,
            &mut chunks,
            &mut events,
            &mut teardown,
        );

        r_cancel(&mut txn, &mut counters, &mut c);

        assert_eq!(teardown.call_count(), 1);
    }
}
