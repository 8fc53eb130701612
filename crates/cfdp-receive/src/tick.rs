//! Periodic Tick Driver (spec §4.9 "R_Tick") and the inactivity-event helper
//! it shares with nothing else (spec §6 "R_SendInactivityEvent").
//!
//! Tick is the only place pending-send flags actually get acted on; `Recv`
//! only ever sets them. Within one call the order is fixed (spec §5):
//! inactivity, then (Class-2 only) pending-ACK, pending-NAK, pending-FIN,
//! ACK-timer, chunked CRC work.

use crate::class1;
use crate::class2::{complete, fin, nak, reset};
use crate::collab::Collaborators;
use crate::config::ChannelConfig;
use crate::counters::ChannelCounters;
use crate::events::Event;
use crate::status::TransactionStatus;
use crate::transaction::{Class, SubState, Transaction};

/// Advances a transaction's timers and flushes any pending sends.
///
/// `*cont` is set to `false` exactly when this call tears the transaction
/// down, so the caller knows to stop ticking it; it is otherwise left `true`.
pub fn r_tick(
    txn: &mut Transaction,
    config: &ChannelConfig,
    counters: &mut ChannelCounters,
    collab: &mut Collaborators<'_>,
    cont: &mut bool,
) {
    *cont = true;

    if collab.timers.tick_inactivity(txn.id) {
        match txn.class() {
            Class::Class1 => {
                r_send_inactivity_event(txn, counters, collab);
                class1::r1_reset(txn, collab);
                *cont = false;
                return;
            }
            Class::Class2 => {
                let already_fired =
                    txn.class_state.as_class2().expect("class-2 transaction").inactivity_fired;
                if !already_fired {
                    r_send_inactivity_event(txn, counters, collab);
                    txn.class_state
                        .as_class2_mut()
                        .expect("class-2 transaction")
                        .inactivity_fired = true;
                }
            }
        }
    }

    if txn.class() == Class::Class1 {
        return;
    }

    let send_ack = txn.class_state.as_class2().expect("class-2 transaction").send_ack;
    if send_ack && collab.pdu.send_ack(txn.id).is_ok() {
        txn.class_state.as_class2_mut().expect("class-2 transaction").send_ack = false;
    }

    let send_nak = txn.class_state.as_class2().expect("class-2 transaction").send_nak;
    if send_nak && nak::substate_send_nak(txn, config, collab).is_ok() {
        txn.class_state.as_class2_mut().expect("class-2 transaction").send_nak = false;
    }

    let send_fin = txn.class_state.as_class2().expect("class-2 transaction").send_fin;
    if send_fin {
        let _ = fin::r2_substate_send_fin(txn, collab);
    }

    let ack_timer_armed =
        txn.class_state.as_class2().expect("class-2 transaction").ack_timer_armed;
    if ack_timer_armed && collab.timers.tick_ack(txn.id) {
        if txn.sub_state == SubState::WaitForFinAck {
            let state = txn.class_state.as_class2_mut().expect("class-2 transaction");
            state.acknak_count += 1;
            if state.acknak_count > config.ack_limit {
                counters.ack_limit += 1;
                txn.set_status(TransactionStatus::AckLimitReached);
                if reset::r2_reset(txn, collab) {
                    *cont = false;
                    return;
                }
            } else {
                state.send_fin = true;
                collab.timers.arm_ack(txn.id);
            }
        } else {
            complete::r2_complete(txn, config, counters, collab, true);
            collab.timers.arm_ack(txn.id);
        }
    }

    let (crc_work_due, crc_calc, status_is_error) = {
        let state = txn.class_state.as_class2().expect("class-2 transaction");
        (state.send_fin, state.crc_calc, txn.history.status.is_error())
    };
    if crc_work_due && !crc_calc && !status_is_error {
        fin::calc_crc_chunk(txn, config, counters, collab);
    }
}

/// Records an inactivity timeout against a transaction (spec §6
/// "`R_SendInactivityEvent(txn)`").
fn r_send_inactivity_event(
    txn: &mut Transaction,
    counters: &mut ChannelCounters,
    collab: &mut Collaborators<'_>,
) {
    txn.set_status(TransactionStatus::InactivityDetected);
    collab.emit(txn.id, Event::InactTimerErr);
    counters.inactivity_timer += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::ChunkList;
    use crate::testutil::{
        FakeEventSink, FakeFileStore, FakePduTransmitter, FakeTeardown, FakeTimerSource,
    };
    use crate::transaction::{Class, TransactionId};

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
    fn class1_inactivity_tears_down_and_stops_ticking() {
        let mut txn = Transaction::new(TransactionId(1), Class::Class1, 0, "tmp".into());
        let config = ChannelConfig::default();
        let mut fs = FakeFileStore::new();
        let mut pdu_tx = FakePduTransmitter::new();
        let mut timers = FakeTimerSource::new();
        timers.inactivity_expires_next = true;
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
        let mut cont = true;

        r_tick(&mut txn, &config, &mut counters, &mut c, &mut cont);

        assert!(!cont);
        assert_eq!(teardown.call_count(), 1);
        assert_eq!(counters.inactivity_timer, 1);
        assert_eq!(events.count(Event::InactTimerErr), 1);
    }

    #[test]
    fn class2_inactivity_fires_once_and_does_not_retear_down() {
        let mut txn = Transaction::new(TransactionId(2), Class::Class2, 0, "tmp".into());
        let config = ChannelConfig::default();
        let mut fs = FakeFileStore::new();
        let mut pdu_tx = FakePduTransmitter::new();
        let mut timers = FakeTimerSource::new();
        timers.inactivity_expires_next = true;
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
        let mut cont = true;

        r_tick(&mut txn, &config, &mut counters, &mut c, &mut cont);
        r_tick(&mut txn, &config, &mut counters, &mut c, &mut cont);

        assert_eq!(counters.inactivity_timer, 1);
        assert_eq!(events.count(Event::InactTimerErr), 1);
        assert_eq!(
            txn.history.status,
            TransactionStatus::InactivityDetected
        );
    }

    #[test]
    fn pending_ack_is_flushed_and_cleared_on_success() {
        let mut txn = Transaction::new(TransactionId(3), Class::Class2, 0, "tmp".into());
        txn.class_state.as_class2_mut().unwrap().send_ack = true;
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
        let mut cont = true;

        r_tick(&mut txn, &config, &mut counters, &mut c, &mut cont);

        assert_eq!(pdu_tx.acks_sent, 1);
        assert!(!txn.class_state.as_class2().unwrap().send_ack);
    }

    #[test]
    fn ack_timer_expiry_outside_wait_for_fin_ack_forces_completion_check() {
        let mut txn = Transaction::new(TransactionId(4), Class::Class2, 0, "tmp".into());
        txn.fsize = 300;
        {
            let state = txn.class_state.as_class2_mut().unwrap();
            state.md_recv = true;
            state.eof_recv = true;
            state.ack_timer_armed = true;
        }
        let config = ChannelConfig::default();
        let mut fs = FakeFileStore::new();
        let mut pdu_tx = FakePduTransmitter::new();
        let mut timers = FakeTimerSource::new();
        timers.ack_expires_next = true;
        let mut chunks = ChunkList::new(config.max_chunks);
        chunks.add(0..300);
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
        let mut cont = true;

        r_tick(&mut txn, &config, &mut counters, &mut c, &mut cont);

        assert!(txn.class_state.as_class2().unwrap().complete);
        assert!(txn.class_state.as_class2().unwrap().send_fin);
    }

    #[test]
    fn ack_timer_expiry_in_wait_for_fin_ack_retransmits_fin_until_limit() {
        let mut txn = Transaction::new(TransactionId(5), Class::Class2, 0, "tmp".into());
        txn.sub_state = SubState::WaitForFinAck;
        {
            let state = txn.class_state.as_class2_mut().unwrap();
            state.ack_timer_armed = true;
            state.crc_calc = true;
        }
        let mut config = ChannelConfig::default();
        config.ack_limit = 1;
        let mut fs = FakeFileStore::new();
        let mut pdu_tx = FakePduTransmitter::new();
        let mut timers = FakeTimerSource::new();
        timers.ack_expires_next = true;
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
        let mut cont = true;

        r_tick(&mut txn, &config, &mut counters, &mut c, &mut cont);
        assert!(cont);
        assert_eq!(txn.class_state.as_class2().unwrap().acknak_count, 1);

        r_tick(&mut txn, &config, &mut counters, &mut c, &mut cont);

        assert!(!cont);
        assert_eq!(counters.ack_limit, 1);
        assert_eq!(teardown.call_count(), 1);
        assert_eq!(txn.history.status, TransactionStatus::AckLimitReached);
    }

    #[test]
    fn crc_chunk_work_runs_only_once_fin_is_pending() {
        let mut txn = Transaction::new(TransactionId(6), Class::Class2, 0, "tmp".into());
        txn.fsize = 4;
        txn.class_state.as_class2_mut().unwrap().send_fin = true;
        let config = ChannelConfig::default();
        let mut fs = FakeFileStore::new();
        fs.write(&[9u8; 4]).unwrap();
        fs.seek(0).unwrap();
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
        let mut cont = true;

        r_tick(&mut txn, &config, &mut counters, &mut c, &mut cont);

        assert!(txn.class_state.as_class2().unwrap().crc_calc);
    }

    #[test]
    fn no_crc_work_without_a_pending_fin() {
        let mut txn = Transaction::new(TransactionId(7), Class::Class2, 0, "tmp".into());
        txn.fsize = 4;
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
        let mut cont = true;

        r_tick(&mut txn, &config, &mut counters, &mut c, &mut cont);

        assert!(!txn.class_state.as_class2().unwrap().crc_calc);
    }
}
