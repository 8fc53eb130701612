//! Integration coverage for spec §8 scenario 3: a single gap discovered at
//! EOF, repaired by one NAK round, then completion driven to FIN.

use cfdp_receive::chunks::ChunkList;
use cfdp_receive::class2::r2_recv;
use cfdp_receive::collab::Collaborators;
use cfdp_receive::config::ChannelConfig;
use cfdp_receive::counters::ChannelCounters;
use cfdp_receive::pdu::{ConditionCode, EofPdu, FileDataPdu, InboundPdu, NakSegment};
use cfdp_receive::testutil::{FakeEventSink, FakeFileStore, FakePduTransmitter, FakeTeardown, FakeTimerSource};
use cfdp_receive::tick::r_tick;
use cfdp_receive::transaction::{Class, Transaction, TransactionId};

#[allow(clippy::too_many_arguments)]
fn collab<'a>(
    fs: &'a mut FakeFileStore,
    pdu: &'a mut FakePduTransmitter,
    timers: &'a mut FakeTimerSource,
    chunks: &'a mut ChunkList,
    events: &'a mut FakeEventSink,
    teardown: &'a mut FakeTeardown,
) -> Collaborators<'a> {
    Collaborators { fs, pdu, timers, chunks, events, teardown }
}

/// Drives the first NAK round and gap repair end to end: two file-data PDUs
/// leave a hole at [100, 200), EOF records the gap as outstanding, one
/// ACK-timer expiry turns that into a NAK, a second tick flushes it, and the
/// missing segment arriving afterward leaves only completion bookkeeping for
/// the next ACK-timer expiry to notice.
#[test]
fn gap_is_naked_then_closed_by_the_missing_segment() {
    let config = ChannelConfig::default();
    let mut txn = Transaction::new(TransactionId(1), Class::Class2, 0, "recv.tmp".into());
    txn.class_state.as_class2_mut().unwrap().md_recv = true;

    let mut fs = FakeFileStore::new();
    let mut pdu_tx = FakePduTransmitter::new();
    let mut timers = FakeTimerSource::new();
    let mut chunks = ChunkList::new(config.max_chunks);
    let mut events = FakeEventSink::new();
    let mut teardown = FakeTeardown::new();
    let mut counters = ChannelCounters::default();

    let first = [1u8; 100];
    r2_recv(
        &mut txn,
        &InboundPdu::FileData(FileDataPdu { offset: 0, data: &first }),
        &config,
        &mut counters,
        &mut collab(&mut fs, &mut pdu_tx, &mut timers, &mut chunks, &mut events, &mut teardown),
    );
    let third = [3u8; 100];
    r2_recv(
        &mut txn,
        &InboundPdu::FileData(FileDataPdu { offset: 200, data: &third }),
        &config,
        &mut counters,
        &mut collab(&mut fs, &mut pdu_tx, &mut timers, &mut chunks, &mut events, &mut teardown),
    );
    r2_recv(
        &mut txn,
        &InboundPdu::Eof(EofPdu { crc: 0, size: 300, condition_code: ConditionCode::NoError }),
        &config,
        &mut counters,
        &mut collab(&mut fs, &mut pdu_tx, &mut timers, &mut chunks, &mut events, &mut teardown),
    );

    assert!(txn.class_state.as_class2().unwrap().send_ack);
    assert!(!txn.class_state.as_class2().unwrap().complete);

    let mut cont = true;

    // Tick 1: flush the pending ACK, then let the ACK timer expire and
    // discover the gap, scheduling a NAK.
    timers.ack_expires_next = true;
    r_tick(
        &mut txn,
        &config,
        &mut counters,
        &mut collab(&mut fs, &mut pdu_tx, &mut timers, &mut chunks, &mut events, &mut teardown),
        &mut cont,
    );
    assert_eq!(pdu_tx.acks_sent, 1);
    assert!(txn.class_state.as_class2().unwrap().send_nak);
    assert_eq!(txn.class_state.as_class2().unwrap().acknak_count, 1);

    // Tick 2: flush the pending NAK.
    r_tick(
        &mut txn,
        &config,
        &mut counters,
        &mut collab(&mut fs, &mut pdu_tx, &mut timers, &mut chunks, &mut events, &mut teardown),
        &mut cont,
    );
    assert_eq!(pdu_tx.naks_sent.len(), 1);
    assert_eq!(pdu_tx.naks_sent[0].segments, vec![NakSegment { offset_start: 100, offset_end: 200 }]);
    assert!(txn.class_state.as_class2().unwrap().fd_nak_sent);

    // The missing segment arrives, closing the gap.
    let second = [2u8; 100];
    r2_recv(
        &mut txn,
        &InboundPdu::FileData(FileDataPdu { offset: 100, data: &second }),
        &config,
        &mut counters,
        &mut collab(&mut fs, &mut pdu_tx, &mut timers, &mut chunks, &mut events, &mut teardown),
    );
    assert_eq!(txn.class_state.as_class2().unwrap().acknak_count, 0);

    // Tick 3: the next ACK-timer expiry re-runs the completion check, which
    // now finds full coverage and schedules FIN.
    timers.ack_expires_next = true;
    r_tick(
        &mut txn,
        &config,
        &mut counters,
        &mut collab(&mut fs, &mut pdu_tx, &mut timers, &mut chunks, &mut events, &mut teardown),
        &mut cont,
    );
    assert!(txn.class_state.as_class2().unwrap().complete);
    assert!(txn.class_state.as_class2().unwrap().send_fin);
}
