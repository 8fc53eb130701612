//! Gap Tracking & NAK Generation (spec §4.5 "R2_GapCompute", "SubstateSendNak").

use std::ops::Range;

use crate::collab::{ChunkStore, Collaborators, PduTransmitter, SendError};
use crate::config::ChannelConfig;
use crate::events::Event;
use crate::pdu::{NakPdu, NakSegment};
use crate::transaction::Transaction;

/// Builds the segment list for a NAK covering gaps within `scope`, clamped
/// to `max_segments` (`CF_PDU_MAX_SEGMENTS`, spec §4.5/§8 scenario 6).
///
/// Segment offsets are relativized to `scope.start`, matching the wire rule
/// in spec §6 ("segment offsets are written as `gap_offset − scope_start`").
pub fn build_nak_segments(
    chunks: &dyn ChunkStore,
    scope: Range<u64>,
    max_segments: usize,
) -> Vec<NakSegment> {
    let mut segments = Vec::new();
    let scope_start = scope.start;
    chunks.compute_gaps(scope, &mut |gap| {
        if segments.len() < max_segments {
            segments.push(NakSegment {
                offset_start: gap.start - scope_start,
                offset_end: gap.end - scope_start,
            });
        }
    });
    segments
}

/// Sends (or decides not to send) a NAK for the FILEDATA sub-state.
///
/// Returns `Ok(())` when the pending `send_nak` flag may be cleared: either
/// the NAK was transmitted, or no metadata has arrived yet and a blank
/// metadata-request NAK was sent, or no gaps remain and the transaction was
/// marked complete instead of sending anything. Returns `Err` when the
/// transmit itself failed and the flag must stay set for the next `Tick`
/// to retry (spec §4.5 "NAK send failure ... does not clear send_nak").
pub fn substate_send_nak(
    txn: &mut Transaction,
    config: &ChannelConfig,
    collab: &mut Collaborators<'_>,
) -> Result<(), SendError> {
    let md_recv = txn.class_state.as_class2().expect("class-2 transaction").md_recv;

    if !md_recv {
        collab.emit(txn.id, Event::RequestMdInf);
        collab.pdu.send_nak(txn.id, &NakPdu::default())?;
        return Ok(());
    }

    let segments = build_nak_segments(collab.chunks, 0..txn.fsize, config.max_nak_segments);

    if segments.is_empty() {
        txn.class_state.as_class2_mut().expect("class-2 transaction").complete = true;
        return Ok(());
    }

    let nak = NakPdu {
        scope: Some((0, txn.fsize)),
        segments,
    };
    let result = collab.pdu.send_nak(txn.id, &nak);
    // Set on attempt regardless of outcome (spec §9 open question).
    txn.class_state.as_class2_mut().expect("class-2 transaction").fd_nak_sent = true;
    result
}
