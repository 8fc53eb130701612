//! Metadata Reception (spec §4.7 "R2_RecvMd").

use crate::collab::Collaborators;
use crate::counters::ChannelCounters;
use crate::events::Event;
use crate::pdu::MetadataPdu;
use crate::status::TransactionStatus;
use crate::transaction::Transaction;

/// Processes an inbound metadata PDU.
///
/// A second metadata PDU is a no-op (spec §8 idempotence property, applied
/// here by analogy with the EOF idempotence spec §4.3 states explicitly).
/// An empty destination filename is treated as a parse failure, since this
/// crate receives already-decoded [`MetadataPdu`] values and has no other
/// way to observe a malformed metadata PDU.
pub fn r2_recv_md(
    txn: &mut Transaction,
    pdu: &MetadataPdu,
    counters: &mut ChannelCounters,
    collab: &mut Collaborators<'_>,
) {
    if txn.class_state.as_class2().expect("class-2 transaction").md_recv {
        return;
    }

    if pdu.destination_filename.is_empty() {
        counters.error += 1;
        collab.emit(txn.id, Event::PduMdErr);
        return;
    }

    if collab.fs.rename(&pdu.destination_filename).is_err() {
        txn.set_status(TransactionStatus::FilestoreRejection);
        collab.emit(txn.id, Event::RenameErr);
        return;
    }

    if collab.fs.open_or_create(&pdu.destination_filename).is_err() {
        txn.set_status(TransactionStatus::FilestoreRejection);
        collab.emit(txn.id, Event::OpenErr);
    }

    txn.cached_pos = 0;
    txn.destination_filename = Some(pdu.destination_filename.clone());
    if let Some(file_size) = pdu.file_size {
        txn.fsize = txn.fsize.max(file_size);
    }

    let state = txn.class_state.as_class2_mut().expect("class-2 transaction");
    state.md_recv = true;
    state.acknak_count = 0;

    if state.eof_recv && txn.fsize != state.eof_size {
        txn.set_status(TransactionStatus::FileSizeError);
        collab.emit(txn.id, Event::EofMdSizeErr);
    }
}
