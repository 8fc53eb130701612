//! Class-1 Receiver: PDU dispatch and terminal handling for unacknowledged
//! transfers (spec §4.2 "R1_Recv", §4.10 "R1_Reset").

use crate::collab::{Collaborators, Teardown};
use crate::counters::ChannelCounters;
use crate::crc;
use crate::events::Event;
use crate::pdu::InboundPdu;
use crate::sink;
use crate::status::TransactionStatus;
use crate::transaction::Transaction;

/// Dispatches one inbound PDU to a Class-1 transaction.
///
/// File-data is handed to the File Sink and digested into `crc_accum`; any
/// sink failure resets the transaction immediately. EOF always ends the
/// transaction (spec §4.2): it validates size and CRC, sets [`Transaction::keep`]
/// on success, and resets unconditionally. Any other PDU kind is ignored —
/// Class-1 has no metadata or FIN-ACK handling.
pub fn r1_recv(
    txn: &mut Transaction,
    pdu: &InboundPdu<'_>,
    counters: &mut ChannelCounters,
    collab: &mut Collaborators<'_>,
) {
    match pdu {
        InboundPdu::FileData(fd) => {
            match sink::process_fd(txn, fd, counters, collab) {
                Ok(()) => txn.crc_accum.update(fd.data),
                Err(()) => r1_reset(txn, collab),
            }
        }
        InboundPdu::Eof(eof) => {
            if txn.fsize != eof.size {
                txn.set_status(TransactionStatus::FileSizeError);
                collab.emit(txn.id, Event::SizeMismatchErr);
                counters.file_size_mismatch += 1;
            } else if crc::r_check_crc(txn.crc_accum.current(), eof.crc).is_err() {
                txn.set_status(TransactionStatus::FileChecksumFailure);
                collab.emit(txn.id, Event::CrcErr);
                counters.crc_mismatch += 1;
            } else {
                txn.keep = true;
            }
            r1_reset(txn, collab);
        }
        InboundPdu::Metadata(_) | InboundPdu::FinAck(_) => {}
    }
}

/// Tears down a Class-1 transaction (spec §4.10 "R1_Reset"): delegates to
/// the external teardown unconditionally. Class-1 never emits PDUs, so
/// there is nothing to flush beforehand.
pub fn r1_reset(txn: &mut Transaction, collab: &mut Collaborators<'_>) {
    collab.teardown.teardown(txn.id, txn.keep);
}
