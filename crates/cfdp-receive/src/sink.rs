//! File Sink: writes incoming file-data PDUs to the backing file
//! (spec §4.4 "ProcessFd").

use crate::collab::{Collaborators, FileStore};
use crate::counters::ChannelCounters;
use crate::events::Event;
use crate::pdu::FileDataPdu;
use crate::status::TransactionStatus;
use crate::transaction::Transaction;

/// Writes `pdu`'s bytes to the backing file, updating `cached_pos`/`fsize`
/// on success.
///
/// Seeks only when `pdu.offset` differs from the cached write position,
/// avoiding a redundant seek for the common case of sequentially-arriving
/// file data (spec §8 "File sink" property).
///
/// On any failure the transaction status and an [`Event`] are recorded and
/// `Err(())` is returned; the caller (spec §4.2, §4.3) is responsible for
/// deciding what happens next (immediate `Reset` for Class-1, schedule FIN
/// for Class-2).
pub fn process_fd(
    txn: &mut Transaction,
    pdu: &FileDataPdu<'_>,
    counters: &mut ChannelCounters,
    collab: &mut Collaborators<'_>,
) -> Result<(), ()> {
    if pdu.offset != txn.cached_pos {
        if collab.fs.seek(pdu.offset).is_err() {
            txn.set_status(TransactionStatus::FileSizeError);
            collab.emit(txn.id, Event::SeekFdErr);
            counters.file_seek += 1;
            return Err(());
        }
    }

    let wrote_fully = matches!(collab.fs.write(pdu.data), Ok(written) if written == pdu.data.len());
    if !wrote_fully {
        txn.set_status(TransactionStatus::FilestoreRejection);
        collab.emit(txn.id, Event::WriteErr);
        counters.file_write += 1;
        return Err(());
    }

    txn.cached_pos = pdu.offset + pdu.data.len() as u64;
    txn.fsize = txn.fsize.max(txn.cached_pos);
    counters.file_data_bytes += pdu.data.len() as u64;
    Ok(())
}
