//! Incremental CRC-32 digest used by the integrity verifier (spec §4.9, §8).
//!
//! CFDP transactions are checksummed with a single fixed algorithm (CRC-32,
//! ISO 3309), so unlike the other collaborators in [`crate::collab`] this is
//! not exposed as a trait boundary — there is nothing a caller would swap it
//! for.

use crc32fast::Hasher;

/// Running CRC-32 digest over received file bytes.
///
/// Class-1 transactions feed this incrementally as file-data PDUs arrive.
/// Class-2 transactions instead feed it in bounded slices from
/// [`crate::class2::fin::calc_crc_chunk`], re-reading the reconstructed file
/// rather than trusting bytes as they arrived out of order.
#[derive(Clone, Debug, Default)]
pub struct Crc32 {
    hasher: Hasher,
}

impl Crc32 {
    /// Creates a fresh digest with no bytes accumulated.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `data` into the running digest.
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Resets the digest to its initial state, discarding any accumulated bytes.
    pub fn reset(&mut self) {
        self.hasher = Hasher::new();
    }

    /// Finalizes the digest without consuming it, so additional bytes may
    /// still be folded in afterward if the caller needs a running checkpoint.
    #[must_use]
    pub fn current(&self) -> u32 {
        self.hasher.clone().finalize()
    }
}

/// Compares a computed CRC against the value declared by the sender
/// (spec §6 "`R_CheckCrc(txn, expected) -> 0 | ERROR`").
///
/// Shared by [`crate::class1::r1_recv`]'s EOF handling and
/// [`crate::class2::fin::calc_crc_chunk`]'s finalization step, so the two
/// classes' CRC comparisons stay textually identical.
#[must_use]
pub fn r_check_crc(computed: u32, expected: u32) -> Result<(), ()> {
    if computed == expected {
        Ok(())
    } else {
        Err(())
    }
}
