//! Integrity validation over firmware slots
//!
//! Composes the content hasher with the slot store to prove that two slots
//! hold byte-identical images, and that an image clears the minimum-size
//! sanity floor. Every operation here is a pure read: it completes with a
//! boolean or fails, and never mutates a slot.

use crate::digest::{Digest, digest_reader};
use crate::error::FirmwareUpdateError;
use crate::slot::Slot;
use crate::store::SlotStore;

/// Read-only integrity checks over a [`SlotStore`]
#[derive(Debug, Clone, Copy)]
pub struct IntegrityValidator<'a> {
    store: &'a SlotStore,
    chunk_size: usize,
}

impl<'a> IntegrityValidator<'a> {
    /// Build a validator reading in `chunk_size` increments
    pub fn new(store: &'a SlotStore, chunk_size: usize) -> Self {
        Self { store, chunk_size }
    }

    /// Digest of the full image held in a slot
    ///
    /// # Errors
    ///
    /// [`FirmwareUpdateError::SlotNotFound`] if the slot is absent,
    /// [`FirmwareUpdateError::Read`] on I/O failure mid-stream.
    pub async fn slot_digest(&self, slot: Slot) -> Result<Digest, FirmwareUpdateError> {
        let mut reader = self.store.open(slot).await?;
        digest_reader(&mut reader, self.chunk_size)
            .await
            .map_err(|e| FirmwareUpdateError::read(slot, e))
    }

    /// True iff both slots hold bit-identical content
    ///
    /// # Errors
    ///
    /// Fails with [`FirmwareUpdateError::SlotNotFound`] or
    /// [`FirmwareUpdateError::Read`] if either slot cannot be read in full.
    pub async fn verify_match(
        &self,
        slot_a: Slot,
        slot_b: Slot,
    ) -> Result<bool, FirmwareUpdateError> {
        let digest_a = self.slot_digest(slot_a).await?;
        let digest_b = self.slot_digest(slot_b).await?;
        Ok(digest_a == digest_b)
    }

    /// True iff the slot's image is at least `min_bytes` long
    ///
    /// Guards against accepting a truncated image as valid; a floor, not a
    /// proof of content.
    ///
    /// # Errors
    ///
    /// Fails with [`FirmwareUpdateError::SlotNotFound`] or
    /// [`FirmwareUpdateError::Read`] if the slot cannot be inspected.
    pub async fn verify_minimum_size(
        &self,
        slot: Slot,
        min_bytes: u64,
    ) -> Result<bool, FirmwareUpdateError> {
        let size = self.store.size(slot).await?;
        Ok(size >= min_bytes)
    }
}
