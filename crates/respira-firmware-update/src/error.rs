//! Error types for firmware update operations

use thiserror::Error;

use crate::slot::Slot;

/// Errors that can occur during firmware update operations
#[derive(Error, Debug)]
pub enum FirmwareUpdateError {
    /// Referenced slot has never been written
    #[error("firmware slot not found: {0}")]
    SlotNotFound(Slot),

    /// I/O failure while reading a slot
    #[error("read error on slot {slot}: {source}")]
    Read {
        /// Slot being read when the failure occurred
        slot: Slot,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while writing a slot
    #[error("write error on slot {slot}: {source}")]
    Write {
        /// Slot being written when the failure occurred
        slot: Slot,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Digest or size check failed
    #[error("integrity mismatch: {0}")]
    IntegrityMismatch(String),

    /// An update transaction is already in flight
    #[error("firmware update already in progress")]
    Busy,

    /// Rollback itself failed its integrity check; the device has no
    /// verified image and needs operator attention
    #[error("rollback failed integrity check: {0}")]
    UnrecoverableRollback(String),

    /// Caller-supplied value could not be parsed or is out of range
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl FirmwareUpdateError {
    /// Map an I/O error on a read path, folding `NotFound` into the slot
    /// taxonomy
    pub(crate) fn read(slot: Slot, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            FirmwareUpdateError::SlotNotFound(slot)
        } else {
            FirmwareUpdateError::Read { slot, source }
        }
    }

    /// Map an I/O error on a write path
    pub(crate) fn write(slot: Slot, source: std::io::Error) -> Self {
        FirmwareUpdateError::Write { slot, source }
    }
}
