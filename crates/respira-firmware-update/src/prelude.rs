//! Convenience re-exports for common firmware update types

pub use crate::config::{
    DEFAULT_MAX_FIRMWARE_SIZE, DEFAULT_MIN_FIRMWARE_SIZE, FirmwareUpdateConfig,
};
pub use crate::digest::{DEFAULT_CHUNK_SIZE, Digest, digest_bytes, digest_reader};
pub use crate::error::FirmwareUpdateError;
pub use crate::manager::{
    SlotStatus, UpdateManager, UpdateOutcome, UpdateReport, UpdateState, UpdateTransaction,
    ValidationReport,
};
pub use crate::slot::Slot;
pub use crate::store::SlotStore;
pub use crate::validator::IntegrityValidator;
