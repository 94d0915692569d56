//! Firmware update and integrity validation for Respira devices
//!
//! This crate provides safe, recoverable firmware updates with:
//! - Three named slots (`installed`, `candidate`, `backup`) over plain files
//! - Streaming SHA-256 integrity proofs, never loading a full image
//! - A backup-write-validate-commit state machine with deterministic rollback
//! - Single-flight updates: overlapping requests are rejected, not queued
//! - One audit event per transition of interest, delivered best-effort
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`slot`]: Named slot identifiers
//! - [`store`]: Slot-addressed file storage and copy discipline
//! - [`digest`]: Streaming content hashing
//! - [`validator`]: Digest and size checks composed over the store
//! - [`manager`]: The update state machine and its reports
//! - [`config`]: Slot locations and validation bounds
//! - [`error`]: Error types
//!
//! # Recovery model
//!
//! An interrupted candidate-to-installed copy can leave `installed` holding
//! a truncated image. The manager does not try to prevent that window; it
//! detects it during validation and restores the verified backup. The only
//! unrecoverable condition is a rollback whose own integrity check fails,
//! which is surfaced as an error rather than retried against a suspect
//! backup.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use respira_audit::TracingAuditSink;
//! use respira_firmware_update::prelude::*;
//!
//! # async fn example() -> Result<(), FirmwareUpdateError> {
//! let config = FirmwareUpdateConfig::with_firmware_dir("/var/lib/respira/firmware");
//! let manager = UpdateManager::new(config, Arc::new(TracingAuditSink::new()));
//!
//! match manager.update().await?.outcome {
//!     UpdateOutcome::Committed => println!("update applied"),
//!     outcome => println!("update ended in {outcome}"),
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod digest;
pub mod error;
pub mod manager;
pub mod prelude;
pub mod slot;
pub mod store;
pub mod validator;

pub use config::{DEFAULT_MAX_FIRMWARE_SIZE, DEFAULT_MIN_FIRMWARE_SIZE, FirmwareUpdateConfig};
pub use digest::{DEFAULT_CHUNK_SIZE, Digest};
pub use error::FirmwareUpdateError;
pub use manager::{
    SlotStatus, UpdateManager, UpdateOutcome, UpdateReport, UpdateState, UpdateTransaction,
    ValidationReport,
};
pub use slot::Slot;
pub use store::SlotStore;
pub use validator::IntegrityValidator;
