//! Audit event construction and delivery for Respira device software
//!
//! Regulatory-relevant facts (firmware updates, rollbacks, injected faults)
//! are modelled as append-only [`AuditEvent`]s. This crate owns event
//! *construction*; storage lives behind the [`AuditSink`] trait so the core
//! subsystems never depend on a concrete backend.
//!
//! Delivery is best-effort by convention: callers log a failed `record` and
//! carry on. An audit outage must never block a firmware operation.
//!
//! # Example
//!
//! ```
//! use respira_audit::{AuditEvent, AuditSink, MemoryAuditSink};
//!
//! # async fn example() -> Result<(), respira_audit::AuditError> {
//! let sink = MemoryAuditSink::new();
//! let event = AuditEvent::new("firmware_update")
//!     .with_field("status", "success")
//!     .with_field("attempt_id", 3u64);
//! sink.record(event).await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod event;
pub mod sink;

pub use event::{AuditEvent, AuditValue};
pub use sink::{AuditError, AuditSink, MemoryAuditSink, TracingAuditSink};
