//! Convenience re-exports for test suites

pub use crate::fault::{FaultInjector, parse_fault_duration};
pub use crate::fixtures::{patterned_image, seed_slot};
pub use crate::sinks::FailingAuditSink;
