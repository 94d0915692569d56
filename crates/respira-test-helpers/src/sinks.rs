//! Audit sinks with deliberately bad behavior

use async_trait::async_trait;

use respira_audit::{AuditError, AuditEvent, AuditSink};

/// Sink that rejects every event
///
/// Used to prove audit delivery is advisory: an audit outage must never
/// fail or block a firmware operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingAuditSink;

impl FailingAuditSink {
    /// Create a sink that always errors
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditSink for FailingAuditSink {
    async fn record(&self, _event: AuditEvent) -> Result<(), AuditError> {
        Err(AuditError::Unavailable(
            "audit store offline (test sink)".to_string(),
        ))
    }
}
