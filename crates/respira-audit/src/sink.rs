//! Audit sink trait and in-process implementations

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::event::AuditEvent;

/// Errors surfaced by an audit backend
///
/// Callers treat these as advisory: delivery failures are logged and never
/// propagated into the operation that produced the event.
#[derive(Error, Debug)]
pub enum AuditError {
    /// The backend rejected or could not accept the event
    #[error("audit backend unavailable: {0}")]
    Unavailable(String),

    /// The event payload could not be rendered for transport
    #[error("audit serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Destination for audit events
///
/// Implementations must tolerate concurrent `record` calls. The core emits
/// one event per state transition of interest and never retries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record one event
    ///
    /// # Errors
    ///
    /// Returns an [`AuditError`] when the backend cannot accept the event.
    async fn record(&self, event: AuditEvent) -> Result<(), AuditError>;
}

/// Sink that emits events through the `tracing` pipeline
///
/// The in-process default: events land in whatever subscriber the host
/// installed, alongside ordinary diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    /// Create a tracing-backed sink
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: AuditEvent) -> Result<(), AuditError> {
        let payload = event.to_json()?;
        info!(target: "respira::audit", event = %event.name, %payload, "audit event");
        Ok(())
    }
}

/// Append-only in-memory sink for tests
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, in arrival order
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().await.clone()
    }

    /// Events whose name matches `name`, in arrival order
    pub async fn events_named(&self, name: &str) -> Vec<AuditEvent> {
        self.events
            .lock()
            .await
            .iter()
            .filter(|e| e.name == name)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, event: AuditEvent) -> Result<(), AuditError> {
        self.events.lock().await.push(event);
        Ok(())
    }
}
