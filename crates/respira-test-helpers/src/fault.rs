//! Fault injection for recovery-path testing
//!
//! Constructs the corrupted preconditions the update manager's recovery
//! protocol exists to handle: a slot holding a truncated prefix of an image,
//! exactly what an abrupt power loss mid-copy produces. Goes through the
//! store's `write_in_place` primitive, never the atomic path.

use std::sync::Arc;

use tokio::io::AsyncReadExt;

use respira_audit::{AuditEvent, AuditSink};
use respira_firmware_update::{FirmwareUpdateError, Slot, SlotStore};

/// Deliberately corrupts slot contents to exercise recovery paths
pub struct FaultInjector<'a> {
    store: &'a SlotStore,
    audit: Arc<dyn AuditSink>,
}

impl<'a> FaultInjector<'a> {
    /// Build an injector over a store, reporting faults to `audit`
    pub fn new(store: &'a SlotStore, audit: Arc<dyn AuditSink>) -> Self {
        Self { store, audit }
    }

    /// Write only the first `prefix_len` bytes of `src` into `dst`, then stop
    ///
    /// Models a power failure mid-update: `dst` ends up holding a bounded
    /// prefix of the source image. Returns the byte count actually written,
    /// which is less than `prefix_len` when the source is shorter.
    ///
    /// # Errors
    ///
    /// Propagates store errors ([`FirmwareUpdateError::SlotNotFound`] for an
    /// absent source, I/O failures otherwise).
    pub async fn inject_partial_write(
        &self,
        src: Slot,
        dst: Slot,
        prefix_len: u64,
    ) -> Result<u64, FirmwareUpdateError> {
        let reader = self.store.open(src).await?;
        let mut truncated = reader.take(prefix_len);
        let written = self.store.write_in_place(dst, &mut truncated).await?;

        self.record(
            AuditEvent::new("fault_injection")
                .with_field("type", "partial_write")
                .with_field("bytes_written", written)
                .with_field("severity", "critical"),
        )
        .await;

        Ok(written)
    }

    /// Record a simulated sudden power loss
    ///
    /// Emits the audit event only; combine with
    /// [`FaultInjector::inject_partial_write`] to also produce the on-disk
    /// effect.
    pub async fn simulate_power_interruption(&self) {
        self.record(
            AuditEvent::new("fault_injection")
                .with_field("type", "power_interruption")
                .with_field("severity", "critical"),
        )
        .await;
    }

    /// Record a simulated pressure sensor fault of `duration` seconds
    ///
    /// The duration arrives as text from keyword-driven test tables and is
    /// parsed strictly: a malformed value is an explicit error, never a
    /// silently ignored fault.
    ///
    /// # Errors
    ///
    /// [`FirmwareUpdateError::InvalidInput`] when `duration` does not parse
    /// as a non-negative integer.
    pub async fn simulate_sensor_fault(
        &self,
        duration: &str,
    ) -> Result<(), FirmwareUpdateError> {
        let seconds = parse_fault_duration(duration)?;

        self.record(
            AuditEvent::new("fault_injection")
                .with_field("type", "pressure_sensor")
                .with_field("duration", seconds)
                .with_field("severity", "critical"),
        )
        .await;

        Ok(())
    }

    async fn record(&self, event: AuditEvent) {
        // Test harness: a lost fault event only makes a test fail louder.
        if let Err(e) = self.audit.record(event).await {
            eprintln!("fault injection audit record failed: {e}");
        }
    }
}

/// Strictly parse a fault duration in seconds
///
/// # Errors
///
/// [`FirmwareUpdateError::InvalidInput`] for anything but a base-10
/// non-negative integer.
pub fn parse_fault_duration(input: &str) -> Result<u64, FirmwareUpdateError> {
    input.trim().parse::<u64>().map_err(|_| {
        FirmwareUpdateError::InvalidInput(format!("fault duration not a valid integer: {input:?}"))
    })
}
