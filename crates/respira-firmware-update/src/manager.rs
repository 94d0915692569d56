//! Firmware update manager
//!
//! The state machine that sequences backup, write, validation and rollback
//! for one device. A transaction walks
//! `Idle → BackingUp → Writing → Validating` and terminates in `Committed`,
//! `RolledBack` (validation failed, recovery verified) or `Failed`
//! (no safe path forward). Each transition of interest emits exactly one
//! audit event; audit delivery is best-effort and never blocks the update.
//!
//! The window this design defends is the candidate-to-installed copy: an
//! interruption there can leave `installed` holding a truncated prefix. The
//! protocol detects that in `Validating` and restores the backup rather than
//! trying to prevent interruption.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use respira_audit::{AuditEvent, AuditSink};

use crate::config::FirmwareUpdateConfig;
use crate::digest::Digest;
use crate::error::FirmwareUpdateError;
use crate::slot::Slot;
use crate::store::SlotStore;
use crate::validator::IntegrityValidator;

/// Firmware update state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpdateState {
    /// No transaction in progress
    #[default]
    Idle,

    /// Copying `installed` into `backup`
    BackingUp,

    /// Copying `candidate` into `installed`
    Writing,

    /// Running digest and size checks on `installed`
    Validating,

    /// Update applied and verified (terminal)
    Committed,

    /// Restoring `backup` into `installed`
    RollingBack,

    /// Restore verified against `backup` (terminal)
    RolledBack,

    /// Unrecoverable; operator attention required (terminal)
    Failed,
}

impl UpdateState {
    /// Check if a transaction is currently in progress
    pub fn is_in_progress(&self) -> bool {
        !matches!(
            self,
            UpdateState::Idle
                | UpdateState::Committed
                | UpdateState::RolledBack
                | UpdateState::Failed
        )
    }

    /// Check if this state ends a transaction
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UpdateState::Committed | UpdateState::RolledBack | UpdateState::Failed
        )
    }
}

impl std::fmt::Display for UpdateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UpdateState::Idle => "idle",
            UpdateState::BackingUp => "backing_up",
            UpdateState::Writing => "writing",
            UpdateState::Validating => "validating",
            UpdateState::Committed => "committed",
            UpdateState::RollingBack => "rolling_back",
            UpdateState::RolledBack => "rolled_back",
            UpdateState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Terminal outcome of one update or rollback attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// New firmware applied and verified
    Committed,
    /// Validation failed; previous firmware restored and verified
    RolledBack,
    /// No verified firmware could be established
    Failed,
}

impl std::fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UpdateOutcome::Committed => "committed",
            UpdateOutcome::RolledBack => "rolled_back",
            UpdateOutcome::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Ephemeral record of one update attempt
///
/// Owned exclusively by the manager while the attempt runs; archived into
/// the [`UpdateReport`] once the transaction reaches a terminal state.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateTransaction {
    /// Monotonically increasing attempt identifier
    pub attempt_id: u64,

    /// When the attempt started (UTC)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// Digest of `installed` immediately before this attempt
    pub pre_update_digest: Digest,

    /// Digest of `candidate` recorded at transaction start
    pub candidate_digest: Digest,
}

/// Result of a completed update or rollback operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReport {
    /// Attempt identifier
    pub attempt_id: u64,

    /// Terminal outcome
    pub outcome: UpdateOutcome,

    /// Digest of `installed` before the attempt, when known
    pub pre_update_digest: Option<Digest>,

    /// Digest of `candidate` at transaction start, when known
    pub candidate_digest: Option<Digest>,

    /// Digest of `installed` after the attempt, when known
    pub installed_digest: Option<Digest>,

    /// Whether the backup image was restored
    pub rollback_performed: bool,

    /// Wall-clock duration of the attempt
    #[serde(with = "duration_millis")]
    pub duration: Duration,

    /// Why the update did not commit, if it did not
    pub error: Option<String>,
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Read-only validation summary of the current slot contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Digest of `installed`
    pub installed_digest: Digest,

    /// Digest of `candidate`
    pub candidate_digest: Digest,

    /// Whether the two digests are equal
    pub digests_match: bool,

    /// Size of `installed` in bytes
    pub installed_size: u64,

    /// Configured minimum firmware size
    pub min_firmware_size: u64,

    /// Whether `installed` clears the minimum size
    pub meets_minimum_size: bool,
}

impl ValidationReport {
    /// True iff both mandatory checks pass
    pub fn is_valid(&self) -> bool {
        self.digests_match && self.meets_minimum_size
    }
}

/// Presence and content summary of one slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotStatus {
    /// Slot identifier
    pub slot: Slot,

    /// Whether the slot has ever been written
    pub present: bool,

    /// Image size in bytes, when present
    pub size_bytes: Option<u64>,

    /// Image digest, when present
    pub digest: Option<Digest>,
}

struct InstalledChecks {
    matches_candidate: bool,
    meets_minimum_size: bool,
}

/// Firmware update manager
///
/// Holds the slot store, the validation bounds and the audit sink, and
/// enforces the single-flight rule: at most one update or rollback runs at
/// a time, and a second request is rejected with
/// [`FirmwareUpdateError::Busy`] rather than queued.
pub struct UpdateManager {
    config: FirmwareUpdateConfig,
    store: SlotStore,
    audit: Arc<dyn AuditSink>,
    state: RwLock<UpdateState>,
    in_flight: AtomicBool,
    attempt_counter: AtomicU64,
}

impl UpdateManager {
    /// Create a manager over the configured slots
    pub fn new(config: FirmwareUpdateConfig, audit: Arc<dyn AuditSink>) -> Self {
        let store = SlotStore::new(&config);
        Self {
            config,
            store,
            audit,
            state: RwLock::new(UpdateState::Idle),
            in_flight: AtomicBool::new(false),
            attempt_counter: AtomicU64::new(0),
        }
    }

    /// The slot store this manager operates on
    pub fn store(&self) -> &SlotStore {
        &self.store
    }

    /// The active configuration
    pub fn config(&self) -> &FirmwareUpdateConfig {
        &self.config
    }

    /// Current state machine state
    pub async fn current_state(&self) -> UpdateState {
        *self.state.read().await
    }

    /// Apply the candidate image to the installed slot
    ///
    /// Runs the full protocol: back up `installed`, write `candidate`,
    /// validate, and either commit or restore the backup. Returns a report
    /// for `Committed` and `RolledBack` outcomes.
    ///
    /// # Errors
    ///
    /// [`FirmwareUpdateError::Busy`] if a transaction is already in flight;
    /// otherwise the error that drove the transaction to `Failed` (audit
    /// events for the failure have already been emitted).
    pub async fn update(&self) -> Result<UpdateReport, FirmwareUpdateError> {
        let _guard = self.begin_operation()?;
        let attempt_id = self.next_attempt_id();
        let started = Instant::now();

        let result = self.run_update(attempt_id, started).await;

        self.set_state(UpdateState::Idle).await;
        result
    }

    /// Restore the backup image into the installed slot
    ///
    /// The standalone recovery operation: copy `backup` into `installed`
    /// and re-verify the restore.
    ///
    /// # Errors
    ///
    /// [`FirmwareUpdateError::Busy`] if a transaction is in flight;
    /// [`FirmwareUpdateError::SlotNotFound`] if no backup exists;
    /// [`FirmwareUpdateError::UnrecoverableRollback`] if the restored image
    /// does not match the backup.
    pub async fn rollback(&self) -> Result<UpdateReport, FirmwareUpdateError> {
        let _guard = self.begin_operation()?;
        let attempt_id = self.next_attempt_id();
        let started = Instant::now();
        let validator = self.validator();

        info!(attempt_id, "starting firmware rollback");
        self.set_state(UpdateState::RollingBack).await;

        let result = match self.restore_backup(&validator, attempt_id).await {
            Ok(()) => {
                self.set_state(UpdateState::RolledBack).await;
                let installed_digest = validator.slot_digest(Slot::Installed).await.ok();
                Ok(UpdateReport {
                    attempt_id,
                    outcome: UpdateOutcome::RolledBack,
                    pre_update_digest: None,
                    candidate_digest: None,
                    installed_digest,
                    rollback_performed: true,
                    duration: started.elapsed(),
                    error: None,
                })
            }
            Err(e) => {
                self.set_state(UpdateState::Failed).await;
                Err(e)
            }
        };

        self.set_state(UpdateState::Idle).await;
        result
    }

    /// Run both integrity checks without mutating any slot
    ///
    /// # Errors
    ///
    /// [`FirmwareUpdateError::SlotNotFound`] or [`FirmwareUpdateError::Read`]
    /// if `installed` or `candidate` cannot be read.
    pub async fn validate(&self) -> Result<ValidationReport, FirmwareUpdateError> {
        let validator = self.validator();

        let installed_digest = validator.slot_digest(Slot::Installed).await?;
        let candidate_digest = validator.slot_digest(Slot::Candidate).await?;
        let installed_size = self.store.size(Slot::Installed).await?;

        Ok(ValidationReport {
            digests_match: installed_digest == candidate_digest,
            installed_digest,
            candidate_digest,
            installed_size,
            min_firmware_size: self.config.min_firmware_size,
            meets_minimum_size: installed_size >= self.config.min_firmware_size,
        })
    }

    /// Presence, size and digest of every slot
    ///
    /// Absent slots report `present: false`; they are not an error here.
    ///
    /// # Errors
    ///
    /// [`FirmwareUpdateError::Read`] if a present slot cannot be read.
    pub async fn status(&self) -> Result<Vec<SlotStatus>, FirmwareUpdateError> {
        let validator = self.validator();
        let mut statuses = Vec::with_capacity(Slot::ALL.len());

        for slot in Slot::ALL {
            if !self.store.exists(slot).await {
                statuses.push(SlotStatus {
                    slot,
                    present: false,
                    size_bytes: None,
                    digest: None,
                });
                continue;
            }

            let size = self.store.size(slot).await?;
            let digest = validator.slot_digest(slot).await?;
            statuses.push(SlotStatus {
                slot,
                present: true,
                size_bytes: Some(size),
                digest: Some(digest),
            });
        }

        Ok(statuses)
    }

    async fn run_update(
        &self,
        attempt_id: u64,
        started: Instant,
    ) -> Result<UpdateReport, FirmwareUpdateError> {
        info!(attempt_id, "starting firmware update");
        self.set_state(UpdateState::BackingUp).await;
        let validator = self.validator();

        // Preflight reads. Any failure here aborts before a destructive
        // write: no backup means no safe path forward.
        let pre_update_digest = match validator.slot_digest(Slot::Installed).await {
            Ok(digest) => digest,
            Err(e) => return Err(self.fail_update(attempt_id, e).await),
        };
        let candidate_digest = match validator.slot_digest(Slot::Candidate).await {
            Ok(digest) => digest,
            Err(e) => return Err(self.fail_update(attempt_id, e).await),
        };
        let candidate_size = match self.store.size(Slot::Candidate).await {
            Ok(size) => size,
            Err(e) => return Err(self.fail_update(attempt_id, e).await),
        };
        if candidate_size > self.config.max_firmware_size {
            let e = FirmwareUpdateError::IntegrityMismatch(format!(
                "candidate size {candidate_size} exceeds maximum {}",
                self.config.max_firmware_size
            ));
            return Err(self.fail_update(attempt_id, e).await);
        }

        let transaction = UpdateTransaction {
            attempt_id,
            started_at: chrono::Utc::now(),
            pre_update_digest,
            candidate_digest,
        };

        // BackingUp: preserve the running image before anything destructive.
        if let Err(e) = self.store.copy(Slot::Installed, Slot::Backup).await {
            return Err(self.fail_update(attempt_id, e).await);
        }
        match validator.verify_match(Slot::Installed, Slot::Backup).await {
            Ok(true) => {}
            Ok(false) => {
                let e = FirmwareUpdateError::IntegrityMismatch(
                    "backup does not match installed image".to_string(),
                );
                return Err(self.fail_update(attempt_id, e).await);
            }
            Err(e) => return Err(self.fail_update(attempt_id, e).await),
        }

        // Writing: the interruption window. The write result is noted but
        // validation runs regardless; a truncated or failed write surfaces
        // as an integrity mismatch, never as a silent retry.
        self.set_state(UpdateState::Writing).await;
        let write_result = self.store.copy(Slot::Candidate, Slot::Installed).await;

        self.set_state(UpdateState::Validating).await;
        // Commit is decided by the checks alone: a write error with a
        // provably intact installed image (e.g. candidate already applied)
        // does not force a rollback.
        let failure = match (&write_result, self.check_installed(&validator).await) {
            (_, Ok(checks)) if checks.matches_candidate && checks.meets_minimum_size => None,
            (Err(e), _) => Some(format!("write failed: {e}")),
            (_, Err(e)) => Some(format!("validation failed: {e}")),
            (_, Ok(checks)) if !checks.matches_candidate => {
                Some("installed image does not match candidate digest".to_string())
            }
            (_, Ok(_)) => Some(format!(
                "installed image below minimum size {}",
                self.config.min_firmware_size
            )),
        };

        let Some(reason) = failure else {
            self.set_state(UpdateState::Committed).await;
            self.record_event(
                AuditEvent::new("firmware_update")
                    .with_field("status", "success")
                    .with_field("attempt_id", attempt_id)
                    .with_field("installed_digest", candidate_digest.to_hex())
                    .with_field("duration_ms", started.elapsed().as_millis() as u64),
            )
            .await;
            info!(attempt_id, digest = %candidate_digest, "firmware update committed");

            return Ok(UpdateReport {
                attempt_id,
                outcome: UpdateOutcome::Committed,
                pre_update_digest: Some(transaction.pre_update_digest),
                candidate_digest: Some(transaction.candidate_digest),
                installed_digest: Some(candidate_digest),
                rollback_performed: false,
                duration: started.elapsed(),
                error: None,
            });
        };

        warn!(attempt_id, reason = %reason, "update validation failed, rolling back");
        self.record_event(
            AuditEvent::new("firmware_update")
                .with_field("status", "failed")
                .with_field("attempt_id", attempt_id)
                .with_field("error", reason.clone()),
        )
        .await;

        self.set_state(UpdateState::RollingBack).await;
        match self.restore_backup(&validator, attempt_id).await {
            Ok(()) => {
                self.set_state(UpdateState::RolledBack).await;
                Ok(UpdateReport {
                    attempt_id,
                    outcome: UpdateOutcome::RolledBack,
                    pre_update_digest: Some(transaction.pre_update_digest),
                    candidate_digest: Some(transaction.candidate_digest),
                    installed_digest: Some(transaction.pre_update_digest),
                    rollback_performed: true,
                    duration: started.elapsed(),
                    error: Some(reason),
                })
            }
            Err(e) => {
                self.set_state(UpdateState::Failed).await;
                Err(e)
            }
        }
    }

    async fn check_installed(
        &self,
        validator: &IntegrityValidator<'_>,
    ) -> Result<InstalledChecks, FirmwareUpdateError> {
        // Both checks are mandatory and independently enforced.
        let matches_candidate = validator
            .verify_match(Slot::Installed, Slot::Candidate)
            .await?;
        let meets_minimum_size = validator
            .verify_minimum_size(Slot::Installed, self.config.min_firmware_size)
            .await?;
        Ok(InstalledChecks {
            matches_candidate,
            meets_minimum_size,
        })
    }

    /// Copy `backup` into `installed` and verify the restore.
    ///
    /// The one unrecoverable condition lives here: if the restored image
    /// does not match the backup, the backup medium itself is suspect, and
    /// retrying against it risks destroying the last good image. Surface it
    /// loudly instead.
    async fn restore_backup(
        &self,
        validator: &IntegrityValidator<'_>,
        attempt_id: u64,
    ) -> Result<(), FirmwareUpdateError> {
        if let Err(e) = self.store.copy(Slot::Backup, Slot::Installed).await {
            error!(attempt_id, error = %e, "rollback copy failed");
            self.record_rollback_failure(attempt_id, &e).await;
            return Err(e);
        }

        match validator.verify_match(Slot::Installed, Slot::Backup).await {
            Ok(true) => {
                self.record_event(
                    AuditEvent::new("firmware_rollback")
                        .with_field("status", "rolled_back")
                        .with_field("attempt_id", attempt_id),
                )
                .await;
                info!(attempt_id, "firmware rollback completed");
                Ok(())
            }
            Ok(false) => {
                let e = FirmwareUpdateError::UnrecoverableRollback(
                    "installed image does not match backup after restore".to_string(),
                );
                error!(attempt_id, error = %e, "rollback verification failed");
                self.record_rollback_failure(attempt_id, &e).await;
                Err(e)
            }
            Err(verify_err) => {
                let e = FirmwareUpdateError::UnrecoverableRollback(format!(
                    "cannot verify restored image: {verify_err}"
                ));
                error!(attempt_id, error = %e, "rollback verification failed");
                self.record_rollback_failure(attempt_id, &e).await;
                Err(e)
            }
        }
    }

    async fn fail_update(
        &self,
        attempt_id: u64,
        error: FirmwareUpdateError,
    ) -> FirmwareUpdateError {
        error!(attempt_id, error = %error, "firmware update failed");
        self.set_state(UpdateState::Failed).await;
        self.record_event(
            AuditEvent::new("firmware_update")
                .with_field("status", "failed")
                .with_field("attempt_id", attempt_id)
                .with_field("error", error.to_string()),
        )
        .await;
        error
    }

    async fn record_rollback_failure(&self, attempt_id: u64, error: &FirmwareUpdateError) {
        self.record_event(
            AuditEvent::new("firmware_rollback")
                .with_field("status", "failed")
                .with_field("attempt_id", attempt_id)
                .with_field("error", error.to_string()),
        )
        .await;
    }

    /// Audit delivery is best-effort: a failed write is logged locally and
    /// never fails the operation that produced the event.
    async fn record_event(&self, event: AuditEvent) {
        let name = event.name.clone();
        if let Err(e) = self.audit.record(event).await {
            warn!(event = %name, error = %e, "audit record failed");
        }
    }

    fn validator(&self) -> IntegrityValidator<'_> {
        IntegrityValidator::new(&self.store, self.config.hash_chunk_size)
    }

    fn next_attempt_id(&self) -> u64 {
        self.attempt_counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn begin_operation(&self) -> Result<OperationGuard<'_>, FirmwareUpdateError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(FirmwareUpdateError::Busy);
        }
        Ok(OperationGuard {
            flag: &self.in_flight,
        })
    }

    async fn set_state(&self, new_state: UpdateState) {
        let mut state = self.state.write().await;
        *state = new_state;
    }
}

/// Releases the single-flight flag when an operation ends, on any path.
struct OperationGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use respira_audit::MemoryAuditSink;
    use tempfile::TempDir;

    #[test]
    fn state_progress_classification() {
        assert!(!UpdateState::Idle.is_in_progress());
        assert!(UpdateState::BackingUp.is_in_progress());
        assert!(UpdateState::Writing.is_in_progress());
        assert!(UpdateState::Validating.is_in_progress());
        assert!(UpdateState::RollingBack.is_in_progress());
        assert!(!UpdateState::Committed.is_in_progress());
        assert!(!UpdateState::RolledBack.is_in_progress());
        assert!(!UpdateState::Failed.is_in_progress());
    }

    #[test]
    fn terminal_states() {
        assert!(UpdateState::Committed.is_terminal());
        assert!(UpdateState::RolledBack.is_terminal());
        assert!(UpdateState::Failed.is_terminal());
        assert!(!UpdateState::Idle.is_terminal());
        assert!(!UpdateState::Validating.is_terminal());
    }

    #[tokio::test]
    async fn single_flight_guard_rejects_overlap() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let manager = UpdateManager::new(
            FirmwareUpdateConfig::with_firmware_dir(dir.path()),
            Arc::new(MemoryAuditSink::new()),
        );

        let first = manager.begin_operation();
        assert!(first.is_ok());
        assert!(matches!(
            manager.begin_operation(),
            Err(FirmwareUpdateError::Busy)
        ));

        drop(first);
        assert!(manager.begin_operation().is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn attempt_ids_increase_monotonically() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let manager = UpdateManager::new(
            FirmwareUpdateConfig::with_firmware_dir(dir.path()),
            Arc::new(MemoryAuditSink::new()),
        );

        assert_eq!(manager.next_attempt_id(), 1);
        assert_eq!(manager.next_attempt_id(), 2);
        assert_eq!(manager.next_attempt_id(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn update_without_installed_image_fails_before_writing() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let sink = Arc::new(MemoryAuditSink::new());
        let manager = UpdateManager::new(
            FirmwareUpdateConfig::with_firmware_dir(dir.path()),
            Arc::clone(&sink) as Arc<dyn AuditSink>,
        );

        let result = manager.update().await;
        assert!(matches!(
            result,
            Err(FirmwareUpdateError::SlotNotFound(Slot::Installed))
        ));

        // Fail-safe: nothing was created by the aborted attempt.
        assert!(!manager.store().exists(Slot::Backup).await);
        assert!(!manager.store().exists(Slot::Installed).await);

        let events = sink.events_named("firmware_update").await;
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].field("status").map(ToString::to_string),
            Some("failed".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn manager_returns_to_idle_after_terminal_state() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let manager = UpdateManager::new(
            FirmwareUpdateConfig::with_firmware_dir(dir.path()),
            Arc::new(MemoryAuditSink::new()),
        );

        // Fails (no slots), but the machine must be ready for the next attempt.
        let _ = manager.update().await;
        assert_eq!(manager.current_state().await, UpdateState::Idle);
        assert!(manager.update().await.is_err());
        Ok(())
    }

    #[test]
    fn report_serializes_duration_as_millis() -> anyhow::Result<()> {
        let report = UpdateReport {
            attempt_id: 1,
            outcome: UpdateOutcome::Committed,
            pre_update_digest: None,
            candidate_digest: None,
            installed_digest: None,
            rollback_performed: false,
            duration: Duration::from_millis(1500),
            error: None,
        };

        let json = serde_json::to_value(&report)?;
        assert_eq!(json["duration"], 1500);
        assert_eq!(json["outcome"], "committed");
        Ok(())
    }
}
