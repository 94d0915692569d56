//! Property-based tests for firmware integrity and update invariants

use std::sync::Arc;

use proptest::prelude::*;

use respira_audit::{AuditSink, MemoryAuditSink};
use respira_firmware_update::prelude::*;
use respira_test_helpers::prelude::*;

fn arb_image() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 200..2_000)
}

/// Configs for property runs shrink the size floor so arbitrary small
/// images exercise the same code paths as production-sized ones.
fn small_config(dir: &tempfile::TempDir) -> FirmwareUpdateConfig {
    let mut config = FirmwareUpdateConfig::with_firmware_dir(dir.path());
    config.min_firmware_size = 100;
    config
}

fn runtime() -> Result<tokio::runtime::Runtime, TestCaseError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| TestCaseError::fail(format!("failed to create runtime: {e}")))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_digest_is_deterministic(image in arb_image()) {
        prop_assert_eq!(digest_bytes(&image), digest_bytes(&image));
    }

    #[test]
    fn prop_digests_differ_for_differing_content(
        image in arb_image(),
        flip_at in any::<prop::sample::Index>(),
    ) {
        let mut other = image.clone();
        let index = flip_at.index(other.len());
        other[index] ^= 0x01;
        prop_assert_ne!(digest_bytes(&image), digest_bytes(&other));
    }

    #[test]
    fn prop_streamed_digest_matches_in_memory_digest(
        image in arb_image(),
        chunk_size in 1usize..4_096,
    ) {
        let rt = runtime()?;
        rt.block_on(async {
            let streamed = digest_reader(&mut image.as_slice(), chunk_size)
                .await
                .map_err(|e| TestCaseError::fail(format!("digest failed: {e}")))?;
            prop_assert_eq!(streamed, digest_bytes(&image));
            Ok(())
        })?;
    }

    #[test]
    fn prop_commit_preserves_backup_and_applies_candidate(
        installed in arb_image(),
        candidate in arb_image(),
    ) {
        let rt = runtime()?;
        rt.block_on(async {
            let dir = tempfile::TempDir::new()
                .map_err(|e| TestCaseError::fail(format!("tempdir: {e}")))?;
            let manager = UpdateManager::new(
                small_config(&dir),
                Arc::new(MemoryAuditSink::new()),
            );

            seed_slot(manager.store(), Slot::Installed, &installed)
                .await
                .map_err(|e| TestCaseError::fail(format!("seed installed: {e}")))?;
            seed_slot(manager.store(), Slot::Candidate, &candidate)
                .await
                .map_err(|e| TestCaseError::fail(format!("seed candidate: {e}")))?;

            let report = manager
                .update()
                .await
                .map_err(|e| TestCaseError::fail(format!("update: {e}")))?;
            prop_assert_eq!(report.outcome, UpdateOutcome::Committed);

            let validator = IntegrityValidator::new(manager.store(), DEFAULT_CHUNK_SIZE);
            let installed_digest = validator
                .slot_digest(Slot::Installed)
                .await
                .map_err(|e| TestCaseError::fail(format!("digest installed: {e}")))?;
            let backup_digest = validator
                .slot_digest(Slot::Backup)
                .await
                .map_err(|e| TestCaseError::fail(format!("digest backup: {e}")))?;

            prop_assert_eq!(installed_digest, digest_bytes(&candidate));
            prop_assert_eq!(backup_digest, digest_bytes(&installed));
            Ok(())
        })?;
    }

    #[test]
    fn prop_partial_write_always_rolls_back_to_backup(
        good in arb_image(),
        candidate in arb_image(),
        prefix in 1u64..150,
    ) {
        let rt = runtime()?;
        rt.block_on(async {
            let dir = tempfile::TempDir::new()
                .map_err(|e| TestCaseError::fail(format!("tempdir: {e}")))?;
            let sink = Arc::new(MemoryAuditSink::new());
            let manager = UpdateManager::new(
                small_config(&dir),
                Arc::clone(&sink) as Arc<dyn AuditSink>,
            );
            let store = manager.store();

            // A known-good image is installed and backed up, then an
            // interrupted write leaves a short prefix of the candidate.
            seed_slot(store, Slot::Installed, &good)
                .await
                .map_err(|e| TestCaseError::fail(format!("seed installed: {e}")))?;
            seed_slot(store, Slot::Candidate, &candidate)
                .await
                .map_err(|e| TestCaseError::fail(format!("seed candidate: {e}")))?;
            store
                .copy(Slot::Installed, Slot::Backup)
                .await
                .map_err(|e| TestCaseError::fail(format!("backup: {e}")))?;

            let injector = FaultInjector::new(store, Arc::clone(&sink) as Arc<dyn AuditSink>);
            injector
                .inject_partial_write(Slot::Candidate, Slot::Installed, prefix)
                .await
                .map_err(|e| TestCaseError::fail(format!("inject: {e}")))?;

            let report = manager
                .rollback()
                .await
                .map_err(|e| TestCaseError::fail(format!("rollback: {e}")))?;
            prop_assert_eq!(report.outcome, UpdateOutcome::RolledBack);

            let validator = IntegrityValidator::new(store, DEFAULT_CHUNK_SIZE);
            let installed_digest = validator
                .slot_digest(Slot::Installed)
                .await
                .map_err(|e| TestCaseError::fail(format!("digest installed: {e}")))?;
            prop_assert_eq!(installed_digest, digest_bytes(&good));
            Ok(())
        })?;
    }

    #[test]
    fn prop_second_request_is_always_busy(seed in any::<u8>()) {
        let rt = runtime()?;
        rt.block_on(async {
            let dir = tempfile::TempDir::new()
                .map_err(|e| TestCaseError::fail(format!("tempdir: {e}")))?;
            let manager = UpdateManager::new(
                small_config(&dir),
                Arc::new(MemoryAuditSink::new()),
            );

            seed_slot(manager.store(), Slot::Installed, &patterned_image(1_000, seed))
                .await
                .map_err(|e| TestCaseError::fail(format!("seed installed: {e}")))?;
            seed_slot(
                manager.store(),
                Slot::Candidate,
                &patterned_image(1_000, seed.wrapping_add(1)),
            )
            .await
            .map_err(|e| TestCaseError::fail(format!("seed candidate: {e}")))?;

            let (first, second) = tokio::join!(manager.update(), manager.update());
            let busy_count = [&first, &second]
                .iter()
                .filter(|r| matches!(r, Err(FirmwareUpdateError::Busy)))
                .count();
            let committed_count = [&first, &second]
                .iter()
                .filter(|r| matches!(r, Ok(report) if report.outcome == UpdateOutcome::Committed))
                .count();

            prop_assert_eq!(busy_count, 1);
            prop_assert_eq!(committed_count, 1);
            Ok(())
        })?;
    }
}
