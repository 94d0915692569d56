//! Command implementations for respctl

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use respira_audit::TracingAuditSink;
use respira_firmware_update::{FirmwareUpdateConfig, UpdateManager, UpdateOutcome};

use crate::error::CliError;
use crate::output;

/// Resolved invocation context shared by every subcommand
pub struct CommandContext {
    pub config: Option<PathBuf>,
    pub firmware_dir: Option<PathBuf>,
    pub json: bool,
}

impl CommandContext {
    async fn manager(&self) -> Result<UpdateManager> {
        let config = load_config(self.config.as_deref(), self.firmware_dir.as_deref()).await?;
        Ok(UpdateManager::new(config, Arc::new(TracingAuditSink::new())))
    }
}

/// Run a firmware update
pub async fn update(ctx: &CommandContext) -> Result<()> {
    let manager = ctx.manager().await?;
    let report = manager.update().await?;
    output::print_update_report("update", &report, ctx.json);

    match report.outcome {
        UpdateOutcome::Committed => Ok(()),
        _ => {
            let reason = report
                .error
                .unwrap_or_else(|| "validation failed".to_string());
            Err(CliError::UpdateRolledBack(reason).into())
        }
    }
}

/// Restore the backup image
pub async fn rollback(ctx: &CommandContext) -> Result<()> {
    let manager = ctx.manager().await?;
    let report = manager.rollback().await?;
    output::print_update_report("rollback", &report, ctx.json);
    Ok(())
}

/// Check firmware integrity without mutating any slot
pub async fn validate(ctx: &CommandContext) -> Result<()> {
    let manager = ctx.manager().await?;
    let report = manager.validate().await?;
    output::print_validation_report(&report, ctx.json);

    if report.is_valid() {
        Ok(())
    } else {
        let reason = if report.digests_match {
            format!(
                "installed size {} below minimum {}",
                report.installed_size, report.min_firmware_size
            )
        } else {
            "installed digest does not match candidate".to_string()
        };
        Err(CliError::ValidationFailed(reason).into())
    }
}

/// Show presence, size and digest of each slot
pub async fn status(ctx: &CommandContext) -> Result<()> {
    let manager = ctx.manager().await?;
    let statuses = manager.status().await?;
    output::print_slot_statuses(&statuses, ctx.json);
    Ok(())
}

async fn load_config(
    config_path: Option<&Path>,
    firmware_dir: Option<&Path>,
) -> Result<FirmwareUpdateConfig> {
    let mut config = match config_path {
        Some(path) => FirmwareUpdateConfig::from_json_file(path).await?,
        None => FirmwareUpdateConfig::default(),
    };

    if let Some(dir) = firmware_dir {
        config.firmware_dir = dir.to_path_buf();
    }

    Ok(config)
}
