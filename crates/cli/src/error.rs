//! Error types and exit-code mapping for respctl

use thiserror::Error;

use respira_firmware_update::FirmwareUpdateError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("update rolled back: {0}")]
    UpdateRolledBack(String),

    #[error("firmware validation failed: {0}")]
    ValidationFailed(String),
}

/// Map an error chain to the process exit code
///
/// Every failure class gets a stable code so supervisors and test tables can
/// react without parsing messages.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    if let Some(e) = error.downcast_ref::<FirmwareUpdateError>() {
        return match e {
            FirmwareUpdateError::SlotNotFound(_) => 2,
            FirmwareUpdateError::IntegrityMismatch(_) => 3,
            FirmwareUpdateError::Busy => 4,
            FirmwareUpdateError::UnrecoverableRollback(_) => 5,
            FirmwareUpdateError::InvalidInput(_) => 6,
            FirmwareUpdateError::Read { .. } | FirmwareUpdateError::Write { .. } => 1,
        };
    }

    match error.downcast_ref::<CliError>() {
        Some(CliError::UpdateRolledBack(_) | CliError::ValidationFailed(_)) => 3,
        None => 1,
    }
}
