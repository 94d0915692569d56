//! Configuration for the firmware update subsystem

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::digest::DEFAULT_CHUNK_SIZE;
use crate::error::FirmwareUpdateError;

/// Minimum byte count a firmware image must reach to be considered complete
///
/// A sanity floor against truncated images, not a cryptographic guarantee.
pub const DEFAULT_MIN_FIRMWARE_SIZE: u64 = 100_000;

/// Largest candidate image the updater will accept
pub const DEFAULT_MAX_FIRMWARE_SIZE: u64 = 10_000_000;

/// Firmware update configuration
///
/// Slot locations and validation bounds. All fields have defaults so a
/// config file only needs to state what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FirmwareUpdateConfig {
    /// Directory holding the three slot files
    pub firmware_dir: PathBuf,

    /// File name of the `installed` slot
    pub installed_file: String,

    /// File name of the `candidate` slot
    pub candidate_file: String,

    /// File name of the `backup` slot
    pub backup_file: String,

    /// Minimum valid firmware size in bytes
    pub min_firmware_size: u64,

    /// Maximum accepted candidate size in bytes
    pub max_firmware_size: u64,

    /// Chunk size for streaming digest reads
    pub hash_chunk_size: usize,
}

impl Default for FirmwareUpdateConfig {
    fn default() -> Self {
        Self {
            firmware_dir: PathBuf::from("firmware"),
            installed_file: "installed_firmware.bin".to_string(),
            candidate_file: "new_firmware.bin".to_string(),
            backup_file: "firmware_backup.bin".to_string(),
            min_firmware_size: DEFAULT_MIN_FIRMWARE_SIZE,
            max_firmware_size: DEFAULT_MAX_FIRMWARE_SIZE,
            hash_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl FirmwareUpdateConfig {
    /// Defaults rooted at `firmware_dir`
    pub fn with_firmware_dir(firmware_dir: impl Into<PathBuf>) -> Self {
        Self {
            firmware_dir: firmware_dir.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareUpdateError::InvalidInput`] when the file cannot be
    /// read or does not parse as a config document.
    pub async fn from_json_file(path: &Path) -> Result<Self, FirmwareUpdateError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            FirmwareUpdateError::InvalidInput(format!(
                "cannot read config {}: {e}",
                path.display()
            ))
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            FirmwareUpdateError::InvalidInput(format!(
                "cannot parse config {}: {e}",
                path.display()
            ))
        })
    }
}
