//! Named firmware slots
//!
//! A device carries exactly three single-valued storage locations for
//! firmware images. Slot identity is the only versioning the store knows
//! about; retention policy is imposed by the update manager, not here.

use serde::{Deserialize, Serialize};

/// Firmware slot identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// The image the device currently runs
    Installed,
    /// The incoming image staged for an update
    Candidate,
    /// The pre-update copy of `installed`, kept as the recovery image
    Backup,
}

impl Slot {
    /// All slots, in the order status listings print them
    pub const ALL: [Slot; 3] = [Slot::Installed, Slot::Candidate, Slot::Backup];

    /// Stable lowercase name used in logs, audit events and file naming
    pub const fn as_str(self) -> &'static str {
        match self {
            Slot::Installed => "installed",
            Slot::Candidate => "candidate",
            Slot::Backup => "backup",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
