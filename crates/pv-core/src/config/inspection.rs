//! Periodic inspection (VGP) configuration.

use serde::{Deserialize, Serialize};

/// Validity rules for the periodic inspection of rented equipment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InspectionConfig {
    /// Number of days an inspection stays valid.
    #[serde(default = "default_validity_days")]
    pub validity_days: i64,
    /// Number of days before expiry at which an inspection is flagged as due.
    #[serde(default = "default_warning_days")]
    pub warning_days: i64,
}

impl Default for InspectionConfig {
    fn default() -> Self {
        Self {
            validity_days: default_validity_days(),
            warning_days: default_warning_days(),
        }
    }
}

fn default_validity_days() -> i64 {
    180
}

fn default_warning_days() -> i64 {
    30
}
