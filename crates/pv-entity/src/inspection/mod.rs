//! Periodic inspection (VGP) status of rented equipment.
//!
//! Lifting equipment must be inspected periodically. A report records the
//! date of the last inspection; its status is evaluated against a validity
//! window from [`InspectionConfig`].

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use pv_core::config::InspectionConfig;

/// Date format used by the form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validity of the last periodic inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    /// No date recorded, or the date is unreadable.
    None,
    Valid,
    /// Expires within the warning window.
    DueSoon,
    Expired,
}

impl InspectionStatus {
    /// Evaluate an inspection date on `today`.
    pub fn evaluate(date: Option<&str>, today: NaiveDate, config: &InspectionConfig) -> Self {
        let Some(expiry) = date.and_then(|d| expiry_date(d, config)) else {
            return Self::None;
        };
        let remaining = (expiry - today).num_days();
        if remaining <= 0 {
            Self::Expired
        } else if remaining < config.warning_days {
            Self::DueSoon
        } else {
            Self::Valid
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Valid => "valid",
            Self::DueSoon => "due_soon",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Date after which an inspection performed on `date` is no longer valid.
pub fn expiry_date(date: &str, config: &InspectionConfig) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .ok()
        .map(|d| d + Duration::days(config.validity_days))
}

/// Count of reports per inspection status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionBreakdown {
    pub none: i64,
    pub valid: i64,
    pub due_soon: i64,
    pub expired: i64,
}

impl InspectionBreakdown {
    /// Tally the status of every date.
    pub fn tally<'a, I>(dates: I, today: NaiveDate, config: &InspectionConfig) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut breakdown = Self::default();
        for date in dates {
            match InspectionStatus::evaluate(date, today, config) {
                InspectionStatus::None => breakdown.none += 1,
                InspectionStatus::Valid => breakdown.valid += 1,
                InspectionStatus::DueSoon => breakdown.due_soon += 1,
                InspectionStatus::Expired => breakdown.expired += 1,
            }
        }
        breakdown
    }
}
