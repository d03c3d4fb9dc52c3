//! Completion status of a report.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use pv_core::error::AppError;

/// Signature completion of a handover report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    /// Neither signature present.
    Empty,
    /// Only the reception signature is present.
    ReceptionOnly,
    /// Only the return signature is present.
    RetourOnly,
    /// Both signatures present.
    Complete,
}

impl CompletionStatus {
    /// Derive the status from signature presence.
    pub fn from_signatures(reception: bool, retour: bool) -> Self {
        match (reception, retour) {
            (true, true) => Self::Complete,
            (true, false) => Self::ReceptionOnly,
            (false, true) => Self::RetourOnly,
            (false, false) => Self::Empty,
        }
    }

    /// Return the status as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::ReceptionOnly => "reception_only",
            Self::RetourOnly => "retour_only",
            Self::Complete => "complete",
        }
    }

    /// French label used on rendered documents.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "Non signé",
            Self::ReceptionOnly => "Réception signée",
            Self::RetourOnly => "Retour signé",
            Self::Complete => "Complet",
        }
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CompletionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "empty" => Ok(Self::Empty),
            "reception_only" => Ok(Self::ReceptionOnly),
            "retour_only" => Ok(Self::RetourOnly),
            "complete" => Ok(Self::Complete),
            other => Err(AppError::validation(format!(
                "Unknown report status '{other}'"
            ))),
        }
    }
}
