//! Indexed projection of a report payload.
//!
//! The columns stored next to the payload exist for listing and
//! filtering. They are always recomputed from the form data with
//! [`extract_indexed_fields`] and never accepted from callers.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::form::{FormData, non_blank};
use super::status::CompletionStatus;

/// Query-friendly attributes derived from a [`FormData`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct IndexedFields {
    pub site_name: String,
    /// Driver addresses joined with `", "`.
    pub driver_emails: Option<String>,
    pub company_email: Option<String>,
    pub responsible: Option<String>,
    pub supplier: Option<String>,
    pub equipment_type: Option<String>,
    pub reception_date: Option<String>,
    pub return_date: Option<String>,
    pub status: CompletionStatus,
    pub inspection_date: Option<String>,
    pub inspection_document: Option<String>,
}

/// Derive the indexed attributes of a report from its form data.
pub fn extract_indexed_fields(form: &FormData) -> IndexedFields {
    let drivers: Vec<&str> = form
        .driver_emails
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .collect();

    IndexedFields {
        site_name: form.site_name().to_string(),
        driver_emails: (!drivers.is_empty()).then(|| drivers.join(", ")),
        company_email: non_blank(&form.company_email),
        responsible: non_blank(&form.responsible),
        supplier: non_blank(&form.supplier),
        equipment_type: non_blank(&form.equipment_type),
        reception_date: non_blank(&form.reception_date),
        return_date: non_blank(&form.return_date),
        status: CompletionStatus::from_signatures(
            form.has_reception_signature(),
            form.has_return_signature(),
        ),
        inspection_date: non_blank(&form.inspection_date),
        inspection_document: non_blank(&form.inspection_document),
    }
}
