//! Typed form submission of a handover report.
//!
//! Wire keys keep the names used by the operator form (`chantier`,
//! `email_conducteur`, ...). Checklist items, counters, fluid levels,
//! observations and any other keys without a dedicated field are kept in
//! [`FormData::extra`] so that nothing submitted is dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use pv_core::error::AppError;
use pv_core::result::AppResult;

/// A handover report form submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    /// Site (chantier) name. Required.
    #[serde(rename = "chantier", default, deserialize_with = "null_as_empty")]
    pub site_name: String,
    /// Driver contact addresses. Accepts a single string, a comma
    /// separated string, or a list on input.
    #[serde(
        rename = "email_conducteur",
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub driver_emails: Vec<String>,
    /// Company contact address.
    #[serde(rename = "email_entreprise", default, skip_serializing_if = "Option::is_none")]
    pub company_email: Option<String>,
    /// Single recipient address used by older form revisions.
    #[serde(rename = "email_destinataire", default, skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,
    /// Responsible person.
    #[serde(rename = "responsable", default, skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,
    /// Rental supplier.
    #[serde(rename = "fournisseur", default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    /// Equipment type (e.g. "Nacelle élévatrice").
    #[serde(rename = "materiel_type", default, skip_serializing_if = "Option::is_none")]
    pub equipment_type: Option<String>,
    /// Equipment serial number.
    #[serde(rename = "materiel_numero", default, skip_serializing_if = "Option::is_none")]
    pub equipment_number: Option<String>,
    /// Reception date, `YYYY-MM-DD`.
    #[serde(rename = "date_reception", default, skip_serializing_if = "Option::is_none")]
    pub reception_date: Option<String>,
    /// Return date, `YYYY-MM-DD`.
    #[serde(rename = "date_retour", default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    /// Reception signature (image data URL).
    #[serde(rename = "signature_reception", default, skip_serializing_if = "Option::is_none")]
    pub reception_signature: Option<String>,
    /// Return signature (image data URL).
    #[serde(rename = "signature_retour", default, skip_serializing_if = "Option::is_none")]
    pub return_signature: Option<String>,
    /// Last periodic inspection (VGP) date, `YYYY-MM-DD`.
    #[serde(rename = "vgp_date", default, skip_serializing_if = "Option::is_none")]
    pub inspection_date: Option<String>,
    /// Storage key of the periodic inspection conformity document.
    #[serde(rename = "vgp_document_path", default, skip_serializing_if = "Option::is_none")]
    pub inspection_document: Option<String>,
    /// Every other submitted key.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl FormData {
    /// Whether a non-blank reception signature is present.
    pub fn has_reception_signature(&self) -> bool {
        non_blank(&self.reception_signature).is_some()
    }

    /// Whether a non-blank return signature is present.
    pub fn has_return_signature(&self) -> bool {
        non_blank(&self.return_signature).is_some()
    }

    /// Trimmed site name.
    pub fn site_name(&self) -> &str {
        self.site_name.trim()
    }

    /// Recipients derived from the form: drivers, company, then the
    /// legacy single recipient. Blank and duplicate addresses are dropped.
    pub fn default_recipients(&self) -> Vec<String> {
        let candidates = self
            .driver_emails
            .iter()
            .map(String::as_str)
            .chain(self.company_email.as_deref())
            .chain(self.recipient_email.as_deref());

        let mut recipients: Vec<String> = Vec::new();
        for candidate in candidates {
            let address = candidate.trim();
            if address.is_empty() {
                continue;
            }
            if !recipients.iter().any(|r| r.eq_ignore_ascii_case(address)) {
                recipients.push(address.to_string());
            }
        }
        recipients
    }

    /// Check the fields required before a report can be stored.
    pub fn validate(&self) -> AppResult<()> {
        if self.site_name().is_empty() {
            return Err(AppError::validation("Site name (chantier) is required"));
        }
        Ok(())
    }
}

/// Trim an optional string and drop it when nothing remains.
pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let addresses = match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(joined)) => joined.split(',').map(str::to_string).collect(),
        Some(OneOrMany::Many(list)) => list,
    };

    Ok(addresses
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_keys_and_extra_fields() {
        let form: FormData = serde_json::from_value(json!({
            "chantier": "Chantier Confluence - Lyon 2ème",
            "materiel_type": "Nacelle élévatrice",
            "fournisseur": "Loxam",
            "carrosserie_reception": "bon",
            "carburant_reception": "75"
        }))
        .expect("form should parse");

        assert_eq!(form.site_name, "Chantier Confluence - Lyon 2ème");
        assert_eq!(form.equipment_type.as_deref(), Some("Nacelle élévatrice"));
        assert_eq!(form.extra.get("carrosserie_reception"), Some(&json!("bon")));
        assert_eq!(form.extra.len(), 2);

        let back = serde_json::to_value(&form).expect("serialize");
        assert_eq!(back["carburant_reception"], json!("75"));
        assert_eq!(back["fournisseur"], json!("Loxam"));
    }

    #[test]
    fn test_driver_emails_accept_string_or_list() {
        let single: FormData =
            serde_json::from_value(json!({ "email_conducteur": "a@x.fr, b@x.fr" })).unwrap();
        assert_eq!(single.driver_emails, vec!["a@x.fr", "b@x.fr"]);

        let list: FormData =
            serde_json::from_value(json!({ "email_conducteur": ["a@x.fr", " ", "c@x.fr"] }))
                .unwrap();
        assert_eq!(list.driver_emails, vec!["a@x.fr", "c@x.fr"]);

        let null: FormData = serde_json::from_value(json!({ "email_conducteur": null })).unwrap();
        assert!(null.driver_emails.is_empty());
    }

    #[test]
    fn test_null_site_name_is_empty() {
        let form: FormData = serde_json::from_value(json!({ "chantier": null })).unwrap();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_default_recipients_dedup() {
        let form = FormData {
            site_name: "S".into(),
            driver_emails: vec!["paul@x.fr".into(), "PAUL@x.fr".into()],
            company_email: Some("contact@bouygues.fr".into()),
            recipient_email: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(
            form.default_recipients(),
            vec!["paul@x.fr".to_string(), "contact@bouygues.fr".to_string()]
        );
    }

    #[test]
    fn test_whitespace_signature_is_missing() {
        let form = FormData {
            reception_signature: Some("   ".into()),
            return_signature: Some("data:image/png;base64,AAAA".into()),
            ..Default::default()
        };
        assert!(!form.has_reception_signature());
        assert!(form.has_return_signature());
    }
}
