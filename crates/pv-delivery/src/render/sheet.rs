//! Plain-text handover sheet.
//!
//! Lays the report out in the same sections as the paper form: general
//! information, periodic inspection, checklist at reception and return,
//! counters and fluids, observations, signatures.

use std::fmt::Write;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use serde_json::Value;

use pv_core::error::AppError;
use pv_core::result::AppResult;
use pv_entity::report::{ReportPayload, extract_indexed_fields};

use super::{DocumentRenderer, RenderedDocument, document_file_name};

/// Checklist items recorded at reception and return, with their labels.
const CHECKLIST: &[(&str, &str)] = &[
    ("carrosserie", "Carrosserie"),
    ("eclairage", "Éclairage"),
    ("pneumatiques", "Pneumatiques"),
    ("panier", "Panier"),
    ("flexibles", "Flexibles"),
    ("commandes", "Commandes"),
    ("conformite", "Conformité"),
    ("mobilites", "Mobilités"),
    ("nacelles", "Nacelles"),
    ("securite", "Sécurité"),
];

const FLUIDS: &[(&str, &str)] = &[
    ("compteur", "Compteur (h)"),
    ("carburant", "Carburant (%)"),
    ("fuite_moteur", "Fuite moteur"),
    ("fuite_hydraulique", "Fuite hydraulique"),
    ("fuite_gasoil", "Fuite gasoil"),
];

const WIDTH: usize = 72;

/// Renders a report as a UTF-8 text sheet.
#[derive(Debug, Clone, Default)]
pub struct HandoverSheetRenderer;

impl HandoverSheetRenderer {
    pub fn new() -> Self {
        Self
    }

    fn layout(&self, payload: &ReportPayload) -> Result<String, std::fmt::Error> {
        let form = &payload.form_data;
        let fields = extract_indexed_fields(form);
        let mut out = String::new();

        writeln!(out, "{}", "=".repeat(WIDTH))?;
        writeln!(out, "PROCÈS-VERBAL DE MATÉRIEL LOUÉ")?;
        writeln!(out, "{}", "=".repeat(WIDTH))?;
        line(&mut out, "Chantier", Some(&fields.site_name))?;
        line(&mut out, "Matériel", fields.equipment_type.as_deref())?;
        line(&mut out, "N° matériel", form.equipment_number.as_deref())?;
        line(&mut out, "Fournisseur", fields.supplier.as_deref())?;
        line(&mut out, "Responsable", fields.responsible.as_deref())?;
        line(&mut out, "Conducteur(s)", fields.driver_emails.as_deref())?;
        line(&mut out, "Entreprise", fields.company_email.as_deref())?;
        line(&mut out, "Date de réception", fields.reception_date.as_deref())?;
        line(&mut out, "Date de retour", fields.return_date.as_deref())?;
        line(&mut out, "Statut", Some(fields.status.label()))?;

        section(&mut out, "VÉRIFICATION GÉNÉRALE PÉRIODIQUE")?;
        line(&mut out, "Date VGP", fields.inspection_date.as_deref())?;
        let document = if fields.inspection_document.is_some() {
            "joint"
        } else {
            "non fourni"
        };
        line(&mut out, "Attestation", Some(document))?;

        section(&mut out, "ÉTAT DU MATÉRIEL")?;
        writeln!(out, "{:<24}{:<24}{:<24}", "", "Réception", "Retour")?;
        for (key, label) in CHECKLIST.iter().chain(FLUIDS) {
            let reception = extra_text(payload, &format!("{key}_reception"));
            let retour = extra_text(payload, &format!("{key}_retour"));
            writeln!(out, "{label:<24}{reception:<24}{retour:<24}")?;
        }

        section(&mut out, "OBSERVATIONS")?;
        for (suffix, label) in [("reception", "Réception"), ("retour", "Retour")] {
            let text = extra_text(payload, &format!("observations_{suffix}"));
            writeln!(out, "{label} : {text}")?;
        }

        section(&mut out, "SIGNATURES")?;
        line(&mut out, "Réception", Some(signed(form.has_reception_signature())))?;
        line(&mut out, "Retour", Some(signed(form.has_return_signature())))?;

        writeln!(out, "{}", "-".repeat(WIDTH))?;
        if let Some(info) = &payload.version_info {
            writeln!(
                out,
                "Version {} envoyée le {} à {}",
                info.number,
                info.date.format("%d/%m/%Y %H:%M"),
                info.sent_to
            )?;
        }
        writeln!(out, "Référence : {}", payload.id)?;
        writeln!(out, "Généré le {}", Utc::now().format("%d/%m/%Y %H:%M"))?;
        Ok(out)
    }
}

#[async_trait]
impl DocumentRenderer for HandoverSheetRenderer {
    fn name(&self) -> &str {
        "handover-sheet"
    }

    async fn render(&self, payload: &ReportPayload) -> AppResult<RenderedDocument> {
        let text = self
            .layout(payload)
            .map_err(|e| AppError::external(format!("Failed to lay out handover sheet: {e}")))?;
        Ok(RenderedDocument {
            file_name: document_file_name(payload, "txt"),
            content_type: "text/plain; charset=utf-8".to_string(),
            content: Bytes::from(text),
        })
    }
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))
}

fn line(out: &mut String, label: &str, value: Option<&str>) -> std::fmt::Result {
    writeln!(out, "{label:<20}: {}", value.unwrap_or("-"))
}

fn signed(present: bool) -> &'static str {
    if present { "signée" } else { "non signée" }
}

fn extra_text(payload: &ReportPayload, key: &str) -> String {
    match payload.form_data.extra.get(key) {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => "-".to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_core::types::id::ReportId;
    use pv_entity::report::FormData;
    use serde_json::json;

    #[tokio::test]
    async fn test_render_contains_sections_and_checklist() {
        let form: FormData = serde_json::from_value(json!({
            "chantier": "Chantier Gerland",
            "materiel_type": "Nacelle ciseaux",
            "fournisseur": "Loxam",
            "date_reception": "2024-05-02",
            "carrosserie_reception": "bon",
            "carburant_retour": 40,
            "observations_reception": "Rayure portière gauche",
            "signature_reception": "data:image/png;base64,AAAA"
        }))
        .unwrap();
        let payload = ReportPayload::new(ReportId::new(), form, Utc::now());

        let document = HandoverSheetRenderer::new().render(&payload).await.unwrap();
        let text = String::from_utf8(document.content.to_vec()).unwrap();

        assert_eq!(document.file_name, "PV_Materiel_Chantier_Gerland_2024-05-02.txt");
        assert!(text.contains("Chantier            : Chantier Gerland"));
        assert!(text.contains("Statut              : Réception signée"));
        assert!(text.contains("Rayure portière gauche"));
        assert!(text.contains("40"));
        assert!(text.contains("Retour              : non signée"));
    }
}
