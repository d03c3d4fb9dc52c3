//! Dispatching a report by mail and versioning it.
//!
//! The sequence is validate, render, send, then record. Rendering and
//! sending happen before any write, so a failure in either leaves the
//! stored report and its archive exactly as they were. Recording the
//! dispatch archives the live state and stores the new one in a single
//! store transaction.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};
use validator::ValidateEmail;

use pv_core::config::MailConfig;
use pv_core::error::{AppError, ErrorKind};
use pv_core::result::AppResult;
use pv_core::traits::mailer::{DeliveryReceipt, Mailer};
use pv_core::types::id::ReportId;
use pv_database::store::{DispatchRecord, ReportStore};
use pv_delivery::mail::build_dispatch_mail;
use pv_delivery::render::DocumentRenderer;
use pv_entity::report::{FormData, Report, ReportPayload};

/// A request to send a report.
#[derive(Debug, Clone, Default)]
pub struct DispatchRequest {
    /// Existing report, or `None` to create one.
    pub id: Option<ReportId>,
    pub form: FormData,
    /// Explicit recipients. Defaults to the addresses in the form.
    pub recipients: Option<Vec<String>>,
    /// Comment for the archived version.
    pub comment: Option<String>,
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    pub report: Report,
    /// Number of the version archived by this dispatch.
    pub archived_version: Option<i32>,
    pub recipients: Vec<String>,
    pub receipt: DeliveryReceipt,
}

#[derive(Debug, Clone)]
pub struct DispatchService {
    store: Arc<dyn ReportStore>,
    renderer: Arc<dyn DocumentRenderer>,
    mailer: Arc<dyn Mailer>,
    mail: MailConfig,
}

impl DispatchService {
    pub fn new(
        store: Arc<dyn ReportStore>,
        renderer: Arc<dyn DocumentRenderer>,
        mailer: Arc<dyn Mailer>,
        mail: MailConfig,
    ) -> Self {
        Self {
            store,
            renderer,
            mailer,
            mail,
        }
    }

    /// Whether the mail settings allow a dispatch.
    pub fn mail_configured(&self) -> bool {
        self.mail.is_configured()
    }

    pub async fn dispatch(&self, request: DispatchRequest) -> AppResult<DispatchResult> {
        request.form.validate()?;
        let recipients = resolve_recipients(request.recipients.as_deref(), &request.form)?;
        let id = request.id.unwrap_or_default();
        let sent_at = Utc::now();

        // Render what the stored state will look like after the dispatch.
        let preview = match self.store.find_by_id(id).await? {
            Some(current) => {
                let mut payload = current.payload.revise(request.form.clone(), sent_at);
                payload.mark_sent(current.current_version + 1, sent_at, &recipients);
                payload
            }
            None => {
                let mut payload = ReportPayload::new(id, request.form.clone(), sent_at);
                payload.mark_sent(1, sent_at, &recipients);
                payload
            }
        };

        let document = self.renderer.render(&preview).await.map_err(|e| {
            warn!(report_id = %id, error = %e, "Dispatch aborted: rendering failed");
            AppError::external(format!("Failed to render report: {}", e.message))
        })?;

        let mail = build_dispatch_mail(&self.mail, &preview, &document, &recipients);
        let receipt = self.mailer.send(&self.mail, &mail).await.map_err(|e| {
            warn!(
                report_id = %id,
                transport = self.mailer.transport_name(),
                error = %e,
                "Dispatch aborted: mail not sent"
            );
            match e.kind {
                ErrorKind::Validation => e,
                _ => AppError::external(format!("Failed to send report: {}", e.message)),
            }
        })?;

        let record = DispatchRecord {
            sent_at,
            recipients: recipients.clone(),
            comment: request.comment,
        };
        let outcome = self
            .store
            .record_dispatch(id, request.form, &record)
            .await
            .map_err(|e| {
                error!(
                    report_id = %id,
                    message_id = %receipt.message_id,
                    error = %e,
                    "Mail delivered but report update failed"
                );
                let message = format!(
                    "Report sent to {} but could not be recorded: {}",
                    recipients.join(", "),
                    e.message
                );
                AppError::with_source(e.kind, message, e)
            })?;

        info!(
            report_id = %id,
            version = outcome.report.current_version,
            archived = ?outcome.archived.as_ref().map(|v| v.version_number),
            recipients = recipients.len(),
            "Report dispatched"
        );

        Ok(DispatchResult {
            archived_version: outcome.archived.map(|v| v.version_number),
            report: outcome.report,
            recipients,
            receipt,
        })
    }
}

/// Explicit recipients, or the form's addresses. Each must be a valid
/// address and at least one is required.
fn resolve_recipients(explicit: Option<&[String]>, form: &FormData) -> AppResult<Vec<String>> {
    let candidates = match explicit {
        Some(list) if list.iter().any(|r| !r.trim().is_empty()) => list.to_vec(),
        _ => form.default_recipients(),
    };

    let mut recipients: Vec<String> = Vec::new();
    for candidate in candidates.iter().flat_map(|c| c.split(',')) {
        let address = candidate.trim();
        if address.is_empty() || recipients.iter().any(|r| r.eq_ignore_ascii_case(address)) {
            continue;
        }
        if !address.validate_email() {
            return Err(AppError::validation(format!(
                "Invalid recipient address: {address}"
            )));
        }
        recipients.push(address.to_string());
    }

    if recipients.is_empty() {
        return Err(AppError::validation("At least one recipient is required"));
    }
    Ok(recipients)
}
