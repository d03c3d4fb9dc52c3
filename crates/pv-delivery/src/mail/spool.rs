//! Spool-directory mail transport.
//!
//! Each message is written as an `.eml` file into the configured spool
//! directory, where the outbound relay picks it up. A message counts as
//! sent once its file is fully written.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tracing::info;
use uuid::Uuid;

use pv_core::config::MailConfig;
use pv_core::error::{AppError, ErrorKind};
use pv_core::result::AppResult;
use pv_core::traits::mailer::{DeliveryReceipt, Mailer, OutgoingMail};

use super::message::encode_mime;

#[derive(Debug, Clone, Default)]
pub struct SpoolMailer;

impl SpoolMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for SpoolMailer {
    fn transport_name(&self) -> &str {
        "spool"
    }

    async fn send(&self, settings: &MailConfig, mail: &OutgoingMail) -> AppResult<DeliveryReceipt> {
        if !settings.is_configured() {
            return Err(AppError::external(
                "Mail is not configured: set mail.enabled and mail.sender",
            ));
        }
        if mail.to.is_empty() {
            return Err(AppError::validation("At least one recipient is required"));
        }

        let domain = settings
            .sender
            .rsplit_once('@')
            .map_or("localhost", |(_, d)| d.trim());
        let message_id = format!("{}@{domain}", Uuid::new_v4());
        let mime = encode_mime(mail, settings.sender.trim(), &message_id, Utc::now());

        let dir = PathBuf::from(&settings.spool_dir);
        fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Failed to create mail spool: {}", dir.display()),
                e,
            )
        })?;

        // The relay only picks up `.eml` files.
        let stem = message_id.replace('@', "_");
        let partial = dir.join(format!("{stem}.tmp"));
        let target = dir.join(format!("{stem}.eml"));
        fs::write(&partial, mime.as_bytes()).await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Failed to spool message", e)
        })?;
        fs::rename(&partial, &target).await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Failed to spool message", e)
        })?;

        info!(
            message_id = %message_id,
            recipients = mail.to.len(),
            path = %target.display(),
            "Spooled outgoing mail"
        );

        Ok(DeliveryReceipt {
            message_id,
            accepted: mail.to.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail() -> OutgoingMail {
        OutgoingMail {
            to: vec!["conducteur@btp.fr".into()],
            subject: "PV".into(),
            body: "Bonjour".into(),
            attachment: None,
        }
    }

    fn settings(dir: &std::path::Path) -> MailConfig {
        MailConfig {
            enabled: true,
            sender: "pv@cl-conseil.fr".into(),
            spool_dir: dir.to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_send_writes_eml() {
        let dir = tempfile::tempdir().unwrap();
        let receipt = SpoolMailer::new()
            .send(&settings(dir.path()), &mail())
            .await
            .unwrap();

        assert!(receipt.message_id.ends_with("@cl-conseil.fr"));
        assert_eq!(receipt.accepted, vec!["conducteur@btp.fr"]);

        let files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].extension().unwrap(), "eml");
        let content = std::fs::read_to_string(&files[0]).unwrap();
        assert!(content.contains("To: conducteur@btp.fr"));
    }

    #[tokio::test]
    async fn test_unconfigured_mail_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = settings(dir.path());
        config.enabled = false;

        let err = SpoolMailer::new().send(&config, &mail()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
