//! In-memory mail transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use pv_core::config::MailConfig;
use pv_core::error::AppError;
use pv_core::result::AppResult;
use pv_core::traits::mailer::{DeliveryReceipt, Mailer, OutgoingMail};

/// Keeps every accepted message in memory. Used for local runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<OutgoingMail>>>,
    reject: Arc<AtomicBool>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail.
    pub fn set_reject(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    /// Messages accepted so far.
    pub async fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    fn transport_name(&self) -> &str {
        "memory"
    }

    async fn send(&self, settings: &MailConfig, mail: &OutgoingMail) -> AppResult<DeliveryReceipt> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(AppError::external("Mail transport rejected the message"));
        }
        if !settings.is_configured() {
            return Err(AppError::external(
                "Mail is not configured: set mail.enabled and mail.sender",
            ));
        }

        let message_id = Uuid::new_v4().to_string();
        self.sent.lock().await.push(mail.clone());
        info!(message_id = %message_id, recipients = mail.to.len(), "Accepted mail in memory");

        Ok(DeliveryReceipt {
            message_id,
            accepted: mail.to.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> MailConfig {
        MailConfig {
            enabled: true,
            sender: "pv@cl-conseil.fr".into(),
            ..Default::default()
        }
    }

    fn mail() -> OutgoingMail {
        OutgoingMail {
            to: vec!["a@x.fr".into()],
            subject: "PV".into(),
            body: String::new(),
            attachment: None,
        }
    }

    #[tokio::test]
    async fn test_records_and_rejects() {
        let mailer = MemoryMailer::new();
        mailer.send(&configured(), &mail()).await.unwrap();
        assert_eq!(mailer.sent().await.len(), 1);

        mailer.set_reject(true);
        assert!(mailer.send(&configured(), &mail()).await.is_err());
        assert_eq!(mailer.sent().await.len(), 1);
    }
}
