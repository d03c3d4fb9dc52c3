//! Mail transport trait.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::config::MailConfig;
use crate::result::AppResult;

/// A binary attachment (the rendered handover document).
#[derive(Debug, Clone)]
pub struct MailAttachment {
    /// File name announced in `Content-Disposition`.
    pub file_name: String,
    /// MIME type of the content.
    pub content_type: String,
    /// Raw content.
    pub content: Bytes,
}

/// A fully-built message ready to be handed to a transport.
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    /// Recipient addresses.
    pub to: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// Optional attachment.
    pub attachment: Option<MailAttachment>,
}

/// What the transport reports back after accepting a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Transport-specific message identifier.
    pub message_id: String,
    /// Recipients the transport accepted.
    pub accepted: Vec<String>,
}

/// Trait for outgoing mail transports.
///
/// The settings are passed on every call so that a configuration reload
/// never races with an in-flight send.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug + 'static {
    /// Return the transport name (e.g. `"spool"`).
    fn transport_name(&self) -> &str;

    /// Hand a message to the transport.
    async fn send(&self, settings: &MailConfig, mail: &OutgoingMail)
    -> AppResult<DeliveryReceipt>;
}
