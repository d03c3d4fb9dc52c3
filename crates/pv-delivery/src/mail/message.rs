//! Building the dispatch message and its MIME encoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};

use pv_core::config::MailConfig;
use pv_core::traits::mailer::{MailAttachment, OutgoingMail};
use pv_entity::report::ReportPayload;

use crate::render::RenderedDocument;

const BOUNDARY_PREFIX: &str = "pv-materiel-";
const LINE_LENGTH: usize = 76;

/// Compose the message carrying a rendered report to its recipients.
pub fn build_dispatch_mail(
    settings: &MailConfig,
    payload: &ReportPayload,
    document: &RenderedDocument,
    recipients: &[String],
) -> OutgoingMail {
    let reception = payload
        .form_data
        .reception_date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or("Non spécifiée");

    let body = format!(
        "Bonjour,\r\n\r\n\
         Veuillez trouver ci-joint le Procès-Verbal de matériel loué pour le chantier : {site}\r\n\r\n\
         Date de réception : {reception}\r\n\r\n\
         Ce document a été généré automatiquement.\r\n\r\n\
         Cordialement\r\n",
        site = payload.site_name,
    );

    OutgoingMail {
        to: recipients.to_vec(),
        subject: format!("{} - {} - {}", settings.subject_prefix, payload.site_name, reception),
        body,
        attachment: Some(MailAttachment {
            file_name: document.file_name.clone(),
            content_type: document.content_type.clone(),
            content: document.content.clone(),
        }),
    }
}

/// Encode a message as an RFC 5322 document with a multipart body.
pub fn encode_mime(
    mail: &OutgoingMail,
    sender: &str,
    message_id: &str,
    date: DateTime<Utc>,
) -> String {
    let boundary = format!("{BOUNDARY_PREFIX}{}", message_id.replace(['@', '.'], "-"));
    let mut out = String::new();

    out.push_str(&format!("From: {sender}\r\n"));
    out.push_str(&format!("To: {}\r\n", mail.to.join(", ")));
    out.push_str(&format!("Subject: {}\r\n", encode_header(&mail.subject)));
    out.push_str(&format!("Date: {}\r\n", date.to_rfc2822()));
    out.push_str(&format!("Message-ID: <{message_id}>\r\n"));
    out.push_str("MIME-Version: 1.0\r\n");
    out.push_str(&format!(
        "Content-Type: multipart/mixed; boundary=\"{boundary}\"\r\n\r\n"
    ));

    out.push_str(&format!("--{boundary}\r\n"));
    out.push_str("Content-Type: text/plain; charset=utf-8\r\n");
    out.push_str("Content-Transfer-Encoding: base64\r\n\r\n");
    out.push_str(&wrap_base64(mail.body.as_bytes()));

    if let Some(attachment) = &mail.attachment {
        out.push_str(&format!("--{boundary}\r\n"));
        out.push_str(&format!("Content-Type: {}\r\n", attachment.content_type));
        out.push_str("Content-Transfer-Encoding: base64\r\n");
        out.push_str(&format!(
            "Content-Disposition: attachment; filename=\"{}\"\r\n\r\n",
            attachment.file_name.replace('"', "")
        ));
        out.push_str(&wrap_base64(&attachment.content));
    }

    out.push_str(&format!("--{boundary}--\r\n"));
    out
}

/// RFC 2047 encoded-word for non-ASCII header values.
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value))
    }
}

fn wrap_base64(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / LINE_LENGTH * 2 + 2);
    for chunk in encoded.as_bytes().chunks(LINE_LENGTH) {
        // base64 output is ASCII
        out.push_str(&String::from_utf8_lossy(chunk));
        out.push_str("\r\n");
    }
    out
}
