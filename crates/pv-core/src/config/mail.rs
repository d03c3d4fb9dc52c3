//! Outgoing mail configuration.
//!
//! The whole struct is passed to the mailer at call time; there is no
//! process-wide mail state.

use serde::{Deserialize, Serialize};

/// Outgoing mail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Whether report dispatch is enabled at all.
    #[serde(default)]
    pub enabled: bool,
    /// Transport used for dispatch: `spool` or `memory`.
    #[serde(default = "default_transport")]
    pub transport: String,
    /// Sender address placed in the `From` header.
    #[serde(default)]
    pub sender: String,
    /// Directory where the spool mailer drops `.eml` files for the relay.
    #[serde(default = "default_spool_dir")]
    pub spool_dir: String,
    /// Subject prefix, followed by the site name and reception date.
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
}

impl MailConfig {
    /// Whether enough settings are present to hand a message to a transport.
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.sender.trim().is_empty()
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            transport: default_transport(),
            sender: String::new(),
            spool_dir: default_spool_dir(),
            subject_prefix: default_subject_prefix(),
        }
    }
}

fn default_transport() -> String {
    "spool".to_string()
}

fn default_spool_dir() -> String {
    "./data/outbox".to_string()
}

fn default_subject_prefix() -> String {
    "PV Matériel Loué".to_string()
}
