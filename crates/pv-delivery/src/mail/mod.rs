//! Dispatch mail composition and transports.

pub mod memory;
pub mod message;
pub mod spool;

use std::sync::Arc;

use tracing::info;

use pv_core::config::MailConfig;
use pv_core::error::AppError;
use pv_core::result::AppResult;
use pv_core::traits::mailer::Mailer;

pub use memory::MemoryMailer;
pub use message::{build_dispatch_mail, encode_mime};
pub use spool::SpoolMailer;

/// Build the transport named by `mail.transport`.
pub fn mailer_from_config(config: &MailConfig) -> AppResult<Arc<dyn Mailer>> {
    let mailer: Arc<dyn Mailer> = match config.transport.as_str() {
        "spool" => {
            info!(spool_dir = %config.spool_dir, "Using spool mail transport");
            Arc::new(SpoolMailer::new())
        }
        "memory" => {
            info!("Using in-memory mail transport");
            Arc::new(MemoryMailer::new())
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown mail transport: '{other}'. Supported: spool, memory"
            )));
        }
    };
    Ok(mailer)
}
