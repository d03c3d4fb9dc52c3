//! Configuration commands.

use clap::{Args, Subcommand};

use pv_core::config::AppConfig;
use pv_core::error::AppError;
use pv_database::connection::mask_password;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
}

pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            shown.database.url = mask_password(&shown.database.url);
            match format {
                OutputFormat::Json => output::print_json(&shown),
                OutputFormat::Table => {
                    output::print_kv(
                        "Server",
                        &format!("{}:{}", shown.server.host, shown.server.port),
                    );
                    output::print_kv("Store", &shown.database.backend);
                    output::print_kv("Database", &shown.database.url);
                    output::print_kv(
                        "Mail",
                        &format!(
                            "{} ({}, configured: {})",
                            shown.mail.transport,
                            shown.mail.sender,
                            shown.mail.is_configured()
                        ),
                    );
                    output::print_kv("Mail spool", &shown.mail.spool_dir);
                    output::print_kv("Documents", &shown.storage.documents_root);
                    output::print_kv(
                        "VGP validity",
                        &format!(
                            "{} days (warning {} days)",
                            shown.inspection.validity_days, shown.inspection.warning_days
                        ),
                    );
                    output::print_kv(
                        "Logging",
                        &format!("{} ({})", shown.logging.level, shown.logging.format),
                    );
                }
            }
        }
    }
    Ok(())
}
