//! CLI command definitions and dispatch.

pub mod config;
pub mod migrate;
pub mod report;
pub mod serve;
pub mod stats;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use pv_core::config::AppConfig;
use pv_core::error::AppError;
use pv_database::store::ReportStore;
use pv_delivery::{HandoverSheetRenderer, LocalDocumentStorage};
use pv_service::ReportService;

use crate::output::OutputFormat;

/// PV Matériel: equipment handover reports
#[derive(Debug, Parser)]
#[command(name = "pv-cli", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Configuration overlay (`config/{env}.toml`)
    #[arg(long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Inspect and manage reports
    Report(report::ReportArgs),
    /// Report and inspection statistics
    Stats,
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.config, &self.env)?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Report(args) => report::execute(args, &config, self.format).await,
            Commands::Stats => stats::execute(&config, self.format).await,
            Commands::Config(args) => config::execute(args, &config, self.format),
        }
    }
}

/// Open the configured store without running migrations.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn ReportStore>, AppError> {
    pv_api::app::open_store(config, false).await
}

/// Report service over the configured store and document root.
pub async fn report_service(
    config: &AppConfig,
    store: Arc<dyn ReportStore>,
) -> Result<ReportService, AppError> {
    let documents = LocalDocumentStorage::new(&config.storage.documents_root).await?;
    Ok(ReportService::new(
        store,
        Arc::new(HandoverSheetRenderer::new()),
        Arc::new(documents),
        config.inspection,
        config.storage.max_document_bytes,
    ))
}
