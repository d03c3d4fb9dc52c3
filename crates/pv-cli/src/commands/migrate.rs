//! Database migration commands.

use clap::{Args, Subcommand};

use pv_core::config::AppConfig;
use pv_core::error::AppError;
use pv_database::DatabasePool;

use crate::output;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommand,
}

#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    if config.database.backend != "postgres" {
        output::print_warning("The configured store has no schema to migrate.");
        return Ok(());
    }

    let db = DatabasePool::connect(&config.database).await?;
    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            pv_database::migration::run_migrations(db.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
    }
    db.close().await;
    Ok(())
}
