//! Report inspection and management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use pv_core::config::AppConfig;
use pv_core::error::AppError;
use pv_core::types::id::ReportId;
use pv_core::types::pagination::PageRequest;
use pv_database::store::ReportFilter;
use pv_entity::report::{CompletionStatus, VersionEntry};
use pv_service::VersionService;
use pv_service::report::ReportListItem;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(subcommand)]
    pub command: ReportCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// List reports, most recently updated first
    List {
        /// Filter by completion status (empty, reception_only, retour_only, complete)
        #[arg(short, long)]
        status: Option<String>,
        /// Search site, equipment, supplier and responsible
        #[arg(short, long)]
        query: Option<String>,
        /// Maximum number of reports
        #[arg(short, long, default_value_t = 25)]
        limit: u64,
    },
    /// Show a report, or one of its versions
    Show {
        id: String,
        /// Version number to show instead of the current state
        #[arg(long)]
        version: Option<i32>,
    },
    /// List the versions of a report
    Versions { id: String },
    /// Delete a report with its versions and inspection document
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct ReportRow {
    id: String,
    site: String,
    equipment: String,
    status: String,
    version: i32,
    last_sent: String,
    vgp: String,
    updated_at: String,
}

impl From<&ReportListItem> for ReportRow {
    fn from(item: &ReportListItem) -> Self {
        let s = &item.summary;
        Self {
            id: s.id.to_string(),
            site: s.indexed.site_name.clone(),
            equipment: s.indexed.equipment_type.clone().unwrap_or_default(),
            status: s.indexed.status.label().to_string(),
            version: s.current_version,
            last_sent: s
                .last_sent_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            vgp: item.inspection_status.as_str().to_string(),
            updated_at: s.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct VersionRow {
    version: i32,
    current: bool,
    created_at: String,
    created_by: String,
    comment: String,
}

impl From<&VersionEntry> for VersionRow {
    fn from(entry: &VersionEntry) -> Self {
        Self {
            version: entry.version_number,
            current: entry.is_current,
            created_at: entry.created_at.format("%Y-%m-%d %H:%M").to_string(),
            created_by: entry
                .created_by
                .as_ref()
                .map(|c| c.as_str().to_string())
                .unwrap_or_else(|| "-".to_string()),
            comment: entry.comment.clone().unwrap_or_default(),
        }
    }
}

/// Execute report commands
pub async fn execute(
    args: &ReportArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = super::open_store(config).await?;

    match &args.command {
        ReportCommand::List {
            status,
            query,
            limit,
        } => {
            let filter = ReportFilter {
                status: status
                    .as_deref()
                    .map(str::parse::<CompletionStatus>)
                    .transpose()?,
                query: query.clone(),
            };
            let service = super::report_service(config, store).await?;
            let page = service
                .list(&filter, &PageRequest::new(1, *limit))
                .await?;
            let rows: Vec<ReportRow> = page.items.iter().map(ReportRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table && page.total_items > rows.len() as u64 {
                println!("({} of {} reports)", rows.len(), page.total_items);
            }
        }
        ReportCommand::Show { id, version } => {
            let id = parse_id(id)?;
            match version {
                Some(number) => {
                    let view = VersionService::new(store).load_version(id, *number).await?;
                    output::print_json(&view);
                }
                None => {
                    let report = super::report_service(config, store).await?.load(id).await?;
                    output::print_json(&report);
                }
            }
        }
        ReportCommand::Versions { id } => {
            let entries = VersionService::new(store)
                .list_versions(parse_id(id)?)
                .await?;
            let rows: Vec<VersionRow> = entries.iter().map(VersionRow::from).collect();
            output::print_list(&rows, format);
        }
        ReportCommand::Delete { id, force } => {
            let id = parse_id(id)?;
            let service = super::report_service(config, store).await?;
            let report = service.load(id).await?;

            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete report '{}' ({}) and its {} version(s)?",
                        report.indexed.site_name, id, report.current_version
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let deleted = service.delete(id).await?;
            output::print_success(&format!("Report {id} deleted"));
            if deleted.document_removed {
                output::print_kv("Inspection document", "removed");
            }
        }
    }

    Ok(())
}

fn parse_id(raw: &str) -> Result<ReportId, AppError> {
    raw.parse()
        .map_err(|_| AppError::validation(format!("Invalid report id: {raw}")))
}
