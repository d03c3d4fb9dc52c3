//! Report statistics.

use pv_core::config::AppConfig;
use pv_core::error::AppError;

use crate::output::{self, OutputFormat};

pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let store = super::open_store(config).await?;
    let stats = super::report_service(config, store).await?.stats().await?;

    match format {
        OutputFormat::Json => output::print_json(&stats),
        OutputFormat::Table => {
            let r = &stats.reports;
            println!("Reports");
            output::print_kv("Total", &r.total.to_string());
            output::print_kv("Complete", &r.complete.to_string());
            output::print_kv("Reception only", &r.reception_only.to_string());
            output::print_kv("Return only", &r.retour_only.to_string());
            output::print_kv("Empty", &r.empty.to_string());
            output::print_kv("Resent (> 1 version)", &r.multi_version.to_string());
            output::print_kv("Archived versions", &r.archived_versions.to_string());
            println!("Periodic inspection");
            let i = &stats.inspection;
            output::print_kv("No date", &i.none.to_string());
            output::print_kv("Valid", &i.valid.to_string());
            output::print_kv("Due soon", &i.due_soon.to_string());
            output::print_kv("Expired", &i.expired.to_string());
        }
    }
    Ok(())
}
