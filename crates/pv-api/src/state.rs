//! Application state shared across all handlers.

use std::sync::Arc;

use pv_core::config::AppConfig;
use pv_core::traits::mailer::Mailer;
use pv_core::traits::storage::DocumentStorage;
use pv_database::store::ReportStore;
use pv_delivery::render::DocumentRenderer;
use pv_service::{DispatchService, ReportService, VersionService};

/// Shared dependencies, passed to every handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ReportStore>,
    pub documents: Arc<dyn DocumentStorage>,
    pub mail_transport: String,
    pub report_service: Arc<ReportService>,
    pub dispatch_service: Arc<DispatchService>,
    pub version_service: Arc<VersionService>,
}

impl AppState {
    /// Wire the services around the given collaborators.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn ReportStore>,
        renderer: Arc<dyn DocumentRenderer>,
        mailer: Arc<dyn Mailer>,
        documents: Arc<dyn DocumentStorage>,
    ) -> Self {
        let report_service = Arc::new(ReportService::new(
            Arc::clone(&store),
            Arc::clone(&renderer),
            Arc::clone(&documents),
            config.inspection,
            config.storage.max_document_bytes,
        ));
        let dispatch_service = Arc::new(DispatchService::new(
            Arc::clone(&store),
            renderer,
            Arc::clone(&mailer),
            config.mail.clone(),
        ));
        let version_service = Arc::new(VersionService::new(Arc::clone(&store)));

        Self {
            mail_transport: mailer.transport_name().to_string(),
            config: Arc::new(config),
            store,
            documents,
            report_service,
            dispatch_service,
            version_service,
        }
    }
}
