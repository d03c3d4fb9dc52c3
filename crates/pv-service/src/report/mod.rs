//! Report services.

pub mod dispatch;
pub mod service;
pub mod version;

pub use dispatch::{DispatchRequest, DispatchResult, DispatchService};
pub use service::{
    DeletedReport, DownloadedReport, InspectionDocument, ReportListItem, ReportService, StatsView,
};
pub use version::{VersionService, VersionView};
