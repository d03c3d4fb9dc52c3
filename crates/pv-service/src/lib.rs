//! # pv-service
//!
//! Business logic for handover reports. Services receive their
//! collaborators (store, renderer, mailer, document storage) as `Arc`
//! trait objects at construction time.

pub mod report;

pub use report::{
    DispatchRequest, DispatchResult, DispatchService, ReportService, VersionService,
};
