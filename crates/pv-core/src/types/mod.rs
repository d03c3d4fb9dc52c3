//! Core type definitions used across the workspace.

pub mod id;
pub mod pagination;

pub use id::ReportId;
pub use pagination::{PageRequest, PageResponse};
