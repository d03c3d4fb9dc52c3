//! Custom Axum extractors.

pub mod json;
pub mod pagination;
pub mod path;
pub mod query;

pub use json::ValidatedJson;
pub use pagination::PaginationParams;
pub use path::{ValidatedPath, parse_report_id, parse_version_number};
pub use query::ValidatedQuery;
