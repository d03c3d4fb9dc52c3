//! # pv-database
//!
//! PostgreSQL connection management, migrations and the report store.
//! The [`store::ReportStore`] trait has a transactional Postgres
//! implementation and an in-memory one for single-node runs and tests.

pub mod connection;
pub mod migration;
pub mod store;

pub use connection::DatabasePool;
pub use store::{MemoryReportStore, PgReportStore, ReportStore};
