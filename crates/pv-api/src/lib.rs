//! # pv-api
//!
//! HTTP API for handover reports built on Axum.
//!
//! Every response body carries a `success` flag. Successful calls add
//! `data`; failures add a machine-readable `error` code and a `message`.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
