//! # pv-core
//!
//! Core crate for the equipment handover report service. Contains the
//! configuration schemas, typed identifiers, pagination types, the
//! collaborator traits (mail transport, document storage), and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
