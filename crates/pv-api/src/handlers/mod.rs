//! HTTP request handlers.

pub mod dispatch;
pub mod document;
pub mod health;
pub mod report;
pub mod stats;
pub mod version;
