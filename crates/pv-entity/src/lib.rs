//! # pv-entity
//!
//! Domain entity models for equipment handover reports (PV). Every
//! struct in this crate represents a database table row or a domain
//! value object. Database entities additionally derive `sqlx::FromRow`.
//!
//! The full [`report::ReportPayload`] is authoritative; the indexed
//! columns of a [`report::Report`] are a projection of it, produced only
//! by [`report::extract_indexed_fields`].

pub mod inspection;
pub mod report;
