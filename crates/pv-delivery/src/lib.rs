//! # pv-delivery
//!
//! Implementations of the collaborators the report services depend on:
//!
//! - [`render`]: turns a report payload into a printable handover sheet
//! - [`mail`]: builds the dispatch message and hands it to a transport
//! - [`storage`]: keeps periodic-inspection conformity documents on disk

pub mod mail;
pub mod render;
pub mod storage;

pub use mail::{MemoryMailer, SpoolMailer, build_dispatch_mail, mailer_from_config};
pub use render::{DocumentRenderer, HandoverSheetRenderer, RenderedDocument};
pub use storage::{LocalDocumentStorage, inspection_document_key};
