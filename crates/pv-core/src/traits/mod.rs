//! Collaborator traits defined in `pv-core` and implemented by `pv-delivery`.

pub mod mailer;
pub mod storage;

pub use mailer::{DeliveryReceipt, MailAttachment, Mailer, OutgoingMail};
pub use storage::DocumentStorage;
