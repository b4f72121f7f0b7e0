//! Access request workflow: pending → approved | denied.

pub mod service;

pub use service::AccessRequestService;
