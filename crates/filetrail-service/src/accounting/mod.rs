//! Aggregate accounting over the live file set.

pub mod service;

pub use service::{AccountingService, WorkspaceStats};
