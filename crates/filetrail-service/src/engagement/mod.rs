//! Comments, reactions and download records.

pub mod service;

pub use service::EngagementService;
