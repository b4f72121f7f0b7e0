//! Explicit per-user file grants.

pub mod service;

pub use service::PermissionService;
