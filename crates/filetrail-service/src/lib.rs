//! # filetrail-service
//!
//! Business logic for FileTrail. Each service orchestrates the store traits
//! from `filetrail-database` to implement one component of the engine:
//!
//! - [`VersionService`]: per-file version numbering, restore, pruning
//! - [`ShareLinkService`]: capability tokens with expiry, view quota and password
//! - [`PermissionService`] / [`AccessRequestService`]: grants and the review workflow
//! - [`AccountingService`]: quota, stats and duplicate detection
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. [`Engine`] wires a full set.

pub mod access;
pub mod accounting;
pub mod activity;
pub mod context;
pub mod engagement;
pub mod engine;
pub mod file;
pub mod permission;
pub mod share;

#[cfg(test)]
pub(crate) mod testing;

pub use access::AccessRequestService;
pub use accounting::{AccountingService, WorkspaceStats};
pub use activity::ActivityService;
pub use context::RequestContext;
pub use engagement::EngagementService;
pub use engine::Engine;
pub use file::{FileService, VersionService};
pub use permission::PermissionService;
pub use share::{LinkAccess, LinkPasswordHasher, ShareLinkService};
