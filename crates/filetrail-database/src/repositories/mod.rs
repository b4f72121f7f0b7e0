//! PostgreSQL implementations of the store traits.

pub mod access;
pub mod activity;
pub mod engagement;
pub mod file;
pub mod permission;
pub mod share;
pub mod stats;
pub mod version;

pub use access::AccessRequestRepository;
pub use activity::ActivityRepository;
pub use engagement::EngagementRepository;
pub use file::FileRepository;
pub use permission::PermissionRepository;
pub use share::ShareLinkRepository;
pub use stats::StatsRepository;
pub use version::VersionRepository;
