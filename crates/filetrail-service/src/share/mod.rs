//! Share link gatekeeper: token issuance, password checks, atomic consumption.

pub mod link;
pub mod password;

pub use link::{CreateLinkRequest, LinkAccess, ShareLinkService};
pub use password::LinkPasswordHasher;
