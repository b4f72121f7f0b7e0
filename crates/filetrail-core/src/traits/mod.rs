//! Collaborator traits defined in `filetrail-core` and injected into services.

pub mod clock;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use token::{RandomTokenGenerator, TokenGenerator};
