//! Access request domain entities.

pub mod request;
pub mod status;

pub use request::{AccessRequest, NewAccessRequest};
pub use status::{AccessRequestStatus, ReviewDecision};
