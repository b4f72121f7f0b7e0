//! Share link domain entities.

pub mod link;

pub use link::{LinkState, NewShareLink, ShareLink};
