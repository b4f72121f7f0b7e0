//! Best-effort activity logging and the activity feed.

pub mod service;

pub use service::ActivityService;
