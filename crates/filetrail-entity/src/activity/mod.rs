//! File activity feed entities.

pub mod model;

pub use model::{ActivityAction, ActivityEntry, NewActivity};
