//! File domain entities.

pub mod model;
pub mod version;

pub use model::{File, FileContent};
pub use version::FileVersion;
