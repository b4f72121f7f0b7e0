//! # filetrail-core
//!
//! Core crate for FileTrail. Contains the unified error system, the
//! configuration schema, typed identifiers, and the collaborator traits
//! (clock, token generation) the engine is parameterised over.
//!
//! This crate has **no** internal dependencies on other FileTrail crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
