//! Core type definitions used across the FileTrail workspace.

pub mod id;

pub use id::*;
