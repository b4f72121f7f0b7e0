//! # filetrail-cli
//!
//! Command tree for driving the FileTrail engine against PostgreSQL:
//! versions, share links, grants, access requests, accounting, trash and
//! activity. The `filetrail` binary parses [`Cli`] and calls
//! [`Cli::execute`] with the loaded configuration.

pub mod commands;
pub mod output;

pub use commands::Cli;
