//! # filetrail-entity
//!
//! Domain entity models for FileTrail. Every struct in this crate
//! represents a database row or a derived value object. Row entities
//! derive `sqlx::FromRow` alongside serde.

pub mod access;
pub mod activity;
pub mod engagement;
pub mod file;
pub mod permission;
pub mod share;
pub mod stats;
