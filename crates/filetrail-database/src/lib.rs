//! # filetrail-database
//!
//! Persistence for FileTrail. The engine talks to storage only through the
//! traits in [`store`]; two implementations are provided:
//!
//! - [`repositories`]: PostgreSQL via sqlx, for production
//! - [`memory`]: a single-mutex in-memory store, for single-node use and tests
//!
//! Both honour the same atomicity contracts: per-file version allocation,
//! check-and-increment on share-link consumption, guarded access-request
//! review, and single-pass quota aggregation.

pub mod connection;
pub mod error;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::{DatabasePool, PoolHealth};
pub use memory::MemoryStore;
pub use store::Stores;
