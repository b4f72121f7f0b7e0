//! Derived aggregates. None of these are stored.

pub mod file;
pub mod quota;

pub use file::FileStats;
pub use quota::{QuotaSnapshot, QuotaTotals};
