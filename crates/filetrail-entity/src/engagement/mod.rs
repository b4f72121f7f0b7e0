//! Comments, reactions and download records.
//!
//! Plain single-row records. They carry no cross-row invariant and exist
//! here because file statistics count them.

pub mod comment;
pub mod download;
pub mod reaction;

pub use comment::{Comment, NewComment};
pub use download::{DownloadRecord, NewDownload};
pub use reaction::{NewReaction, Reaction, ReactionCount};
