//! File-level services: version history, trash and relocation.

pub mod service;
pub mod version;

pub use service::FileService;
pub use version::VersionService;

use filetrail_core::error::AppError;
use filetrail_core::result::AppResult;
use filetrail_core::types::FileId;
use filetrail_database::store::FileStore;
use filetrail_entity::file::File;

/// Load a file or fail with `NotFound`.
pub(crate) async fn require_file(files: &dyn FileStore, file_id: FileId) -> AppResult<File> {
    files
        .find_file(file_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
}
