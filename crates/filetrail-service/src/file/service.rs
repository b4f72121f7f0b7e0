//! File service: trash, restore from trash, and relocation.

use std::sync::Arc;

use tracing::{debug, info};

use filetrail_core::error::AppError;
use filetrail_core::result::AppResult;
use filetrail_core::traits::Clock;
use filetrail_core::types::{FileId, WorkspaceId};
use filetrail_database::store::{FileLocation, FileStore};
use filetrail_entity::activity::ActivityAction;
use filetrail_entity::file::File;

use super::require_file;
use crate::activity::ActivityService;
use crate::context::RequestContext;

/// Writes the narrow set of File fields the engine owns.
#[derive(Clone)]
pub struct FileService {
    /// File store.
    files: Arc<dyn FileStore>,
    /// Activity log.
    activity: Arc<ActivityService>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        files: Arc<dyn FileStore>,
        activity: Arc<ActivityService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            files,
            activity,
            clock,
        }
    }

    /// Fetch a file record.
    pub async fn get_file(&self, file_id: FileId) -> AppResult<File> {
        require_file(self.files.as_ref(), file_id).await
    }

    /// Soft-delete a file.
    pub async fn trash_file(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<File> {
        let file = require_file(self.files.as_ref(), file_id).await?;
        if file.is_trashed() {
            return Err(AppError::invalid_state("File is already in the trash"));
        }

        let now = self.clock.now();
        let file = self
            .files
            .set_deleted_at(file_id, Some(now), now)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        info!(user_id = %ctx.user_id, file_id = %file_id, "File moved to trash");
        self.activity
            .log(file_id, Some(ctx.user_id), ActivityAction::FileTrashed, "")
            .await;

        Ok(file)
    }

    /// Bring a soft-deleted file back.
    pub async fn restore_from_trash(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
    ) -> AppResult<File> {
        let file = require_file(self.files.as_ref(), file_id).await?;
        if !file.is_trashed() {
            return Err(AppError::invalid_state("File is not in the trash"));
        }

        let file = self
            .files
            .set_deleted_at(file_id, None, self.clock.now())
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        info!(user_id = %ctx.user_id, file_id = %file_id, "File restored from trash");
        self.activity
            .log(file_id, Some(ctx.user_id), ActivityAction::FileRestored, "")
            .await;

        Ok(file)
    }

    /// Soft-deleted files of a workspace, most recently trashed first.
    pub async fn list_trash(&self, workspace_id: WorkspaceId) -> AppResult<Vec<File>> {
        debug!(workspace_id = %workspace_id, "Listing trash");
        self.files.list_trashed(workspace_id).await
    }

    /// Change a file's channel and/or workspace.
    pub async fn move_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        location: FileLocation,
    ) -> AppResult<File> {
        if location.is_empty() {
            return Err(AppError::validation(
                "A target channel or workspace is required",
            ));
        }

        let file = self
            .files
            .relocate(file_id, location, self.clock.now())
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            workspace_id = %file.workspace_id,
            "File moved"
        );
        self.activity
            .log(
                file_id,
                Some(ctx.user_id),
                ActivityAction::FileMoved,
                describe(&location),
            )
            .await;

        Ok(file)
    }

    /// Move several files to the same location. Unknown IDs are skipped.
    ///
    /// Returns how many files were moved.
    pub async fn move_files(
        &self,
        ctx: &RequestContext,
        file_ids: &[FileId],
        location: FileLocation,
    ) -> AppResult<usize> {
        let mut moved = 0;
        for &file_id in file_ids {
            match self.move_file(ctx, file_id, location).await {
                Ok(_) => moved += 1,
                Err(e) if e.kind == filetrail_core::ErrorKind::NotFound => {
                    debug!(file_id = %file_id, "Skipping unknown file in bulk move");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(moved)
    }
}

fn describe(location: &FileLocation) -> String {
    let mut parts = Vec::new();
    if let Some(channel_id) = location.channel_id {
        parts.push(format!("channel={channel_id}"));
    }
    if let Some(workspace_id) = location.workspace_id {
        parts.push(format!("workspace={workspace_id}"));
    }
    parts.join(" ")
}
