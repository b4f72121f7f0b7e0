//! Trash and relocation commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use filetrail_core::error::AppError;
use filetrail_core::types::{ChannelId, FileId, WorkspaceId};
use filetrail_database::store::FileLocation;
use filetrail_entity::file::File;
use filetrail_service::Engine;

use super::Cli;
use crate::output;

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Show a file
    Show {
        /// File ID
        id: FileId,
    },
    /// Move a file to the trash
    Trash {
        /// File ID
        id: FileId,
    },
    /// Bring a file back from the trash
    Restore {
        /// File ID
        id: FileId,
    },
    /// List trashed files of a workspace
    Trashed {
        /// Workspace ID
        #[arg(long)]
        workspace: WorkspaceId,
    },
    /// Move one or more files to another channel or workspace
    Move {
        /// File IDs
        #[arg(required = true)]
        ids: Vec<FileId>,
        /// Target channel
        #[arg(long)]
        channel: Option<ChannelId>,
        /// Target workspace
        #[arg(long)]
        workspace: Option<WorkspaceId>,
    },
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
pub struct FileRow {
    /// File ID
    #[tabled(rename = "ID")]
    pub id: String,
    /// Name
    #[tabled(rename = "Name")]
    pub name: String,
    /// Workspace
    #[tabled(rename = "Workspace")]
    pub workspace_id: String,
    /// Channel
    #[tabled(rename = "Channel")]
    pub channel_id: String,
    /// Size in bytes
    #[tabled(rename = "Size")]
    pub size_bytes: i64,
    /// Trash time
    #[tabled(rename = "Deleted")]
    pub deleted_at: String,
    /// Last change
    #[tabled(rename = "Updated")]
    pub updated_at: String,
}

impl From<&File> for FileRow {
    fn from(f: &File) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            workspace_id: f.workspace_id.to_string(),
            channel_id: output::or_dash(f.channel_id),
            size_bytes: f.size_bytes,
            deleted_at: output::or_dash(f.deleted_at.map(output::timestamp)),
            updated_at: output::timestamp(f.updated_at),
        }
    }
}

/// Execute file commands
pub async fn execute(args: &FileArgs, cli: &Cli, engine: &Engine) -> Result<(), AppError> {
    match &args.command {
        FileCommand::Show { id } => {
            let file = engine.files.get_file(*id).await?;
            output::print_item(&FileRow::from(&file), cli.format);
        }
        FileCommand::Trash { id } => {
            let ctx = cli.context()?;
            let file = engine.files.trash_file(&ctx, *id).await?;
            output::print_success(&format!("Moved '{}' to the trash.", file.name));
        }
        FileCommand::Restore { id } => {
            let ctx = cli.context()?;
            let file = engine.files.restore_from_trash(&ctx, *id).await?;
            output::print_success(&format!("Restored '{}' from the trash.", file.name));
        }
        FileCommand::Trashed { workspace } => {
            let files = engine.files.list_trash(*workspace).await?;
            let rows: Vec<FileRow> = files.iter().map(FileRow::from).collect();
            output::print_list(&rows, cli.format);
        }
        FileCommand::Move {
            ids,
            channel,
            workspace,
        } => {
            let ctx = cli.context()?;
            let location = FileLocation {
                channel_id: *channel,
                workspace_id: *workspace,
            };
            if let [id] = ids.as_slice() {
                let file = engine.files.move_file(&ctx, *id, location).await?;
                output::print_item(&FileRow::from(&file), cli.format);
            } else {
                let moved = engine.files.move_files(&ctx, ids, location).await?;
                output::print_success(&format!("Moved {moved} of {} files.", ids.len()));
            }
        }
    }
    Ok(())
}
