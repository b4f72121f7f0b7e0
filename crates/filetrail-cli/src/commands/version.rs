//! File version history commands.

use clap::{Args, Subcommand};
use dialoguer::Confirm;
use serde::Serialize;
use tabled::Tabled;

use filetrail_core::config::AppConfig;
use filetrail_core::error::AppError;
use filetrail_core::types::{FileId, VersionId};
use filetrail_entity::file::FileVersion;
use filetrail_service::Engine;

use super::Cli;
use crate::output;

/// Arguments for version commands
#[derive(Debug, Args)]
pub struct VersionArgs {
    /// Version subcommand
    #[command(subcommand)]
    pub command: VersionCommand,
}

/// Version subcommands
#[derive(Debug, Subcommand)]
pub enum VersionCommand {
    /// Snapshot the current content of a file as a new version
    Create {
        /// File ID
        #[arg(long)]
        file: FileId,
        /// Note stored with the version
        #[arg(short, long)]
        message: Option<String>,
    },
    /// List versions of a file, newest first
    List {
        /// File ID
        #[arg(long)]
        file: FileId,
    },
    /// Show a single version
    Show {
        /// Version ID
        id: VersionId,
    },
    /// Delete a version
    Delete {
        /// Version ID
        id: VersionId,
    },
    /// Make a version's content current again
    Restore {
        /// Version ID
        id: VersionId,
        /// Record the current content as a new version first
        #[arg(long)]
        snapshot: bool,
    },
    /// Drop all but the newest versions of a file
    Prune {
        /// File ID
        #[arg(long)]
        file: FileId,
        /// Versions to keep (defaults to engine.version_retention)
        #[arg(long)]
        keep: Option<u32>,
        /// Skip confirmation
        #[arg(long)]
        yes: bool,
    },
}

/// Version display row
#[derive(Debug, Serialize, Tabled)]
pub struct VersionRow {
    /// Version ID
    #[tabled(rename = "ID")]
    pub id: String,
    /// Version number
    #[tabled(rename = "Version")]
    pub version: i32,
    /// Size in bytes
    #[tabled(rename = "Size")]
    pub size_bytes: i64,
    /// Content checksum
    #[tabled(rename = "Checksum")]
    pub checksum: String,
    /// Uploader
    #[tabled(rename = "By")]
    pub uploaded_by: String,
    /// Note
    #[tabled(rename = "Comment")]
    pub comment: String,
    /// Creation time
    #[tabled(rename = "Created")]
    pub created_at: String,
}

impl From<&FileVersion> for VersionRow {
    fn from(v: &FileVersion) -> Self {
        Self {
            id: v.id.to_string(),
            version: v.version_num,
            size_bytes: v.size_bytes,
            checksum: output::or_dash(v.checksum.as_deref()),
            uploaded_by: v.uploaded_by.to_string(),
            comment: output::or_dash(v.comment.as_deref()),
            created_at: output::timestamp(v.created_at),
        }
    }
}

/// Execute version commands
pub async fn execute(
    args: &VersionArgs,
    cli: &Cli,
    engine: &Engine,
    config: &AppConfig,
) -> Result<(), AppError> {
    match &args.command {
        VersionCommand::Create { file, message } => {
            let ctx = cli.context()?;
            let version = engine
                .versions
                .create_version(&ctx, *file, message.as_deref())
                .await?;
            output::print_item(&VersionRow::from(&version), cli.format);
        }
        VersionCommand::List { file } => {
            let versions = engine.versions.list_versions(*file).await?;
            let rows: Vec<VersionRow> = versions.iter().map(VersionRow::from).collect();
            output::print_list(&rows, cli.format);
        }
        VersionCommand::Show { id } => {
            let version = engine.versions.get_version(*id).await?;
            output::print_item(&VersionRow::from(&version), cli.format);
        }
        VersionCommand::Delete { id } => {
            let ctx = cli.context()?;
            engine.versions.delete_version(&ctx, *id).await?;
            output::print_success(&format!("Version {id} deleted."));
        }
        VersionCommand::Restore { id, snapshot } => {
            let ctx = cli.context()?;
            if *snapshot {
                let (saved, file) = engine.versions.snapshot_and_restore(&ctx, *id).await?;
                output::print_success(&format!(
                    "Saved previous content as version {} and restored '{}'.",
                    saved.version_num, file.name
                ));
            } else {
                let file = engine.versions.restore_version(&ctx, *id).await?;
                output::print_success(&format!("Restored '{}'.", file.name));
            }
        }
        VersionCommand::Prune { file, keep, yes } => {
            let ctx = cli.context()?;
            let keep = keep.or(config.engine.version_retention).ok_or_else(|| {
                AppError::validation("No --keep given and engine.version_retention is not set")
            })?;

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Delete all but the newest {keep} versions of {file}?"
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Prompt error: {e}")))?;

                if !confirmed {
                    println!("Aborted.");
                    return Ok(());
                }
            }

            let removed = engine.versions.prune_versions(&ctx, *file, keep).await?;
            output::print_success(&format!("Pruned {removed} versions."));
        }
    }
    Ok(())
}
