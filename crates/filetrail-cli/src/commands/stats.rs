//! Quota, file statistics and duplicate lookup commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use filetrail_core::error::AppError;
use filetrail_core::types::{FileId, WorkspaceId};
use filetrail_entity::file::File;
use filetrail_service::Engine;

use crate::output::{self, OutputFormat};

/// Arguments for stats commands
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Stats subcommand
    #[command(subcommand)]
    pub command: StatsCommand,
}

/// Stats subcommands
#[derive(Debug, Subcommand)]
pub enum StatsCommand {
    /// Storage used by a workspace against its limit
    Quota {
        /// Workspace ID
        #[arg(long)]
        workspace: WorkspaceId,
    },
    /// Quota plus remaining bytes and usage ratio
    Workspace {
        /// Workspace ID
        #[arg(long)]
        workspace: WorkspaceId,
    },
    /// Download, reaction, comment and version counts for a file
    File {
        /// File ID
        #[arg(long)]
        file: FileId,
    },
    /// Other files with the same checksum
    Dupes {
        /// File ID
        #[arg(long)]
        file: FileId,
    },
}

/// Duplicate file display row
#[derive(Debug, Serialize, Tabled)]
pub struct DuplicateRow {
    /// File ID
    #[tabled(rename = "ID")]
    pub id: String,
    /// Name
    #[tabled(rename = "Name")]
    pub name: String,
    /// Workspace
    #[tabled(rename = "Workspace")]
    pub workspace_id: String,
    /// Size in bytes
    #[tabled(rename = "Size")]
    pub size_bytes: i64,
    /// Whether the file is in the trash
    #[tabled(rename = "Trashed")]
    pub trashed: bool,
}

impl From<&File> for DuplicateRow {
    fn from(f: &File) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            workspace_id: f.workspace_id.to_string(),
            size_bytes: f.size_bytes,
            trashed: f.is_trashed(),
        }
    }
}

/// Execute stats commands
pub async fn execute(
    args: &StatsArgs,
    format: OutputFormat,
    engine: &Engine,
) -> Result<(), AppError> {
    match &args.command {
        StatsCommand::Quota { workspace } => {
            let quota = engine.accounting.workspace_quota(*workspace).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&quota)?),
                OutputFormat::Table => {
                    println!("Workspace {workspace}");
                    output::print_kv("Total size", &quota.total_size.to_string());
                    output::print_kv("Files", &quota.file_count.to_string());
                    output::print_kv("Limit", &quota.quota_limit.to_string());
                }
            }
        }
        StatsCommand::Workspace { workspace } => {
            let stats = engine.accounting.workspace_stats(*workspace).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Table => {
                    println!("Workspace {workspace}");
                    output::print_kv("Total size", &stats.quota.total_size.to_string());
                    output::print_kv("Files", &stats.quota.file_count.to_string());
                    output::print_kv("Limit", &stats.quota.quota_limit.to_string());
                    output::print_kv("Remaining", &stats.remaining_bytes.to_string());
                    output::print_kv("Usage", &format!("{:.1}%", stats.usage_ratio * 100.0));
                    if stats.over_limit {
                        output::print_warning("Workspace is over its storage limit.");
                    }
                }
            }
        }
        StatsCommand::File { file } => {
            let stats = engine.accounting.file_stats(*file).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Table => {
                    println!("File {file}");
                    output::print_kv("Downloads", &stats.downloads.to_string());
                    output::print_kv("Reactions", &stats.reactions.to_string());
                    output::print_kv("Comments", &stats.comments.to_string());
                    output::print_kv("Versions", &stats.versions.to_string());
                }
            }
        }
        StatsCommand::Dupes { file } => {
            let dupes = engine.accounting.find_duplicates(*file).await?;
            let rows: Vec<DuplicateRow> = dupes.iter().map(DuplicateRow::from).collect();
            output::print_list(&rows, format);
        }
    }
    Ok(())
}
