//! Activity feed commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use filetrail_core::error::AppError;
use filetrail_core::types::{FileId, UserId};
use filetrail_entity::activity::ActivityEntry;
use filetrail_service::Engine;

use crate::output::{self, OutputFormat};

/// Arguments for activity commands
#[derive(Debug, Args)]
pub struct ActivityArgs {
    /// Activity subcommand
    #[command(subcommand)]
    pub command: ActivityCommand,
}

/// Activity subcommands
#[derive(Debug, Subcommand)]
pub enum ActivityCommand {
    /// Recent activity on a file
    File {
        /// File ID
        id: FileId,
        /// Maximum entries (default 50)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Recent activity by a user
    User {
        /// User ID
        id: UserId,
        /// Maximum entries (default 50)
        #[arg(short, long)]
        limit: Option<u32>,
    },
}

/// Activity display row
#[derive(Debug, Serialize, Tabled)]
pub struct ActivityRow {
    /// Timestamp
    #[tabled(rename = "Time")]
    pub created_at: String,
    /// File
    #[tabled(rename = "File")]
    pub file_id: String,
    /// Acting user
    #[tabled(rename = "User")]
    pub user_id: String,
    /// Action name
    #[tabled(rename = "Action")]
    pub action: String,
    /// Details
    #[tabled(rename = "Details")]
    pub details: String,
}

impl From<&ActivityEntry> for ActivityRow {
    fn from(e: &ActivityEntry) -> Self {
        Self {
            created_at: output::timestamp(e.created_at),
            file_id: e.file_id.to_string(),
            user_id: output::or_dash(e.user_id),
            action: e.action.clone(),
            details: e.details.clone(),
        }
    }
}

/// Execute activity commands
pub async fn execute(
    args: &ActivityArgs,
    format: OutputFormat,
    engine: &Engine,
) -> Result<(), AppError> {
    let entries = match &args.command {
        ActivityCommand::File { id, limit } => {
            engine.activity.list_file_activity(*id, *limit).await?
        }
        ActivityCommand::User { id, limit } => {
            engine.activity.list_user_activity(*id, *limit).await?
        }
    };

    let rows: Vec<ActivityRow> = entries.iter().map(ActivityRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}
