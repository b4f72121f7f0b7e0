//! Access request commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use filetrail_core::error::AppError;
use filetrail_core::types::{AccessRequestId, FileId};
use filetrail_entity::access::{AccessRequest, ReviewDecision};
use filetrail_service::Engine;

use super::Cli;
use crate::output;

/// Arguments for access request commands
#[derive(Debug, Args)]
pub struct AccessArgs {
    /// Access subcommand
    #[command(subcommand)]
    pub command: AccessCommand,
}

/// Access request subcommands
#[derive(Debug, Subcommand)]
pub enum AccessCommand {
    /// Ask for access to a file
    Request {
        /// File ID
        #[arg(long)]
        file: FileId,
        /// Why access is needed
        #[arg(long)]
        reason: String,
    },
    /// Approve or deny a pending request
    Review {
        /// Request ID
        id: AccessRequestId,
        /// Decision: approved or denied
        #[arg(long)]
        decision: ReviewDecision,
    },
    /// List pending requests, oldest first
    Pending,
    /// List all requests for a file
    List {
        /// File ID
        #[arg(long)]
        file: FileId,
    },
}

/// Access request display row
#[derive(Debug, Serialize, Tabled)]
pub struct AccessRequestRow {
    /// Request ID
    #[tabled(rename = "ID")]
    pub id: String,
    /// File ID
    #[tabled(rename = "File")]
    pub file_id: String,
    /// Requester
    #[tabled(rename = "Requester")]
    pub requester_id: String,
    /// Reason
    #[tabled(rename = "Reason")]
    pub reason: String,
    /// Status
    #[tabled(rename = "Status")]
    pub status: String,
    /// Reviewer
    #[tabled(rename = "Reviewed By")]
    pub reviewed_by: String,
    /// Creation time
    #[tabled(rename = "Created")]
    pub created_at: String,
}

impl From<&AccessRequest> for AccessRequestRow {
    fn from(r: &AccessRequest) -> Self {
        Self {
            id: r.id.to_string(),
            file_id: r.file_id.to_string(),
            requester_id: r.requester_id.to_string(),
            reason: r.reason.clone(),
            status: r.status.to_string(),
            reviewed_by: output::or_dash(r.reviewed_by),
            created_at: output::timestamp(r.created_at),
        }
    }
}

/// Execute access request commands
pub async fn execute(args: &AccessArgs, cli: &Cli, engine: &Engine) -> Result<(), AppError> {
    match &args.command {
        AccessCommand::Request { file, reason } => {
            let ctx = cli.context()?;
            let request = engine.access.request_access(&ctx, *file, reason).await?;
            output::print_item(&AccessRequestRow::from(&request), cli.format);
        }
        AccessCommand::Review { id, decision } => {
            let ctx = cli.context()?;
            let request = engine.access.review_request(&ctx, *id, *decision).await?;
            output::print_item(&AccessRequestRow::from(&request), cli.format);
        }
        AccessCommand::Pending => {
            let requests = engine.access.list_pending().await?;
            let rows: Vec<AccessRequestRow> = requests.iter().map(AccessRequestRow::from).collect();
            output::print_list(&rows, cli.format);
        }
        AccessCommand::List { file } => {
            let requests = engine.access.list_for_file(*file).await?;
            let rows: Vec<AccessRequestRow> = requests.iter().map(AccessRequestRow::from).collect();
            output::print_list(&rows, cli.format);
        }
    }
    Ok(())
}
