//! Permission grant commands.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use filetrail_core::error::AppError;
use filetrail_core::types::{FileId, PermissionId, UserId};
use filetrail_entity::permission::{Permission, PermissionLevel};
use filetrail_service::Engine;

use super::Cli;
use crate::output;

/// Arguments for permission commands
#[derive(Debug, Args)]
pub struct PermArgs {
    /// Permission subcommand
    #[command(subcommand)]
    pub command: PermCommand,
}

/// Permission subcommands
#[derive(Debug, Subcommand)]
pub enum PermCommand {
    /// Grant a user a permission on a file
    Grant {
        /// File ID
        #[arg(long)]
        file: FileId,
        /// Grantee
        #[arg(long)]
        user: UserId,
        /// Level: read, comment, write or manage
        #[arg(long)]
        level: PermissionLevel,
        /// Expiry instant (RFC 3339)
        #[arg(long)]
        expires_at: Option<DateTime<Utc>>,
    },
    /// Remove a grant
    Revoke {
        /// Permission ID
        id: PermissionId,
    },
    /// Show the levels a user currently holds on a file
    Effective {
        /// File ID
        #[arg(long)]
        file: FileId,
        /// User ID
        #[arg(long)]
        user: UserId,
    },
    /// List all grants on a file
    List {
        /// File ID
        #[arg(long)]
        file: FileId,
    },
}

/// Permission display row
#[derive(Debug, Serialize, Tabled)]
pub struct PermissionRow {
    /// Grant ID
    #[tabled(rename = "ID")]
    pub id: String,
    /// Grantee
    #[tabled(rename = "User")]
    pub user_id: String,
    /// Level
    #[tabled(rename = "Level")]
    pub level: String,
    /// Granted by
    #[tabled(rename = "Granted By")]
    pub granted_by: String,
    /// Expiry
    #[tabled(rename = "Expires")]
    pub expires_at: String,
}

impl From<&Permission> for PermissionRow {
    fn from(p: &Permission) -> Self {
        Self {
            id: p.id.to_string(),
            user_id: p.user_id.to_string(),
            level: p.permission.to_string(),
            granted_by: p.granted_by.to_string(),
            expires_at: output::or_dash(p.expires_at.map(output::timestamp)),
        }
    }
}

/// Execute permission commands
pub async fn execute(args: &PermArgs, cli: &Cli, engine: &Engine) -> Result<(), AppError> {
    match &args.command {
        PermCommand::Grant {
            file,
            user,
            level,
            expires_at,
        } => {
            let ctx = cli.context()?;
            let grant = engine
                .permissions
                .grant_permission(&ctx, *file, *user, *level, *expires_at)
                .await?;
            output::print_item(&PermissionRow::from(&grant), cli.format);
        }
        PermCommand::Revoke { id } => {
            let ctx = cli.context()?;
            engine.permissions.revoke_permission(&ctx, *id).await?;
            output::print_success(&format!("Permission {id} revoked."));
        }
        PermCommand::Effective { file, user } => {
            let levels = engine.permissions.effective_permissions(*file, *user).await?;
            match cli.format {
                output::OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&levels)?);
                }
                output::OutputFormat::Table => {
                    if levels.is_empty() {
                        output::print_warning("No effective permissions.");
                    } else {
                        let names: Vec<&str> = levels.iter().map(|l| l.as_str()).collect();
                        output::print_kv("Effective", &names.join(", "));
                    }
                }
            }
        }
        PermCommand::List { file } => {
            let grants = engine.permissions.list_permissions(*file).await?;
            let rows: Vec<PermissionRow> = grants.iter().map(PermissionRow::from).collect();
            output::print_list(&rows, cli.format);
        }
    }
    Ok(())
}
