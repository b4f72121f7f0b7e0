//! Share link commands.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use filetrail_core::error::AppError;
use filetrail_core::types::{FileId, ShareLinkId};
use filetrail_entity::share::ShareLink;
use filetrail_service::share::CreateLinkRequest;
use filetrail_service::Engine;

use super::Cli;
use crate::output;

/// Arguments for link commands
#[derive(Debug, Args)]
pub struct LinkArgs {
    /// Link subcommand
    #[command(subcommand)]
    pub command: LinkCommand,
}

/// Link subcommands
#[derive(Debug, Subcommand)]
pub enum LinkCommand {
    /// Create a share link for a file
    Create {
        /// File ID
        #[arg(long)]
        file: FileId,
        /// Maximum number of accesses (0 = unlimited)
        #[arg(long, default_value_t = 0)]
        max_views: i32,
        /// Expiry instant (RFC 3339)
        #[arg(long)]
        expires_at: Option<DateTime<Utc>>,
        /// Password required to open the link
        #[arg(long)]
        password: Option<String>,
    },
    /// Open a link by token, spending one view
    Open {
        /// Link token
        token: String,
        /// Link password
        #[arg(long)]
        password: Option<String>,
    },
    /// Deactivate a link
    Revoke {
        /// Link ID
        id: ShareLinkId,
    },
    /// List links of a file
    List {
        /// File ID
        #[arg(long)]
        file: FileId,
    },
}

/// Share link display row
#[derive(Debug, Serialize, Tabled)]
pub struct LinkRow {
    /// Link ID
    #[tabled(rename = "ID")]
    pub id: String,
    /// Bearer token
    #[tabled(rename = "Token")]
    pub token: String,
    /// Views used / allowed
    #[tabled(rename = "Views")]
    pub views: String,
    /// Expiry
    #[tabled(rename = "Expires")]
    pub expires_at: String,
    /// Password protected
    #[tabled(rename = "Password")]
    pub password: bool,
    /// Current state
    #[tabled(rename = "State")]
    pub state: String,
}

impl LinkRow {
    fn new(link: &ShareLink, now: DateTime<Utc>) -> Self {
        let limit = if link.max_views == 0 {
            "∞".to_string()
        } else {
            link.max_views.to_string()
        };
        Self {
            id: link.id.to_string(),
            token: link.token.clone(),
            views: format!("{}/{limit}", link.views),
            expires_at: output::or_dash(link.expires_at.map(output::timestamp)),
            password: link.requires_password(),
            state: link.state_at(now).to_string(),
        }
    }
}

/// Execute link commands
pub async fn execute(args: &LinkArgs, cli: &Cli, engine: &Engine) -> Result<(), AppError> {
    match &args.command {
        LinkCommand::Create {
            file,
            max_views,
            expires_at,
            password,
        } => {
            let ctx = cli.context()?;
            let req = CreateLinkRequest {
                max_views: *max_views,
                expires_at: *expires_at,
                password: password.clone(),
            };
            let link = engine.links.create_link(&ctx, *file, req).await?;
            output::print_item(&LinkRow::new(&link, Utc::now()), cli.format);
        }
        LinkCommand::Open { token, password } => {
            let access = engine
                .links
                .resolve_and_consume(token, password.as_deref())
                .await?;
            output::print_success(&format!("Link opened '{}'.", access.file.name));
            output::print_kv("Storage key", &access.file.storage_key);
            output::print_kv("Views", &access.link.views.to_string());
            output::print_kv(
                "Remaining",
                &output::or_dash(access.link.remaining_views()),
            );
        }
        LinkCommand::Revoke { id } => {
            let ctx = cli.context()?;
            engine.links.revoke_link(&ctx, *id).await?;
            output::print_success(&format!("Link {id} revoked."));
        }
        LinkCommand::List { file } => {
            let now = Utc::now();
            let links = engine.links.list_links(*file).await?;
            let rows: Vec<LinkRow> = links.iter().map(|l| LinkRow::new(l, now)).collect();
            output::print_list(&rows, cli.format);
        }
    }
    Ok(())
}
