//! Comment, reaction and download commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use filetrail_core::error::AppError;
use filetrail_core::types::{CommentId, FileId};
use filetrail_entity::engagement::{Comment, ReactionCount};
use filetrail_service::Engine;

use super::Cli;
use crate::output;

/// Arguments for engagement commands
#[derive(Debug, Args)]
pub struct EngageArgs {
    /// Engagement subcommand
    #[command(subcommand)]
    pub command: EngageCommand,
}

/// Engagement subcommands
#[derive(Debug, Subcommand)]
pub enum EngageCommand {
    /// Comment on a file
    Comment {
        /// File ID
        #[arg(long)]
        file: FileId,
        /// Comment text
        text: String,
        /// Comment being replied to
        #[arg(long)]
        reply_to: Option<CommentId>,
    },
    /// List comments on a file
    Comments {
        /// File ID
        #[arg(long)]
        file: FileId,
    },
    /// Delete a comment and its replies
    Uncomment {
        /// Comment ID
        id: CommentId,
    },
    /// React to a file
    React {
        /// File ID
        #[arg(long)]
        file: FileId,
        /// Emoji
        emoji: String,
    },
    /// Remove a reaction
    Unreact {
        /// File ID
        #[arg(long)]
        file: FileId,
        /// Emoji
        emoji: String,
    },
    /// Reaction counts for a file
    Reactions {
        /// File ID
        #[arg(long)]
        file: FileId,
    },
    /// Record a download of a file
    Download {
        /// File ID
        #[arg(long)]
        file: FileId,
    },
}

/// Comment display row
#[derive(Debug, Serialize, Tabled)]
pub struct CommentRow {
    /// Comment ID
    #[tabled(rename = "ID")]
    pub id: String,
    /// Author
    #[tabled(rename = "User")]
    pub user_id: String,
    /// Parent comment
    #[tabled(rename = "Reply To")]
    pub parent_id: String,
    /// Text
    #[tabled(rename = "Comment")]
    pub content: String,
    /// Creation time
    #[tabled(rename = "Created")]
    pub created_at: String,
}

impl From<&Comment> for CommentRow {
    fn from(c: &Comment) -> Self {
        Self {
            id: c.id.to_string(),
            user_id: c.user_id.to_string(),
            parent_id: output::or_dash(c.parent_id),
            content: c.content.clone(),
            created_at: output::timestamp(c.created_at),
        }
    }
}

/// Reaction count display row
#[derive(Debug, Serialize, Tabled)]
pub struct ReactionRow {
    /// Emoji
    #[tabled(rename = "Emoji")]
    pub emoji: String,
    /// Count
    #[tabled(rename = "Count")]
    pub count: i64,
}

impl From<&ReactionCount> for ReactionRow {
    fn from(r: &ReactionCount) -> Self {
        Self {
            emoji: r.emoji.clone(),
            count: r.count,
        }
    }
}

/// Execute engagement commands
pub async fn execute(args: &EngageArgs, cli: &Cli, engine: &Engine) -> Result<(), AppError> {
    match &args.command {
        EngageCommand::Comment {
            file,
            text,
            reply_to,
        } => {
            let ctx = cli.context()?;
            let comment = engine
                .engagement
                .add_comment(&ctx, *file, text, *reply_to)
                .await?;
            output::print_item(&CommentRow::from(&comment), cli.format);
        }
        EngageCommand::Comments { file } => {
            let comments = engine.engagement.list_comments(*file).await?;
            let rows: Vec<CommentRow> = comments.iter().map(CommentRow::from).collect();
            output::print_list(&rows, cli.format);
        }
        EngageCommand::Uncomment { id } => {
            let ctx = cli.context()?;
            engine.engagement.delete_comment(&ctx, *id).await?;
            output::print_success(&format!("Comment {id} deleted."));
        }
        EngageCommand::React { file, emoji } => {
            let ctx = cli.context()?;
            engine.engagement.add_reaction(&ctx, *file, emoji).await?;
            output::print_success(&format!("Reacted {emoji}."));
        }
        EngageCommand::Unreact { file, emoji } => {
            let ctx = cli.context()?;
            if engine.engagement.remove_reaction(&ctx, *file, emoji).await? {
                output::print_success(&format!("Removed {emoji}."));
            } else {
                output::print_warning("No such reaction.");
            }
        }
        EngageCommand::Reactions { file } => {
            let counts = engine.engagement.reaction_summary(*file).await?;
            let rows: Vec<ReactionRow> = counts.iter().map(ReactionRow::from).collect();
            output::print_list(&rows, cli.format);
        }
        EngageCommand::Download { file } => {
            let ctx = cli.context()?;
            let record = engine.engagement.record_download(&ctx, *file).await?;
            output::print_success(&format!(
                "Download recorded at {}.",
                output::timestamp(record.downloaded_at)
            ));
        }
    }
    Ok(())
}
