//! CLI command definitions and dispatch.

pub mod access;
pub mod activity;
pub mod engage;
pub mod file;
pub mod link;
pub mod migrate;
pub mod perm;
pub mod stats;
pub mod version;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use filetrail_core::config::AppConfig;
use filetrail_core::error::AppError;
use filetrail_core::traits::SystemClock;
use filetrail_core::types::UserId;
use filetrail_database::{DatabasePool, Stores};
use filetrail_service::{Engine, RequestContext};

use crate::output::OutputFormat;

/// FileTrail: version history, share links and access control for files
#[derive(Debug, Parser)]
#[command(name = "filetrail", version, about, long_about = None)]
pub struct Cli {
    /// Path to the base configuration file
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay (loads config/<ENV>.toml)
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Acting user ID, required by commands that change state
    #[arg(long = "as", global = true)]
    pub actor: Option<UserId>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// File version history
    Version(version::VersionArgs),
    /// Share links
    Link(link::LinkArgs),
    /// Permission grants
    Perm(perm::PermArgs),
    /// Access requests
    Access(access::AccessArgs),
    /// Quota, file stats and duplicates
    Stats(stats::StatsArgs),
    /// Trash and relocation
    File(file::FileArgs),
    /// Activity feeds
    Activity(activity::ActivityArgs),
    /// Comments, reactions and downloads
    Engage(engage::EngageArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        tracing::debug!(command = ?self.command, actor = ?self.actor, "Executing command");

        let pool = create_db_pool(config).await?;

        if let Commands::Migrate(args) = &self.command {
            return migrate::execute(args, self.format, &pool).await;
        }

        let engine = Engine::new(
            Stores::postgres(pool.into_pool()),
            &config.engine,
            &config.quota,
            Arc::new(SystemClock),
        );

        match &self.command {
            Commands::Migrate(_) => Ok(()),
            Commands::Version(args) => version::execute(args, self, &engine, config).await,
            Commands::Link(args) => link::execute(args, self, &engine).await,
            Commands::Perm(args) => perm::execute(args, self, &engine).await,
            Commands::Access(args) => access::execute(args, self, &engine).await,
            Commands::Stats(args) => stats::execute(args, self.format, &engine).await,
            Commands::File(args) => file::execute(args, self, &engine).await,
            Commands::Activity(args) => activity::execute(args, self.format, &engine).await,
            Commands::Engage(args) => engage::execute(args, self, &engine).await,
        }
    }

    /// Context for the acting user given with `--as`.
    pub fn context(&self) -> Result<RequestContext, AppError> {
        self.actor
            .map(RequestContext::new)
            .ok_or_else(|| AppError::validation("This command needs an acting user: pass --as <USER_ID>"))
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}
