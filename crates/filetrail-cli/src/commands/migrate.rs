//! Schema migration and connectivity commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use filetrail_core::error::AppError;
use filetrail_database::DatabasePool;
use filetrail_database::migration::{self, MigrationState};

use crate::output::{self, OutputFormat};

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Apply pending migrations
    Run,
    /// Show which embedded migrations are applied
    Status,
    /// Check that the database answers
    Check,
}

/// Migration display row
#[derive(Debug, Serialize, Tabled)]
struct MigrationRow {
    #[tabled(rename = "Version")]
    version: i64,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Applied")]
    applied: bool,
}

impl From<MigrationState> for MigrationRow {
    fn from(m: MigrationState) -> Self {
        Self {
            version: m.version,
            description: m.description,
            applied: m.applied,
        }
    }
}

/// Execute migration commands
pub async fn execute(
    args: &MigrateArgs,
    format: OutputFormat,
    pool: &DatabasePool,
) -> Result<(), AppError> {
    let result = match &args.command {
        MigrateCommand::Run => migration::run_migrations(pool.pool())
            .await
            .map(|()| output::print_success("All migrations applied.")),
        MigrateCommand::Status => migration::migration_status(pool.pool())
            .await
            .map(|states| {
                let rows: Vec<MigrationRow> = states.into_iter().map(MigrationRow::from).collect();
                output::print_list(&rows, format);
            }),
        MigrateCommand::Check => pool.health_check().await.map(|health| {
            output::print_success("Database is reachable.");
            output::print_kv("Server version", &health.server_version);
            output::print_kv("Connections", &health.size.to_string());
            output::print_kv("Idle", &health.idle.to_string());
        }),
    };

    pool.close().await;
    result
}
