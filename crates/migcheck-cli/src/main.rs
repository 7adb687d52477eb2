mod commands;
mod config;
mod infra;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use commands::{InspectArgs, PopulateArgs, ValidateArgs};
use migcheck_core::Error as CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config file error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "migcheck",
    version,
    about = "Validate a database migration between two PostgreSQL instances"
)]
struct Cli {
    /// Append JSON logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare the source and target databases.
    Validate(ValidateArgs),
    /// Load a SQL script into the source database.
    Populate(PopulateArgs),
    /// Dump the catalog of one database as JSON.
    Inspect(InspectArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_file.as_deref())?;

    match cli.command {
        Command::Validate(args) => commands::validate::run(args).await,
        Command::Populate(args) => commands::populate::run(args).await,
        Command::Inspect(args) => commands::inspect::run(args).await,
    }
}
