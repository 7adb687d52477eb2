use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use migcheck_introspect::{DEFAULT_SCHEMA, PostgresCatalog, snapshot};

use crate::CliError;
use crate::commands::{ConnectArgs, connect};
use crate::config::{
    EndpointConfig, POPULATE_PASSWORD_ENV, env_var, prompt_password, resolve_endpoint,
    resolve_password,
};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Database host.
    #[arg(long)]
    host: String,
    /// Database port [default: 5432].
    #[arg(long)]
    port: Option<u16>,
    /// Database name [default: ecommerce].
    #[arg(long)]
    database: Option<String>,
    /// Database user [default: admin].
    #[arg(long)]
    username: Option<String>,
    /// Password (falls back to DB_PASSWORD, then a prompt).
    #[arg(long)]
    password: Option<String>,
    /// Schema to inspect.
    #[arg(long, default_value = DEFAULT_SCHEMA)]
    schema: String,
    /// Write the snapshot here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    #[command(flatten)]
    connect: ConnectArgs,
}

pub async fn run(args: InspectArgs) -> Result<ExitCode, CliError> {
    let flags = EndpointConfig {
        host: Some(args.host.clone()),
        port: args.port,
        database: args.database.clone(),
        username: args.username.clone(),
    };
    let endpoint = resolve_endpoint("inspected", &flags, &EndpointConfig::default(), None)?;
    let password = resolve_password(
        args.password.clone(),
        POPULATE_PASSWORD_ENV,
        env_var,
        prompt_password,
        "Enter database password: ",
    )?;

    let pool = connect(&endpoint, &password, &args.connect).await?;
    let catalog =
        PostgresCatalog::new(pool.clone(), endpoint.to_string()).with_schema(&args.schema);
    let result = snapshot(&catalog).await;
    pool.close().await;
    let snapshot = result?;

    tracing::info!(
        event = "snapshot_taken",
        endpoint = %endpoint,
        tables = snapshot.tables.len()
    );

    match &args.out {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(path)?;
            serde_json::to_writer_pretty(file, &snapshot)?;
            tracing::info!(event = "snapshot_written", path = %path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &snapshot)?;
            writeln!(stdout)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
