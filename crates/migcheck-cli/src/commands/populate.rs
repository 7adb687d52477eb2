use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Args;
use migcheck_introspect::{Catalog, PostgresCatalog};
use sqlx::PgPool;
use uuid::Uuid;

use crate::CliError;
use crate::commands::{ConnectArgs, connect};
use crate::config::{
    DEFAULT_TERRAFORM_DIR, EndpointConfig, POPULATE_PASSWORD_ENV, env_var, prompt_password,
    resolve_endpoint, resolve_password,
};
use crate::infra::TerraformOutputs;

#[derive(Args, Debug)]
pub struct PopulateArgs {
    /// Database host.
    #[arg(long)]
    host: Option<String>,
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
    /// SQL script to execute.
    #[arg(long, default_value = "setup_source_data.sql")]
    sql_file: PathBuf,
    /// Directory holding the Terraform state.
    #[arg(long, default_value = DEFAULT_TERRAFORM_DIR)]
    terraform_dir: PathBuf,
    /// Read the source endpoint from Terraform outputs.
    #[arg(long, default_value_t = false)]
    use_terraform: bool,
    #[command(flatten)]
    connect: ConnectArgs,
}

pub async fn run(args: PopulateArgs) -> Result<ExitCode, CliError> {
    let run_id = Uuid::new_v4().to_string();
    tracing::info!(event = "run_started", run_id = %run_id, command = "populate");
    let timer = Instant::now();

    let flags = EndpointConfig {
        host: args.host.clone(),
        port: args.port,
        database: args.database.clone(),
        username: args.username.clone(),
    };

    let infra = if args.use_terraform || (args.host.is_none() && args.password.is_none()) {
        TerraformOutputs::load(&args.terraform_dir)?.endpoint("source")
    } else {
        None
    };
    let endpoint = resolve_endpoint("source", &flags, &EndpointConfig::default(), infra.as_ref())?;

    if !args.sql_file.exists() {
        return Err(CliError::InvalidConfig(format!(
            "SQL file not found: {}",
            args.sql_file.display()
        )));
    }
    let script = std::fs::read_to_string(&args.sql_file)?;

    let password = resolve_password(
        args.password.clone(),
        POPULATE_PASSWORD_ENV,
        env_var,
        prompt_password,
        "Enter database password: ",
    )?;

    let pool = connect(&endpoint, &password, &args.connect).await?;
    tracing::info!(event = "script_started", path = %args.sql_file.display());
    let counts = populate(pool, &script).await?;
    tracing::info!(event = "script_finished", path = %args.sql_file.display());

    println!("Row counts in {endpoint}:");
    for (table, count) in counts {
        println!("  {table}: {count} rows");
    }

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(event = "run_finished", run_id = %run_id, duration_ms = duration_ms);

    Ok(ExitCode::SUCCESS)
}

/// Execute `script`, then count the rows of every base table. The pool is
/// closed before any error is returned.
async fn populate(pool: PgPool, script: &str) -> Result<Vec<(String, i64)>, CliError> {
    let outcome = execute_and_count(&pool, script).await;
    pool.close().await;
    outcome
}

async fn execute_and_count(pool: &PgPool, script: &str) -> Result<Vec<(String, i64)>, CliError> {
    sqlx::raw_sql(script).execute(pool).await?;

    let catalog = PostgresCatalog::new(pool.clone(), "source");
    let mut counts = Vec::new();
    for table in catalog.list_tables().await? {
        let count = catalog.row_count(&table).await?;
        counts.push((table, count));
    }
    Ok(counts)
}
