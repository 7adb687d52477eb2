use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Args;
use migcheck_core::DEFAULT_SAMPLE_SIZE;
use migcheck_introspect::{DEFAULT_SCHEMA, PostgresCatalog};
use migcheck_validate::{ValidateOptions, Validator, export_report, render_report};
use uuid::Uuid;

use crate::CliError;
use crate::commands::{ConnectArgs, connect};
use crate::config::{
    ConfigFile, DEFAULT_TERRAFORM_DIR, EndpointConfig, env_var, load_config, prompt_password,
    resolve_endpoint, resolve_passwords,
};
use crate::infra::TerraformOutputs;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Source database host.
    #[arg(long)]
    source_host: Option<String>,
    /// Source database port [default: 5432].
    #[arg(long)]
    source_port: Option<u16>,
    /// Source database name [default: ecommerce].
    #[arg(long)]
    source_database: Option<String>,
    /// Source database user [default: admin].
    #[arg(long)]
    source_username: Option<String>,
    /// Source password (falls back to SOURCE_DB_PASSWORD, then a prompt).
    #[arg(long)]
    source_password: Option<String>,
    /// Target database host.
    #[arg(long)]
    target_host: Option<String>,
    /// Target database port [default: 5432].
    #[arg(long)]
    target_port: Option<u16>,
    /// Target database name [default: ecommerce].
    #[arg(long)]
    target_database: Option<String>,
    /// Target database user [default: admin].
    #[arg(long)]
    target_username: Option<String>,
    /// Target password (falls back to TARGET_DB_PASSWORD, then the source password).
    #[arg(long)]
    target_password: Option<String>,
    /// Directory holding the Terraform state [default: ../terraform].
    #[arg(long)]
    terraform_dir: Option<PathBuf>,
    /// Read endpoints from Terraform outputs even when hosts are given.
    #[arg(long, default_value_t = false)]
    use_terraform: bool,
    /// Write a JSON summary of the report to this path.
    #[arg(long)]
    output_file: Option<PathBuf>,
    /// Rows sampled per table for the data integrity check [default: 1000].
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    sample_size: Option<u32>,
    /// Order every sample deterministically, even without a single-column primary key.
    #[arg(long, default_value_t = false)]
    strict_ordering: bool,
    /// Schema to compare [default: public].
    #[arg(long)]
    schema: Option<String>,
    /// TOML file with endpoint and validation settings.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(flatten)]
    connect: ConnectArgs,
}

pub async fn run(args: ValidateArgs) -> Result<ExitCode, CliError> {
    let run_id = Uuid::new_v4().to_string();
    tracing::info!(event = "run_started", run_id = %run_id, command = "validate");
    let timer = Instant::now();

    let file = match &args.config {
        Some(path) => {
            let config = load_config(path)?;
            tracing::info!(event = "config_loaded", path = %path.display());
            config
        }
        None => ConfigFile::default(),
    };

    let source_flags = EndpointConfig {
        host: args.source_host.clone(),
        port: args.source_port,
        database: args.source_database.clone(),
        username: args.source_username.clone(),
    };
    let target_flags = EndpointConfig {
        host: args.target_host.clone(),
        port: args.target_port,
        database: args.target_database.clone(),
        username: args.target_username.clone(),
    };

    let hosts_given = [&source_flags, &target_flags, &file.source, &file.target]
        .iter()
        .any(|endpoint| endpoint.host.is_some());
    let infra = if args.use_terraform || !hosts_given {
        let dir = args
            .terraform_dir
            .clone()
            .or_else(|| file.terraform_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TERRAFORM_DIR));
        match TerraformOutputs::load(&dir) {
            Ok(outputs) => Some(outputs),
            Err(err) => {
                tracing::warn!(event = "infra_lookup_failed", error = %err);
                None
            }
        }
    } else {
        None
    };
    let source_infra = infra.as_ref().and_then(|outputs| outputs.endpoint("source"));
    let target_infra = infra.as_ref().and_then(|outputs| outputs.endpoint("target"));

    let source = resolve_endpoint("source", &source_flags, &file.source, source_infra.as_ref())?;
    let target = resolve_endpoint("target", &target_flags, &file.target, target_infra.as_ref())?;

    let sample_size = args
        .sample_size
        .or(file.validation.sample_size)
        .unwrap_or(DEFAULT_SAMPLE_SIZE);
    if sample_size == 0 {
        return Err(CliError::InvalidConfig(
            "sample_size must be at least 1".to_string(),
        ));
    }
    let options = ValidateOptions {
        sample_size,
        strict_ordering: args.strict_ordering
            || file.validation.strict_ordering.unwrap_or(false),
    };
    let schema = args
        .schema
        .clone()
        .or_else(|| file.validation.schema.clone())
        .unwrap_or_else(|| DEFAULT_SCHEMA.to_string());

    let (source_password, target_password) = resolve_passwords(
        args.source_password.clone(),
        args.target_password.clone(),
        env_var,
        prompt_password,
    )?;

    let source_pool = connect(&source, &source_password, &args.connect).await?;
    let target_pool = match connect(&target, &target_password, &args.connect).await {
        Ok(pool) => pool,
        Err(err) => {
            source_pool.close().await;
            return Err(err);
        }
    };

    let source_catalog = PostgresCatalog::new(source_pool.clone(), "source").with_schema(&schema);
    let target_catalog = PostgresCatalog::new(target_pool.clone(), "target").with_schema(&schema);

    tracing::info!(
        event = "validation_started",
        source = %source,
        target = %target,
        schema = %schema,
        sample_size = options.sample_size,
        strict_ordering = options.strict_ordering
    );

    let report = Validator::new(&source_catalog, &target_catalog, options)
        .validate()
        .await;

    source_pool.close().await;
    target_pool.close().await;

    println!("{}", render_report(&report));

    if let Some(path) = &args.output_file {
        export_report(&report, path)?;
        tracing::info!(event = "report_exported", path = %path.display());
        println!("\nResults exported to: {}", path.display());
    }

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(
        event = "run_finished",
        run_id = %run_id,
        passed = report.passed(),
        total = report.total(),
        duration_ms = duration_ms
    );

    if report.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
