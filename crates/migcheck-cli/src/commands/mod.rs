pub mod inspect;
pub mod populate;
pub mod validate;

use std::time::Duration;

use clap::Args;
use migcheck_core::Error as CoreError;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};

use crate::CliError;
use crate::config::Endpoint;

pub use inspect::InspectArgs;
pub use populate::PopulateArgs;
pub use validate::ValidateArgs;

/// Session settings shared by every command that opens a connection.
#[derive(Args, Debug, Clone)]
pub struct ConnectArgs {
    /// TLS mode (disable, allow, prefer, require, verify-ca, verify-full).
    #[arg(long, default_value = "require")]
    ssl_mode: String,
    /// Seconds to wait for a connection.
    #[arg(long, default_value_t = 30)]
    connect_timeout: u64,
}

/// Open a single-connection pool to `endpoint`.
pub async fn connect(
    endpoint: &Endpoint,
    password: &str,
    args: &ConnectArgs,
) -> Result<PgPool, CliError> {
    let ssl_mode: PgSslMode = args
        .ssl_mode
        .parse()
        .map_err(|_| CliError::InvalidConfig(format!("unknown ssl mode '{}'", args.ssl_mode)))?;

    let options = PgConnectOptions::new()
        .host(&endpoint.host)
        .port(endpoint.port)
        .database(&endpoint.database)
        .username(&endpoint.username)
        .password(password)
        .ssl_mode(ssl_mode);

    tracing::info!(event = "connecting", endpoint = %endpoint, ssl_mode = %args.ssl_mode);

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(args.connect_timeout))
        .connect_with(options)
        .await
        .map_err(|err| CoreError::Connection(format!("{endpoint}: {err}")))?;

    tracing::info!(event = "connected", endpoint = %endpoint);
    Ok(pool)
}
