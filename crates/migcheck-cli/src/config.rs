use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::CliError;

pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_DATABASE: &str = "ecommerce";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_TERRAFORM_DIR: &str = "../terraform";

pub const SOURCE_PASSWORD_ENV: &str = "SOURCE_DB_PASSWORD";
pub const TARGET_PASSWORD_ENV: &str = "TARGET_DB_PASSWORD";
pub const POPULATE_PASSWORD_ENV: &str = "DB_PASSWORD";

/// Partially specified connection endpoint, as given by flags, the config
/// file or infrastructure outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub username: Option<String>,
}

impl EndpointConfig {
    /// Fill unset fields from `fallback`.
    fn or(&self, fallback: &EndpointConfig) -> EndpointConfig {
        EndpointConfig {
            host: self.host.clone().or_else(|| fallback.host.clone()),
            port: self.port.or(fallback.port),
            database: self.database.clone().or_else(|| fallback.database.clone()),
            username: self.username.clone().or_else(|| fallback.username.clone()),
        }
    }
}

/// Fully resolved endpoint without credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.database)
    }
}

/// `[validation]` table of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub sample_size: Option<u32>,
    pub strict_ordering: Option<bool>,
    pub schema: Option<String>,
}

/// Optional TOML config file for the `validate` command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub source: EndpointConfig,
    pub target: EndpointConfig,
    pub validation: ValidationConfig,
    pub terraform_dir: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<ConfigFile, CliError> {
    let content = std::fs::read_to_string(path)?;
    let config: ConfigFile = toml::from_str(&content)?;
    Ok(config)
}

/// Resolve an endpoint. Infrastructure outputs win over flags, flags over the
/// config file, and the config file over built-in defaults.
pub fn resolve_endpoint(
    side: &str,
    flags: &EndpointConfig,
    file: &EndpointConfig,
    infra: Option<&EndpointConfig>,
) -> Result<Endpoint, CliError> {
    let merged = flags.or(file);
    let merged = match infra {
        Some(infra) => infra.or(&merged),
        None => merged,
    };

    let host = merged
        .host
        .filter(|host| !host.is_empty())
        .ok_or_else(|| CliError::InvalidConfig(format!("{side} host is required")))?;

    Ok(Endpoint {
        host,
        port: merged.port.unwrap_or(DEFAULT_PORT),
        database: merged
            .database
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        username: merged
            .username
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
    })
}

/// Resolve one password: flag, then environment variable, then prompt.
pub fn resolve_password<E, P>(
    flag: Option<String>,
    env_name: &str,
    env: E,
    prompt: P,
    prompt_label: &str,
) -> io::Result<String>
where
    E: Fn(&str) -> Option<String>,
    P: FnOnce(&str) -> io::Result<String>,
{
    match non_empty(flag).or_else(|| non_empty(env(env_name))) {
        Some(password) => Ok(password),
        None => prompt(prompt_label),
    }
}

/// Resolve source and target passwords. The target reuses the source
/// password when neither its flag nor its environment variable is set.
pub fn resolve_passwords<E, P>(
    source_flag: Option<String>,
    target_flag: Option<String>,
    env: E,
    prompt: P,
) -> io::Result<(String, String)>
where
    E: Fn(&str) -> Option<String>,
    P: FnOnce(&str) -> io::Result<String>,
{
    let source = resolve_password(
        source_flag,
        SOURCE_PASSWORD_ENV,
        &env,
        prompt,
        "Enter source database password: ",
    )?;
    let target = non_empty(target_flag)
        .or_else(|| non_empty(env(TARGET_PASSWORD_ENV)))
        .unwrap_or_else(|| source.clone());
    Ok((source, target))
}

pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Read a password from stdin after printing `label` to stderr.
pub fn prompt_password(label: &str) -> io::Result<String> {
    let mut stderr = io::stderr();
    stderr.write_all(label.as_bytes())?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
