use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use serde_json::Value;

use migcheck_core::{Error, Result};

use crate::config::EndpointConfig;

/// Named outputs read from Terraform state.
#[derive(Debug, Clone, Default)]
pub struct TerraformOutputs {
    values: BTreeMap<String, Value>,
}

impl TerraformOutputs {
    /// Run `terraform output -json` in `dir` and parse its result.
    pub fn load(dir: &Path) -> Result<Self> {
        tracing::info!(event = "infra_lookup_started", dir = %dir.display());

        let output = Command::new("terraform")
            .args(["output", "-json"])
            .current_dir(dir)
            .output()
            .map_err(|err| Error::InfraLookup(format!("running terraform: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::InfraLookup(format!(
                "terraform output exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Self::parse(&String::from_utf8_lossy(&output.stdout))
    }

    /// Parse `terraform output -json`, keeping each output's `value`.
    pub fn parse(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, Value> = serde_json::from_str(json)
            .map_err(|err| Error::InfraLookup(format!("parsing terraform outputs: {err}")))?;

        let values = raw
            .into_iter()
            .map(|(name, output)| {
                let value = output.get("value").cloned().unwrap_or(Value::Null);
                (name, value)
            })
            .collect();

        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Endpoint under `connection_info.<side>`, if present.
    pub fn endpoint(&self, side: &str) -> Option<EndpointConfig> {
        let info = self.get("connection_info")?.get(side)?;
        Some(EndpointConfig {
            host: string_field(info, "host"),
            port: port_field(info),
            database: string_field(info, "database"),
            username: string_field(info, "username"),
        })
    }
}

fn string_field(info: &Value, key: &str) -> Option<String> {
    info.get(key).and_then(Value::as_str).map(str::to_string)
}

fn port_field(info: &Value) -> Option<u16> {
    match info.get("port")? {
        Value::Number(number) => number.as_u64().and_then(|port| u16::try_from(port).ok()),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}
