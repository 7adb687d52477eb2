use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::sample::RowSample;

const NULL_MARKER: &str = "\\N";

/// SHA-256 digest of the canonical text of a row sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum([u8; 32]);

impl Checksum {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Digest the canonical text of `sample`.
    pub fn of_sample(sample: &RowSample) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(canonical_text(sample).as_bytes());
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First eight hex characters, for report lines.
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(8);
        hex
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Serialize a row sample deterministically.
///
/// The first line holds the column names, followed by one line per row in
/// fetch order. Values are tab separated using the COPY text conventions:
/// NULL is `\N` and backslash, tab, newline and carriage return are escaped.
pub fn canonical_text(sample: &RowSample) -> String {
    let mut out = String::new();
    let header: Vec<String> = sample.columns.iter().map(|name| escape(name)).collect();
    out.push_str(&header.join("\t"));
    out.push('\n');

    for row in &sample.rows {
        let values: Vec<String> = row
            .iter()
            .map(|value| match value {
                Some(value) => escape(value),
                None => NULL_MARKER.to_string(),
            })
            .collect();
        out.push_str(&values.join("\t"));
        out.push('\n');
    }

    out
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}
