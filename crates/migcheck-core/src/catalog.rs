use std::fmt;

use serde::{Deserialize, Serialize};

/// Column definition as reported by the catalog.
///
/// Only `name` and `data_type` take part in schema comparison. The remaining
/// fields are carried for reporting and snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub max_length: Option<i32>,
    pub nullable: bool,
    pub default: Option<String>,
}

impl ColumnSchema {
    /// Build a nullable column without length or default.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            max_length: None,
            nullable: true,
            default: None,
        }
    }
}

/// Kind of a table constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    PrimaryKey,
    ForeignKey,
    Unique,
    Check,
    Other(String),
}

impl ConstraintKind {
    /// Parse the textual constraint type used by `information_schema`.
    pub fn from_catalog(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "PRIMARY KEY" => ConstraintKind::PrimaryKey,
            "FOREIGN KEY" => ConstraintKind::ForeignKey,
            "UNIQUE" => ConstraintKind::Unique,
            "CHECK" => ConstraintKind::Check,
            _ => ConstraintKind::Other(value.to_string()),
        }
    }

    pub fn as_catalog_str(&self) -> &str {
        match self {
            ConstraintKind::PrimaryKey => "PRIMARY KEY",
            ConstraintKind::ForeignKey => "FOREIGN KEY",
            ConstraintKind::Unique => "UNIQUE",
            ConstraintKind::Check => "CHECK",
            ConstraintKind::Other(value) => value,
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_catalog_str())
    }
}

/// One constraint/column pair. Multi-column constraints yield one row per
/// column, in key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub name: String,
    pub kind: ConstraintKind,
    pub column: String,
}

impl Constraint {
    pub fn new(name: impl Into<String>, kind: ConstraintKind, column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            column: column.into(),
        }
    }

    pub fn is_primary_key(&self) -> bool {
        self.kind == ConstraintKind::PrimaryKey
    }
}

/// Return the primary key columns of a constraint listing, in key order.
pub fn primary_key_columns(constraints: &[Constraint]) -> Vec<String> {
    constraints
        .iter()
        .filter(|constraint| constraint.is_primary_key())
        .map(|constraint| constraint.column.clone())
        .collect()
}

/// Index definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    pub name: String,
    pub definition: String,
}
