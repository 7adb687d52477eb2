use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use migcheck_core::DEFAULT_SAMPLE_SIZE;
use migcheck_introspect::SampleOptions;

/// Options for a validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateOptions {
    /// Rows sampled per table on both sides for data integrity.
    pub sample_size: u32,
    /// Totally order unkeyed and composite-key tables before sampling.
    pub strict_ordering: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            strict_ordering: false,
        }
    }
}

impl ValidateOptions {
    pub fn sample_options(&self) -> SampleOptions {
        SampleOptions {
            sample_size: self.sample_size,
            strict_ordering: self.strict_ordering,
        }
    }
}

/// The checks run by a validation, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    TableExistence,
    RowCounts,
    SchemaStructure,
    Constraints,
    DataIntegrity,
}

impl CheckKind {
    pub const ALL: [CheckKind; 5] = [
        CheckKind::TableExistence,
        CheckKind::RowCounts,
        CheckKind::SchemaStructure,
        CheckKind::Constraints,
        CheckKind::DataIntegrity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CheckKind::TableExistence => "Table Existence",
            CheckKind::RowCounts => "Row Counts",
            CheckKind::SchemaStructure => "Schema Structure",
            CheckKind::Constraints => "Constraints",
            CheckKind::DataIntegrity => "Data Integrity",
        }
    }
}

/// Free-form detail attached to a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Detail {
    #[default]
    None,
    Lines(Vec<String>),
}

impl Detail {
    pub fn lines(&self) -> &[String] {
        match self {
            Detail::None => &[],
            Detail::Lines(lines) => lines,
        }
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub check_name: String,
    pub passed: bool,
    pub source_value: Detail,
    pub target_value: Detail,
    pub message: String,
}

impl ValidationResult {
    /// Result carrying per-table lines in `source_value`.
    pub fn with_lines(
        kind: CheckKind,
        passed: bool,
        lines: Vec<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            check_name: kind.name().to_string(),
            passed,
            source_value: Detail::Lines(lines),
            target_value: Detail::None,
            message: message.into(),
        }
    }

    /// Failed result for a check that could not run at all.
    pub fn errored(kind: CheckKind, error: impl std::fmt::Display) -> Self {
        Self {
            check_name: kind.name().to_string(),
            passed: false,
            source_value: Detail::None,
            target_value: Detail::None,
            message: format!("Error: {error}"),
        }
    }
}

/// Results of one run plus the time the report was assembled.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    timestamp: DateTime<Utc>,
    results: Vec<ValidationResult>,
}

impl ValidationReport {
    pub fn new(results: Vec<ValidationResult>) -> Self {
        Self::with_timestamp(results, Utc::now())
    }

    pub fn with_timestamp(results: Vec<ValidationResult>, timestamp: DateTime<Utc>) -> Self {
        Self { timestamp, results }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|result| result.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|result| result.passed)
    }
}
