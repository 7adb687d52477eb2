use std::fs::{OpenOptions, create_dir_all};
use std::path::Path;

use serde::{Deserialize, Serialize};

use migcheck_core::Result;

use crate::model::ValidationReport;

const RULE_WIDTH: usize = 60;

/// Machine-readable summary of a report.
///
/// Per-table detail lines are only carried by the text rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub timestamp: String,
    pub summary: ExportSummary,
    pub results: Vec<ExportResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSummary {
    pub total_checks: usize,
    pub passed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
    pub check_name: String,
    pub passed: bool,
    pub message: String,
}

impl ExportDocument {
    pub fn from_report(report: &ValidationReport) -> Self {
        Self {
            timestamp: report.timestamp().to_rfc3339(),
            summary: ExportSummary {
                total_checks: report.total(),
                passed: report.passed(),
                failed: report.failed(),
            },
            results: report
                .results()
                .iter()
                .map(|result| ExportResult {
                    check_name: result.check_name.clone(),
                    passed: result.passed,
                    message: result.message.clone(),
                })
                .collect(),
        }
    }
}

/// Render a human-readable report.
pub fn render_report(report: &ValidationReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = Vec::new();

    lines.push(rule.clone());
    lines.push("MIGRATION VALIDATION REPORT".to_string());
    lines.push(rule.clone());
    lines.push(format!("Timestamp: {}", report.timestamp().to_rfc3339()));
    lines.push(rule.clone());

    for result in report.results() {
        let status = if result.passed {
            "✓ PASSED"
        } else {
            "✗ FAILED"
        };
        lines.push(String::new());
        lines.push(format!("{status}: {}", result.check_name));
        lines.push(format!("  Message: {}", result.message));
        for item in result.source_value.lines() {
            lines.push(format!("    {item}"));
        }
    }

    lines.push(String::new());
    lines.push(rule.clone());
    lines.push(format!(
        "SUMMARY: {}/{} checks passed",
        report.passed(),
        report.total()
    ));
    if report.all_passed() {
        lines.push("✓ MIGRATION VALIDATED SUCCESSFULLY".to_string());
    } else {
        lines.push("✗ MIGRATION VALIDATION FAILED".to_string());
    }
    lines.push(rule);

    lines.join("\n")
}

/// Write the structured summary of `report` as pretty JSON to `path`.
pub fn export_report(report: &ValidationReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, &ExportDocument::from_report(report))?;
    Ok(())
}
