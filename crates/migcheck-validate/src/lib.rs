//! Source/target comparison checks and validation reports.

pub mod engine;
pub mod model;
pub mod report;

pub use engine::Validator;
pub use model::{CheckKind, Detail, ValidateOptions, ValidationReport, ValidationResult};
pub use report::{ExportDocument, ExportResult, ExportSummary, export_report, render_report};
