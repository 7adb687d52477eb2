use std::collections::{BTreeMap, BTreeSet};

use migcheck_core::{Checksum, ColumnSchema, Error, Result};
use migcheck_introspect::{Catalog, SampleOptions, checksum_with_order, plan};

use crate::model::{CheckKind, Detail, ValidateOptions, ValidationReport, ValidationResult};

/// Compares a source catalog against a target catalog.
///
/// Per-table checks are always driven by the source's table list. A failure
/// on one table turns that table's line into an error line and fails the
/// enclosing check; the remaining tables still run.
pub struct Validator<'a> {
    source: &'a dyn Catalog,
    target: &'a dyn Catalog,
    options: ValidateOptions,
}

impl<'a> Validator<'a> {
    pub fn new(source: &'a dyn Catalog, target: &'a dyn Catalog, options: ValidateOptions) -> Self {
        Self {
            source,
            target,
            options,
        }
    }

    pub fn options(&self) -> &ValidateOptions {
        &self.options
    }

    /// Run every check and stamp the results into a report.
    pub async fn validate(&self) -> ValidationReport {
        ValidationReport::new(self.run_all().await)
    }

    /// Run every check in report order. Always yields one result per check.
    pub async fn run_all(&self) -> Vec<ValidationResult> {
        let mut results = Vec::with_capacity(CheckKind::ALL.len());
        for kind in CheckKind::ALL {
            results.push(self.run_check(kind).await);
        }
        results
    }

    /// Run a single check, converting a top-level failure into a failed result.
    pub async fn run_check(&self, kind: CheckKind) -> ValidationResult {
        tracing::info!(event = "check_started", check = kind.name());

        let outcome = match kind {
            CheckKind::TableExistence => self.table_existence().await,
            CheckKind::RowCounts => self.row_counts().await,
            CheckKind::SchemaStructure => self.schema_structure().await,
            CheckKind::Constraints => self.constraints().await,
            CheckKind::DataIntegrity => self.data_integrity().await,
        };

        match outcome {
            Ok(result) => {
                tracing::info!(
                    event = "check_finished",
                    check = kind.name(),
                    passed = result.passed
                );
                result
            }
            Err(err) => {
                tracing::error!(event = "check_errored", check = kind.name(), error = %err);
                ValidationResult::errored(kind, err)
            }
        }
    }

    pub async fn table_existence(&self) -> Result<ValidationResult> {
        let source_tables: BTreeSet<String> =
            self.source.list_tables().await?.into_iter().collect();
        let target_tables: BTreeSet<String> =
            self.target.list_tables().await?.into_iter().collect();

        let missing: Vec<&str> = source_tables
            .difference(&target_tables)
            .map(String::as_str)
            .collect();
        let extra: Vec<&str> = target_tables
            .difference(&source_tables)
            .map(String::as_str)
            .collect();

        let passed = missing.is_empty();
        let message = if !missing.is_empty() {
            format!("Missing tables in target: {}", missing.join(", "))
        } else if !extra.is_empty() {
            format!("Extra tables in target (OK): {}", extra.join(", "))
        } else {
            format!(
                "All {} tables present in both databases",
                source_tables.len()
            )
        };

        Ok(ValidationResult {
            check_name: CheckKind::TableExistence.name().to_string(),
            passed,
            source_value: Detail::Lines(source_tables.into_iter().collect()),
            target_value: Detail::Lines(target_tables.into_iter().collect()),
            message,
        })
    }

    pub async fn row_counts(&self) -> Result<ValidationResult> {
        let kind = CheckKind::RowCounts;
        let tables = self.source.list_tables().await?;
        let mut all_match = true;
        let mut lines = Vec::with_capacity(tables.len());

        for table in &tables {
            let source_count = match self.source.row_count(table).await {
                Ok(count) => count,
                Err(err) => {
                    all_match = false;
                    lines.push(self.table_error(kind, table, &err));
                    continue;
                }
            };

            let target_count = self.target.row_count(table).await.unwrap_or_else(|err| {
                tracing::warn!(
                    event = "target_count_defaulted",
                    table = %table,
                    error = %err
                );
                0
            });

            let matched = source_count == target_count;
            all_match &= matched;
            lines.push(format!(
                "{} {table}: {source_count} vs {target_count}",
                mark(matched)
            ));
        }

        let message = if all_match {
            "All row counts match"
        } else {
            "Row count mismatch detected"
        };
        Ok(ValidationResult::with_lines(kind, all_match, lines, message))
    }

    pub async fn schema_structure(&self) -> Result<ValidationResult> {
        let kind = CheckKind::SchemaStructure;
        let tables = self.source.list_tables().await?;
        let mut all_match = true;
        let mut lines = Vec::with_capacity(tables.len());

        for table in &tables {
            let source_schema = match self.source.get_schema(table).await {
                Ok(columns) => columns,
                Err(err) => {
                    all_match = false;
                    lines.push(self.table_error(kind, table, &err));
                    continue;
                }
            };
            let target_schema =
                self.target_or_empty(kind, table, self.target.get_schema(table).await);

            let source_cols = column_types(&source_schema);
            let target_cols = column_types(&target_schema);

            if source_cols == target_cols {
                lines.push(format!(
                    "{} {table}: Schema matches ({} columns)",
                    mark(true),
                    source_cols.len()
                ));
                continue;
            }

            all_match = false;
            lines.push(schema_mismatch_line(table, &source_cols, &target_cols));
        }

        let message = if all_match {
            "All schemas match"
        } else {
            "Schema differences detected"
        };
        Ok(ValidationResult::with_lines(kind, all_match, lines, message))
    }

    /// Compares primary key row counts only; other constraint kinds are not
    /// compared.
    pub async fn constraints(&self) -> Result<ValidationResult> {
        let kind = CheckKind::Constraints;
        let tables = self.source.list_tables().await?;
        let mut all_match = true;
        let mut lines = Vec::with_capacity(tables.len());

        for table in &tables {
            let source_constraints = match self.source.get_constraints(table).await {
                Ok(constraints) => constraints,
                Err(err) => {
                    all_match = false;
                    lines.push(self.table_error(kind, table, &err));
                    continue;
                }
            };
            let target_constraints =
                self.target_or_empty(kind, table, self.target.get_constraints(table).await);

            let source_pk = source_constraints
                .iter()
                .filter(|constraint| constraint.is_primary_key())
                .count();
            let target_pk = target_constraints
                .iter()
                .filter(|constraint| constraint.is_primary_key())
                .count();

            if source_pk == target_pk {
                lines.push(format!("{} {table}: Constraints present", mark(true)));
            } else {
                all_match = false;
                lines.push(format!("{} {table}: Primary key mismatch", mark(false)));
            }
        }

        let message = if all_match {
            "All constraints present"
        } else {
            "Missing constraints detected"
        };
        Ok(ValidationResult::with_lines(kind, all_match, lines, message))
    }

    pub async fn data_integrity(&self) -> Result<ValidationResult> {
        let kind = CheckKind::DataIntegrity;
        let tables = self.source.list_tables().await?;
        let options = self.options.sample_options();
        let mut all_match = true;
        let mut lines = Vec::with_capacity(tables.len());

        for table in &tables {
            match self.checksum_pair(table, &options).await {
                Ok((source_sum, target_sum)) => {
                    let matched = source_sum == target_sum;
                    all_match &= matched;
                    lines.push(format!(
                        "{} {table}: {}... vs {}...",
                        mark(matched),
                        source_sum.short(),
                        target_sum.short()
                    ));
                }
                Err(err) => {
                    all_match = false;
                    lines.push(self.table_error(kind, table, &err));
                }
            }
        }

        let message = if all_match {
            "Data integrity verified"
        } else {
            "Data integrity issues detected"
        };
        Ok(ValidationResult::with_lines(kind, all_match, lines, message))
    }

    /// The sample order is planned from the source and reused for the target,
    /// so a target missing an ordering column fails instead of diverging.
    async fn checksum_pair(
        &self,
        table: &str,
        options: &SampleOptions,
    ) -> Result<(Checksum, Checksum)> {
        let order = plan(self.source, table, options).await?;
        let source_sum =
            checksum_with_order(self.source, table, &order, options.sample_size).await?;
        let target_sum =
            checksum_with_order(self.target, table, &order, options.sample_size).await?;
        Ok((source_sum, target_sum))
    }

    fn target_or_empty<T>(&self, kind: CheckKind, table: &str, outcome: Result<Vec<T>>) -> Vec<T> {
        outcome.unwrap_or_else(|err| {
            tracing::warn!(
                event = "target_lookup_defaulted",
                check = kind.name(),
                side = self.target.label(),
                table = %table,
                error = %err
            );
            Vec::new()
        })
    }

    fn table_error(&self, kind: CheckKind, table: &str, err: &Error) -> String {
        tracing::warn!(
            event = "table_failed",
            check = kind.name(),
            table = %table,
            error = %err
        );
        format!("{} {table}: Error - {err}", mark(false))
    }
}

fn mark(matched: bool) -> &'static str {
    if matched { "✓" } else { "✗" }
}

fn column_types(columns: &[ColumnSchema]) -> BTreeMap<&str, &str> {
    columns
        .iter()
        .map(|column| (column.name.as_str(), column.data_type.as_str()))
        .collect()
}

fn schema_mismatch_line(
    table: &str,
    source_cols: &BTreeMap<&str, &str>,
    target_cols: &BTreeMap<&str, &str>,
) -> String {
    let source_names: BTreeSet<&str> = source_cols.keys().copied().collect();
    let target_names: BTreeSet<&str> = target_cols.keys().copied().collect();
    let diff: Vec<&str> = source_names
        .symmetric_difference(&target_names)
        .copied()
        .collect();
    let retyped: Vec<&str> = source_cols
        .iter()
        .filter(|(name, data_type)| {
            target_cols
                .get(*name)
                .is_some_and(|target_type| target_type != *data_type)
        })
        .map(|(name, _)| *name)
        .collect();

    let mut line = format!(
        "{} {table}: Schema mismatch - diff columns: {{{}}}",
        mark(false),
        diff.join(", ")
    );
    if !retyped.is_empty() {
        line.push_str(&format!("; retyped columns: {{{}}}", retyped.join(", ")));
    }
    line
}
