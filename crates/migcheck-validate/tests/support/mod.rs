#![allow(dead_code)]

//! In-memory catalog used to drive the validator without a database.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use migcheck_core::{
    ColumnSchema, Constraint, ConstraintKind, Error, IndexDef, Result, RowSample, SampleOrder,
};
use migcheck_introspect::Catalog;

#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    pub columns: Vec<ColumnSchema>,
    pub constraints: Vec<Constraint>,
    pub indexes: Vec<IndexDef>,
    /// Rows in physical storage order.
    pub rows: Vec<Vec<Option<String>>>,
}

impl MemoryTable {
    pub fn new(columns: &[(&str, &str)]) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|(name, data_type)| ColumnSchema::new(*name, *data_type))
                .collect(),
            ..Self::default()
        }
    }

    pub fn primary_key(mut self, name: &str, columns: &[&str]) -> Self {
        for column in columns {
            self.constraints
                .push(Constraint::new(name, ConstraintKind::PrimaryKey, *column));
        }
        self.indexes.push(IndexDef {
            name: name.to_string(),
            definition: format!("CREATE UNIQUE INDEX {name} USING btree ({})", columns.join(", ")),
        });
        self
    }

    pub fn rows(mut self, rows: &[&[&str]]) -> Self {
        self.rows = rows
            .iter()
            .map(|row| row.iter().map(|value| Some(value.to_string())).collect())
            .collect();
        self
    }

    pub fn reversed(mut self) -> Self {
        self.rows.reverse();
        self
    }

    pub fn column_mut(&mut self, name: &str) -> &mut ColumnSchema {
        self.columns
            .iter_mut()
            .find(|column| column.name == name)
            .expect("column exists in fixture")
    }
}

#[derive(Debug, Clone)]
pub struct MemoryCatalog {
    label: String,
    tables: BTreeMap<String, MemoryTable>,
    failures: BTreeSet<(String, String)>,
    unreachable: bool,
}

impl MemoryCatalog {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            tables: BTreeMap::new(),
            failures: BTreeSet::new(),
            unreachable: false,
        }
    }

    pub fn with_table(mut self, name: &str, table: MemoryTable) -> Self {
        self.tables.insert(name.to_string(), table);
        self
    }

    pub fn without_table(mut self, name: &str) -> Self {
        self.tables.remove(name);
        self
    }

    pub fn table_mut(&mut self, name: &str) -> &mut MemoryTable {
        self.tables.get_mut(name).expect("table exists in fixture")
    }

    /// Make `operation` fail for `table`.
    pub fn failing(mut self, table: &str, operation: &str) -> Self {
        self.failures
            .insert((table.to_string(), operation.to_string()));
        self
    }

    /// Make every call fail, as with a dropped connection.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    fn check(&self, table: &str, operation: &str) -> Result<()> {
        if self.unreachable {
            return Err(Error::Connection(format!("{} is unreachable", self.label)));
        }
        if self
            .failures
            .contains(&(table.to_string(), operation.to_string()))
        {
            return Err(Error::catalog(operation, table, "injected failure"));
        }
        Ok(())
    }

    fn existing(&self, table: &str, operation: &str) -> Result<&MemoryTable> {
        self.tables.get(table).ok_or_else(|| {
            Error::catalog(operation, table, format!("relation \"{table}\" does not exist"))
        })
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    fn label(&self) -> &str {
        &self.label
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        self.check("*", "list_tables")?;
        Ok(self.tables.keys().cloned().collect())
    }

    async fn get_schema(&self, table: &str) -> Result<Vec<ColumnSchema>> {
        self.check(table, "get_schema")?;
        Ok(self
            .tables
            .get(table)
            .map(|t| t.columns.clone())
            .unwrap_or_default())
    }

    async fn get_constraints(&self, table: &str) -> Result<Vec<Constraint>> {
        self.check(table, "get_constraints")?;
        Ok(self
            .tables
            .get(table)
            .map(|t| t.constraints.clone())
            .unwrap_or_default())
    }

    async fn get_indexes(&self, table: &str) -> Result<Vec<IndexDef>> {
        self.check(table, "get_indexes")?;
        Ok(self
            .tables
            .get(table)
            .map(|t| t.indexes.clone())
            .unwrap_or_default())
    }

    async fn row_count(&self, table: &str) -> Result<i64> {
        self.check(table, "row_count")?;
        let t = self.existing(table, "row_count")?;
        Ok(t.rows.len() as i64)
    }

    async fn sample_rows(
        &self,
        table: &str,
        order: &SampleOrder,
        limit: u32,
    ) -> Result<RowSample> {
        self.check(table, "sample_rows")?;
        let t = self.existing(table, "sample_rows")?;

        let positions: Vec<usize> = order
            .columns()
            .iter()
            .map(|name| {
                t.columns
                    .iter()
                    .position(|column| column.name == *name)
                    .ok_or_else(|| {
                        Error::catalog("sample_rows", table, format!("unknown column {name}"))
                    })
            })
            .collect::<Result<_>>()?;

        let mut rows = t.rows.clone();
        if *order == SampleOrder::RowText {
            rows.sort_by_key(|row| row_text(row));
        } else if !positions.is_empty() {
            rows.sort_by(|left, right| {
                positions.iter().fold(Ordering::Equal, |acc, idx| {
                    acc.then_with(|| compare_values(&left[*idx], &right[*idx]))
                })
            });
        }
        rows.truncate(limit as usize);

        Ok(RowSample::new(
            t.columns.iter().map(|column| column.name.clone()).collect(),
            rows,
        ))
    }
}

/// Tab-joined row, as a stand-in for a record's text form.
fn row_text(row: &[Option<String>]) -> String {
    row.iter()
        .map(|value| value.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\t")
}

/// Integers compare numerically, everything else as text; NULL sorts last.
fn compare_values(left: &Option<String>, right: &Option<String>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(l), Some(r)) => match (l.parse::<i64>(), r.parse::<i64>()) {
            (Ok(l), Ok(r)) => l.cmp(&r),
            _ => l.cmp(r),
        },
    }
}

/// A small shop database with keyed, composite-keyed and unkeyed tables.
pub fn shop(label: &str) -> MemoryCatalog {
    MemoryCatalog::new(label)
        .with_table(
            "audit_log",
            MemoryTable::new(&[("note", "text"), ("created_at", "timestamp without time zone")])
                .rows(&[
                    &["created", "2026-01-01 10:00:00"],
                    &["shipped", "2026-01-02 11:00:00"],
                ]),
        )
        .with_table(
            "customers",
            MemoryTable::new(&[
                ("id", "integer"),
                ("email", "character varying"),
                ("full_name", "text"),
            ])
            .primary_key("customers_pkey", &["id"])
            .rows(&[
                &["1", "ann@example.com", "Ann"],
                &["2", "bo@example.com", "Bo"],
                &["10", "cy@example.com", "Cy"],
            ]),
        )
        .with_table(
            "order_items",
            MemoryTable::new(&[("order_id", "integer"), ("line_no", "integer"), ("sku", "text")])
                .primary_key("order_items_pkey", &["order_id", "line_no"])
                .rows(&[&["1", "1", "A-1"], &["1", "2", "B-7"], &["2", "1", "A-1"]]),
        )
}
