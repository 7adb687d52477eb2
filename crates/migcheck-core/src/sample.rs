use serde::{Deserialize, Serialize};

/// Ordering strategy used when fetching a row sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "columns", rename_all = "snake_case")]
pub enum SampleOrder {
    /// `ORDER BY <pk> ASC` on a single-column primary key.
    PrimaryKey(String),
    /// `ORDER BY` every listed column, ascending, in the given order.
    Columns(Vec<String>),
    /// `ORDER BY` the whole row's text form. Total over any column types,
    /// including those without a btree ordering.
    RowText,
    /// No ordering; rows come back in the database's physical order.
    Unordered,
}

impl SampleOrder {
    /// Named columns that drive the ordering, empty for `RowText` and
    /// `Unordered`.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            SampleOrder::PrimaryKey(column) => vec![column.as_str()],
            SampleOrder::Columns(columns) => columns.iter().map(String::as_str).collect(),
            SampleOrder::RowText | SampleOrder::Unordered => Vec::new(),
        }
    }

    pub fn is_ordered(&self) -> bool {
        !matches!(self, SampleOrder::Unordered)
    }
}

/// A bounded set of rows fetched from one table, values rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSample {
    /// Column names in ordinal order.
    pub columns: Vec<String>,
    /// Row values in fetch order; `None` is SQL NULL.
    pub rows: Vec<Vec<Option<String>>>,
}

impl RowSample {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
