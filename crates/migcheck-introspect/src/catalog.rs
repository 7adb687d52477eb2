use async_trait::async_trait;

use migcheck_core::{ColumnSchema, Constraint, IndexDef, Result, RowSample, SampleOrder};

/// Read-only view over one database's catalog and rows.
///
/// Implementations borrow a live connection owned by the caller and never
/// open, close or mutate it.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Side label used in logs and errors (e.g. `source`).
    fn label(&self) -> &str;

    /// Base tables in the inspected schema, sorted by name.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Column definitions ordered by ordinal position.
    async fn get_schema(&self, table: &str) -> Result<Vec<ColumnSchema>>;

    /// Constraint rows ordered by constraint name then key position.
    async fn get_constraints(&self, table: &str) -> Result<Vec<Constraint>>;

    /// Index definitions ordered by name.
    async fn get_indexes(&self, table: &str) -> Result<Vec<IndexDef>>;

    async fn row_count(&self, table: &str) -> Result<i64>;

    /// Fetch at most `limit` rows using the given ordering strategy.
    async fn sample_rows(
        &self,
        table: &str,
        order: &SampleOrder,
        limit: u32,
    ) -> Result<RowSample>;
}
