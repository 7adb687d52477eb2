use async_trait::async_trait;
use sqlx::PgPool;

use migcheck_core::{ColumnSchema, Constraint, IndexDef, Result, RowSample, SampleOrder};

use crate::catalog::Catalog;

mod mapper;
mod queries;
mod utils;

pub use utils::{order_clause, qualified_name, quote_ident};

/// Schema inspected when none is configured.
pub const DEFAULT_SCHEMA: &str = "public";

/// Catalog backed by a PostgreSQL pool owned by the caller.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
    label: String,
    schema: String,
}

impl PostgresCatalog {
    /// Create a catalog over the `public` schema using a pre-configured pool.
    pub fn new(pool: PgPool, label: impl Into<String>) -> Self {
        Self {
            pool,
            label: label.into(),
            schema: DEFAULT_SCHEMA.to_string(),
        }
    }

    /// Inspect `schema` instead of `public`.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Catalog for PostgresCatalog {
    fn label(&self) -> &str {
        &self.label
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        let mut tables = queries::list_tables(&self.pool, &self.schema).await?;
        mapper::sort_tables(&mut tables);
        Ok(tables)
    }

    async fn get_schema(&self, table: &str) -> Result<Vec<ColumnSchema>> {
        let raw = queries::list_columns(&self.pool, &self.schema, table).await?;
        Ok(mapper::map_columns(raw))
    }

    async fn get_constraints(&self, table: &str) -> Result<Vec<Constraint>> {
        let raw = queries::list_constraints(&self.pool, &self.schema, table).await?;
        Ok(mapper::map_constraints(raw))
    }

    async fn get_indexes(&self, table: &str) -> Result<Vec<IndexDef>> {
        let raw = queries::list_indexes(&self.pool, &self.schema, table).await?;
        Ok(mapper::map_indexes(raw))
    }

    async fn row_count(&self, table: &str) -> Result<i64> {
        queries::count_rows(&self.pool, &self.schema, table).await
    }

    async fn sample_rows(
        &self,
        table: &str,
        order: &SampleOrder,
        limit: u32,
    ) -> Result<RowSample> {
        let columns = self
            .get_schema(table)
            .await?
            .into_iter()
            .map(|column| column.name)
            .collect();
        let rows = queries::fetch_rows(&self.pool, &self.schema, table, order, limit).await?;
        Ok(RowSample::new(columns, rows))
    }
}
