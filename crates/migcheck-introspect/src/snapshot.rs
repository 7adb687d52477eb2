use serde::{Deserialize, Serialize};

use migcheck_core::{ColumnSchema, Constraint, IndexDef, Result};

use crate::catalog::Catalog;

/// Catalog facts for every base table of one database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub label: String,
    pub tables: Vec<TableSnapshot>,
}

/// Columns, constraints and indexes of one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub name: String,
    pub row_count: i64,
    pub columns: Vec<ColumnSchema>,
    pub constraints: Vec<Constraint>,
    pub indexes: Vec<IndexDef>,
}

/// Introspect every table of `catalog`. The first failing query aborts.
pub async fn snapshot(catalog: &dyn Catalog) -> Result<CatalogSnapshot> {
    let mut tables = Vec::new();

    for name in catalog.list_tables().await? {
        let columns = catalog.get_schema(&name).await?;
        let constraints = catalog.get_constraints(&name).await?;
        let indexes = catalog.get_indexes(&name).await?;
        let row_count = catalog.row_count(&name).await?;

        tables.push(TableSnapshot {
            name,
            row_count,
            columns,
            constraints,
            indexes,
        });
    }

    Ok(CatalogSnapshot {
        label: catalog.label().to_string(),
        tables,
    })
}
