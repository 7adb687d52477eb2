//! Deterministic row sampling and checksumming.
//!
//! A table with a single-column primary key is sampled in key order. Any
//! other table (no key, or a composite key) is sampled without an `ORDER BY`,
//! so its digest follows the database's physical row order and two replicas
//! holding the same rows may still disagree. `strict_ordering` opts into a
//! total order: every key column for composite keys, and the row's text form
//! (`t::text`) for tables without a key. Ordering by the text form works for
//! column types with no btree operator class (`json`, `xml`, `point`).
//!
//! When two catalogs are compared the order is planned once, from one side,
//! and both sides are sampled with it.

use migcheck_core::{
    Checksum, Constraint, DEFAULT_SAMPLE_SIZE, Error, Result, SampleOrder, primary_key_columns,
};

use crate::catalog::Catalog;

/// Options shared by both sides of a checksum comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleOptions {
    /// Maximum number of rows fetched per table.
    pub sample_size: u32,
    /// Order unkeyed and composite-key tables deterministically.
    pub strict_ordering: bool,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            strict_ordering: false,
        }
    }
}

/// Choose the ordering strategy for a table from its constraints.
pub fn plan_order(constraints: &[Constraint], strict_ordering: bool) -> SampleOrder {
    let mut pk = primary_key_columns(constraints);

    if pk.len() == 1 {
        if let Some(column) = pk.pop() {
            return SampleOrder::PrimaryKey(column);
        }
    }

    if !strict_ordering {
        SampleOrder::Unordered
    } else if pk.is_empty() {
        SampleOrder::RowText
    } else {
        SampleOrder::Columns(pk)
    }
}

/// Look up `table`'s constraints in `catalog` and plan its sample order.
pub async fn plan(
    catalog: &dyn Catalog,
    table: &str,
    options: &SampleOptions,
) -> Result<SampleOrder> {
    let constraints = catalog
        .get_constraints(table)
        .await
        .map_err(|err| Error::sample(table, err))?;

    let order = plan_order(&constraints, options.strict_ordering);
    tracing::debug!(
        event = "sample_planned",
        side = catalog.label(),
        table = table,
        ordered = order.is_ordered()
    );
    Ok(order)
}

/// Sample up to `limit` rows of `table` in the given order and digest them.
pub async fn checksum_with_order(
    catalog: &dyn Catalog,
    table: &str,
    order: &SampleOrder,
    limit: u32,
) -> Result<Checksum> {
    let sample = catalog
        .sample_rows(table, order, limit)
        .await
        .map_err(|err| Error::sample(table, err))?;

    Ok(Checksum::of_sample(&sample))
}

/// Plan from `catalog` itself, then sample and digest `table`.
pub async fn checksum(
    catalog: &dyn Catalog,
    table: &str,
    options: &SampleOptions,
) -> Result<Checksum> {
    let order = plan(catalog, table, options).await?;
    checksum_with_order(catalog, table, &order, options.sample_size).await
}
