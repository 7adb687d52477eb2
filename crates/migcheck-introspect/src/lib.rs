//! Database catalog introspection and row sampling.

pub mod catalog;
pub mod postgres;
pub mod sampler;
pub mod snapshot;

pub use catalog::Catalog;
pub use postgres::{DEFAULT_SCHEMA, PostgresCatalog};
pub use sampler::{SampleOptions, checksum, checksum_with_order, plan, plan_order};
pub use snapshot::{CatalogSnapshot, TableSnapshot, snapshot};

pub use migcheck_core::{Checksum, ColumnSchema, Constraint, IndexDef, RowSample, SampleOrder};
