//! Core contracts for migcheck.
//!
//! This crate defines the catalog facts extracted from a database, the row
//! sample and checksum types, and the error type shared across the
//! introspection, validation and CLI crates.

pub mod catalog;
pub mod checksum;
pub mod error;
pub mod sample;

pub use catalog::{ColumnSchema, Constraint, ConstraintKind, IndexDef, primary_key_columns};
pub use checksum::{Checksum, canonical_text};
pub use error::{Error, Result};
pub use sample::{RowSample, SampleOrder};

/// Default number of rows sampled per table for data integrity checks.
pub const DEFAULT_SAMPLE_SIZE: u32 = 1000;
