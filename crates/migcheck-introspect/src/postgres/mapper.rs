use migcheck_core::{ColumnSchema, Constraint, ConstraintKind, IndexDef};

use super::queries::{RawColumn, RawConstraint, RawIndex};

pub fn map_columns(raw: Vec<RawColumn>) -> Vec<ColumnSchema> {
    raw.into_iter()
        .map(|col| ColumnSchema {
            name: col.name,
            data_type: col.data_type,
            max_length: col.max_length,
            nullable: col.nullable,
            default: col.default,
        })
        .collect()
}

pub fn map_constraints(raw: Vec<RawConstraint>) -> Vec<Constraint> {
    raw.into_iter()
        .map(|con| Constraint {
            name: con.name,
            kind: ConstraintKind::from_catalog(&con.kind),
            column: con.column_name,
        })
        .collect()
}

pub fn map_indexes(raw: Vec<RawIndex>) -> Vec<IndexDef> {
    raw.into_iter()
        .map(|idx| IndexDef {
            name: idx.name,
            definition: idx.definition,
        })
        .collect()
}

/// Byte-order sort so table order never depends on the server collation.
pub fn sort_tables(tables: &mut [String]) {
    tables.sort_by(|left, right| left.as_bytes().cmp(right.as_bytes()));
}
