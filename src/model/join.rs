// src/model/join.rs
use std::sync::Arc;

use super::table::{ColumnRef, TableRef};

/// Join between the referencing side and a lookup table.
///
/// Primary-key columns belong to the lookup table, foreign-key columns to the
/// referencing side; they are paired by position.
#[derive(Debug, Clone)]
pub struct JoinDesc {
    /// `inner`, `left`, ... An empty type means the entry is not joined.
    pub join_type: String,
    pub primary_keys: Vec<ColumnRef>,
    pub foreign_keys: Vec<ColumnRef>,
}

impl JoinDesc {
    pub fn new(
        join_type: impl Into<String>,
        primary_keys: Vec<ColumnRef>,
        foreign_keys: Vec<ColumnRef>,
    ) -> Self {
        Self {
            join_type: join_type.into(),
            primary_keys,
            foreign_keys,
        }
    }

    pub fn is_joined(&self) -> bool {
        !self.join_type.is_empty()
    }
}

/// A lookup table with the join that brings it in.
#[derive(Debug, Clone)]
pub struct JoinTableDesc {
    pub table: Arc<TableRef>,
    pub join: JoinDesc,
}

impl JoinTableDesc {
    pub fn new(table: &Arc<TableRef>, join: JoinDesc) -> Self {
        Self {
            table: Arc::clone(table),
            join,
        }
    }
}
