//! Clause builders shared by the flat table statements.
//!
//! - [`projection`] - the column list of the SELECT
//! - [`join_clause`] - FROM the root fact table plus one JOIN per lookup table
//! - [`where_clause`] - `WHERE 1=1` plus the filter and partition predicates
//!
//! Layout (single line or one item per line) changes whitespace only; token
//! order and keywords are identical in both layouts.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use crate::error::{FlatTableError, FlatTableResult};
use crate::model::{ColumnRef, FlatTableDesc, TableRef};

/// Line layout of a generated statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Items separated by a space.
    SingleLine,
    /// Items separated by a newline.
    #[default]
    MultiLine,
}

impl Layout {
    pub fn from_single_line(single_line: bool) -> Self {
        if single_line {
            Layout::SingleLine
        } else {
            Layout::MultiLine
        }
    }

    pub fn sep(self) -> &'static str {
        match self {
            Layout::SingleLine => " ",
            Layout::MultiLine => "\n",
        }
    }
}

/// Physical name of a flat table column: `<table-alias>_<column-name>`.
///
/// Any consumer of the flat table schema must derive column names this way.
pub fn col_name(col: &ColumnRef) -> String {
    format!("{}_{}", col.table_alias(), col.name)
}

/// Render the projected columns in descriptor order.
///
/// A column whose `<table-name>.<column-name>` appears in `skip_as` is rendered
/// as its bare expression; every other column is aliased with [`col_name`].
/// Each item is followed by the layout separator and items are joined by `,`.
pub fn projection(desc: &FlatTableDesc, layout: Layout, skip_as: &[String]) -> String {
    let sep = layout.sep();
    let mut sql = String::new();
    for (i, col) in desc.columns().iter().enumerate() {
        if i > 0 {
            sql.push(',');
        }
        sql.push_str(&col.expression);
        if !skip_as.contains(&col.total_name()) {
            sql.push_str(" as ");
            sql.push_str(&col_name(col));
        }
        sql.push_str(sep);
    }
    sql
}

/// Render `FROM <root>` followed by the lookup joins.
///
/// Entries with an empty join type are skipped, and a lookup table reference
/// that was already joined is not joined again. Returns
/// [`FlatTableError::JoinArity`] when a join pairs a different number of
/// primary and foreign keys.
pub fn join_clause(desc: &FlatTableDesc, layout: Layout) -> FlatTableResult<String> {
    let sep = layout.sep();
    let root = desc.root();
    let mut joined: HashSet<*const TableRef> = HashSet::new();

    let mut sql = format!("FROM {} as {} {}", root.identity, root.alias, sep);

    for lookup in desc.join_tables() {
        let join = &lookup.join;
        if !join.is_joined() {
            continue;
        }
        if !joined.insert(Arc::as_ptr(&lookup.table)) {
            continue;
        }

        let pk = &join.primary_keys;
        let fk = &join.foreign_keys;
        if pk.len() != fk.len() {
            return Err(FlatTableError::JoinArity {
                table: lookup.table.identity.clone(),
                primary_keys: pk.len(),
                foreign_keys: fk.len(),
            });
        }

        sql.push_str(&join.join_type.to_uppercase());
        sql.push_str(" JOIN ");
        sql.push_str(&lookup.table.identity);
        sql.push_str(" as ");
        sql.push_str(&lookup.table.alias);
        sql.push_str(sep);
        sql.push_str("ON ");
        for (i, (fk_col, pk_col)) in fk.iter().zip(pk).enumerate() {
            if i > 0 {
                sql.push_str(" AND ");
            }
            sql.push_str(&fk_col.expression);
            sql.push_str(" = ");
            sql.push_str(&pk_col.expression);
        }
        sql.push_str(sep);
    }

    Ok(sql)
}

/// Render the WHERE clause.
///
/// Always starts with `WHERE 1=1` so optional predicates can be appended
/// uniformly. The partition predicate is added only when the descriptor has a
/// segment with a finite range and the partition has a date column. Fails when
/// the range bounds cannot be rendered with the partition format.
pub fn where_clause(desc: &FlatTableDesc, layout: Layout) -> FlatTableResult<String> {
    let sep = layout.sep();
    let mut sql = String::from("WHERE 1=1");

    if let Some(filter) = desc.filter_condition().filter(|f| !f.is_empty()) {
        sql.push_str(" AND (");
        sql.push_str(filter);
        sql.push_str(") ");
    }

    if let Some(segment) = desc.segment() {
        let range = &segment.range;
        match desc.partition() {
            Some(partition) if partition.date_column.is_some() => {
                if !range.is_infinite() {
                    sql.push_str(" AND (");
                    sql.push_str(&partition.build_date_range_condition(segment, range)?);
                    sql.push(')');
                    sql.push_str(sep);
                }
            }
            _ => {
                if !range.is_infinite() {
                    warn!(
                        table = desc.table_name(),
                        "segment range is bounded but the model has no partition date column"
                    );
                }
            }
        }
    }

    Ok(sql)
}
