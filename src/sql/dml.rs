//! DML for the flat table: SELECT, INSERT OVERWRITE and the count probe.
//!
//! These are the built-in statements. [`crate::generator::FlatTableGenerator`]
//! wraps [`insert_statement`] with the configured plugin override.

use tracing::debug;

use super::clause::{join_clause, projection, where_clause, Layout};
use crate::error::FlatTableResult;
use crate::model::FlatTableDesc;

/// Session initialisation: `USE <database>;`
pub fn init_statements(database: &str) -> String {
    format!("USE {};\n", database)
}

/// SELECT over the joined tables, multi-line, with every column aliased.
pub fn select_statement_default(desc: &FlatTableDesc) -> FlatTableResult<String> {
    select_statement(desc, false, &[])
}

/// SELECT over the joined tables.
///
/// `skip_as` lists `<table-name>.<column-name>` entries that are projected
/// without an alias, for use as an intermediate subquery.
pub fn select_statement(
    desc: &FlatTableDesc,
    single_line: bool,
    skip_as: &[String],
) -> FlatTableResult<String> {
    let layout = Layout::from_single_line(single_line);

    let mut sql = String::from("SELECT");
    sql.push_str(layout.sep());
    sql.push_str(&projection(desc, layout, skip_as));
    sql.push_str(&join_clause(desc, layout)?);
    sql.push_str(&where_clause(desc, layout)?);
    Ok(sql)
}

/// Row count of the unjoined root fact table, written to `output_dir`.
///
/// Used to estimate skew before the full join runs, so lookups are never joined.
pub fn count_statement(desc: &FlatTableDesc, output_dir: &str) -> FlatTableResult<String> {
    let root = desc.root();
    let mut sql = format!("dfs -mkdir -p {};\n", output_dir);
    sql.push_str(&format!(
        "INSERT OVERWRITE DIRECTORY '{}' SELECT count(*) FROM {} {}\n",
        output_dir, root.identity, root.alias
    ));
    sql.push_str(&where_clause(desc, Layout::MultiLine)?);
    debug!(table = desc.table_name(), output_dir, "generated count statement");
    Ok(sql)
}

/// `INSERT OVERWRITE TABLE <name> <select>;` with the built-in SELECT.
pub fn insert_statement(desc: &FlatTableDesc) -> FlatTableResult<String> {
    let sql = format!(
        "INSERT OVERWRITE TABLE {} {};\n",
        desc.table_name(),
        select_statement_default(desc)?
    );
    debug!(table = desc.table_name(), "generated insert statement");
    Ok(sql)
}

/// Insert for incremental loads. Same text as [`insert_statement`] and never
/// subject to a plugin override.
pub fn insert_partial_statement(desc: &FlatTableDesc) -> FlatTableResult<String> {
    insert_statement(desc)
}
