//! Post-load redistribution of the flat table's output files.

use tracing::debug;

use super::clause::col_name;
use crate::model::FlatTableDesc;

/// Rewrite the flat table onto itself to control file skew and ordering.
///
/// Emits exactly one of `CLUSTER BY <col>` (when a cluster-by column is set),
/// `DISTRIBUTE BY <col>` (when only a distribute-by column is set) or
/// `DISTRIBUTE BY RAND()`.
pub fn redistribute_statement(desc: &FlatTableDesc) -> String {
    let name = desc.table_name();
    let mut sql = format!("INSERT OVERWRITE TABLE {} SELECT * FROM {}", name, name);

    match (desc.cluster_by(), desc.distribute_by()) {
        (Some(cluster), _) => {
            sql.push_str(" CLUSTER BY ");
            sql.push_str(&col_name(cluster));
        }
        (None, Some(distribute)) => {
            sql.push_str(" DISTRIBUTE BY ");
            sql.push_str(&col_name(distribute));
        }
        (None, None) => sql.push_str(" DISTRIBUTE BY RAND()"),
    }
    sql.push_str(";\n");

    debug!(table = name, "generated redistribute statement");
    sql
}
