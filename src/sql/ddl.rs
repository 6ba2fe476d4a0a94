//! DDL for the flat table: CREATE EXTERNAL TABLE and DROP TABLE.
//!
//! # Examples
//!
//! ```
//! use flatgen::model::{ColumnRef, FlatTableDesc, TableRef};
//! use flatgen::sql::ddl::{create_table_statement, drop_table_statement};
//!
//! let sales = TableRef::new("DEFAULT.KYLIN_SALES", "KYLIN_SALES");
//! let desc = FlatTableDesc::builder("kylin_intermediate_sales", &sales)
//!     .column(ColumnRef::new(&sales, "PRICE", "decimal(19,4)"))
//!     .build();
//!
//! let ddl = create_table_statement(&desc, "/kylin/flat", "PARQUET", ",");
//! assert!(ddl.contains("STORED AS PARQUET"));
//! assert_eq!(
//!     drop_table_statement(&desc),
//!     "DROP TABLE IF EXISTS kylin_intermediate_sales;\n"
//! );
//! ```

use tracing::debug;

use super::clause::col_name;
use super::types::hive_data_type;
use crate::config::FlatTableSettings;
use crate::model::FlatTableDesc;

/// The only storage format that takes a ROW FORMAT clause.
pub const TEXTFILE: &str = "TEXTFILE";

/// Storage location of the flat table: `<storage_dir>/<table-name>`.
pub fn table_dir(desc: &FlatTableDesc, storage_dir: &str) -> String {
    format!("{}/{}", storage_dir, desc.table_name())
}

/// CREATE EXTERNAL TABLE using the storage format and delimiter from `settings`.
pub fn create_table_statement_with_settings(
    desc: &FlatTableDesc,
    storage_dir: &str,
    settings: &FlatTableSettings,
) -> String {
    create_table_statement(
        desc,
        storage_dir,
        &settings.storage_format,
        &settings.field_delimiter,
    )
}

/// CREATE EXTERNAL TABLE for the flat table, followed by the ALTER TABLE that
/// enables `auto.purge`.
///
/// Columns appear in descriptor order with their Hive types. The ROW FORMAT
/// line is emitted only when `storage_format` is exactly `TEXTFILE`.
pub fn create_table_statement(
    desc: &FlatTableDesc,
    storage_dir: &str,
    storage_format: &str,
    field_delimiter: &str,
) -> String {
    let name = desc.table_name();
    let mut ddl = String::new();

    ddl.push_str("CREATE EXTERNAL TABLE IF NOT EXISTS ");
    ddl.push_str(name);
    ddl.push('\n');

    ddl.push_str("(\n");
    for (i, col) in desc.columns().iter().enumerate() {
        if i > 0 {
            ddl.push(',');
        }
        ddl.push_str(&col_name(col));
        ddl.push(' ');
        ddl.push_str(&hive_data_type(&col.data_type));
        ddl.push('\n');
    }
    ddl.push_str(")\n");

    if storage_format == TEXTFILE {
        ddl.push_str("ROW FORMAT DELIMITED FIELDS TERMINATED BY '\\");
        ddl.push_str(field_delimiter);
        ddl.push_str("'\n");
    }
    ddl.push_str("STORED AS ");
    ddl.push_str(storage_format);
    ddl.push('\n');
    ddl.push_str("LOCATION '");
    ddl.push_str(&table_dir(desc, storage_dir));
    ddl.push_str("';\n");
    ddl.push_str("ALTER TABLE ");
    ddl.push_str(name);
    ddl.push_str(" SET TBLPROPERTIES('auto.purge'='true');\n");

    debug!(table = name, format = storage_format, "generated create table statement");
    ddl
}

/// `DROP TABLE IF EXISTS <name>;`
pub fn drop_table_statement(desc: &FlatTableDesc) -> String {
    format!("DROP TABLE IF EXISTS {};\n", desc.table_name())
}
