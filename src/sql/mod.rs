//! Flat table statement generation.
//!
//! - [`types`] - logical to Hive type mapping
//! - [`clause`] - projection, join and where clause builders
//! - [`ddl`] - CREATE EXTERNAL TABLE / DROP TABLE
//! - [`dml`] - SELECT, INSERT OVERWRITE, count probe, session init
//! - [`redistribute`] - CLUSTER BY / DISTRIBUTE BY rewrite of the output
//!
//! Every generator is a pure function of a [`FlatTableDesc`](crate::model::FlatTableDesc).

pub mod clause;
pub mod ddl;
pub mod dml;
pub mod redistribute;
pub mod types;


pub use clause::{col_name, join_clause, projection, where_clause, Layout};
pub use ddl::{
    create_table_statement, create_table_statement_with_settings, drop_table_statement, table_dir,
};
pub use dml::{
    count_statement, init_statements, insert_partial_statement, insert_statement,
    select_statement, select_statement_default,
};
pub use redistribute::redistribute_statement;
pub use types::{hive_data_type, HiveType};
