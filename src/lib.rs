//! # flatgen
//!
//! Generates the Hive statements that materialize a denormalized flat table:
//! a root fact table joined to its lookup tables, filtered and bounded to a
//! segment's time range.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          FlatTableDocument (JSON, CLI input)             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [resolve]
//! ┌─────────────────────────────────────────────────────────┐
//! │       FlatTableDesc (immutable descriptor snapshot)      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql::clause]
//! ┌─────────────────────────────────────────────────────────┐
//! │        projection  /  FROM ... JOIN  /  WHERE 1=1        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql::ddl, sql::dml, sql::redistribute]
//! ┌─────────────────────────────────────────────────────────┐
//! │  CREATE / DROP / INSERT OVERWRITE / count / redistribute │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! [`FlatTableGenerator`] ties the statements to [`config::FlatTableSettings`]
//! and lets a registered [`plugin::InsertStatementGenerator`] replace the
//! built-in INSERT.
//!
//! Every generated statement is a pure function of the descriptor: the same
//! descriptor always yields byte-identical text, and projected columns always
//! follow the descriptor's column order.

pub mod config;
pub mod document;
pub mod error;
pub mod generator;
pub mod model;
pub mod plugin;
pub mod sql;

// Re-export SQL submodules at crate level
pub use sql::ddl;
pub use sql::dml;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{FlatTableSettings, Settings};
    pub use crate::error::{FlatTableError, FlatTableResult, PluginError};
    pub use crate::generator::FlatTableGenerator;
    pub use crate::model::{
        ColumnRef, DateColumnFormat, FlatTableDesc, JoinDesc, JoinTableDesc, PartitionDesc,
        Segment, SegmentRange, TableRef,
    };
    pub use crate::plugin::{InsertStatementGenerator, PluginRegistry};
    pub use crate::sql::{col_name, hive_data_type, Layout};
}

pub use error::{FlatTableError, FlatTableResult};
pub use generator::FlatTableGenerator;
pub use model::FlatTableDesc;
