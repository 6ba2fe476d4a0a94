//! JSON document describing a flat table, resolved into a [`FlatTableDesc`].
//!
//! The document is the input format of the `flatgen` CLI. Tables are declared
//! once with an alias and columns are referenced as `ALIAS.COLUMN`:
//!
//! ```json
//! {
//!   "table_name": "flat_sales",
//!   "root": {"identity": "DEFAULT.KYLIN_SALES", "alias": "KYLIN_SALES"},
//!   "lookups": [
//!     {"identity": "DEFAULT.KYLIN_CAL_DT", "alias": "KYLIN_CAL_DT",
//!      "join": {"type": "inner", "primary_key": ["KYLIN_CAL_DT.CAL_DT"],
//!               "foreign_key": ["KYLIN_SALES.PART_DT"]}}
//!   ],
//!   "columns": [{"column": "KYLIN_SALES.PART_DT", "data_type": "date"}],
//!   "partition": {"date_column": "KYLIN_SALES.PART_DT"},
//!   "segment": {"start": 1356998400000, "end": 1357084800000}
//! }
//! ```
//!
//! A lookup listed twice under the same alias resolves to the same table
//! reference, so it is joined only once.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::FlatTableSettings;
use crate::model::{
    ColumnRef, DateColumnFormat, FlatTableDesc, JoinDesc, JoinTableDesc, PartitionDesc, Segment,
    SegmentRange, TableRef,
};

/// Data type given to key and partition columns that are not projected.
const UNDECLARED_COLUMN_TYPE: &str = "varchar";

/// Errors raised while reading or resolving a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read descriptor document: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse descriptor document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("column reference '{0}' is not of the form ALIAS.COLUMN")]
    InvalidColumnRef(String),

    #[error("column reference '{reference}' uses unknown table alias '{alias}'")]
    UnknownTable { reference: String, alias: String },

    #[error("column '{0}' is not one of the flat table columns")]
    UnknownColumn(String),

    #[error("partition format '{0}' is not a valid strftime pattern")]
    InvalidFormat(String),

    #[error("alias '{alias}' is declared for both {first} and {second}")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FlatTableDocument {
    pub table_name: String,
    pub root: TableDocument,
    #[serde(default)]
    pub lookups: Vec<LookupDocument>,
    pub columns: Vec<ColumnDocument>,
    #[serde(default)]
    pub filter_condition: Option<String>,
    #[serde(default)]
    pub partition: Option<PartitionDocument>,
    #[serde(default)]
    pub segment: Option<SegmentDocument>,
    #[serde(default)]
    pub cluster_by: Option<String>,
    #[serde(default)]
    pub distribute_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TableDocument {
    pub identity: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LookupDocument {
    #[serde(flatten)]
    pub table: TableDocument,
    pub join: JoinDocument,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JoinDocument {
    #[serde(rename = "type", default)]
    pub join_type: String,
    #[serde(default)]
    pub primary_key: Vec<String>,
    #[serde(default)]
    pub foreign_key: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColumnDocument {
    /// `ALIAS.COLUMN`
    pub column: String,
    pub data_type: String,
    /// Computed expression; defaults to the qualified column name.
    #[serde(default)]
    pub expression: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PartitionDocument {
    pub date_column: Option<String>,
    /// `strftime` pattern of the date column.
    #[serde(default)]
    pub date_format: Option<String>,
    /// The date column holds epoch milliseconds.
    #[serde(default)]
    pub time_millis: bool,
    #[serde(default)]
    pub time_column: Option<String>,
    #[serde(default)]
    pub time_format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SegmentDocument {
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
}

impl FlatTableDocument {
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Resolve into a descriptor. A segment in the document carries `settings`.
    pub fn resolve(&self, settings: Arc<FlatTableSettings>) -> Result<FlatTableDesc, DocumentError> {
        let mut resolver = Resolver::default();
        let root = resolver.declare_table(&self.root)?;

        let mut lookups = Vec::with_capacity(self.lookups.len());
        for lookup in &self.lookups {
            lookups.push(resolver.declare_table(&lookup.table)?);
        }

        for column in &self.columns {
            let mut col = resolver.new_column(&column.column, &column.data_type)?;
            if let Some(expr) = &column.expression {
                col = col.with_expression(expr.clone());
            }
            resolver.columns.push((column.column.clone(), col));
        }

        let mut builder = FlatTableDesc::builder(&self.table_name, &root)
            .columns(resolver.columns.iter().map(|(_, c)| c.clone()));

        for (lookup, table) in self.lookups.iter().zip(&lookups) {
            let join = &lookup.join;
            let primary_keys = join
                .primary_key
                .iter()
                .map(|r| resolver.key_column(r))
                .collect::<Result<Vec<_>, _>>()?;
            let foreign_keys = join
                .foreign_key
                .iter()
                .map(|r| resolver.key_column(r))
                .collect::<Result<Vec<_>, _>>()?;
            builder = builder.join_table(JoinTableDesc::new(
                table,
                JoinDesc::new(join.join_type.clone(), primary_keys, foreign_keys),
            ));
        }

        if let Some(filter) = &self.filter_condition {
            builder = builder.filter_condition(filter.clone());
        }

        if let Some(partition) = &self.partition {
            builder = builder.partition(resolver.partition(partition)?);
        }

        if let Some(segment) = &self.segment {
            let range = SegmentRange::new(segment.start, segment.end);
            builder = builder.segment(Segment::new(range, settings));
        }

        if let Some(reference) = &self.cluster_by {
            builder = builder.cluster_by(resolver.declared_column(reference)?);
        }
        if let Some(reference) = &self.distribute_by {
            builder = builder.distribute_by(resolver.declared_column(reference)?);
        }

        Ok(builder.build())
    }
}

#[derive(Default)]
struct Resolver {
    tables: HashMap<String, Arc<TableRef>>,
    /// Declared flat table columns in document order.
    columns: Vec<(String, ColumnRef)>,
}

impl Resolver {
    /// Declare a table alias, reusing the existing reference when the same
    /// alias names the same identity again.
    fn declare_table(&mut self, doc: &TableDocument) -> Result<Arc<TableRef>, DocumentError> {
        if let Some(existing) = self.tables.get(&doc.alias) {
            if existing.identity != doc.identity {
                return Err(DocumentError::DuplicateAlias {
                    alias: doc.alias.clone(),
                    first: existing.identity.clone(),
                    second: doc.identity.clone(),
                });
            }
            return Ok(Arc::clone(existing));
        }
        let table = TableRef::new(doc.identity.clone(), doc.alias.clone());
        self.tables.insert(doc.alias.clone(), Arc::clone(&table));
        Ok(table)
    }

    fn new_column(&self, reference: &str, data_type: &str) -> Result<ColumnRef, DocumentError> {
        let (alias, name) = reference
            .split_once('.')
            .filter(|(a, n)| !a.is_empty() && !n.is_empty())
            .ok_or_else(|| DocumentError::InvalidColumnRef(reference.to_string()))?;
        let table = self
            .tables
            .get(alias)
            .ok_or_else(|| DocumentError::UnknownTable {
                reference: reference.to_string(),
                alias: alias.to_string(),
            })?;
        Ok(ColumnRef::new(table, name, data_type))
    }

    fn declared_column(&self, reference: &str) -> Result<ColumnRef, DocumentError> {
        self.columns
            .iter()
            .find(|(r, _)| r == reference)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| DocumentError::UnknownColumn(reference.to_string()))
    }

    /// A declared column, or an undeclared one on a known table.
    fn key_column(&self, reference: &str) -> Result<ColumnRef, DocumentError> {
        match self.declared_column(reference) {
            Ok(col) => Ok(col),
            Err(_) => self.new_column(reference, UNDECLARED_COLUMN_TYPE),
        }
    }

    fn partition(&self, doc: &PartitionDocument) -> Result<PartitionDesc, DocumentError> {
        let mut partition = match &doc.date_column {
            Some(reference) => PartitionDesc::new(self.key_column(reference)?),
            None => PartitionDesc::default(),
        };

        if doc.time_millis {
            partition.date_format = DateColumnFormat::TimeMillis;
        } else if let Some(format) = &doc.date_format {
            partition = partition
                .with_date_format(DateColumnFormat::Pattern(format.clone()))
                .map_err(|_| DocumentError::InvalidFormat(format.clone()))?;
        }

        if let Some(reference) = &doc.time_column {
            let format = doc.time_format.clone().unwrap_or_else(|| "%H".to_string());
            partition = partition
                .with_time_column(self.key_column(reference)?, format.clone())
                .map_err(|_| DocumentError::InvalidFormat(format))?;
        }

        Ok(partition)
    }
}
