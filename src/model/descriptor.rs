// src/model/descriptor.rs
use std::sync::Arc;

use super::join::JoinTableDesc;
use super::partition::PartitionDesc;
use super::segment::{Segment, SegmentRange};
use super::table::{ColumnRef, TableRef};

/// Read-only snapshot of everything needed to generate the flat table statements.
///
/// Built once per generation request with [`FlatTableDesc::builder`] and shared
/// by reference with every generator.
#[derive(Debug, Clone)]
pub struct FlatTableDesc {
    table_name: String,
    columns: Vec<ColumnRef>,
    root: Arc<TableRef>,
    join_tables: Vec<JoinTableDesc>,
    filter_condition: Option<String>,
    partition: Option<PartitionDesc>,
    segment: Option<Segment>,
    cluster_by: Option<ColumnRef>,
    distribute_by: Option<ColumnRef>,
}

impl FlatTableDesc {
    pub fn builder(table_name: impl Into<String>, root: &Arc<TableRef>) -> FlatTableDescBuilder {
        FlatTableDescBuilder {
            desc: FlatTableDesc {
                table_name: table_name.into(),
                columns: Vec::new(),
                root: Arc::clone(root),
                join_tables: Vec::new(),
                filter_condition: None,
                partition: None,
                segment: None,
                cluster_by: None,
                distribute_by: None,
            },
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Columns in canonical order.
    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }

    /// The root fact table.
    pub fn root(&self) -> &Arc<TableRef> {
        &self.root
    }

    pub fn join_tables(&self) -> &[JoinTableDesc] {
        &self.join_tables
    }

    pub fn filter_condition(&self) -> Option<&str> {
        self.filter_condition.as_deref()
    }

    pub fn partition(&self) -> Option<&PartitionDesc> {
        self.partition.as_ref()
    }

    pub fn segment(&self) -> Option<&Segment> {
        self.segment.as_ref()
    }

    pub fn segment_range(&self) -> Option<&SegmentRange> {
        self.segment.as_ref().map(|s| &s.range)
    }

    pub fn cluster_by(&self) -> Option<&ColumnRef> {
        self.cluster_by.as_ref()
    }

    pub fn distribute_by(&self) -> Option<&ColumnRef> {
        self.distribute_by.as_ref()
    }
}

/// Builder for [`FlatTableDesc`].
#[derive(Debug, Clone)]
#[must_use = "call build() to obtain the descriptor"]
pub struct FlatTableDescBuilder {
    desc: FlatTableDesc,
}

impl FlatTableDescBuilder {
    /// Append a column; columns keep insertion order.
    pub fn column(mut self, col: ColumnRef) -> Self {
        self.desc.columns.push(col);
        self
    }

    pub fn columns(mut self, cols: impl IntoIterator<Item = ColumnRef>) -> Self {
        self.desc.columns.extend(cols);
        self
    }

    pub fn join_table(mut self, join: JoinTableDesc) -> Self {
        self.desc.join_tables.push(join);
        self
    }

    pub fn filter_condition(mut self, condition: impl Into<String>) -> Self {
        self.desc.filter_condition = Some(condition.into());
        self
    }

    pub fn partition(mut self, partition: PartitionDesc) -> Self {
        self.desc.partition = Some(partition);
        self
    }

    pub fn segment(mut self, segment: Segment) -> Self {
        self.desc.segment = Some(segment);
        self
    }

    pub fn cluster_by(mut self, col: ColumnRef) -> Self {
        self.desc.cluster_by = Some(col);
        self
    }

    pub fn distribute_by(mut self, col: ColumnRef) -> Self {
        self.desc.distribute_by = Some(col);
        self
    }

    pub fn build(self) -> FlatTableDesc {
        self.desc
    }
}
