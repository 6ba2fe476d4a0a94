//! The flat table descriptor.
//!
//! A descriptor is assembled once from upstream model and segment state and is
//! read-only afterwards. Tables are shared through `Arc` so that join
//! de-duplication can use pointer identity.

pub mod descriptor;
pub mod join;
pub mod partition;
pub mod segment;
pub mod table;

pub use descriptor::{FlatTableDesc, FlatTableDescBuilder};
pub use join::{JoinDesc, JoinTableDesc};
pub use partition::{
    DateColumnFormat, DefaultPartitionConditionBuilder, PartitionConditionBuilder, PartitionDesc,
};
pub use segment::{Segment, SegmentRange};
pub use table::{ColumnRef, TableRef};
