// src/model/segment.rs
use std::sync::Arc;

use crate::config::FlatTableSettings;

/// Time slice covered by a segment, in epoch milliseconds.
///
/// `start` is inclusive and `end` exclusive; `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentRange {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl SegmentRange {
    pub fn new(start: Option<i64>, end: Option<i64>) -> Self {
        Self { start, end }
    }

    /// Unbounded on both sides.
    pub fn infinite() -> Self {
        Self::default()
    }

    pub fn is_infinite(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// The slice of fact data being materialized, with its own configuration.
#[derive(Debug, Clone)]
pub struct Segment {
    pub range: SegmentRange,
    pub settings: Arc<FlatTableSettings>,
}

impl Segment {
    pub fn new(range: SegmentRange, settings: Arc<FlatTableSettings>) -> Self {
        Self { range, settings }
    }
}
