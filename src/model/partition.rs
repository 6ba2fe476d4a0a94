// src/model/partition.rs
//! Partition columns and the strategies that turn a segment range into a
//! predicate over them.

use std::fmt::{self, Write};
use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};

use super::segment::{Segment, SegmentRange};
use super::table::ColumnRef;
use crate::error::{FlatTableError, FlatTableResult};

/// How the partition date column stores its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateColumnFormat {
    /// A string or date column compared against a `strftime` rendering.
    Pattern(String),
    /// A numeric column holding epoch milliseconds.
    TimeMillis,
}

impl DateColumnFormat {
    /// A `strftime` pattern format, rejected when the pattern does not parse.
    pub fn pattern(pattern: impl Into<String>) -> FlatTableResult<Self> {
        let pattern = pattern.into();
        validate_pattern(&pattern)?;
        Ok(DateColumnFormat::Pattern(pattern))
    }
}

impl Default for DateColumnFormat {
    fn default() -> Self {
        DateColumnFormat::Pattern("%Y-%m-%d".to_string())
    }
}

/// Renders the date-range predicate appended to the WHERE clause.
///
/// Partition semantics vary by column representation, so the predicate text is
/// owned by this strategy and not by the clause builder.
pub trait PartitionConditionBuilder: Send + Sync + fmt::Debug {
    fn build_date_range_condition(
        &self,
        partition: &PartitionDesc,
        segment: &Segment,
        range: &SegmentRange,
    ) -> FlatTableResult<String>;
}

/// Partition columns of a model.
#[derive(Debug, Clone)]
pub struct PartitionDesc {
    pub date_column: Option<ColumnRef>,
    /// Optional finer-grained time column paired with the date column.
    pub time_column: Option<ColumnRef>,
    pub date_format: DateColumnFormat,
    /// `strftime` pattern for the time column.
    pub time_format: String,
    pub condition_builder: Arc<dyn PartitionConditionBuilder>,
}

impl Default for PartitionDesc {
    /// No partition columns; segment ranges add no predicate.
    fn default() -> Self {
        Self {
            date_column: None,
            time_column: None,
            date_format: DateColumnFormat::default(),
            time_format: "%H".to_string(),
            condition_builder: Arc::new(DefaultPartitionConditionBuilder),
        }
    }
}

impl PartitionDesc {
    /// Partition on a date column using [`DefaultPartitionConditionBuilder`].
    pub fn new(date_column: ColumnRef) -> Self {
        Self {
            date_column: Some(date_column),
            ..Self::default()
        }
    }

    /// Fails with [`FlatTableError::InvalidDateFormat`] for a malformed pattern.
    pub fn with_date_format(mut self, format: DateColumnFormat) -> FlatTableResult<Self> {
        if let DateColumnFormat::Pattern(pattern) = &format {
            validate_pattern(pattern)?;
        }
        self.date_format = format;
        Ok(self)
    }

    /// Fails with [`FlatTableError::InvalidDateFormat`] for a malformed pattern.
    pub fn with_time_column(
        mut self,
        column: ColumnRef,
        format: impl Into<String>,
    ) -> FlatTableResult<Self> {
        let format = format.into();
        validate_pattern(&format)?;
        self.time_column = Some(column);
        self.time_format = format;
        Ok(self)
    }

    pub fn with_condition_builder(mut self, builder: Arc<dyn PartitionConditionBuilder>) -> Self {
        self.condition_builder = builder;
        self
    }

    pub fn build_date_range_condition(
        &self,
        segment: &Segment,
        range: &SegmentRange,
    ) -> FlatTableResult<String> {
        self.condition_builder
            .build_date_range_condition(self, segment, range)
    }
}

/// Half-open `[start, end)` predicate over the partition date column, and the
/// time column when one is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPartitionConditionBuilder;

impl PartitionConditionBuilder for DefaultPartitionConditionBuilder {
    fn build_date_range_condition(
        &self,
        partition: &PartitionDesc,
        _segment: &Segment,
        range: &SegmentRange,
    ) -> FlatTableResult<String> {
        let Some(date_col) = &partition.date_column else {
            return Ok(String::new());
        };
        let date = date_col.expression.as_str();

        let pattern = match &partition.date_format {
            DateColumnFormat::TimeMillis => {
                return Ok(millis_range(date, range));
            }
            DateColumnFormat::Pattern(p) => p.as_str(),
        };

        let mut conditions = Vec::new();
        match &partition.time_column {
            Some(time_col) => {
                let time = time_col.expression.as_str();
                let time_pattern = partition.time_format.as_str();
                if let Some(start) = range.start {
                    let d0 = format_millis(start, pattern)?;
                    let t0 = format_millis(start, time_pattern)?;
                    conditions.push(format!(
                        "(({date} = '{d0}' AND {time} >= '{t0}') OR ({date} > '{d0}'))"
                    ));
                }
                if let Some(end) = range.end {
                    let d1 = format_millis(end, pattern)?;
                    let t1 = format_millis(end, time_pattern)?;
                    conditions.push(format!(
                        "(({date} = '{d1}' AND {time} < '{t1}') OR ({date} < '{d1}'))"
                    ));
                }
            }
            None => {
                if let Some(start) = range.start {
                    conditions.push(format!("{date} >= '{}'", format_millis(start, pattern)?));
                }
                if let Some(end) = range.end {
                    conditions.push(format!("{date} < '{}'", format_millis(end, pattern)?));
                }
            }
        }
        Ok(conditions.join(" AND "))
    }
}

fn millis_range(column: &str, range: &SegmentRange) -> String {
    let mut conditions = Vec::new();
    if let Some(start) = range.start {
        conditions.push(format!("{column} >= {start}"));
    }
    if let Some(end) = range.end {
        conditions.push(format!("{column} < {end}"));
    }
    conditions.join(" AND ")
}

fn validate_pattern(pattern: &str) -> FlatTableResult<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(FlatTableError::InvalidDateFormat {
            pattern: pattern.to_string(),
        });
    }
    Ok(())
}

/// Render epoch milliseconds in UTC with a `strftime` pattern.
fn format_millis(millis: i64, pattern: &str) -> FlatTableResult<String> {
    validate_pattern(pattern)?;
    let instant = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or(FlatTableError::TimestampOutOfRange { millis })?;
    let mut out = String::new();
    write!(out, "{}", instant.format(pattern)).map_err(|_| FlatTableError::InvalidDateFormat {
        pattern: pattern.to_string(),
    })?;
    Ok(out)
}
