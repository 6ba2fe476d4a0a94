//! Error types for statement generation.

use thiserror::Error;

/// Error raised by an insert-statement plugin.
pub type PluginError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for statement generation.
pub type FlatTableResult<T> = Result<T, FlatTableError>;

/// Errors that abort generation of a statement.
///
/// Generation is deterministic, so none of these are worth retrying with the
/// same descriptor.
#[derive(Error, Debug)]
pub enum FlatTableError {
    /// A lookup join pairs a different number of primary-key and foreign-key columns.
    #[error(
        "invalid join condition of lookup table {table}: {primary_keys} primary key column(s) vs {foreign_keys} foreign key column(s)"
    )]
    JoinArity {
        /// Identity of the offending lookup table.
        table: String,
        primary_keys: usize,
        foreign_keys: usize,
    },

    /// The configured insert-statement generator could not be resolved or failed.
    ///
    /// The generator's own error, when there is one, is the `source`.
    #[error("insert statement generator '{name}' {reason}")]
    PluginResolution {
        /// Name the generator was configured under.
        name: String,
        reason: String,
        #[source]
        source: Option<PluginError>,
    },

    /// A partition date or time format is not a valid `strftime` pattern.
    #[error("invalid partition format '{pattern}'")]
    InvalidDateFormat { pattern: String },

    /// A segment bound cannot be rendered as a calendar date.
    #[error("segment bound {millis} is outside the representable date range")]
    TimestampOutOfRange { millis: i64 },
}

impl FlatTableError {
    pub(crate) fn plugin_not_registered(name: &str) -> Self {
        FlatTableError::PluginResolution {
            name: name.to_string(),
            reason: "is not registered".to_string(),
            source: None,
        }
    }

    pub(crate) fn plugin_failed(name: &str, source: PluginError) -> Self {
        FlatTableError::PluginResolution {
            name: name.to_string(),
            reason: "failed".to_string(),
            source: Some(source),
        }
    }
}
