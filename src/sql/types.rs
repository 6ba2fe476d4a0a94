//! Logical-to-Hive type mapping for flat table DDL.
//!
//! Model columns carry logical types such as `varchar(256)` or `integer`.
//! The flat table stores them with Hive's physical types. Only the families
//! Hive spells differently are rewritten; every other type passes through
//! lower-cased, so a new or custom logical type never blocks DDL generation.

use std::fmt;

/// Hive storage type for a flat table column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HiveType {
    /// `string`, for every `varchar(n)`.
    String,

    /// `int`, for `integer`.
    Int,

    /// `bigint`.
    BigInt,

    /// Any other type, lower-cased and otherwise unchanged.
    Passthrough(String),
}

impl HiveType {
    /// Map a logical type by prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use flatgen::sql::types::HiveType;
    ///
    /// assert_eq!(HiveType::from_logical("VARCHAR(256)"), HiveType::String);
    /// assert_eq!(HiveType::from_logical("integer"), HiveType::Int);
    /// assert_eq!(
    ///     HiveType::from_logical("Decimal(19,4)"),
    ///     HiveType::Passthrough("decimal(19,4)".to_string())
    /// );
    /// ```
    pub fn from_logical(logical: &str) -> Self {
        let lower = logical.to_lowercase();
        if lower.starts_with("varchar") {
            HiveType::String
        } else if lower.starts_with("integer") {
            HiveType::Int
        } else if lower.starts_with("bigint") {
            HiveType::BigInt
        } else {
            HiveType::Passthrough(lower)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HiveType::String => "string",
            HiveType::Int => "int",
            HiveType::BigInt => "bigint",
            HiveType::Passthrough(s) => s,
        }
    }
}

impl fmt::Display for HiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hive type name for a logical type.
pub fn hive_data_type(logical: &str) -> String {
    HiveType::from_logical(logical).to_string()
}
