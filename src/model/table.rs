// src/model/table.rs
use std::sync::Arc;

/// A physical table as it appears in generated SQL.
///
/// A model may alias one physical table several times for different roles, so
/// join targets are compared by `Arc` identity (see [`TableRef::same_ref`]),
/// never by identity string. The type has no `PartialEq`:
///
/// ```compile_fail
/// use flatgen::model::TableRef;
///
/// let buyer = TableRef::new("DEFAULT.KYLIN_ACCOUNT", "BUYER_ACCOUNT");
/// let seller = TableRef::new("DEFAULT.KYLIN_ACCOUNT", "SELLER_ACCOUNT");
/// assert!(*buyer != *seller);
/// ```
#[derive(Debug, Clone)]
pub struct TableRef {
    /// Fully-qualified identity, e.g. `DEFAULT.KYLIN_SALES`.
    pub identity: String,
    /// Bare table name, e.g. `KYLIN_SALES`.
    pub name: String,
    /// Alias given to the table in the FROM clause.
    pub alias: String,
}

impl TableRef {
    /// Create a shared table reference.
    ///
    /// The bare name is the part of `identity` after the last `.`.
    pub fn new(identity: impl Into<String>, alias: impl Into<String>) -> Arc<Self> {
        let identity = identity.into();
        let name = identity
            .rsplit('.')
            .next()
            .unwrap_or(identity.as_str())
            .to_string();
        Arc::new(Self {
            identity,
            name,
            alias: alias.into(),
        })
    }

    /// True when both handles point at the same reference.
    pub fn same_ref(a: &Arc<TableRef>, b: &Arc<TableRef>) -> bool {
        Arc::ptr_eq(a, b)
    }
}

/// A column of a [`TableRef`].
#[derive(Debug, Clone)]
pub struct ColumnRef {
    pub table: Arc<TableRef>,
    pub name: String,
    /// Logical data type, e.g. `varchar(256)` or `bigint`.
    pub data_type: String,
    /// SQL fragment used to select the column; a plain qualified name or a
    /// computed expression.
    pub expression: String,
}

impl ColumnRef {
    /// Column selected as `<alias>.<name>`.
    pub fn new(
        table: &Arc<TableRef>,
        name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let expression = format!("{}.{}", table.alias, name);
        Self {
            table: Arc::clone(table),
            name,
            data_type: data_type.into(),
            expression,
        }
    }

    /// Replace the source expression (computed columns).
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = expression.into();
        self
    }

    pub fn table_alias(&self) -> &str {
        &self.table.alias
    }

    /// `<table-name>.<column-name>`, the key used by the skip-as set.
    pub fn total_name(&self) -> String {
        format!("{}.{}", self.table.name, self.name)
    }
}
