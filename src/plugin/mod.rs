//! Named insert-statement generators that can replace the built-in INSERT.
//!
//! Generators are registered under a name at startup. Configuration selects one
//! through `advanced_generator`; [`crate::generator::FlatTableGenerator`]
//! validates the name against the registry when it is built and dispatches to
//! the generator on every insert.
//!
//! ```
//! use flatgen::model::FlatTableDesc;
//! use flatgen::plugin::PluginRegistry;
//!
//! let mut registry = PluginRegistry::new();
//! registry.register_fn("truncate_first", |desc: &FlatTableDesc| {
//!     Ok(format!("TRUNCATE TABLE {};\n", desc.table_name()))
//! });
//! assert!(registry.contains("truncate_first"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{FlatTableError, FlatTableResult, PluginError};
use crate::model::FlatTableDesc;

/// Replacement for the built-in INSERT statement.
///
/// Implementations are opaque collaborators and may have side effects.
pub trait InsertStatementGenerator: Send + Sync {
    fn generate_insert_data_statement(&self, desc: &FlatTableDesc) -> Result<String, PluginError>;
}

impl<F> InsertStatementGenerator for F
where
    F: Fn(&FlatTableDesc) -> Result<String, PluginError> + Send + Sync,
{
    fn generate_insert_data_statement(&self, desc: &FlatTableDesc) -> Result<String, PluginError> {
        self(desc)
    }
}

/// Table of insert-statement generators keyed by name.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    generators: BTreeMap<String, Arc<dyn InsertStatementGenerator>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generator, replacing any previous one with the same name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        generator: Arc<dyn InsertStatementGenerator>,
    ) -> &mut Self {
        self.generators.insert(name.into(), generator);
        self
    }

    /// Register a closure as a generator.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&FlatTableDesc) -> Result<String, PluginError> + Send + Sync + 'static,
    {
        self.register(name, Arc::new(f))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }

    /// Look up a generator by name.
    pub fn resolve(&self, name: &str) -> FlatTableResult<Arc<dyn InsertStatementGenerator>> {
        self.generators
            .get(name)
            .cloned()
            .ok_or_else(|| FlatTableError::plugin_not_registered(name))
    }

    /// Resolve `name` and run it, wrapping any failure with the generator name.
    pub fn dispatch(&self, name: &str, desc: &FlatTableDesc) -> FlatTableResult<String> {
        let generator = self.resolve(name)?;
        generator
            .generate_insert_data_statement(desc)
            .map_err(|e| FlatTableError::plugin_failed(name, e))
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("generators", &self.generators.keys().collect::<Vec<_>>())
            .finish()
    }
}
