//! Settings-aware entry point for flat table statement generation.
//!
//! [`FlatTableGenerator`] binds the process-wide [`FlatTableSettings`] and the
//! [`PluginRegistry`] once, validating the configured insert generator up
//! front, and then generates statements for any number of descriptors. It is
//! `Send + Sync` and holds no per-descriptor state.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::FlatTableSettings;
use crate::error::{FlatTableError, FlatTableResult};
use crate::model::FlatTableDesc;
use crate::plugin::PluginRegistry;
use crate::sql::{ddl, dml, redistribute};

/// Generates every flat table statement for a descriptor.
#[derive(Debug, Clone)]
pub struct FlatTableGenerator {
    settings: Arc<FlatTableSettings>,
    plugins: PluginRegistry,
}

impl FlatTableGenerator {
    /// Bind settings and plugins.
    ///
    /// Fails with [`FlatTableError::PluginResolution`] when the settings name an
    /// insert generator that is not registered.
    pub fn new(settings: Arc<FlatTableSettings>, plugins: PluginRegistry) -> FlatTableResult<Self> {
        validate_plugin(&settings, &plugins)?;
        Ok(Self { settings, plugins })
    }

    /// Generator with default settings and no plugins.
    pub fn with_defaults() -> Self {
        Self {
            settings: Arc::new(FlatTableSettings::default()),
            plugins: PluginRegistry::new(),
        }
    }

    pub fn settings(&self) -> &FlatTableSettings {
        &self.settings
    }

    /// Settings in effect for `desc`: the segment's own when it has one.
    pub fn effective_settings<'a>(&'a self, desc: &'a FlatTableDesc) -> &'a FlatTableSettings {
        desc.segment()
            .map(|segment| segment.settings.as_ref())
            .unwrap_or(self.settings.as_ref())
    }

    pub fn init_statements(&self) -> String {
        dml::init_statements(&self.settings.database)
    }

    /// CREATE EXTERNAL TABLE with the effective storage format and delimiter,
    /// located under the configured storage directory.
    pub fn create_table_statement(&self, desc: &FlatTableDesc) -> String {
        let settings = self.effective_settings(desc);
        ddl::create_table_statement_with_settings(desc, &settings.storage_dir, settings)
    }

    pub fn drop_table_statement(&self, desc: &FlatTableDesc) -> String {
        ddl::drop_table_statement(desc)
    }

    pub fn select_statement(
        &self,
        desc: &FlatTableDesc,
        single_line: bool,
        skip_as: &[String],
    ) -> FlatTableResult<String> {
        dml::select_statement(desc, single_line, skip_as)
    }

    pub fn count_statement(&self, desc: &FlatTableDesc, output_dir: &str) -> FlatTableResult<String> {
        dml::count_statement(desc, output_dir)
    }

    /// INSERT OVERWRITE for the flat table.
    ///
    /// When the effective settings name an insert generator, the statement is
    /// produced entirely by that generator. A missing or failing generator is
    /// an error; there is no fallback to the built-in statement.
    pub fn insert_statement(&self, desc: &FlatTableDesc) -> FlatTableResult<String> {
        let settings = self.effective_settings(desc);
        match settings.advanced_generator.as_deref() {
            Some(name) if settings.is_advanced_flat_table_used() => {
                info!(table = desc.table_name(), generator = name, "delegating insert statement");
                self.plugins.dispatch(name, desc)
            }
            _ => dml::insert_statement(desc),
        }
    }

    /// INSERT OVERWRITE for incremental loads; never delegated.
    pub fn insert_partial_statement(&self, desc: &FlatTableDesc) -> FlatTableResult<String> {
        dml::insert_partial_statement(desc)
    }

    pub fn redistribute_statement(&self, desc: &FlatTableDesc) -> String {
        redistribute::redistribute_statement(desc)
    }

    /// Full materialization script: init, drop, create, insert, redistribute.
    pub fn materialize_statements(&self, desc: &FlatTableDesc) -> FlatTableResult<Vec<String>> {
        let insert = self.insert_statement(desc)?;
        let statements = vec![
            self.init_statements(),
            self.drop_table_statement(desc),
            self.create_table_statement(desc),
            insert,
            self.redistribute_statement(desc),
        ];
        debug!(table = desc.table_name(), count = statements.len(), "generated materialization script");
        Ok(statements)
    }
}

fn validate_plugin(settings: &FlatTableSettings, plugins: &PluginRegistry) -> FlatTableResult<()> {
    match settings.advanced_generator.as_deref() {
        Some(name) if settings.is_advanced_flat_table_used() && !plugins.contains(name) => {
            Err(FlatTableError::plugin_not_registered(name))
        }
        _ => Ok(()),
    }
}
