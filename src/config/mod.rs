//! Configuration module for flatgen.
//!
//! Handles the config file, environment variable expansion, and the flat
//! table generation options.

mod settings;

pub use settings::{expand_env_vars, FlatTableSettings, Settings, SettingsError};
