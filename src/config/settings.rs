//! TOML-based configuration for flatgen.
//!
//! Supports a config file (flatgen.toml) with environment variable expansion
//! in string values.
//!
//! Example configuration:
//! ```toml
//! [flat_table]
//! database = "kylin_flat_db"
//! storage_dir = "${HDFS_WORKING_DIR}/flat"
//! storage_format = "TEXTFILE"
//! field_delimiter = ","
//! advanced_generator = "partitioned_insert"
//! ```
//!
//! `advanced_generator` names an insert statement generator registered with a
//! [`crate::plugin::PluginRegistry`] by the embedding program. The `flatgen`
//! CLI registers none and rejects the key.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Flat table generation options.
    pub flat_table: FlatTableSettings,
}

/// Options that shape the generated flat table statements.
///
/// A segment may carry its own copy, which then takes precedence over the
/// process-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FlatTableSettings {
    /// Database the flat table lives in (`USE <database>;`).
    pub database: String,

    /// Directory under which each flat table gets its own location.
    pub storage_dir: String,

    /// Hive storage format (SEQUENCEFILE, TEXTFILE, PARQUET, ORC, ...).
    pub storage_format: String,

    /// Field delimiter, used only with TEXTFILE.
    pub field_delimiter: String,

    /// Name of a registered insert-statement generator that replaces the
    /// built-in INSERT.
    pub advanced_generator: Option<String>,
}

impl Default for FlatTableSettings {
    fn default() -> Self {
        Self {
            database: "default".to_string(),
            storage_dir: "/tmp/flatgen".to_string(),
            storage_format: "SEQUENCEFILE".to_string(),
            field_delimiter: "\u{001F}".to_string(),
            advanced_generator: None,
        }
    }
}

impl FlatTableSettings {
    /// True when INSERT generation is delegated to a plugin.
    pub fn is_advanced_flat_table_used(&self) -> bool {
        self.advanced_generator
            .as_deref()
            .is_some_and(|name| !name.is_empty())
    }

    /// Copy with `${VAR}` / `$VAR` references expanded in every string value.
    pub fn resolved(&self) -> Result<Self, SettingsError> {
        Ok(Self {
            database: expand_env_vars(&self.database)?,
            storage_dir: expand_env_vars(&self.storage_dir)?,
            storage_format: expand_env_vars(&self.storage_format)?,
            field_delimiter: self.field_delimiter.clone(),
            advanced_generator: self
                .advanced_generator
                .as_deref()
                .map(expand_env_vars)
                .transpose()?,
        })
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text and expand environment variables.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        Ok(Settings {
            flat_table: settings.flat_table.resolved()?,
        })
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `FLATGEN_CONFIG`
    /// 2. `./flatgen.toml`
    /// 3. `~/.config/flatgen/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("FLATGEN_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("flatgen.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("flatgen").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            // $VAR ends at the first non-alphanumeric/underscore
            while let Some(&ch) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' {
                    var_name.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            if var_name.is_empty() {
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
