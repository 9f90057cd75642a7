//! # Scope Configuration
//!
//! Selects the alias variant and any extra aliases without code changes.
//! Sources are layered, later ones winning: defaults, an optional TOML/YAML/JSON
//! file, then `SCOPES_*` environment variables
//! (`SCOPES_ALIAS_VARIANT=direct`, `SCOPES_EXTRA_ALIASES__FILTER=conditions`).

use crate::constants::ENV_PREFIX;
use crate::error::{Result, ScopeError};
use crate::registry::AliasVariant;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Console log output style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    pub alias_variant: AliasVariant,
    /// Public scope name → parameter key, registered on top of the variant's aliases
    pub extra_aliases: HashMap<String, String>,
    pub log_format: LogFormat,
}

impl ScopeConfig {
    /// Defaults overridden by `SCOPES_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Configuration file overridden by `SCOPES_*` environment variables
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::load(Some(path))
    }

    fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading scope configuration file");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| ScopeError::configuration(format!("Failed to load configuration: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| ScopeError::configuration(format!("Invalid scope configuration: {e}")))
    }
}
