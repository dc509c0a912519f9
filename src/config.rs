//! Chunker configuration, persisted as TOML.
//!
//! All tunables live in one explicit struct handed to the builder at
//! construction. Environment overrides exist for deployments that cannot ship
//! a config file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChunkError, ChunkResult};

/// Environment variable overriding [`ChunkerConfig::numeric_threshold`].
pub const ENV_NUMERIC_THRESHOLD: &str = "STRATA_NUMERIC_THRESHOLD";
/// Environment variable overriding [`ChunkerConfig::row_cap`].
pub const ENV_ROW_CAP: &str = "STRATA_ROW_CAP";

/// Tuning knobs for the semantic chunker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Minimum share of non-empty cells that must parse as numbers before a
    /// column gets statistics.
    #[serde(default = "default_numeric_threshold")]
    pub numeric_threshold: f64,
    /// Maximum rows per `table_query` chunk; larger tables are split.
    #[serde(default = "default_row_cap")]
    pub row_cap: usize,
    /// Separator used when serialising a structural path.
    #[serde(default = "default_path_separator")]
    pub path_separator: String,
    /// Mention the enclosing section in the table overview text.
    #[serde(default = "default_true")]
    pub include_path_in_overview: bool,
}

fn default_numeric_threshold() -> f64 {
    0.5
}
fn default_row_cap() -> usize {
    50
}
fn default_path_separator() -> String {
    " > ".into()
}
fn default_true() -> bool {
    true
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            numeric_threshold: default_numeric_threshold(),
            row_cap: default_row_cap(),
            path_separator: default_path_separator(),
            include_path_in_overview: default_true(),
        }
    }
}

impl ChunkerConfig {
    /// Load from a TOML file. Missing fields take their defaults.
    pub fn load(path: &Path) -> ChunkResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ChunkError::ConfigRead {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ChunkError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ChunkResult<()> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Render as pretty TOML.
    pub fn to_toml(&self) -> ChunkResult<String> {
        toml::to_string_pretty(self).map_err(|e| ChunkError::Serialize {
            message: e.to_string(),
        })
    }

    /// Apply `STRATA_*` environment overrides. Unparsable values are ignored.
    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(ENV_NUMERIC_THRESHOLD) {
            match raw.trim().parse::<f64>() {
                Ok(v) => self.numeric_threshold = v,
                Err(e) => tracing::warn!(key = ENV_NUMERIC_THRESHOLD, value = %raw, error = %e, "ignoring override"),
            }
        }
        if let Some(raw) = lookup(ENV_ROW_CAP) {
            match raw.trim().parse::<usize>() {
                Ok(v) => self.row_cap = v,
                Err(e) => tracing::warn!(key = ENV_ROW_CAP, value = %raw, error = %e, "ignoring override"),
            }
        }
        self
    }

    /// Reject values the builder cannot work with.
    pub fn validate(&self) -> ChunkResult<()> {
        if !(0.0..=1.0).contains(&self.numeric_threshold) {
            return Err(ChunkError::InvalidConfig {
                field: "numeric_threshold".into(),
                message: format!("{} is outside [0, 1]", self.numeric_threshold),
            });
        }
        if self.row_cap == 0 {
            return Err(ChunkError::InvalidConfig {
                field: "row_cap".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
