//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use gm_core::ConflictPolicy;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Whether enrollment stops at the first conflicting discipline or reports all of them.
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("gm.db"),
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (GM_*)
        figment = figment.merge(Env::prefixed("GM_"));

        figment.extract()
    }

    /// Opens the configured database, creating its directory if needed.
    pub fn open_database(&self) -> anyhow::Result<gm_db::Database> {
        use anyhow::Context;

        if let Some(parent) = self.database_path.parent() {
            std::fs::create_dir_all(parent).context("failed to create database directory")?;
        }
        gm_db::Database::open(&self.database_path)
            .with_context(|| format!("failed to open {}", self.database_path.display()))
    }
}

/// Returns the platform-specific config directory for gm.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("gm"))
}

/// Returns the platform-specific data directory for gm.
///
/// On Linux: `~/.local/share/gm`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("gm"))
}
