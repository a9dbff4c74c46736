//! Application configuration layered from defaults, a TOML file, and the
//! environment.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::roster::MusterPolicy;

/// Directory under the user's config dir holding the config file.
pub const CONFIG_DIR: &str = "muster";
/// Config file name.
pub const CONFIG_FILE: &str = "muster.toml";
/// Prefix for environment overrides, e.g. `MUSTER_CATALOG_PATH`.
pub const ENV_PREFIX: &str = "MUSTER";

/// Runtime settings for frontends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog JSON document to load.
    pub catalog_path: PathBuf,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Enforce mustering rules inside `add_unit` as well as in the view.
    pub strict_mustering: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/boarding_actions.json"),
            log_filter: "info".to_string(),
            strict_mustering: false,
        }
    }
}

impl AppConfig {
    /// Default config file location under the user's config directory.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR)
            .join(CONFIG_FILE)
    }

    /// Load settings from the default config file and `MUSTER_*` variables.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load settings from `path` (optional on disk) and `MUSTER_*` variables.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::build(path.as_ref(), Environment::with_prefix(ENV_PREFIX))
    }

    fn build(path: &Path, environment: Environment) -> Result<Self> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default(
                "catalog_path",
                defaults.catalog_path.to_string_lossy().to_string(),
            )?
            .set_default("log_filter", defaults.log_filter)?
            .set_default("strict_mustering", defaults.strict_mustering)?
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(environment)
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid config {}", path.display()))
    }

    /// Mustering policy implied by `strict_mustering`.
    pub fn muster_policy(&self) -> MusterPolicy {
        if self.strict_mustering {
            MusterPolicy::Strict
        } else {
            MusterPolicy::Lenient
        }
    }
}

/// Write a default config file at the standard location if none exists.
pub fn ensure_default_config() -> Result<PathBuf> {
    ensure_default_config_at(AppConfig::config_path())
}

/// Write a default config file at `path` if none exists, returning the path.
pub fn ensure_default_config_at(path: impl Into<PathBuf>) -> Result<PathBuf> {
    let path = path.into();
    if path.exists() {
        return Ok(path);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }

    let defaults = AppConfig::default();
    let contents = format!(
        "# Catalog document with factions, detachments, and mustering rules.\n\
         catalog_path = \"{}\"\n\
         # Log filter used when RUST_LOG is unset.\n\
         log_filter = \"{}\"\n\
         # Reject adds that the mustering rules disallow.\n\
         strict_mustering = {}\n",
        defaults.catalog_path.display(),
        defaults.log_filter,
        defaults.strict_mustering
    );
    fs::write(&path, contents)
        .with_context(|| format!("failed to write config {}", path.display()))?;
    info!("wrote default config to {}", path.display());
    Ok(path)
}
