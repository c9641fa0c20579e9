use crate::constants::*;
use crate::error::{ImporterError, Result};
use crate::types::RecordKind;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

pub const OUTPUT_DIR_ENV: &str = "ISO_IMPORTER_OUTPUT_DIR";
pub const CACHE_DIR_ENV: &str = "ISO_IMPORTER_CACHE_DIR";
pub const TIMEOUT_ENV: &str = "ISO_IMPORTER_TIMEOUT_SECONDS";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub timeout_seconds: u64,
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub deliverables_url: String,
    pub technical_committees_url: String,
    pub ics_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            sources: SourcesConfig::default(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            deliverables_url: DELIVERABLES_SOURCE_URL.to_string(),
            technical_committees_url: TC_SOURCE_URL.to_string(),
            ics_url: ICS_SOURCE_URL.to_string(),
        }
    }
}

impl SourcesConfig {
    pub fn url_for(&self, kind: RecordKind) -> &str {
        match kind {
            RecordKind::Deliverable => &self.deliverables_url,
            RecordKind::TechnicalCommittee => &self.technical_committees_url,
            RecordKind::IcsEntry => &self.ics_url,
        }
    }
}

impl Config {
    /// Loads `config.toml` from the working directory when present, then applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH), false)
    }

    /// `required` makes a missing file an error; otherwise defaults are used.
    pub fn load_from(path: &Path, required: bool) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                ImporterError::Config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            Self::from_toml_str(&content)?
        } else if required {
            return Err(ImporterError::Config(format!(
                "Config file '{}' does not exist",
                path.display()
            )));
        } else {
            Self::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(CACHE_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.cache_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            self.timeout_seconds = raw.trim().parse().map_err(|_| {
                ImporterError::Config(format!("{} must be a whole number of seconds, got '{}'", TIMEOUT_ENV, raw))
            })?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
