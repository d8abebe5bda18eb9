use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::Deserialize;

use crate::pricing::RateOverrides;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Machine family whose preset rates are used.
    pub family: Option<String>,
    /// Date the rates were last checked, shown in the footer.
    pub as_of: Option<NaiveDate>,
    #[serde(default)]
    pub rates: RateOverrides,
    #[serde(default)]
    pub inputs: InputDefaults,
}

/// Usage values that replace the built-in defaults. Unset fields fall
/// through.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InputDefaults {
    pub gpus: Option<u32>,
    pub daily_hours: Option<u32>,
    pub days_per_week: Option<u32>,
    pub period_days: Option<u32>,
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gpucost").map(|d| d.config_dir().join("config.toml"))
}

pub fn parse_config(data: &str) -> Result<Config> {
    Ok(toml::from_str(data)?)
}

/// Read the config at `path`. A missing file is `Ok(None)`; anything else
/// that goes wrong is an error.
pub fn read_config(path: &Path) -> Result<Option<Config>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    let config =
        parse_config(&data).with_context(|| format!("invalid config at {}", path.display()))?;
    Ok(Some(config))
}

/// Load the config, falling back to defaults when it is missing or broken.
pub fn load_config(path: Option<&Path>) -> Config {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return Config::default(),
        },
    };

    match read_config(&path) {
        Ok(Some(config)) => {
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        Ok(None) => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Config::default()
        }
        Err(e) => {
            tracing::warn!("{e:#}; using defaults");
            Config::default()
        }
    }
}
