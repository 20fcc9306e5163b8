use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::KeywayError;

const CONFIG_DIR: &str = ".keyway";
const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_API_URL: &str = "https://api.keyway.sh";
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_DOCKER_BINARY: &str = "docker";

const API_URL_VAR: &str = "KEYWAY_API_URL";
const DOCKER_BINARY_VAR: &str = "KEYWAY_DOCKER";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_url: String,
    /// Environment used when `--env` is not given and no prompt is possible.
    pub default_environment: String,
    pub docker_binary: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            default_environment: DEFAULT_ENVIRONMENT.into(),
            docker_binary: DEFAULT_DOCKER_BINARY.into(),
        }
    }
}

impl Config {
    /// Apply `KEYWAY_API_URL` / `KEYWAY_DOCKER` on top of the file values.
    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_VAR).filter(|v| !v.is_empty()) {
            self.api_url = url;
        }
        if let Some(bin) = lookup(DOCKER_BINARY_VAR).filter(|v| !v.is_empty()) {
            self.docker_binary = bin;
        }
        self.api_url = self.api_url.trim_end_matches('/').to_string();
        self
    }
}

/// Returns the config file path for a given project root.
pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Read the project config. A missing file is not an error: defaults apply.
pub fn read(project_root: &Path) -> Result<Config, KeywayError> {
    let path = config_path(project_root);
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(&path)?;
    toml::from_str(&raw).map_err(|e| KeywayError::Config(format!("{}: {}", path.display(), e)))
}

/// Read the project config and apply environment overrides.
pub fn load(project_root: &Path) -> Result<Config, KeywayError> {
    Ok(read(project_root)?.with_overrides(|name| std::env::var(name).ok()))
}

/// Returns the current project root (cwd).
pub fn project_root() -> Result<PathBuf, KeywayError> {
    std::env::current_dir().map_err(KeywayError::Io)
}
