//! Configuration File Loading
//!
//! Finds and parses the TOML configuration file. Lookup order:
//!
//! 1. An explicit path (`--config` or `PTYREDACT_CONFIG`); it must exist
//! 2. `<config dir>/ptyredact/config.toml`, e.g. `~/.config/ptyredact/config.toml`
//! 3. Built-in defaults

use std::fs;
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::{Error, Result};

/// Configuration file loader
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Candidate paths tried in order when no explicit path is given
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Loader using the platform's default search paths
    pub fn new() -> Self {
        Self {
            search_paths: Self::get_search_paths(),
        }
    }

    /// Loader with custom search paths
    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Load and validate the configuration
    ///
    /// A missing explicit path is an error; missing search-path files are
    /// skipped. The returned path is the file that was used, if any.
    pub fn load(&self, explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
        if let Some(path) = explicit {
            let config = Self::load_config_file(path)?;
            return Ok((config, Some(path.to_path_buf())));
        }

        for path in &self.search_paths {
            if path.is_file() {
                let config = Self::load_config_file(path)?;
                return Ok((config, Some(path.clone())));
            }
        }

        let config = Config::default();
        config.validate()?;
        Ok((config, None))
    }

    /// Parse and validate a single file
    pub fn load_config_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Default configuration file location
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ptyredact").join("config.toml"))
    }

    fn get_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(path) = Self::default_config_path() {
            paths.push(path);
        }

        // Home directory fallback for platforms whose config dir is elsewhere
        if let Some(home) = dirs::home_dir() {
            let dotfile = home.join(".config").join("ptyredact").join("config.toml");
            if !paths.contains(&dotfile) {
                paths.push(dotfile);
            }
        }

        paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
