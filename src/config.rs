//! Configuration Management
//!
//! Handles persistent configuration storage for launchpad.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::hierarchy::DEFAULT_INDENT_SIZE;

/// User configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Spaces per level in `dump` output
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,
    /// Inputs of the last successful run
    #[serde(default)]
    pub last_paths: Vec<PathBuf>,
}

fn default_indent_size() -> usize {
    DEFAULT_INDENT_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_size: DEFAULT_INDENT_SIZE,
            last_paths: Vec::new(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("launchpad").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get effective inputs (CLI > last run)
    pub fn effective_paths(&self, cli_paths: &[PathBuf]) -> Vec<PathBuf> {
        if cli_paths.is_empty() {
            self.last_paths.clone()
        } else {
            cli_paths.to_vec()
        }
    }

    /// Get effective indent size (CLI > config)
    pub fn effective_indent(&self, cli_indent: Option<usize>) -> usize {
        cli_indent.unwrap_or(self.indent_size)
    }

    /// Remember inputs and save
    pub fn set_last_paths(&mut self, paths: &[PathBuf]) -> Result<()> {
        self.last_paths = paths.to_vec();
        self.save()
    }
}
