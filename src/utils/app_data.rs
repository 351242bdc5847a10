use crate::index::types::BuildOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const APP_NAME: &str = "dirjump";
const CONFIG_FILE: &str = "config.json";
const INDEX_FILE: &str = "directories.idx";

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory indexed by `dirjump index` when no path is given.
    /// Defaults to the home directory.
    #[serde(default)]
    pub default_root: Option<PathBuf>,

    /// Where the index is stored. Defaults to the app data directory.
    #[serde(default)]
    pub index_file: Option<PathBuf>,

    /// Minimum length of a word inside a directory name to be searchable
    /// on its own
    #[serde(default = "default_min_word_len")]
    pub min_word_len: usize,

    /// Glob patterns for directory names to skip while indexing
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

fn default_min_word_len() -> usize {
    BuildOptions::default().min_word_len
}

fn default_exclude() -> Vec<String> {
    BuildOptions::default().exclude
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_root: None,
            index_file: None,
            min_word_len: default_min_word_len(),
            exclude: default_exclude(),
        }
    }
}

impl AppConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::from_json(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Options passed to the index builder
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            min_word_len: self.min_word_len,
            exclude: self.exclude.clone(),
        }
    }

    /// Index file location, honoring the `index_file` override
    pub fn index_path(&self) -> Result<PathBuf> {
        match &self.index_file {
            Some(path) => Ok(path.clone()),
            None => Ok(get_app_data_dir()?.join(INDEX_FILE)),
        }
    }

    /// Root to index when none is given on the command line
    pub fn root(&self) -> Result<PathBuf> {
        match &self.default_root {
            Some(root) => Ok(root.clone()),
            None => dirs::home_dir().context("Could not determine home directory"),
        }
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    let app_dir = base.join(APP_NAME);

    fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}
