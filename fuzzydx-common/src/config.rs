//! Configuration loading and root folder resolution
//!
//! Root folder resolution priority:
//! 1. Command-line argument (applied by the binary before calling the resolver)
//! 2. Environment variable (`FUZZYDX_ROOT_FOLDER`)
//! 3. TOML config file (`<config_dir>/fuzzydx/config.toml`)
//! 4. OS-dependent compiled default
//!
//! A missing or malformed TOML file never aborts startup: a warning is logged
//! and compiled defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "FUZZYDX_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "fuzzydx.db";

/// Default classifier model file name inside the root folder
pub const CLASSIFIER_MODEL_FILE_NAME: &str = "disease_classifier.json";

/// Compiled-in defaults used when no other source provides a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub bind_address: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let root_folder = dirs::data_local_dir()
            .map(|d| d.join("fuzzydx"))
            .unwrap_or_else(|| PathBuf::from("./fuzzydx_data"));

        Self {
            root_folder,
            log_level: "info".to_string(),
            log_file: None,
            bind_address: "127.0.0.1:5780".to_string(),
        }
    }
}

/// `[logging]` table of the TOML config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_file: None,
        }
    }
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub classifier_model: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default location of the TOML config file for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fuzzydx").join("config.toml"))
}

/// Load and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load the TOML config if present, falling back to defaults on any problem
pub fn load_or_default(path: Option<&Path>) -> TomlConfig {
    let Some(path) = path else {
        return TomlConfig::default();
    };

    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return TomlConfig::default();
    }

    match load_toml_config(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{} - using compiled defaults", e);
            TomlConfig::default()
        }
    }
}

/// Resolves the root folder following the priority order in the module docs
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    toml: TomlConfig,
}

impl RootFolderResolver {
    /// Resolver using an already loaded TOML config
    pub fn with_config(module_name: &str, toml: TomlConfig) -> Self {
        Self {
            module_name: module_name.to_string(),
            toml,
        }
    }

    pub fn resolve(&self) -> PathBuf {
        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                debug!("[{}] root folder from {}", self.module_name, ROOT_FOLDER_ENV);
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml.root_folder {
            debug!("[{}] root folder from TOML config", self.module_name);
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and derives file locations inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            debug!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }

    pub fn classifier_model_path(&self) -> PathBuf {
        self.root_folder.join(CLASSIFIER_MODEL_FILE_NAME)
    }
}
