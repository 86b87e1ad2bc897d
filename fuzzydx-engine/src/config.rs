//! Service configuration
//!
//! Combines command-line overrides with the shared root folder resolution
//! and the optional TOML file. Any value not given on the command line
//! falls through to TOML, then to compiled defaults.

use std::path::PathBuf;

use fuzzydx_common::config::{
    CompiledDefaults, RootFolderInitializer, RootFolderResolver, TomlConfig,
};

/// Values supplied on the command line (or their clap `env` fallbacks)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub classifier_model: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved settings for one service run
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub bind_address: String,
    pub classifier_model: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl EngineConfig {
    pub fn resolve(cli: CliOverrides, toml: TomlConfig) -> Self {
        let defaults = CompiledDefaults::for_current_platform();

        let root_folder = cli.root_folder.unwrap_or_else(|| {
            RootFolderResolver::with_config("fuzzydx", toml.clone()).resolve()
        });
        let initializer = RootFolderInitializer::new(root_folder.clone());

        let bind_address = cli
            .bind_address
            .or(toml.bind_address)
            .unwrap_or(defaults.bind_address);

        let classifier_model = cli
            .classifier_model
            .or(toml.classifier_model)
            .unwrap_or_else(|| initializer.classifier_model_path());

        let log_level = cli.log_level.unwrap_or(toml.logging.level);
        let log_file = toml.logging.log_file.or(defaults.log_file);

        Self {
            database_path: initializer.database_path(),
            root_folder,
            bind_address,
            classifier_model,
            log_level,
            log_file,
        }
    }
}
