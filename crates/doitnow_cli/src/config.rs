//! Layered configuration for the task manager CLI.
//!
//! Priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env`)
//! 3. TOML config file (`<config_dir>/doitnow/config.toml`)
//! 4. Compiled defaults

use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "doitnow";
const DEFAULT_DATA_DIR: &str = "txt_files";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    #[error("failed to resolve working directory: {0}")]
    CurrentDir(std::io::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields optional)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    storage: StorageFileConfig,
    logging: LoggingFileConfig,
}

/// `[storage]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StorageFileConfig {
    data_dir: Option<PathBuf>,
}

/// `[logging]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoggingFileConfig {
    level: Option<String>,
    dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// CLI arguments.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "DO-IT-NOW terminal task manager")]
pub struct CliArgs {
    /// Directory holding users.txt, tasks.txt and the overview reports.
    #[arg(short, long, env = "DOITNOW_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to config file (default: `<config_dir>/doitnow/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, env = "DOITNOW_LOG")]
    pub log_level: Option<String>,

    /// Directory for rolling log files.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved configuration. All paths are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Merges CLI args, env vars and the TOML file.
    ///
    /// An explicit `--config` that cannot be read is an error; a missing
    /// default config file means defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed,
    /// or the working directory cannot be resolved.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        let default_log_root = dirs::data_local_dir().map(|dir| dir.join(APP_DIR_NAME));
        Ok(Self::resolve(cli, &file, &cwd, default_log_root.as_deref()))
    }

    /// Priority: CLI > file > default. Relative paths resolve against `cwd`.
    fn resolve(
        cli: &CliArgs,
        file: &ConfigFile,
        cwd: &Path,
        default_log_root: Option<&Path>,
    ) -> Self {
        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| file.storage.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let data_dir = cwd.join(data_dir);

        let log_dir = cli
            .log_dir
            .clone()
            .or_else(|| file.logging.dir.clone())
            .map(|dir| cwd.join(dir))
            .or_else(|| default_log_root.map(|root| root.join("logs")))
            .unwrap_or_else(|| data_dir.join("logs"));

        let log_level = cli
            .log_level
            .clone()
            .or_else(|| file.logging.level.clone())
            .unwrap_or_else(|| doitnow_core::default_log_level().to_string());

        Self {
            data_dir,
            log_level,
            log_dir,
        }
    }
}

fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(path) = explicit_path {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    let path = config_dir.join(APP_DIR_NAME).join("config.toml");
    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(source) => Err(ConfigError::ReadFile { path, source }),
    }
}
