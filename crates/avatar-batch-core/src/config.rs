use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// How the scanner walks the input root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Traversal {
    /// Only regular files directly inside the root
    Flat,

    /// Descend into every subdirectory
    Recursive,
}

/// Which front end drives the run; decides how outcomes are counted and worded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presentation {
    /// Command-line script: not-found and errors are separate buckets
    Cli,

    /// Upload form: not-found is also counted as an error
    Web,
}

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Settings for a single batch run. Fixed for the duration of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Replace pictures of users that already have one
    pub overwrite: bool,

    /// Report what would happen without touching the store
    pub preview: bool,

    /// Directory walk mode
    pub traversal: Traversal,

    /// Counting and wording rules
    pub presentation: Presentation,
}

impl RunConfig {
    /// Settings used by the command-line script
    pub fn cli(overwrite: bool, preview: bool) -> Self {
        Self {
            overwrite,
            preview,
            traversal: Traversal::Flat,
            presentation: Presentation::Cli,
        }
    }

    /// Settings used by the archive upload form. The form has no preview option.
    pub fn web(overwrite: bool) -> Self {
        Self {
            overwrite,
            preview: false,
            traversal: Traversal::Recursive,
            presentation: Presentation::Web,
        }
    }
}

/// Environment configuration: where the store and the rendered icons live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite user database
    pub database_path: PathBuf,

    /// Root directory for rendered profile icons
    pub icon_dir: PathBuf,

    /// Square edge lengths of the rendered icons, written as f1, f2, ... in this order
    pub icon_sizes: Vec<u32>,

    /// Log level
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("avatar-batch.db"),
            icon_dir: PathBuf::from("icons"),
            icon_sizes: vec![100, 35, 512],
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Configuration(format!("Failed to open config file: {}", e)))?;

        let config: Config = serde_json::from_reader(file)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| Error::Configuration(format!("Failed to create config file: {}", e)))?;

        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(Error::Configuration(
                "Database path must not be empty".to_string(),
            ));
        }

        if self.icon_dir.as_os_str().is_empty() {
            return Err(Error::Configuration(
                "Icon directory must not be empty".to_string(),
            ));
        }

        if self.icon_sizes.is_empty() {
            return Err(Error::Configuration(
                "At least one icon size must be configured".to_string(),
            ));
        }

        if self.icon_sizes.iter().any(|&size| size == 0) {
            return Err(Error::Configuration(
                "Icon sizes must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
