//! Core functionality for setting user profile pictures in bulk.
//!
//! Picture files are named after a user's matching field (the student number
//! stored in `lastname`), e.g. `2025100123.png`. This library provides:
//! - Discovery of picture files in a directory or an extracted ZIP archive
//! - Key extraction and user lookup
//! - The overwrite / preview policy
//! - Icon rendering and storing the new revision on the user
//! - Per-file report lines and aggregate statistics

// -- External Dependencies --
use log::info;
use std::io::Write;
use std::path::Path;

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::{Config, LogLevel, Presentation, RunConfig, Traversal};
pub use error::{Error, Result};
pub use persistence::{SqliteUserStore, UserStore};
pub use processing::{IconProcessor, IconService};
pub use report::BatchStats;
pub use runner::BatchRunner;
pub use types::*;

// -- Public Modules --
pub mod archive;
pub mod config;
pub mod discovery;
pub mod logging;
pub mod matching;
pub mod persistence;
pub mod policy;
pub mod processing;
pub mod report;
pub mod runner;
pub mod types;

/// Main entry point: a user database plus an icon renderer
pub struct AvatarBatch {
    store: SqliteUserStore,
    icons: IconService,
}

impl AvatarBatch {
    /// Open the user database and prepare the icon renderer.
    ///
    /// The database must already exist; a wrong path is an error rather than
    /// a fresh empty store.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let store = SqliteUserStore::open_existing(&config.database_path)?;
        let icons = IconService::from_config(&config);

        info!(
            "Using database {} and icon directory {}",
            config.database_path.display(),
            config.icon_dir.display()
        );

        Ok(Self { store, icons })
    }

    pub fn store(&self) -> &SqliteUserStore {
        &self.store
    }

    /// Command-line flow: flat scan of `directory`
    pub fn run_directory<W: Write>(
        &self,
        directory: &Path,
        overwrite: bool,
        preview: bool,
        out: W,
    ) -> Result<BatchStats> {
        BatchRunner::new(&self.store, &self.icons, RunConfig::cli(overwrite, preview))
            .run_directory(directory, out)
    }

    /// Upload-form flow: extract `archive` and scan it recursively
    pub fn run_archive<W: Write>(&self, archive: &Path, overwrite: bool, out: W) -> Result<BatchStats> {
        BatchRunner::new(&self.store, &self.icons, RunConfig::web(overwrite))
            .run_archive(archive, out)
    }
}
