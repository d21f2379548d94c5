use log::{debug, info, warn};
use std::io::Write;
use std::path::Path;

use crate::archive;
use crate::config::RunConfig;
use crate::discovery::Scanner;
use crate::error::Result;
use crate::matching::match_user;
use crate::persistence::UserStore;
use crate::policy::{decide, Decision};
use crate::processing::{apply_picture, IconProcessor};
use crate::report::{BatchReporter, BatchStats};
use crate::types::{Candidate, Outcome, OutcomeKind};

/// Drives a batch: scan, then match, decide, apply and report per candidate.
///
/// Single-threaded and synchronous. A failing candidate is recorded and the
/// run moves on; only an unreadable input root aborts the run. There is no
/// guard against a second run on the same store, and nothing is rolled back
/// if the process is killed half way.
pub struct BatchRunner<'a, S: ?Sized, P: ?Sized> {
    store: &'a S,
    processor: &'a P,
    config: RunConfig,
}

impl<'a, S, P> BatchRunner<'a, S, P>
where
    S: UserStore + ?Sized,
    P: IconProcessor + ?Sized,
{
    pub fn new(store: &'a S, processor: &'a P, config: RunConfig) -> Self {
        Self {
            store,
            processor,
            config,
        }
    }

    /// Process every candidate below `root`, writing one report line each to `out`
    pub fn run_directory<W: Write>(&self, root: &Path, out: W) -> Result<BatchStats> {
        let candidates = Scanner::new(root, self.config.traversal).candidates()?;
        info!(
            "Starting batch over {} (overwrite: {}, preview: {})",
            root.display(),
            self.config.overwrite,
            self.config.preview
        );

        let mut reporter = BatchReporter::new(out, self.config.presentation);
        for candidate in candidates {
            let outcome = self.process_candidate(&candidate);
            reporter.record(&outcome)?;
        }
        let stats = reporter.finish()?;

        debug_assert!(stats.is_consistent(self.config.presentation));
        info!(
            "Batch finished: {} total, {} updated, {} skipped, {} not found, {} errors",
            stats.total, stats.updated, stats.skipped, stats.notfound, stats.errors
        );
        Ok(stats)
    }

    /// Extract a ZIP archive to a temporary directory and process its contents.
    ///
    /// The temporary directory is removed before returning, whatever the result.
    pub fn run_archive<W: Write>(&self, archive_path: &Path, out: W) -> Result<BatchStats> {
        self.run_archive_in(archive_path, &std::env::temp_dir(), out)
    }

    /// [`BatchRunner::run_archive`] with the extraction directory created below `scratch`
    pub fn run_archive_in<W: Write>(
        &self,
        archive_path: &Path,
        scratch: &Path,
        out: W,
    ) -> Result<BatchStats> {
        let extracted = archive::extract_to_temp_in(archive_path, scratch)?;
        let result = self.run_directory(extracted.path(), out);
        if let Err(e) = extracted.close() {
            warn!("Failed to remove extraction directory: {}", e);
        }
        result
    }

    /// Run one candidate through the pipeline. Never fails; problems are
    /// reported in the returned outcome.
    pub fn process_candidate(&self, candidate: &Candidate) -> Outcome {
        if !candidate.format.is_supported() {
            return Outcome::new(OutcomeKind::Error, candidate)
                .with_message(format!("unsupported file extension '{}'", candidate.extension));
        }

        let user = match match_user(self.store, &candidate.key) {
            Ok(Some(user)) => user,
            Ok(None) => return Outcome::new(OutcomeKind::NotFound, candidate),
            Err(e) => {
                return Outcome::new(OutcomeKind::Error, candidate)
                    .with_message(format!("user lookup failed: {}", e))
            }
        };
        let matched = user.to_matched();

        let has_picture = match self.store.picture(user.id) {
            Ok(picture) => picture != 0,
            Err(e) => {
                return Outcome::new(OutcomeKind::Error, candidate)
                    .with_user(matched)
                    .with_message(format!("cannot read current picture: {}", e))
            }
        };

        let decision = decide(has_picture, &self.config);
        debug!("{}: {:?}", candidate.file_name, decision);

        match decision {
            Decision::Skip => Outcome::new(OutcomeKind::Skipped, candidate).with_user(matched),
            Decision::Simulate => Outcome::new(OutcomeKind::Updated, candidate)
                .with_user(matched)
                .simulated(),
            Decision::Apply => {
                match apply_picture(self.store, self.processor, &user, &candidate.path) {
                    Ok(revision) => Outcome::new(OutcomeKind::Updated, candidate)
                        .with_user(matched)
                        .with_message(format!("revision {}", revision)),
                    Err(e) => Outcome::new(OutcomeKind::Error, candidate)
                        .with_user(matched)
                        .with_message(e.to_string()),
                }
            }
        }
    }
}
