use log::{log, Level};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::{self, Write};

use crate::config::Presentation;
use crate::types::{MatchedUser, Outcome, OutcomeKind};

/// Level at which report lines are mirrored into the log. The lines are user
/// output; at the default log level they must only appear once.
pub(crate) const REPORT_LOG_LEVEL: Level = Level::Debug;

/// Aggregate counters of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub total: usize,
    pub updated: usize,
    pub skipped: usize,
    pub notfound: usize,
    pub errors: usize,
}

impl BatchStats {
    /// Fold one outcome into the counters.
    ///
    /// The upload form also counts a missing user as an error; the
    /// command-line script keeps the two buckets apart.
    pub fn record(&mut self, kind: OutcomeKind, presentation: Presentation) {
        self.total += 1;
        match kind {
            OutcomeKind::Updated => self.updated += 1,
            OutcomeKind::Skipped => self.skipped += 1,
            OutcomeKind::NotFound => {
                self.notfound += 1;
                if presentation == Presentation::Web {
                    self.errors += 1;
                }
            }
            OutcomeKind::Error => self.errors += 1,
        }
    }

    /// Check the counting invariant of the given presentation
    pub fn is_consistent(&self, presentation: Presentation) -> bool {
        match presentation {
            Presentation::Cli => {
                self.total == self.updated + self.skipped + self.notfound + self.errors
            }
            Presentation::Web => {
                self.total == self.updated + self.skipped + self.errors
                    && self.notfound <= self.errors
            }
        }
    }

    /// Final summary block
    pub fn summary(&self, preview: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", "=".repeat(70));
        let _ = writeln!(out, "Finished");
        let _ = writeln!(out, "{}", "-".repeat(70));
        let _ = writeln!(out, "  Total files:    {}", self.total);
        let _ = writeln!(out, "  Updated:        {}", self.updated);
        let _ = writeln!(out, "  Skipped:        {}", self.skipped);
        let _ = writeln!(out, "  User not found: {}", self.notfound);
        let _ = writeln!(out, "  Errors:         {}", self.errors);
        let _ = writeln!(out, "{}", "=".repeat(70));
        if preview {
            let _ = writeln!(
                out,
                "Note: preview mode, no pictures were changed. Run without --preview to apply."
            );
        }
        out
    }
}

/// Writes one line per outcome and keeps the running totals
pub struct BatchReporter<W: Write> {
    out: W,
    presentation: Presentation,
    stats: BatchStats,
}

impl<W: Write> BatchReporter<W> {
    pub fn new(out: W, presentation: Presentation) -> Self {
        Self {
            out,
            presentation,
            stats: BatchStats::default(),
        }
    }

    pub fn stats(&self) -> &BatchStats {
        &self.stats
    }

    /// Write a free-form line, e.g. a run header
    pub fn note(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{}", line)
    }

    /// Count an outcome and write its line
    pub fn record(&mut self, outcome: &Outcome) -> io::Result<()> {
        self.stats.record(outcome.kind, self.presentation);

        let line = format_line(outcome, self.presentation);
        log!(REPORT_LOG_LEVEL, "{}", line);
        writeln!(self.out, "{}", line)
    }

    /// Flush the output and hand back the totals
    pub fn finish(mut self) -> io::Result<BatchStats> {
        self.out.flush()?;
        Ok(self.stats)
    }
}

fn describe_user(user: &MatchedUser) -> String {
    format!(
        "{} (ID: {}, username: {})",
        user.full_name, user.id, user.username
    )
}

/// Render the report line of an outcome
pub fn format_line(outcome: &Outcome, presentation: Presentation) -> String {
    let detail = outcome.message.as_deref().unwrap_or("unknown failure");

    match presentation {
        Presentation::Cli => {
            let who = outcome.user.as_ref().map(describe_user);
            match (outcome.kind, who) {
                (OutcomeKind::Updated, Some(who)) if outcome.simulated => {
                    format!("{}: [preview] would set picture of {}", outcome.file_name, who)
                }
                (OutcomeKind::Updated, Some(who)) => {
                    format!("{}: updated picture of {}", outcome.file_name, who)
                }
                (OutcomeKind::Skipped, Some(who)) => format!(
                    "{}: skipped {}: user already has a picture and overwrite is off",
                    outcome.file_name, who
                ),
                (OutcomeKind::NotFound, _) => format!(
                    "{}: no user found with lastname '{}'",
                    outcome.file_name, outcome.key
                ),
                (_, Some(who)) => format!("{}: error for {}: {}", outcome.file_name, who, detail),
                (_, None) => format!("{}: error: {}", outcome.file_name, detail),
            }
        }
        Presentation::Web => match (outcome.kind, outcome.user.as_ref()) {
            (OutcomeKind::Updated, Some(user)) => format!(
                "{}: picture updated for {} ({})",
                outcome.file_name, user.username, user.full_name
            ),
            (OutcomeKind::Skipped, Some(user)) => format!(
                "{} ({}): skipped, {} already has a picture",
                outcome.file_name, user.full_name, user.username
            ),
            (OutcomeKind::NotFound, _) => format!(
                "{}: no user with lastname '{}'",
                outcome.file_name, outcome.key
            ),
            (_, Some(user)) => format!(
                "{}: cannot save picture for {}: {}",
                outcome.file_name, user.username, detail
            ),
            (_, None) => format!("{}: {}", outcome.file_name, detail),
        },
    }
}
