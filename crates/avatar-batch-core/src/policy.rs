use crate::config::RunConfig;

/// What to do with a matched user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Process the file and store the new revision
    Apply,

    /// Leave the existing picture alone
    Skip,

    /// Report the update without performing it
    Simulate,
}

/// Decide how to treat a matched user.
///
/// The existing-picture check runs first: a user who already has a picture is
/// skipped when overwrite is off, in preview mode too. Preview only turns what
/// would otherwise be an `Apply` into a `Simulate`.
pub fn decide(has_picture: bool, config: &RunConfig) -> Decision {
    if has_picture && !config.overwrite {
        Decision::Skip
    } else if config.preview {
        Decision::Simulate
    } else {
        Decision::Apply
    }
}
