// Picture processing: the icon renderer and the step that stores its result

pub mod file_validation;
pub mod icon;

use std::path::Path;

use crate::error::Result;
use crate::logging::log_store_modification;
use crate::persistence::{User, UserStore};
use crate::types::RevisionToken;

pub use icon::IconService;

/// Turns a picture file into stored icons for a user
pub trait IconProcessor {
    /// Decode, normalise and store the picture, returning its revision
    fn process(&self, user: &User, path: &Path) -> Result<RevisionToken>;
}

/// Process `path` for `user` and record the new revision on the user.
///
/// The store update is a single field write with no lock held since the
/// picture was read, so a concurrent writer may be overwritten. Failures are
/// returned as-is; nothing is retried.
pub fn apply_picture<S, P>(store: &S, processor: &P, user: &User, path: &Path) -> Result<RevisionToken>
where
    S: UserStore + ?Sized,
    P: IconProcessor + ?Sized,
{
    let revision = processor.process(user, path)?;
    store.set_picture(user.id, revision)?;

    log_store_modification(
        "set_picture",
        user.id,
        Some(&format!("revision {} from {}", revision, path.display())),
    );

    Ok(revision)
}

#[cfg(test)]
mod tests;
