//! Key extraction and user lookup.
//!
//! File names follow the `<student number>.<ext>` convention, but nothing here
//! checks that the key is numeric: `photo.png` simply yields the key `photo`.

use log::debug;

use crate::persistence::{PersistenceResult, User, UserStore};

/// Derive the matching key from a file name by removing its final extension.
///
/// The remainder is taken verbatim, without trimming or case folding.
/// A name without an extension is returned unchanged.
pub fn extract_key(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(pos) => file_name[..pos].to_string(),
        None => file_name.to_string(),
    }
}

/// Look up the live user owning `key`
pub fn match_user<S: UserStore + ?Sized>(store: &S, key: &str) -> PersistenceResult<Option<User>> {
    let user = store.find_live_by_key(key)?;
    match &user {
        Some(u) => debug!("Key '{}' matched user {} ({})", key, u.id, u.username),
        None => debug!("Key '{}' matched no live user", key),
    }
    Ok(user)
}
