use std::path::Path;

use super::{apply_picture, IconProcessor};
use crate::error::{Error, Result};
use crate::persistence::{NewUser, SqliteUserStore, User, UserStore};
use crate::types::RevisionToken;

struct FixedProcessor(i64);

impl IconProcessor for FixedProcessor {
    fn process(&self, _user: &User, _path: &Path) -> Result<RevisionToken> {
        Ok(RevisionToken(self.0))
    }
}

struct FailingProcessor;

impl IconProcessor for FailingProcessor {
    fn process(&self, _user: &User, path: &Path) -> Result<RevisionToken> {
        Err(Error::Image(format!("cannot decode {}", path.display())))
    }
}

fn store_with_user() -> (SqliteUserStore, User) {
    let store = SqliteUserStore::open_in_memory().unwrap();
    let id = store
        .insert_user(&NewUser::new("s1001", "Ada", "1001"))
        .unwrap();
    let user = store.user(id).unwrap().unwrap();
    (store, user)
}

#[test]
fn test_apply_stores_revision() {
    let (store, user) = store_with_user();

    let revision = apply_picture(&store, &FixedProcessor(77), &user, Path::new("1001.png")).unwrap();

    assert_eq!(revision, RevisionToken(77));
    assert_eq!(store.picture(user.id).unwrap(), 77);
}

#[test]
fn test_apply_failure_leaves_store_untouched() {
    let (store, user) = store_with_user();

    let result = apply_picture(&store, &FailingProcessor, &user, Path::new("1001.png"));

    assert!(matches!(result, Err(Error::Image(_))));
    assert_eq!(store.picture(user.id).unwrap(), 0);
}

#[test]
fn test_apply_to_vanished_user_fails() {
    let store = SqliteUserStore::open_in_memory().unwrap();
    let ghost = User {
        id: 404,
        username: "ghost".to_string(),
        firstname: "No".to_string(),
        lastname: "One".to_string(),
        deleted: false,
        picture: 0,
    };

    let result = apply_picture(&store, &FixedProcessor(5), &ghost, Path::new("x.png"));

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Database(_)));
    assert_eq!(err.to_string(), "Database error: user 404 not found");
}
