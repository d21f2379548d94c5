#![allow(dead_code)]

pub mod test_images;
pub use test_images::*;

use avatar_batch_core::persistence::NewUser;
use avatar_batch_core::{IconService, SqliteUserStore, UserStore};
use std::path::PathBuf;
use tempfile::TempDir;

/// Revision already stored on user 1002 before any run
pub const EXISTING_REVISION: i64 = 5;

/// A scratch workspace: user database, icon directory and picture directory
pub struct TestEnv {
    pub dir: TempDir,
    pub store: SqliteUserStore,
    pub icons: IconService,
}

impl TestEnv {
    /// Users 1001 (no picture) and 1002 (has a picture), plus a deleted 9999
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteUserStore::open(&dir.path().join("users.db")).unwrap();

        store
            .insert_user(&NewUser::new("s1001", "Ada", "1001"))
            .unwrap();
        store
            .insert_user(&NewUser::new("s1002", "Bo", "1002").with_picture(EXISTING_REVISION))
            .unwrap();
        store
            .insert_user(&NewUser::new("s9999", "Gone", "9999").deleted())
            .unwrap();

        let icons = IconService::new(dir.path().join("icons"), vec![32, 16]);

        Self { dir, store, icons }
    }

    pub fn photos_dir(&self) -> PathBuf {
        self.dir.path().join("photos")
    }

    pub fn picture_of(&self, key: &str) -> i64 {
        self.store.find_live_by_key(key).unwrap().unwrap().picture
    }

    /// Pictures of all users by id, deleted ones included
    pub fn snapshot(&self) -> Vec<i64> {
        (1..=3)
            .map(|id| self.store.user(id).unwrap().unwrap().picture)
            .collect()
    }

    pub fn icon_exists(&self, user_id: i64, name: &str) -> bool {
        self.icons.user_dir(user_id).join(name).is_file()
    }
}
