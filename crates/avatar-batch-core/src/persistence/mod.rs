mod db;
mod error;
mod models;

pub use db::SqliteUserStore;
pub use error::{PersistenceError, PersistenceResult};
pub use models::{NewUser, User};

use crate::types::RevisionToken;

/// Point lookups and point updates on user records.
///
/// No transaction spans a lookup and the following update, so two runs
/// working on the same user race and the last write wins.
pub trait UserStore {
    /// Find the live (not deleted) user whose matching field equals `key`
    fn find_live_by_key(&self, key: &str) -> PersistenceResult<Option<User>>;

    /// Current picture revision of a user, 0 when none
    fn picture(&self, id: i64) -> PersistenceResult<i64>;

    /// Store a new picture revision on a user
    fn set_picture(&self, id: i64, revision: RevisionToken) -> PersistenceResult<()>;
}
