use serde::{Deserialize, Serialize};

use crate::types::{MatchedUser, RevisionToken};

/// A user record as stored in the `users` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// ID in the database
    pub id: i64,

    /// Unique login name
    pub username: String,

    pub firstname: String,

    /// Matching field; holds the student number by convention
    pub lastname: String,

    /// Soft-delete flag
    pub deleted: bool,

    /// Current picture revision, 0 when the user has no custom picture
    pub picture: i64,
}

impl User {
    /// Display name in "first last" order
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    /// Whether the user already carries a custom picture
    pub fn has_picture(&self) -> bool {
        self.picture != 0
    }

    /// Current picture revision, if any
    pub fn revision(&self) -> Option<RevisionToken> {
        self.has_picture().then_some(RevisionToken(self.picture))
    }

    pub fn to_matched(&self) -> MatchedUser {
        MatchedUser {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name(),
        }
    }
}

/// Fields needed to create a user record
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub deleted: bool,
    pub picture: i64,
}

impl NewUser {
    pub fn new(username: &str, firstname: &str, lastname: &str) -> Self {
        Self {
            username: username.to_string(),
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            ..Default::default()
        }
    }

    pub fn deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    pub fn with_picture(mut self, revision: i64) -> Self {
        self.picture = revision;
        self
    }
}
