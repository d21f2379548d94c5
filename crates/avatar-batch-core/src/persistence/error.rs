/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Persistence-specific errors
#[derive(Debug)]
pub enum PersistenceError {
    /// SQLite errors
    Database(rusqlite::Error),

    /// User record not found
    NotFound(String),

    /// Errors during database initialization
    Initialization(String),
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        PersistenceError::Database(err)
    }
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database(err) => write!(f, "Database error: {}", err),
            Self::NotFound(msg) => write!(f, "Entry not found: {}", msg),
            Self::Initialization(msg) => write!(f, "Database initialization error: {}", msg),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(err) => Some(err),
            _ => None,
        }
    }
}

// `crate::Error::Database` adds its own prefix, so only the bare detail is carried over
impl From<PersistenceError> for crate::Error {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Database(e) => crate::Error::Database(e.to_string()),
            PersistenceError::NotFound(what) => {
                crate::Error::Database(format!("{} not found", what))
            }
            PersistenceError::Initialization(msg) => crate::Error::Database(msg),
        }
    }
}
