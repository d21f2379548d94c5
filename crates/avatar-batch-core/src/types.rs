use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Image formats accepted as profile pictures
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Other(String),
}

impl ImageFormat {
    /// Determine format from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "gif" => Self::Gif,
            other => Self::Other(other.to_string()),
        }
    }

    /// Check if format is supported
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

/// A discovered input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Full path to the file
    pub path: PathBuf,

    /// File name including extension
    pub file_name: String,

    /// Lower-cased extension
    pub extension: String,

    /// Key used to find the owning user
    pub key: String,

    /// Image format derived from the extension
    pub format: ImageFormat,
}

impl Candidate {
    /// Build a candidate from a path. Returns `None` when the path has no
    /// file name or no extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        let extension = path.extension()?.to_string_lossy().to_lowercase();
        let key = crate::matching::extract_key(&file_name);
        let format = ImageFormat::from_extension(&extension);

        Some(Self {
            path: path.to_path_buf(),
            file_name,
            extension,
            key,
            format,
        })
    }
}

/// Opaque marker of a processed picture, stored on the user record.
/// Zero is reserved for "no picture".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevisionToken(pub i64);

impl fmt::Display for RevisionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of a processed candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    /// Picture set, or would be set in preview mode
    Updated,

    /// User already had a picture and overwrite was off
    Skipped,

    /// No live user carries the key
    NotFound,

    /// Processing or store failure
    Error,
}

/// Result of processing a single candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Classification
    pub kind: OutcomeKind,

    /// File name of the candidate
    pub file_name: String,

    /// Key extracted from the file name
    pub key: String,

    /// Matched user, if any
    pub user: Option<MatchedUser>,

    /// True when the update was only simulated
    pub simulated: bool,

    /// Diagnostic message for skips and failures
    pub message: Option<String>,
}

/// The parts of a matched user needed for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedUser {
    pub id: i64,
    pub username: String,
    pub full_name: String,
}

impl Outcome {
    pub(crate) fn new(kind: OutcomeKind, candidate: &Candidate) -> Self {
        Self {
            kind,
            file_name: candidate.file_name.clone(),
            key: candidate.key.clone(),
            user: None,
            simulated: false,
            message: None,
        }
    }

    pub(crate) fn with_user(mut self, user: MatchedUser) -> Self {
        self.user = Some(user);
        self
    }

    pub(crate) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub(crate) fn simulated(mut self) -> Self {
        self.simulated = true;
        self
    }

    /// Identifier of the matched user, if any
    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.id)
    }
}
