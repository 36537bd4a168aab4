//! Error types for the Quire core library.

use thiserror::Error;

/// All errors that can occur within the Quire core library.
#[derive(Debug, Error)]
pub enum QuireError {
    /// The candidate identifier does not satisfy the note ID grammar.
    #[error("Invalid note identifier: {0:?}")]
    InvalidIdentifier(String),

    /// The destination storage key is already occupied by another note.
    #[error("A note already exists at {0}")]
    DuplicateTarget(String),

    /// Source and destination are identical, or one of them is empty.
    #[error("Nothing to do")]
    NoOp,

    /// A note ID was requested that does not exist in the snapshot.
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// A batch precondition no longer holds against the current snapshot.
    #[error("Snapshot changed since the batch was computed: {0}")]
    StaleSnapshot(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Frontmatter or configuration YAML could not be read or written.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The external mirror service rejected a request.
    #[error("Mirror error: {0}")]
    Mirror(String),
}

/// Convenience alias that pins the error type to [`QuireError`].
pub type Result<T> = std::result::Result<T, QuireError>;

impl QuireError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidIdentifier(id) if id.is_empty() => "Note name cannot be empty".to_string(),
            Self::InvalidIdentifier(id) => format!("\"{id}\" is not a valid note name"),
            Self::DuplicateTarget(key) => format!("A note named {key} already exists"),
            Self::NoOp => "Nothing changed".to_string(),
            Self::NoteNotFound(_) => "Note no longer exists".to_string(),
            Self::StaleSnapshot(_) => "Notes changed in the meantime, please retry".to_string(),
            Self::Io(e) => format!("File error: {e}"),
            Self::Yaml(e) => format!("Frontmatter error: {e}"),
            Self::Mirror(e) => format!("Mirror error: {e}"),
        }
    }
}
