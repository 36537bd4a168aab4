use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{QuireError, Result};
use crate::utils::is_valid_note_id;

/// Storage key extension; a note `a/b` lives at `a/b.md`.
pub const NOTE_EXTENSION: &str = ".md";

/// Point-in-time view of the file set: storage key -> raw content.
pub type FileSet = BTreeMap<String, String>;

/// Hierarchical, human-readable note identifier.
///
/// Always satisfies [`is_valid_note_id`]; the only way in is [`NoteId::parse`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteId(String);

impl NoteId {
    pub fn parse(raw: &str) -> Result<Self> {
        if is_valid_note_id(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(QuireError::InvalidIdentifier(raw.to_string()))
        }
    }

    /// `"notes/draft.md"` -> `notes/draft`; `None` for keys that are not notes.
    pub fn from_storage_key(key: &str) -> Option<Self> {
        let stem = key.strip_suffix(NOTE_EXTENSION)?;
        Self::parse(stem).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn storage_key(&self) -> String {
        storage_key(&self.0)
    }

    /// Last `/`-delimited segment.
    pub fn basename(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    pub fn parent(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(parent, _)| parent)
    }

    /// Every ancestor folder path, root first: `a/b/c` -> `["a", "a/b"]`.
    pub fn ancestors(&self) -> Vec<String> {
        ancestors_of(&self.0)
    }

    pub fn is_descendant_of(&self, folder: &str) -> bool {
        folder.is_empty()
            || (self.0.len() > folder.len()
                && self.0.starts_with(folder)
                && self.0.as_bytes()[folder.len()] == b'/')
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for NoteId {
    type Error = QuireError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<NoteId> for String {
    fn from(id: NoteId) -> Self {
        id.0
    }
}

impl AsRef<str> for NoteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Storage key for an ID string, valid or not.
pub fn storage_key(id: &str) -> String {
    format!("{id}{NOTE_EXTENSION}")
}

/// Ancestor folder paths of a `/`-separated path, root first.
pub fn ancestors_of(path: &str) -> Vec<String> {
    path.match_indices('/')
        .map(|(idx, _)| path[..idx].to_string())
        .filter(|ancestor| !ancestor.is_empty())
        .collect()
}

/// A note as seen by queries: frontmatter fields plus the links in its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub tags: Vec<String>,
    pub is_private: bool,
    pub updated_at: Option<String>,
    pub gist_id: Option<String>,
    /// Wikilink targets in order of appearance.
    pub links: Vec<String>,
    pub body: String,
}

/// Precomputed `NoteId -> referencing NoteIds` mapping, supplied by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BacklinkIndex(pub HashMap<NoteId, Vec<NoteId>>);

impl BacklinkIndex {
    pub fn backlinks_of(&self, id: &NoteId) -> &[NoteId] {
        self.0.get(id).map(Vec::as_slice).unwrap_or_default()
    }
}
