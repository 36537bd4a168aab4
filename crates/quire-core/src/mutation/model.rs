use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::model::{FileSet, NoteId};

/// SHA-256 hex digest of a note's content, used to pin a batch to the snapshot it was computed from.
pub fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// A set of file mutations that must be applied as one atomic unit.
///
/// `changes` maps a storage key to its new content, or to `None` for a
/// tombstone (delete).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MutationBatch {
    pub kind: MutationKind,
    pub changes: BTreeMap<String, Option<String>>,
    pub message: Option<String>,
    pub preconditions: Vec<Precondition>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MutationKind {
    CreateNote,
    SaveNote,
    DeleteNote,
    RenameNote,
    MoveNotes,
    Undo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Precondition {
    ContentUnchanged { key: String, digest: String },
    KeyAbsent { key: String },
}

impl Precondition {
    pub fn key(&self) -> &str {
        match self {
            Self::ContentUnchanged { key, .. } | Self::KeyAbsent { key } => key,
        }
    }
}

impl MutationBatch {
    pub fn new(kind: MutationKind) -> Self {
        Self {
            kind,
            changes: BTreeMap::new(),
            message: None,
            preconditions: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn write(&mut self, key: String, content: String) {
        self.changes.insert(key, Some(content));
    }

    pub fn tombstone(&mut self, key: String) {
        self.changes.insert(key, None);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Pin every touched key to the state it has in `snapshot`.
    pub fn pin_to(&mut self, snapshot: &FileSet) {
        self.preconditions = self
            .changes
            .keys()
            .map(|key| match snapshot.get(key) {
                Some(content) => Precondition::ContentUnchanged {
                    key: key.clone(),
                    digest: content_digest(content),
                },
                None => Precondition::KeyAbsent { key: key.clone() },
            })
            .collect();
    }

    /// Note IDs this batch writes that do not exist in `snapshot`.
    pub fn created_ids(&self, snapshot: &FileSet) -> Vec<NoteId> {
        self.changes
            .iter()
            .filter(|(key, content)| content.is_some() && !snapshot.contains_key(*key))
            .filter_map(|(key, _)| NoteId::from_storage_key(key))
            .collect()
    }

    /// Keys this batch deletes.
    pub fn deleted_keys(&self) -> impl Iterator<Item = &str> {
        self.changes
            .iter()
            .filter(|(_, content)| content.is_none())
            .map(|(key, _)| key.as_str())
    }

    /// The batch that puts every touched key back the way `snapshot` has it.
    ///
    /// `snapshot` must be the state the batch was computed against.
    pub fn invert(&self, snapshot: &FileSet) -> Self {
        let mut inverse = MutationBatch::new(MutationKind::Undo);
        for key in self.changes.keys() {
            inverse
                .changes
                .insert(key.clone(), snapshot.get(key).cloned());
        }
        inverse.message = self.message.as_ref().map(|m| format!("Undo: {m}"));

        let mut after = snapshot.clone();
        for (key, content) in &self.changes {
            match content {
                Some(content) => {
                    after.insert(key.clone(), content.clone());
                }
                None => {
                    after.remove(key);
                }
            }
        }
        inverse.pin_to(&after);
        inverse
    }
}
