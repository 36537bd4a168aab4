use crate::error::{QuireError, Result};
use crate::model::{FileSet, Note, NoteId};
use crate::mutation::model::{content_digest, MutationBatch, Precondition};
use crate::parser::parse_note;

/// In-memory snapshot of the vault: storage key -> raw content.
#[derive(Debug, Clone, Default)]
pub struct Store {
    files: FileSet,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(files: FileSet) -> Self {
        Self { files }
    }

    pub fn snapshot(&self) -> &FileSet {
        &self.files
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.files.get(key).map(String::as_str)
    }

    pub fn content_of(&self, id: &NoteId) -> Option<&str> {
        self.get(&id.storage_key())
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.files.contains_key(&id.storage_key())
    }

    /// IDs of every note in the snapshot, in key order.
    pub fn ids(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.files.keys().filter_map(|key| NoteId::from_storage_key(key))
    }

    pub fn note(&self, id: &NoteId) -> Option<Note> {
        self.content_of(id)
            .map(|content| parse_note(id.clone(), content))
    }

    pub fn notes(&self) -> Vec<Note> {
        self.files
            .iter()
            .filter_map(|(key, content)| {
                NoteId::from_storage_key(key).map(|id| parse_note(id, content))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Fail with `StaleSnapshot` if any precondition of `batch` no longer holds.
    pub fn check(&self, batch: &MutationBatch) -> Result<()> {
        for precondition in &batch.preconditions {
            let holds = match precondition {
                Precondition::ContentUnchanged { key, digest } => self
                    .files
                    .get(key)
                    .is_some_and(|content| content_digest(content) == *digest),
                Precondition::KeyAbsent { key } => !self.files.contains_key(key),
            };
            if !holds {
                return Err(QuireError::StaleSnapshot(precondition.key().to_string()));
            }
        }
        Ok(())
    }

    /// Apply every change of `batch`, or none of them.
    pub fn apply(&mut self, batch: &MutationBatch) -> Result<()> {
        self.check(batch)?;
        for (key, content) in &batch.changes {
            match content {
                Some(content) => {
                    self.files.insert(key.clone(), content.clone());
                }
                None => {
                    self.files.remove(key);
                }
            }
        }
        Ok(())
    }

    /// Mirror a file that changed outside of any batch.
    pub fn upsert(&mut self, key: String, content: String) {
        self.files.insert(key, content);
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.files.remove(key)
    }
}
