use serde_yaml::Value;

use super::Workspace;
use crate::error::{QuireError, Result};
use crate::frontmatter::{new_note_content, set_field};
use crate::model::{storage_key, NoteId};
use crate::mutation::model::{MutationBatch, MutationKind};
use crate::mutation::moves::{calculate_move, MoveOutcome};
use crate::mutation::rename::calculate_rename;
use crate::utils::time::now_rfc3339;
use crate::utils::{generate_note_id, is_valid_note_id, to_slug};

/// Mutation planning (Output)
/// These methods are triggered by user intent.
/// They compute a `MutationBatch` against the current snapshot and DO NOT apply it;
/// the caller persists the batch and then hands it back through `record`.
impl Workspace {
    /// Rename `old_id` to `new_id`. With `new_content` absent the note's
    /// current content is carried over.
    pub fn rename_note(
        &self,
        old_id: &str,
        new_id: &str,
        new_content: Option<&str>,
    ) -> Result<Option<MutationBatch>> {
        if old_id.is_empty() || new_id.is_empty() || old_id == new_id {
            return Err(QuireError::NoOp);
        }
        let content = match new_content {
            Some(content) => content.to_string(),
            None => self
                .store
                .get(&storage_key(old_id))
                .ok_or_else(|| QuireError::NoteNotFound(old_id.to_string()))?
                .to_string(),
        };
        calculate_rename(self.store.snapshot(), old_id, new_id, &content)
    }

    pub fn move_notes(&self, note_ids: &[String], target_folder: &str) -> MoveOutcome {
        calculate_move(self.store.snapshot(), note_ids, target_folder)
    }

    /// New note titled `title` inside `folder` (`""` for the root).
    ///
    /// Titles that slugify to nothing get a generated ID.
    pub fn create_note(&self, title: &str, folder: &str) -> Result<(NoteId, MutationBatch)> {
        if !folder.is_empty() && !is_valid_note_id(folder) {
            return Err(QuireError::InvalidIdentifier(folder.to_string()));
        }

        let mut slug = to_slug(title);
        if slug.is_empty() {
            slug = generate_note_id(self.config.notes.generated_id_length);
        }
        let raw = if folder.is_empty() {
            slug
        } else {
            format!("{folder}/{slug}")
        };
        let id = NoteId::parse(&raw)?;

        let key = id.storage_key();
        if self.store.get(&key).is_some() {
            return Err(QuireError::DuplicateTarget(key));
        }

        let display_title = match title.trim() {
            "" => id.basename(),
            trimmed => trimmed,
        };
        let mut batch =
            MutationBatch::new(MutationKind::CreateNote).with_message(format!("Create {id}"));
        batch.write(key, new_note_content(display_title)?);
        batch.pin_to(self.store.snapshot());

        log::debug!("Planned creation of {id}");
        Ok((id, batch))
    }

    /// Store `content` under `id`, stamping `updated_at`.
    pub fn save_note(&self, id: &str, content: &str) -> Result<MutationBatch> {
        let id = NoteId::parse(id)?;
        let stamped = set_field(content, "updated_at", Value::String(now_rfc3339()))?;

        let mut batch =
            MutationBatch::new(MutationKind::SaveNote).with_message(format!("Save {id}"));
        batch.write(id.storage_key(), stamped);
        batch.pin_to(self.store.snapshot());
        Ok(batch)
    }

    pub fn delete_note(&self, id: &str) -> Result<MutationBatch> {
        let id = NoteId::parse(id)?;
        if !self.store.contains(&id) {
            return Err(QuireError::NoteNotFound(id.to_string()));
        }

        let mut batch =
            MutationBatch::new(MutationKind::DeleteNote).with_message(format!("Delete {id}"));
        batch.tombstone(id.storage_key());
        batch.pin_to(self.store.snapshot());
        Ok(batch)
    }
}
