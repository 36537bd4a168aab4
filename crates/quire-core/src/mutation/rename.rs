use crate::error::{QuireError, Result};
use crate::model::{storage_key, FileSet};
use crate::mutation::model::{MutationBatch, MutationKind};
use crate::utils::is_valid_note_id;
use crate::wikilink::rewrite_links;
use std::borrow::Cow;

/// Calculate the batch for renaming a note.
///
/// # Arguments
/// * `snapshot` - The file set the rename is computed against
/// * `old_id` - Current ID of the note
/// * `new_id` - Requested ID
/// * `new_content` - Content to store under `new_id` (self-references are rewritten)
///
/// # Returns
/// * `Ok(Some(batch))` - Rewritten referrers, the new file and a tombstone for the old key
/// * `Ok(None)` - Nothing would change
/// * `Err(..)` - `NoOp`, `InvalidIdentifier` or `DuplicateTarget`; nothing is proposed
pub fn calculate_rename(
    snapshot: &FileSet,
    old_id: &str,
    new_id: &str,
    new_content: &str,
) -> Result<Option<MutationBatch>> {
    if old_id.is_empty() || new_id.is_empty() || old_id == new_id {
        return Err(QuireError::NoOp);
    }
    if !is_valid_note_id(new_id) {
        return Err(QuireError::InvalidIdentifier(new_id.to_string()));
    }

    let old_key = storage_key(old_id);
    let new_key = storage_key(new_id);
    if new_key != old_key && snapshot.contains_key(&new_key) {
        return Err(QuireError::DuplicateTarget(new_key));
    }

    let mut batch = MutationBatch::new(MutationKind::RenameNote)
        .with_message(format!("Rename {old_id} to {new_id}"));

    for (key, content) in snapshot {
        if *key == old_key {
            continue;
        }
        if let Cow::Owned(rewritten) = rewrite_links(content, old_id, new_id) {
            batch.write(key.clone(), rewritten);
        }
    }

    batch.write(
        new_key,
        rewrite_links(new_content, old_id, new_id).into_owned(),
    );
    if snapshot.contains_key(&old_key) {
        batch.tombstone(old_key);
    }

    if batch.is_empty() {
        return Ok(None);
    }

    log::debug!(
        "Rename {old_id} -> {new_id}: {} file(s) in batch",
        batch.changes.len()
    );
    batch.pin_to(snapshot);
    Ok(Some(batch))
}
