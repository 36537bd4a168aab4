use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::model::{storage_key, FileSet};
use crate::mutation::model::{MutationBatch, MutationKind};
use crate::utils::is_valid_note_id;
use crate::wikilink::rewrite_links_many;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// No file exists for the source ID.
    Missing,
    /// The destination is not a valid note ID.
    InvalidTarget,
    /// Another note already occupies the destination key.
    Occupied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedMove {
    pub id: String,
    pub reason: SkipReason,
}

/// Result of a bulk move: best-effort per item, never an error as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// `None` when no item was movable.
    pub batch: Option<MutationBatch>,
    pub moved: usize,
    pub skipped: Vec<SkippedMove>,
}

impl MoveOutcome {
    pub fn skipped_ids(&self) -> Vec<&str> {
        self.skipped.iter().map(|s| s.id.as_str()).collect()
    }
}

/// Destination ID for `old_id` inside `target_folder` (`""` is the root).
pub fn destination_id(old_id: &str, target_folder: &str) -> String {
    let basename = old_id.rsplit('/').next().unwrap_or(old_id);
    if target_folder.is_empty() {
        basename.to_string()
    } else {
        format!("{target_folder}/{basename}")
    }
}

/// Calculate the batch relocating `note_ids` into `target_folder`.
///
/// Items are processed in the order supplied. An item whose destination equals
/// its source is dropped silently; missing sources, invalid destinations and
/// occupied destinations are reported in `skipped` and do not block the rest.
pub fn calculate_move(snapshot: &FileSet, note_ids: &[String], target_folder: &str) -> MoveOutcome {
    let mut skipped = Vec::new();
    let mut moves: Vec<(String, String)> = Vec::new();
    let mut claimed: HashSet<String> = HashSet::new();

    for old_id in note_ids {
        let old_key = storage_key(old_id);
        if !snapshot.contains_key(&old_key) {
            skipped.push(SkippedMove {
                id: old_id.clone(),
                reason: SkipReason::Missing,
            });
            continue;
        }

        let new_id = destination_id(old_id, target_folder);
        if new_id == *old_id {
            continue;
        }
        if !is_valid_note_id(&new_id) {
            skipped.push(SkippedMove {
                id: old_id.clone(),
                reason: SkipReason::InvalidTarget,
            });
            continue;
        }

        let new_key = storage_key(&new_id);
        if snapshot.contains_key(&new_key) || !claimed.insert(new_key) {
            skipped.push(SkippedMove {
                id: old_id.clone(),
                reason: SkipReason::Occupied,
            });
            continue;
        }

        moves.push((old_id.clone(), new_id));
    }

    if moves.is_empty() {
        return MoveOutcome {
            batch: None,
            moved: 0,
            skipped,
        };
    }

    let destination_label = if target_folder.is_empty() {
        "root"
    } else {
        target_folder
    };
    let mut batch = MutationBatch::new(MutationKind::MoveNotes).with_message(format!(
        "Move {} note(s) to {destination_label}",
        moves.len()
    ));

    for (key, content) in snapshot {
        let rewritten = rewrite_links_many(content, &moves);
        let relocated = moves
            .iter()
            .find(|(old_id, _)| storage_key(old_id) == *key);

        match relocated {
            Some((_, new_id)) => {
                batch.write(storage_key(new_id), rewritten.into_owned());
                batch.tombstone(key.clone());
            }
            None if *rewritten != **content => {
                batch.write(key.clone(), rewritten.into_owned());
            }
            None => {}
        }
    }

    log::debug!(
        "Move to {destination_label}: {} moved, {} skipped, {} file(s) in batch",
        moves.len(),
        skipped.len(),
        batch.changes.len()
    );
    batch.pin_to(snapshot);

    MoveOutcome {
        batch: Some(batch),
        moved: moves.len(),
        skipped,
    }
}
