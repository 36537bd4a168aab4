use std::path::Path;

use super::Workspace;
use crate::error::Result;
use crate::model::{BacklinkIndex, FileSet, NoteId, NOTE_EXTENSION};
use crate::mutation::model::MutationBatch;
use crate::store::Store;
use crate::vfs::storage_key_for;

/// State Integration (Input)
/// These methods bring the in-memory state up to date with changes that have
/// already happened: a committed batch, a file event from disk, or a host update.
/// They never touch the disk themselves.
impl Workspace {
    /// Apply a persisted batch to the snapshot and reconcile the folder ledger.
    ///
    /// Returns the batch that undoes it.
    pub fn record(&mut self, batch: &MutationBatch) -> Result<MutationBatch> {
        let inverse = batch.invert(self.store.snapshot());
        let created = batch.created_ids(self.store.snapshot());
        self.store.apply(batch)?;

        for (key, content) in &batch.changes {
            if content.is_none() {
                continue;
            }
            if let Some(id) = NoteId::from_storage_key(key) {
                self.folders.reconcile(&id);
            }
        }

        log::info!(
            "Recorded {:?} ({} change(s), {} new note(s))",
            batch.kind,
            batch.changes.len(),
            created.len()
        );
        Ok(inverse)
    }

    /// Replace the whole snapshot, keeping virtual folders that are still unbacked.
    pub fn replace_snapshot(&mut self, snapshot: FileSet) {
        self.store = Store::from_snapshot(snapshot);
        let ids: Vec<NoteId> = self.store.ids().collect();
        for id in &ids {
            self.folders.reconcile(id);
        }
    }

    /// A file under the root was created or changed on disk.
    ///
    /// Files a full scan would skip are ignored here too.
    pub fn sync_file(&mut self, path: &Path, content: String) {
        let Some(key) = storage_key_for(&self.root, path) else {
            return;
        };
        if !key.ends_with(NOTE_EXTENSION) || self.is_ignored(&key) {
            return;
        }
        if let Some(id) = NoteId::from_storage_key(&key) {
            self.folders.reconcile(&id);
        }
        self.store.upsert(key, content);
    }

    /// A file under the root was deleted on disk.
    pub fn remove_file(&mut self, path: &Path) {
        if let Some(key) = storage_key_for(&self.root, path) {
            self.store.remove(&key);
        }
    }

    fn is_ignored(&self, key: &str) -> bool {
        let ignore = &self.config.vault.ignore_patterns;
        let mut segments: Vec<&str> = key.split('/').collect();
        segments.pop();
        segments
            .iter()
            .any(|segment| ignore.iter().any(|name| name == segment))
    }

    pub fn declare_folder(&mut self, path: &str) -> Result<bool> {
        self.folders.declare(path)
    }

    pub fn remove_folder(&mut self, path: &str) -> bool {
        self.folders.remove(path)
    }

    /// Install the host-maintained backlink index.
    pub fn set_backlinks(&mut self, backlinks: BacklinkIndex) {
        self.backlinks = backlinks;
    }
}
