use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_yaml::Value;

use super::Workspace;
use crate::config::QuireConfig;
use crate::error::{QuireError, Result};
use crate::frontmatter::set_field;
use crate::mirror::MirrorService;
use crate::model::{Note, NoteId};
use crate::mutation::model::{MutationBatch, MutationKind};
use crate::parser::parse_note;
use crate::vfs::FileSystem;

/// The Vault acts as the high-level Facade for the Quire Core.
///
/// # Action vs Query Separation
///
/// *   **Actions (Write)**: anything that persists a batch or talks to the
///     mirror goes through `Vault`, so side effects have one entry point.
///
/// *   **Queries (Read)**: access `vault.workspace` directly. Planning a batch
///     (`vault.workspace.rename_note(..)`) is a query too; it touches nothing.
pub struct Vault {
    pub workspace: Workspace,
    pub fs: Arc<dyn FileSystem>,
    pub mirror: Arc<dyn MirrorService>,
}

impl Vault {
    pub fn new(workspace: Workspace, fs: Arc<dyn FileSystem>, mirror: Arc<dyn MirrorService>) -> Self {
        Self {
            workspace,
            fs,
            mirror,
        }
    }

    /// Load config and snapshot for `root`.
    pub fn open(
        root: PathBuf,
        fs: Arc<dyn FileSystem>,
        mirror: Arc<dyn MirrorService>,
    ) -> Result<Self> {
        let config = QuireConfig::load(&root)?;
        let snapshot = fs.load_snapshot(&root, &config.vault.ignore_patterns)?;
        if config.logging.show_indexing_stats {
            log::info!(
                "Opened vault {:?} at {}: {} file(s)",
                config.vault.name,
                root.display(),
                snapshot.len()
            );
        }
        let workspace = Workspace::with_snapshot(root, config, snapshot);
        Ok(Self::new(workspace, fs, mirror))
    }

    pub fn root(&self) -> &Path {
        self.workspace.root()
    }

    // ------------------------------------------------------------------------
    // File System Sync (Changes coming FROM disk)
    // ------------------------------------------------------------------------

    /// Re-read the whole vault from disk. Returns the number of files.
    pub fn reload(&mut self) -> Result<usize> {
        let snapshot = self.fs.load_snapshot(
            self.workspace.root(),
            &self.workspace.config.vault.ignore_patterns,
        )?;
        let count = snapshot.len();
        self.workspace.replace_snapshot(snapshot);
        Ok(count)
    }

    pub fn sync_path(&mut self, path: &Path) -> Result<()> {
        let content = self.fs.read_to_string(path)?;
        self.workspace.sync_file(path, content);
        Ok(())
    }

    pub fn forget_path(&mut self, path: &Path) {
        self.workspace.remove_file(path);
    }

    // ------------------------------------------------------------------------
    // Persistence (Changes GOING TO disk)
    // ------------------------------------------------------------------------

    /// Write `batch` to disk, then record it. Returns the undo batch.
    pub fn commit(&mut self, batch: &MutationBatch) -> Result<MutationBatch> {
        self.workspace.store.check(batch)?;
        self.fs.commit(self.workspace.root(), batch)?;
        self.record(batch)
    }

    /// Record a batch that some other party already persisted (an editor
    /// applying a workspace edit), then run mirror side effects.
    pub fn record(&mut self, batch: &MutationBatch) -> Result<MutationBatch> {
        let removed: Vec<Note> = batch
            .deleted_keys()
            .filter_map(|key| {
                let id = NoteId::from_storage_key(key)?;
                let content = self.workspace.store.get(key)?;
                Some(parse_note(id, content))
            })
            .collect();

        let inverse = self.workspace.record(batch)?;
        self.sync_mirror(batch, &removed);
        Ok(inverse)
    }

    /// Publish `id` to the mirror and store the remote identifier in its frontmatter.
    ///
    /// Already published notes are pushed again and `None` is returned.
    pub fn publish_note(&mut self, id: &str) -> Result<Option<MutationBatch>> {
        let settings = &self.workspace.config.mirror;
        if !settings.enabled {
            return Err(QuireError::Mirror("mirroring is disabled".to_string()));
        }
        let note = self
            .workspace
            .note(id)
            .ok_or_else(|| QuireError::NoteNotFound(id.to_string()))?;
        if settings.skip_private && note.is_private {
            return Err(QuireError::Mirror(format!("{id} is private")));
        }

        if let Some(remote_id) = &note.gist_id {
            self.mirror.update(remote_id, &note)?;
            return Ok(None);
        }

        let remote_id = self.mirror.create(&note)?;
        let key = note.id.storage_key();
        let content = self
            .workspace
            .store
            .get(&key)
            .ok_or_else(|| QuireError::NoteNotFound(id.to_string()))?;
        let updated = set_field(content, "gist_id", Value::String(remote_id))?;

        let mut batch =
            MutationBatch::new(MutationKind::SaveNote).with_message(format!("Publish {id}"));
        batch.write(key, updated);
        batch.pin_to(self.workspace.snapshot());
        self.commit(&batch)?;
        Ok(Some(batch))
    }

    /// Best-effort: failures are logged and never undo the recorded batch.
    fn sync_mirror(&self, batch: &MutationBatch, removed: &[Note]) {
        let settings = &self.workspace.config.mirror;
        if !settings.enabled {
            return;
        }

        let mut kept: HashSet<String> = HashSet::new();
        for (key, content) in &batch.changes {
            let (Some(content), Some(id)) = (content, NoteId::from_storage_key(key)) else {
                continue;
            };
            let note = parse_note(id, content);
            let Some(remote_id) = note.gist_id.clone() else {
                continue;
            };
            kept.insert(remote_id.clone());
            if settings.skip_private && note.is_private {
                log::debug!("Not mirroring private note {}", note.id);
                continue;
            }
            if let Err(e) = self.mirror.update(&remote_id, &note) {
                log::warn!("Mirror update for {} failed: {e}", note.id);
            }
        }

        // A renamed or moved note keeps its remote copy.
        for note in removed {
            let Some(remote_id) = &note.gist_id else {
                continue;
            };
            if kept.contains(remote_id) {
                continue;
            }
            if let Err(e) = self.mirror.delete(remote_id) {
                log::warn!("Mirror delete for {} failed: {e}", note.id);
            }
        }
    }
}
