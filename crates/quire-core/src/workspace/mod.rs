use std::path::{Path, PathBuf};

use crate::config::QuireConfig;
use crate::folders::VirtualFolders;
use crate::model::{BacklinkIndex, FileSet};
use crate::store::Store;

mod mutations;
mod queries;
mod sync_ops;
mod vault;

#[cfg(test)]
mod tests;

pub use queries::SearchResult;
pub use vault::Vault;

/// Session state for one vault: the file snapshot plus everything derived
/// from or layered on top of it.
pub struct Workspace {
    pub(crate) root: PathBuf,
    pub(crate) config: QuireConfig,
    pub(crate) store: Store,
    pub(crate) folders: VirtualFolders,
    pub(crate) backlinks: BacklinkIndex,
}

impl Workspace {
    pub fn new(root: PathBuf, config: QuireConfig) -> Self {
        Self {
            root,
            config,
            store: Store::new(),
            folders: VirtualFolders::new(),
            backlinks: BacklinkIndex::default(),
        }
    }

    pub fn with_snapshot(root: PathBuf, config: QuireConfig, snapshot: FileSet) -> Self {
        Self {
            store: Store::from_snapshot(snapshot),
            ..Self::new(root, config)
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &QuireConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn snapshot(&self) -> &FileSet {
        self.store.snapshot()
    }
}
