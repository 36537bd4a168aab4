use std::collections::BTreeSet;

use crate::error::{QuireError, Result};
use crate::model::{ancestors_of, NoteId};
use crate::utils::is_valid_note_id;

/// Folder paths that exist only in session state, with no note saved under them yet.
///
/// Kept in byte-wise lexicographic order.
#[derive(Debug, Clone, Default)]
pub struct VirtualFolders {
    paths: BTreeSet<String>,
}

impl VirtualFolders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` as a folder. Returns `false` if it was already declared.
    pub fn declare(&mut self, path: &str) -> Result<bool> {
        if !is_valid_note_id(path) {
            return Err(QuireError::InvalidIdentifier(path.to_string()));
        }
        Ok(self.paths.insert(path.to_string()))
    }

    pub fn remove(&mut self, path: &str) -> bool {
        self.paths.remove(path)
    }

    /// A note was persisted under `saved`: every ancestor folder is now real.
    pub fn reconcile(&mut self, saved: &NoteId) {
        for ancestor in saved.ancestors() {
            if self.paths.remove(&ancestor) {
                log::debug!("Folder {ancestor} is now backed by {saved}");
            }
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Sorted union of the folders implied by `ids` and the virtual ones.
pub fn all_folders<'a>(
    ids: impl IntoIterator<Item = &'a NoteId>,
    virtual_folders: &VirtualFolders,
) -> Vec<String> {
    let mut folders: BTreeSet<String> = virtual_folders.iter().map(str::to_string).collect();
    for id in ids {
        folders.extend(ancestors_of(id.as_str()));
    }
    folders.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> NoteId {
        NoteId::parse(raw).unwrap()
    }

    #[test]
    fn test_declare_keeps_sorted_and_unique() {
        let mut folders = VirtualFolders::new();
        assert!(folders.declare("b").unwrap());
        assert!(folders.declare("a/z").unwrap());
        assert!(folders.declare("a").unwrap());
        assert!(!folders.declare("b").unwrap());
        assert_eq!(folders.iter().collect::<Vec<_>>(), vec!["a", "a/z", "b"]);
    }

    #[test]
    fn test_declare_rejects_invalid() {
        let mut folders = VirtualFolders::new();
        assert!(matches!(
            folders.declare("Not Valid"),
            Err(QuireError::InvalidIdentifier(_))
        ));
        assert!(folders.declare("").is_err());
        assert!(folders.is_empty());
    }

    #[test]
    fn test_reconcile_removes_ancestors_only() {
        let mut folders = VirtualFolders::new();
        for path in ["a", "a/b", "a/b/c", "x"] {
            folders.declare(path).unwrap();
        }
        folders.reconcile(&id("a/b/c"));
        assert_eq!(folders.iter().collect::<Vec<_>>(), vec!["a/b/c", "x"]);

        // idempotent
        folders.reconcile(&id("a/b/c"));
        assert_eq!(folders.len(), 2);
    }

    #[test]
    fn test_remove_only_drops_the_named_path() {
        let mut folders = VirtualFolders::new();
        folders.declare("a").unwrap();
        folders.declare("a/b").unwrap();

        assert!(folders.remove("a"));
        assert!(!folders.remove("a"));
        assert!(!folders.contains("a"));
        assert!(folders.contains("a/b"));
    }

    #[test]
    fn test_all_folders_merges_real_and_virtual() {
        let mut folders = VirtualFolders::new();
        folders.declare("empty").unwrap();
        let ids = [id("a/b/note"), id("top"), id("a/other")];
        assert_eq!(
            all_folders(ids.iter(), &folders),
            vec!["a".to_string(), "a/b".to_string(), "empty".to_string()]
        );
    }
}
