use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::Result;
use crate::model::{FileSet, NOTE_EXTENSION};
use crate::mutation::model::MutationBatch;

const STAGING_SUFFIX: &str = ".quire-staged";

/// Abstract interface for file system operations.
pub trait FileSystem: Send + Sync {
    /// Read the entire contents of a file into a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// List every note file under `root`, skipping directories named in `ignore`.
    fn list_notes(&self, root: &Path, ignore: &[String]) -> Vec<PathBuf>;

    /// Persist `batch` under `root`.
    ///
    /// Every write is staged before any target is touched, so a failure while
    /// staging leaves the vault as it was. A failure after that point can leave
    /// some writes applied and the deletions not yet run.
    fn commit(&self, root: &Path, batch: &MutationBatch) -> Result<()>;

    /// Read every note under `root` into a snapshot keyed by storage key.
    fn load_snapshot(&self, root: &Path, ignore: &[String]) -> Result<FileSet> {
        let mut snapshot = FileSet::new();
        for path in self.list_notes(root, ignore) {
            let Some(key) = storage_key_for(root, &path) else {
                continue;
            };
            let content = self.read_to_string(&path)?;
            snapshot.insert(key, content);
        }
        Ok(snapshot)
    }
}

/// `root/a/b.md` -> `"a/b.md"`, always `/`-separated.
pub fn storage_key_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

pub fn path_for_key(root: &Path, key: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in key.split('/') {
        path.push(segment);
    }
    path
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(STAGING_SUFFIX);
    target.with_file_name(name)
}

/// Standard implementation of FileSystem using std::fs and walkdir.
pub struct PhysicalFileSystem;

impl FileSystem for PhysicalFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn list_notes(&self, root: &Path, ignore: &[String]) -> Vec<PathBuf> {
        let extension = NOTE_EXTENSION.trim_start_matches('.');
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || !ignore.iter().any(|name| e.file_name() == name.as_str())
            })
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
                files.push(path.to_path_buf());
            }
        }

        files
    }

    fn commit(&self, root: &Path, batch: &MutationBatch) -> Result<()> {
        // Stage every write first so a failure leaves the vault untouched.
        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::new();
        for (key, content) in &batch.changes {
            let Some(content) = content else { continue };
            let target = path_for_key(root, key);
            let temp = staging_path(&target);
            let result = target
                .parent()
                .map_or(Ok(()), std::fs::create_dir_all)
                .and_then(|_| std::fs::write(&temp, content));
            if let Err(e) = result {
                discard(&staged);
                let _ = std::fs::remove_file(&temp);
                return Err(e.into());
            }
            staged.push((temp, target));
        }

        for (index, (temp, target)) in staged.iter().enumerate() {
            if let Err(e) = std::fs::rename(temp, target) {
                log::error!(
                    "Commit of {:?} stopped after {index} of {} write(s): {e}",
                    batch.kind,
                    staged.len()
                );
                discard(&staged[index..]);
                return Err(e.into());
            }
        }

        for key in batch.deleted_keys() {
            match std::fs::remove_file(path_for_key(root, key)) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        log::info!(
            "Committed {:?}: {} write(s), {} delete(s)",
            batch.kind,
            staged.len(),
            batch.deleted_keys().count()
        );
        Ok(())
    }
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (temp, _) in staged {
        if let Err(e) = std::fs::remove_file(temp) {
            log::warn!("Could not remove staged file {}: {e}", temp.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::model::MutationKind;
    use std::fs;
    use tempfile::TempDir;

    fn ignore() -> Vec<String> {
        vec![".git".to_string(), ".quire".to_string()]
    }

    #[test]
    fn test_storage_key_roundtrip() {
        let root = Path::new("/vault");
        let path = path_for_key(root, "a/b/c.md");
        assert_eq!(storage_key_for(root, &path).as_deref(), Some("a/b/c.md"));
        assert_eq!(storage_key_for(root, Path::new("/elsewhere/x.md")), None);
    }

    #[test]
    fn test_load_snapshot_skips_ignored_and_non_notes() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("a/one.md"), "one").unwrap();
        fs::write(root.join("top.md"), "top").unwrap();
        fs::write(root.join("a/pic.png"), "png").unwrap();
        fs::write(root.join(".git/HEAD.md"), "nope").unwrap();

        let snapshot = PhysicalFileSystem.load_snapshot(root, &ignore()).unwrap();
        let keys: Vec<&str> = snapshot.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a/one.md", "top.md"]);
        assert_eq!(snapshot["a/one.md"], "one");
    }

    #[test]
    fn test_commit_writes_and_deletes() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("old.md"), "old").unwrap();

        let mut batch = MutationBatch::new(MutationKind::RenameNote);
        batch.write("deep/new.md".into(), "moved".into());
        batch.tombstone("old.md".into());
        batch.tombstone("never-existed.md".into());
        PhysicalFileSystem.commit(root, &batch).unwrap();

        assert_eq!(fs::read_to_string(root.join("deep/new.md")).unwrap(), "moved");
        assert!(!root.join("old.md").exists());
        assert!(!root.join("deep/new.md.quire-staged").exists());
    }

    #[test]
    fn test_commit_failure_leaves_files_untouched() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("a.md"), "original").unwrap();
        // A regular file where a directory is needed makes staging fail.
        fs::write(root.join("blocker"), "").unwrap();

        let mut batch = MutationBatch::new(MutationKind::MoveNotes);
        batch.write("a.md".into(), "changed".into());
        batch.write("blocker/b.md".into(), "b".into());
        assert!(PhysicalFileSystem.commit(root, &batch).is_err());

        assert_eq!(fs::read_to_string(root.join("a.md")).unwrap(), "original");
        assert!(!root.join("a.md.quire-staged").exists());
    }

    #[test]
    fn test_commit_failure_while_placing_cleans_staged_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("old.md"), "old").unwrap();
        // A non-empty directory cannot be replaced by a staged file.
        fs::create_dir_all(root.join("dir.md")).unwrap();
        fs::write(root.join("dir.md/inner"), "").unwrap();

        let mut batch = MutationBatch::new(MutationKind::RenameNote);
        batch.write("a.md".into(), "a".into());
        batch.write("dir.md".into(), "x".into());
        batch.write("z.md".into(), "z".into());
        batch.tombstone("old.md".into());
        assert!(PhysicalFileSystem.commit(root, &batch).is_err());

        assert_eq!(fs::read_to_string(root.join("a.md")).unwrap(), "a");
        assert!(!root.join("dir.md.quire-staged").exists());
        assert!(!root.join("z.md.quire-staged").exists());
        assert!(!root.join("z.md").exists());
        assert!(root.join("old.md").exists());
    }
}
