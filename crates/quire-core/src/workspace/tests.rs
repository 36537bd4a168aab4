use super::*;
use crate::error::QuireError;
use crate::mirror::{MirrorService, NoopMirror};
use crate::model::{Note, NoteId};
use crate::mutation::model::MutationKind;
use crate::vfs::PhysicalFileSystem;
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn write(root: &Path, key: &str, content: &str) {
    let path = crate::vfs::path_for_key(root, key);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn open_vault(files: &[(&str, &str)]) -> (Vault, TempDir) {
    open_vault_with(files, Arc::new(NoopMirror))
}

fn open_vault_with(files: &[(&str, &str)], mirror: Arc<dyn MirrorService>) -> (Vault, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    for (key, content) in files {
        write(temp_dir.path(), key, content);
    }
    let vault = Vault::open(
        temp_dir.path().to_path_buf(),
        Arc::new(PhysicalFileSystem),
        mirror,
    )
    .unwrap();
    (vault, temp_dir)
}

fn read(dir: &TempDir, key: &str) -> Option<String> {
    fs::read_to_string(crate::vfs::path_for_key(dir.path(), key)).ok()
}

#[derive(Default)]
struct RecordingMirror {
    calls: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingMirror {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl MirrorService for RecordingMirror {
    fn create(&self, note: &Note) -> crate::Result<String> {
        self.calls.lock().unwrap().push(format!("create {}", note.id));
        Ok("g-new".to_string())
    }

    fn update(&self, remote_id: &str, _note: &Note) -> crate::Result<()> {
        self.calls.lock().unwrap().push(format!("update {remote_id}"));
        if self.fail {
            return Err(QuireError::Mirror("service unavailable".into()));
        }
        Ok(())
    }

    fn delete(&self, remote_id: &str) -> crate::Result<()> {
        self.calls.lock().unwrap().push(format!("delete {remote_id}"));
        Ok(())
    }
}

#[test]
fn test_rename_commit_updates_disk_and_references() {
    let (mut vault, dir) = open_vault(&[
        ("notes/draft.md", "# Draft\nSelf [[notes/draft]]"),
        ("index.md", "See [[notes/draft|My Draft]]"),
    ]);

    let batch = vault
        .workspace
        .rename_note("notes/draft", "notes/final", None)
        .unwrap()
        .unwrap();
    vault.commit(&batch).unwrap();

    assert_eq!(read(&dir, "index.md").unwrap(), "See [[notes/final|My Draft]]");
    assert_eq!(
        read(&dir, "notes/final.md").unwrap(),
        "# Draft\nSelf [[notes/final]]"
    );
    assert!(read(&dir, "notes/draft.md").is_none());
    assert!(vault.workspace.audit().is_empty());
    assert!(vault.workspace.note("notes/final").is_some());
}

#[test]
fn test_rename_missing_note_without_content() {
    let (vault, _dir) = open_vault(&[("a.md", "A")]);
    let err = vault.workspace.rename_note("ghost", "b", None).unwrap_err();
    assert!(matches!(err, QuireError::NoteNotFound(_)));
}

#[test]
fn test_undo_restores_previous_state() {
    let (mut vault, dir) = open_vault(&[("a.md", "[[b]]"), ("b.md", "B")]);
    let batch = vault.workspace.rename_note("b", "c", None).unwrap().unwrap();
    let undo = vault.commit(&batch).unwrap();
    assert_eq!(undo.kind, MutationKind::Undo);
    assert_eq!(read(&dir, "a.md").unwrap(), "[[c]]");

    vault.commit(&undo).unwrap();
    assert_eq!(read(&dir, "a.md").unwrap(), "[[b]]");
    assert_eq!(read(&dir, "b.md").unwrap(), "B");
    assert!(read(&dir, "c.md").is_none());
}

#[test]
fn test_stale_batch_is_refused_before_touching_disk() {
    let (mut vault, dir) = open_vault(&[("a.md", "[[b]]"), ("b.md", "B")]);
    let batch = vault.workspace.rename_note("b", "c", None).unwrap().unwrap();

    write(dir.path(), "a.md", "edited [[b]]");
    vault.sync_path(&dir.path().join("a.md")).unwrap();

    assert!(matches!(
        vault.commit(&batch),
        Err(QuireError::StaleSnapshot(_))
    ));
    assert!(read(&dir, "c.md").is_none());
    assert_eq!(read(&dir, "b.md").unwrap(), "B");
}

#[test]
fn test_move_commit_reports_skips() {
    let (mut vault, dir) = open_vault(&[
        ("a/x.md", "X"),
        ("a/y.md", "Y"),
        ("b/y.md", "existing"),
        ("home.md", "[[a/x]] [[a/y]]"),
    ]);

    let outcome = vault
        .workspace
        .move_notes(&["a/x".to_string(), "a/y".to_string()], "b");
    assert_eq!(outcome.moved, 1);
    assert_eq!(outcome.skipped_ids(), vec!["a/y"]);

    vault.commit(outcome.batch.as_ref().unwrap()).unwrap();
    assert_eq!(read(&dir, "home.md").unwrap(), "[[b/x]] [[a/y]]");
    assert_eq!(read(&dir, "b/y.md").unwrap(), "existing");
    assert!(vault.workspace.audit().is_empty());
}

#[test]
fn test_rename_and_move_reconcile_declared_folders() {
    let (mut vault, _dir) = open_vault(&[("a.md", "A"), ("m/x.md", "X"), ("index.md", "[[a]] [[m/x]]")]);
    vault.workspace.declare_folder("archive").unwrap();
    vault.workspace.declare_folder("dest").unwrap();
    vault.workspace.declare_folder("keep").unwrap();

    let rename = vault
        .workspace
        .rename_note("a", "archive/a", None)
        .unwrap()
        .unwrap();
    vault.commit(&rename).unwrap();
    let declared: Vec<&str> = vault.workspace.virtual_folders().iter().collect();
    assert_eq!(declared, vec!["dest", "keep"]);

    let outcome = vault.workspace.move_notes(&["m/x".to_string()], "dest");
    assert_eq!(outcome.moved, 1);
    vault.commit(outcome.batch.as_ref().unwrap()).unwrap();

    let declared: Vec<&str> = vault.workspace.virtual_folders().iter().collect();
    assert_eq!(declared, vec!["keep"]);
    assert_eq!(
        vault.workspace.store().get("index.md"),
        Some("[[archive/a]] [[dest/x]]")
    );
}

#[test]
fn test_rename_with_empty_id_is_noop() {
    let (vault, _dir) = open_vault(&[("a.md", "A")]);
    for (old, new) in [("", "b"), ("a", ""), ("a", "a")] {
        let err = vault.workspace.rename_note(old, new, None).unwrap_err();
        assert!(matches!(err, QuireError::NoOp), "{old:?} -> {new:?}: {err:?}");
    }
}

#[test]
fn test_create_note_slugs_title_and_reconciles_folder() {
    let (mut vault, dir) = open_vault(&[]);
    vault.workspace.declare_folder("projects").unwrap();
    vault.workspace.declare_folder("projects/q3").unwrap();
    vault.workspace.declare_folder("other").unwrap();

    let (id, batch) = vault
        .workspace
        .create_note("Kick Off Meeting", "projects/q3")
        .unwrap();
    assert_eq!(id.as_str(), "projects/q3/kick-off-meeting");
    vault.commit(&batch).unwrap();

    let content = read(&dir, "projects/q3/kick-off-meeting.md").unwrap();
    assert!(content.contains("title: Kick Off Meeting"));
    assert_eq!(
        vault.workspace.virtual_folders().iter().collect::<Vec<_>>(),
        vec!["other"]
    );
    assert_eq!(
        vault.workspace.folders(),
        vec!["other", "projects", "projects/q3"]
    );
}

#[test]
fn test_create_note_generated_id_and_duplicates() {
    let (vault, _dir) = open_vault(&[("taken.md", "")]);

    let (id, _) = vault.workspace.create_note("!!!", "").unwrap();
    assert_eq!(id.as_str().len(), 12);

    assert!(matches!(
        vault.workspace.create_note("Taken", ""),
        Err(QuireError::DuplicateTarget(key)) if key == "taken.md"
    ));
    assert!(matches!(
        vault.workspace.create_note("x", "Bad Folder"),
        Err(QuireError::InvalidIdentifier(_))
    ));
}

#[test]
fn test_save_stamps_updated_at() {
    let (mut vault, dir) = open_vault(&[("journal.md", "---\ntitle: Journal\n---\nBody")]);
    let batch = vault
        .workspace
        .save_note("journal", "---\ntitle: Journal\n---\nNew body")
        .unwrap();
    vault.commit(&batch).unwrap();

    let note = vault.workspace.note("journal").unwrap();
    assert!(note.updated_at.is_some());
    assert_eq!(note.title, "Journal");
    assert!(read(&dir, "journal.md").unwrap().ends_with("New body"));

    assert!(vault.workspace.save_note("Not Valid", "x").is_err());
}

#[test]
fn test_delete_note() {
    let (mut vault, dir) = open_vault(&[("gone.md", "bye")]);
    let batch = vault.workspace.delete_note("gone").unwrap();
    vault.commit(&batch).unwrap();
    assert!(read(&dir, "gone.md").is_none());

    assert!(matches!(
        vault.workspace.delete_note("gone"),
        Err(QuireError::NoteNotFound(_))
    ));
}

#[test]
fn test_search_with_folder_and_tags() {
    let (vault, _dir) = open_vault(&[
        ("work/a.md", "---\ntags: [work, work/q3]\n---\nBudget review"),
        ("work/b.md", "---\ntags: [work]\n---\nBudget draft"),
        ("work/c.md", "---\ntags: [misc]\n---\nBudget notes"),
        ("home/d.md", "---\ntags: [work]\n---\nBudget at home"),
    ]);

    let result = vault.workspace.search("budget", Some("work"));
    let ids: Vec<&str> = result.notes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["work/a", "work/b", "work/c"]);
    let tags: Vec<(&str, usize)> = result
        .tags
        .iter()
        .map(|t| (t.tag.as_str(), t.count))
        .collect();
    assert_eq!(tags, vec![("work", 2), ("work/q3", 1), ("misc", 1)]);

    let drafts = vault.workspace.search("-tag:work/q3 tag:work", None);
    assert_eq!(drafts.notes.len(), 2);
}

#[test]
fn test_sync_and_remove_file_events() {
    let (mut vault, dir) = open_vault(&[("a.md", "A")]);
    vault.workspace.declare_folder("inbox").unwrap();

    write(dir.path(), "inbox/new.md", "N");
    vault.sync_path(&dir.path().join("inbox/new.md")).unwrap();
    assert!(vault.workspace.note("inbox/new").is_some());
    assert!(vault.workspace.virtual_folders().is_empty());

    write(dir.path(), ".git/COMMIT.md", "ignored");
    vault.sync_path(&dir.path().join(".git/COMMIT.md")).unwrap();
    assert_eq!(vault.workspace.store().len(), 2);

    vault.forget_path(&dir.path().join("a.md"));
    assert!(vault.workspace.note("a").is_none());

    assert_eq!(vault.reload().unwrap(), 2);
    assert!(vault.workspace.note("a").is_some());
}

#[test]
fn test_backlinks_are_consumed_not_built() {
    let (mut vault, _dir) = open_vault(&[("a.md", "[[b]]"), ("b.md", "")]);
    let b = NoteId::parse("b").unwrap();
    assert!(vault.workspace.backlinks_of(&b).is_empty());

    let mut index = crate::model::BacklinkIndex::default();
    index.0.insert(b.clone(), vec![NoteId::parse("a").unwrap()]);
    vault.workspace.set_backlinks(index);
    assert_eq!(vault.workspace.backlinks_of(&b)[0].as_str(), "a");
}

#[test]
fn test_mirror_updates_and_keeps_renamed_copy() {
    let mirror = Arc::new(RecordingMirror::default());
    let (mut vault, _dir) = open_vault_with(
        &[
            ("pub.md", "---\ngist_id: g1\n---\nPublic"),
            ("secret.md", "---\ngist_id: g2\nisPrivate: true\n---\nHidden"),
        ],
        mirror.clone(),
    );
    vault.workspace.config.mirror.enabled = true;

    let batch = vault.workspace.rename_note("pub", "public", None).unwrap().unwrap();
    vault.commit(&batch).unwrap();
    assert_eq!(mirror.calls(), vec!["update g1"]);

    let batch = vault
        .workspace
        .save_note("secret", "---\ngist_id: g2\nisPrivate: true\n---\nStill hidden")
        .unwrap();
    vault.commit(&batch).unwrap();
    assert_eq!(mirror.calls(), vec!["update g1"]);

    let batch = vault.workspace.delete_note("public").unwrap();
    vault.commit(&batch).unwrap();
    assert_eq!(mirror.calls(), vec!["update g1", "delete g1"]);
}

#[test]
fn test_mirror_failure_does_not_block_commit() {
    let mirror = Arc::new(RecordingMirror {
        fail: true,
        ..RecordingMirror::default()
    });
    let (mut vault, dir) = open_vault_with(&[("pub.md", "---\ngist_id: g1\n---\nA")], mirror.clone());
    vault.workspace.config.mirror.enabled = true;

    let batch = vault.workspace.save_note("pub", "---\ngist_id: g1\n---\nB").unwrap();
    vault.commit(&batch).unwrap();
    assert!(read(&dir, "pub.md").unwrap().ends_with('B'));
    assert_eq!(mirror.calls(), vec!["update g1"]);
}

#[test]
fn test_publish_note_stores_remote_id() {
    let mirror = Arc::new(RecordingMirror::default());
    let (mut vault, dir) = open_vault_with(&[("post.md", "Hello")], mirror.clone());

    assert!(matches!(
        vault.publish_note("post"),
        Err(QuireError::Mirror(_))
    ));

    vault.workspace.config.mirror.enabled = true;
    let batch = vault.publish_note("post").unwrap();
    assert!(batch.is_some());
    assert_eq!(vault.workspace.note("post").unwrap().gist_id.as_deref(), Some("g-new"));
    assert!(read(&dir, "post.md").unwrap().contains("gist_id: g-new"));

    assert_eq!(vault.publish_note("post").unwrap(), None);
    assert_eq!(mirror.calls()[0], "create post");
}
