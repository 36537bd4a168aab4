use serde::Serialize;

use super::Workspace;
use crate::folders::{all_folders, VirtualFolders};
use crate::model::{Note, NoteId};
use crate::mutation::audit::{audit_references, DanglingReference};
use crate::query::{parse_query, tag_cloud, TagFrequency};

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub notes: Vec<Note>,
    pub tags: Vec<TagFrequency>,
}

impl Workspace {
    pub fn note(&self, id: &str) -> Option<Note> {
        let id = NoteId::parse(id).ok()?;
        self.store.note(&id)
    }

    pub fn all_notes(&self) -> Vec<Note> {
        self.store.notes()
    }

    /// Notes matching `query`, optionally limited to the `folder` subtree,
    /// with the tag cloud of that result set.
    pub fn search(&self, query: &str, folder: Option<&str>) -> SearchResult {
        let query = parse_query(query);
        let folder = folder.unwrap_or("");
        let notes: Vec<Note> = self
            .store
            .notes()
            .into_iter()
            .filter(|note| note.id.is_descendant_of(folder) && query.matches(note))
            .collect();
        let tags = tag_cloud(&notes);
        SearchResult { notes, tags }
    }

    /// Real and virtual folders, sorted.
    pub fn folders(&self) -> Vec<String> {
        let ids: Vec<NoteId> = self.store.ids().collect();
        all_folders(ids.iter(), &self.folders)
    }

    pub fn virtual_folders(&self) -> &VirtualFolders {
        &self.folders
    }

    pub fn backlinks_of(&self, id: &NoteId) -> &[NoteId] {
        self.backlinks.backlinks_of(id)
    }

    pub fn audit(&self) -> Vec<DanglingReference> {
        audit_references(self.store.snapshot())
    }
}
