use crate::model::{storage_key, FileSet};
use crate::utils::is_valid_note_id;
use crate::wikilink::extract_links;

/// A wikilink whose target names a note that has no file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub source: String,
    pub target: String,
}

/// Audit the file set for references to missing notes.
///
/// Targets that are not valid note IDs (external names, attachments) are not
/// the engine's to keep consistent and are skipped.
pub fn audit_references(snapshot: &FileSet) -> Vec<DanglingReference> {
    let mut dangling = Vec::new();
    for (key, content) in snapshot {
        for link in extract_links(content) {
            if is_valid_note_id(link.target) && !snapshot.contains_key(&storage_key(link.target)) {
                dangling.push(DanglingReference {
                    source: key.clone(),
                    target: link.target.to_string(),
                });
            }
        }
    }
    dangling
}
