//! Conversion utilities between Core types and LSP types

use quire_core::line_map::{LineMap, Point};
use quire_core::model::FileSet;
use quire_core::vfs::{path_for_key, storage_key_for};
use quire_core::MutationBatch;
use std::path::Path;
use tower_lsp::lsp_types::{
    CreateFile, CreateFileOptions, DeleteFile, DeleteFileOptions, DocumentChangeOperation,
    DocumentChanges, OneOf, OptionalVersionedTextDocumentIdentifier, Position, Range, ResourceOp,
    TextDocumentEdit, TextEdit, WorkspaceEdit,
};
use url::Url;

/// Convert Core Point to LSP Position
pub fn point_to_lsp_position(point: Point) -> Position {
    Position {
        line: point.line,
        character: point.col,
    }
}

pub fn key_to_uri(root: &Path, key: &str) -> Option<Url> {
    Url::from_file_path(path_for_key(root, key)).ok()
}

pub fn uri_to_key(root: &Path, uri: &Url) -> Option<String> {
    let path = uri.to_file_path().ok()?;
    storage_key_for(root, &path)
}

fn whole_document_edit(uri: Url, range: Range, new_text: String) -> DocumentChangeOperation {
    DocumentChangeOperation::Edit(TextDocumentEdit {
        text_document: OptionalVersionedTextDocumentIdentifier { uri, version: None },
        edits: vec![OneOf::Left(TextEdit { range, new_text })],
    })
}

/// Convert a batch to an LSP WorkspaceEdit.
///
/// `snapshot` is the state the batch was computed against: keys it lacks are
/// created, keys it has are replaced whole. Deletions come last so a rename's
/// new file exists before the old one goes.
pub fn batch_to_workspace_edit(root: &Path, batch: &MutationBatch, snapshot: &FileSet) -> WorkspaceEdit {
    let mut document_changes = Vec::new();
    let mut deletions = Vec::new();

    for (key, content) in &batch.changes {
        let Some(uri) = key_to_uri(root, key) else {
            log::warn!("Skipping {key}: not representable as a file URI");
            continue;
        };

        match (content, snapshot.get(key)) {
            (Some(text), Some(previous)) => {
                let map = LineMap::new(previous);
                let range = Range {
                    start: Position::default(),
                    end: point_to_lsp_position(map.end_point(previous)),
                };
                document_changes.push(whole_document_edit(uri, range, text.clone()));
            }
            (Some(text), None) => {
                document_changes.push(DocumentChangeOperation::Op(ResourceOp::Create(
                    CreateFile {
                        uri: uri.clone(),
                        options: Some(CreateFileOptions {
                            overwrite: Some(false),
                            ignore_if_exists: Some(false),
                        }),
                        annotation_id: None,
                    },
                )));
                document_changes.push(whole_document_edit(uri, Range::default(), text.clone()));
            }
            (None, _) => {
                deletions.push(DocumentChangeOperation::Op(ResourceOp::Delete(DeleteFile {
                    uri,
                    options: Some(DeleteFileOptions {
                        recursive: None,
                        ignore_if_not_exists: Some(true),
                        annotation_id: None,
                    }),
                })));
            }
        }
    }

    document_changes.extend(deletions);

    WorkspaceEdit {
        changes: None,
        document_changes: Some(DocumentChanges::Operations(document_changes)),
        change_annotations: None,
    }
}
