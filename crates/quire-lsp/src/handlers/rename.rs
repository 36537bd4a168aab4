use crate::conversion::{batch_to_workspace_edit, uri_to_key};
use crate::state::GlobalState;
use quire_core::{to_slug, NoteId};

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;

/// Rename the note behind the document to the slug of `new_name`.
///
/// The batch is recorded as soon as the edit is handed back; the client
/// applies it as one workspace edit. Refusals are shown to the user and
/// produce no edit.
pub async fn handle_rename(
    client: &Client,
    state: &GlobalState,
    params: RenameParams,
) -> Result<Option<WorkspaceEdit>> {
    let uri = params.text_document_position.text_document.uri;
    let new_id = to_slug(&params.new_name);

    let outcome = {
        let mut vault_guard = state.vault.write().await;
        let Some(vault) = vault_guard.as_mut() else {
            return Ok(None);
        };
        let Some(old_id) = uri_to_key(vault.root(), &uri)
            .and_then(|key| NoteId::from_storage_key(&key))
        else {
            return Ok(None);
        };

        match vault.workspace.rename_note(old_id.as_str(), &new_id, None) {
            Ok(Some(batch)) => {
                let edit = batch_to_workspace_edit(vault.root(), &batch, vault.workspace.snapshot());
                vault.record(&batch).map(|inverse| (edit, inverse))
            }
            Ok(None) => return Ok(None),
            Err(e) => Err(e),
        }
    };

    match outcome {
        Ok((edit, inverse)) => {
            state.push_undo(inverse).await;
            Ok(Some(edit))
        }
        Err(e) => {
            log::debug!("Rename refused: {e}");
            client
                .show_message(MessageType::WARNING, e.user_message())
                .await;
            Ok(None)
        }
    }
}
