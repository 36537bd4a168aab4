use super::{first_arg, to_json, to_rpc_error, vault_not_ready};
use crate::conversion::{batch_to_workspace_edit, key_to_uri};
use crate::protocol::{
    CreateNoteParams, CreateNoteResult, DeleteNoteParams, MoveNotesParams, MoveNotesResult,
    PublishNoteParams, PublishNoteResult, SaveNoteParams,
};
use crate::state::GlobalState;
use quire_core::{MutationBatch, MutationKind};

use tower_lsp::jsonrpc::{Error, ErrorCode, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::Client;

/// Have the client apply `batch`, then record it in the vault.
///
/// The vault is only updated once the client reports the edit as applied.
pub(crate) async fn apply_and_record(client: &Client, state: &GlobalState, batch: MutationBatch) -> Result<()> {
    let workspace_edit = {
        let vault_guard = state.vault.read().await;
        let vault = vault_guard.as_ref().ok_or_else(vault_not_ready)?;
        vault.workspace.store().check(&batch).map_err(to_rpc_error)?;
        batch_to_workspace_edit(vault.root(), &batch, vault.workspace.snapshot())
    };

    client
        .apply_edit(workspace_edit)
        .await?
        .applied
        .then_some(())
        .ok_or_else(|| Error {
            code: ErrorCode::InternalError,
            message: "Client failed to apply workspace edit".into(),
            data: None,
        })?;

    let recorded = {
        let mut vault_guard = state.vault.write().await;
        let vault = vault_guard.as_mut().ok_or_else(vault_not_ready)?;
        match vault.record(&batch) {
            Ok(inverse) => Some(inverse),
            Err(e) => {
                // Disk already has the edit; resync rather than guess.
                log::warn!("Recording {:?} failed ({e}), reloading vault", batch.kind);
                vault.reload().map_err(to_rpc_error)?;
                None
            }
        }
    };

    if let Some(inverse) = recorded {
        if batch.kind != MutationKind::Undo {
            state.push_undo(inverse).await;
        }
    }
    Ok(())
}

pub async fn handle_create_note(
    client: &Client,
    state: &GlobalState,
    params: ExecuteCommandParams,
) -> Result<Option<serde_json::Value>> {
    let params: CreateNoteParams = first_arg(&params)?;

    let (id, batch, uri) = {
        let vault_guard = state.vault.read().await;
        let vault = vault_guard.as_ref().ok_or_else(vault_not_ready)?;
        let (id, batch) = vault
            .workspace
            .create_note(&params.title, &params.folder)
            .map_err(to_rpc_error)?;
        let uri = key_to_uri(vault.root(), &id.storage_key()).map(|u| u.to_string());
        (id, batch, uri)
    };

    apply_and_record(client, state, batch).await?;
    to_json(&CreateNoteResult {
        id: id.to_string(),
        uri,
    })
}

/// Store the buffer the editor holds for a note, stamped with `updated_at`.
pub async fn handle_save_note_command(
    client: &Client,
    state: &GlobalState,
    params: ExecuteCommandParams,
) -> Result<Option<serde_json::Value>> {
    let params: SaveNoteParams = first_arg(&params)?;

    let batch = {
        let vault_guard = state.vault.read().await;
        let vault = vault_guard.as_ref().ok_or_else(vault_not_ready)?;
        vault
            .workspace
            .save_note(&params.id, &params.content)
            .map_err(to_rpc_error)?
    };

    apply_and_record(client, state, batch).await?;
    Ok(Some(serde_json::Value::Bool(true)))
}

/// Push a note to the mirror. The vault writes the remote ID back itself.
pub async fn handle_publish_note_command(
    state: &GlobalState,
    params: ExecuteCommandParams,
) -> Result<Option<serde_json::Value>> {
    let params: PublishNoteParams = first_arg(&params)?;

    let mut vault_guard = state.vault.write().await;
    let vault = vault_guard.as_mut().ok_or_else(vault_not_ready)?;
    let written = vault.publish_note(&params.id).map_err(to_rpc_error)?;
    log::info!("Published {} (new remote copy: {})", params.id, written.is_some());

    to_json(&PublishNoteResult {
        id: params.id,
        created: written.is_some(),
    })
}

pub async fn handle_delete_note_command(
    client: &Client,
    state: &GlobalState,
    params: ExecuteCommandParams,
) -> Result<Option<serde_json::Value>> {
    let params: DeleteNoteParams = first_arg(&params)?;

    let batch = {
        let vault_guard = state.vault.read().await;
        let vault = vault_guard.as_ref().ok_or_else(vault_not_ready)?;
        vault.workspace.delete_note(&params.id).map_err(to_rpc_error)?
    };

    apply_and_record(client, state, batch).await?;
    Ok(Some(serde_json::Value::Bool(true)))
}

pub async fn handle_move_notes_command(
    client: &Client,
    state: &GlobalState,
    params: ExecuteCommandParams,
) -> Result<Option<serde_json::Value>> {
    let params: MoveNotesParams = first_arg(&params)?;

    let outcome = {
        let vault_guard = state.vault.read().await;
        let vault = vault_guard.as_ref().ok_or_else(vault_not_ready)?;
        vault.workspace.move_notes(&params.ids, &params.folder)
    };

    if let Some(batch) = outcome.batch {
        apply_and_record(client, state, batch).await?;
    }

    if !outcome.skipped.is_empty() {
        let skipped: Vec<&str> = outcome.skipped.iter().map(|s| s.id.as_str()).collect();
        client
            .show_message(
                MessageType::WARNING,
                format!("Could not move: {}", skipped.join(", ")),
            )
            .await;
    }

    to_json(&MoveNotesResult {
        moved: outcome.moved,
        skipped: outcome.skipped,
    })
}

pub async fn handle_undo_mutation(client: &Client, state: &GlobalState) -> Result<Option<serde_json::Value>> {
    let popped = state.mutation_history.write().await.pop_back();
    let Some(inverse) = popped else {
        client
            .show_message(MessageType::INFO, "No mutation history to undo.")
            .await;
        return Ok(Some(serde_json::Value::Bool(false)));
    };

    match apply_and_record(client, state, inverse.clone()).await {
        Ok(()) => {
            client
                .show_message(MessageType::INFO, "Mutation undone successfully.")
                .await;
            Ok(Some(serde_json::Value::Bool(true)))
        }
        Err(e) => {
            // Still undoable once whatever blocked it is resolved.
            state.mutation_history.write().await.push_back(inverse);
            Err(e)
        }
    }
}
