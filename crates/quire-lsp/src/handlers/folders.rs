use super::{first_arg, to_json, to_rpc_error, vault_not_ready};
use crate::protocol::FolderParams;
use crate::state::GlobalState;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::ExecuteCommandParams;

/// Add a folder that has no note yet. Returns `false` if it was already declared.
pub async fn handle_declare_folder_command(
    state: &GlobalState,
    params: ExecuteCommandParams,
) -> Result<Option<serde_json::Value>> {
    let params: FolderParams = first_arg(&params)?;

    let mut vault_guard = state.vault.write().await;
    let vault = vault_guard.as_mut().ok_or_else(vault_not_ready)?;
    let added = vault
        .workspace
        .declare_folder(&params.path)
        .map_err(to_rpc_error)?;
    Ok(Some(serde_json::Value::Bool(added)))
}

/// Drop a declared folder. Folders backed by a note on disk are unaffected.
pub async fn handle_remove_folder_command(
    state: &GlobalState,
    params: ExecuteCommandParams,
) -> Result<Option<serde_json::Value>> {
    let params: FolderParams = first_arg(&params)?;

    let mut vault_guard = state.vault.write().await;
    let vault = vault_guard.as_mut().ok_or_else(vault_not_ready)?;
    let removed = vault.workspace.remove_folder(&params.path);
    Ok(Some(serde_json::Value::Bool(removed)))
}

pub async fn handle_list_folders_command(state: &GlobalState) -> Result<Option<serde_json::Value>> {
    let vault_guard = state.vault.read().await;
    let vault = vault_guard.as_ref().ok_or_else(vault_not_ready)?;
    to_json(&vault.workspace.folders())
}
