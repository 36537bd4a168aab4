use super::{first_arg, to_json, vault_not_ready};
use crate::conversion::key_to_uri;
use crate::protocol::{SearchHit, SearchParams, SearchResponse};
use crate::state::GlobalState;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::ExecuteCommandParams;

pub async fn handle_search_command(
    state: &GlobalState,
    params: ExecuteCommandParams,
) -> Result<Option<serde_json::Value>> {
    let params: SearchParams = first_arg(&params)?;

    let vault_guard = state.vault.read().await;
    let vault = vault_guard.as_ref().ok_or_else(vault_not_ready)?;

    let result = vault
        .workspace
        .search(&params.query, params.folder.as_deref());
    let notes = result
        .notes
        .into_iter()
        .map(|note| SearchHit {
            uri: key_to_uri(vault.root(), &note.id.storage_key()).map(|u| u.to_string()),
            id: note.id.to_string(),
            title: note.title,
            tags: note.tags,
        })
        .collect();

    to_json(&SearchResponse {
        notes,
        tags: result.tags,
    })
}
