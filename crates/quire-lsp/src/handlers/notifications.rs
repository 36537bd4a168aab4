use crate::state::GlobalState;
use tower_lsp::lsp_types::*;

/// Handle "workspace/didChangeWatchedFiles" notification
pub async fn handle_did_change_watched_files(
    state: &GlobalState,
    params: DidChangeWatchedFilesParams,
) {
    let mut vault_lock = state.vault.write().await;
    let Some(v) = &mut *vault_lock else {
        return;
    };

    for change in params.changes {
        let Ok(path) = change.uri.to_file_path() else {
            continue;
        };
        match change.typ {
            FileChangeType::CREATED | FileChangeType::CHANGED => {
                if let Err(e) = v.sync_path(&path) {
                    log::warn!("Could not read {}: {e}", path.display());
                }
            }
            FileChangeType::DELETED => v.forget_path(&path),
            _ => {}
        }
    }
}
