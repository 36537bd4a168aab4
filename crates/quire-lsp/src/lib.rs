//! Quire LSP Library
//!
//! LSP protocol layer, converts JSON-RPC requests to Core library calls.

use std::sync::Arc;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LspService};

use quire_core::{FileSystem, MirrorService, NoopMirror, PhysicalFileSystem};

use crate::state::GlobalState;

mod conversion;
mod handlers;
mod protocol;
mod state;


/// LSP backend implementation
pub struct Backend {
    client: Client,
    state: GlobalState,
}

impl Backend {
    pub fn new(client: Client, fs: Arc<dyn FileSystem>, mirror: Arc<dyn MirrorService>) -> Self {
        Self {
            client,
            state: GlobalState::new(fs, mirror),
        }
    }
}

#[tower_lsp::async_trait]
impl tower_lsp::LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handlers::handle_initialize(&self.client, &self.state, params).await
    }

    async fn initialized(&self, _: InitializedParams) {
        log::info!("Client initialized, ready to accept requests");
    }

    async fn shutdown(&self) -> Result<()> {
        handlers::handle_shutdown(&self.state).await
    }

    async fn rename(&self, params: RenameParams) -> Result<Option<WorkspaceEdit>> {
        handlers::handle_rename(&self.client, &self.state, params).await
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        match params.command.as_str() {
            protocol::CMD_CREATE_NOTE => {
                handlers::handle_create_note(&self.client, &self.state, params).await
            }
            protocol::CMD_DELETE_NOTE => {
                handlers::handle_delete_note_command(&self.client, &self.state, params).await
            }
            protocol::CMD_MOVE_NOTES => {
                handlers::handle_move_notes_command(&self.client, &self.state, params).await
            }
            protocol::CMD_SEARCH => handlers::handle_search_command(&self.state, params).await,
            protocol::CMD_DECLARE_FOLDER => {
                handlers::handle_declare_folder_command(&self.state, params).await
            }
            protocol::CMD_LIST_FOLDERS => handlers::handle_list_folders_command(&self.state).await,
            protocol::CMD_REMOVE_FOLDER => {
                handlers::handle_remove_folder_command(&self.state, params).await
            }
            protocol::CMD_SAVE_NOTE => {
                handlers::handle_save_note_command(&self.client, &self.state, params).await
            }
            protocol::CMD_PUBLISH_NOTE => {
                handlers::handle_publish_note_command(&self.state, params).await
            }
            protocol::CMD_UNDO => handlers::handle_undo_mutation(&self.client, &self.state).await,
            other => Err(Error::invalid_params(format!("Unknown command: {other}"))),
        }
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        handlers::handle_did_change_watched_files(&self.state, params).await
    }
}

/// Create and return LSP service and client socket
pub fn create_lsp_service() -> (LspService<Backend>, tower_lsp::ClientSocket) {
    let fs: Arc<dyn FileSystem> = Arc::new(PhysicalFileSystem);
    let mirror: Arc<dyn MirrorService> = Arc::new(NoopMirror);
    LspService::new(move |client| Backend::new(client, fs.clone(), mirror.clone()))
}
