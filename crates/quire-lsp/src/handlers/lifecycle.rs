use crate::protocol::COMMANDS;
use crate::state::GlobalState;
use quire_core::Vault;
use tower_lsp::jsonrpc::{Error, ErrorCode, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::Client;

/// Handle "initialize" request
pub async fn handle_initialize(
    client: &Client,
    state: &GlobalState,
    params: InitializeParams,
) -> Result<InitializeResult> {
    let root_uri = params.root_uri.or_else(|| {
        params
            .workspace_folders
            .and_then(|folders| folders.into_iter().next())
            .map(|folder| folder.uri)
    });

    match root_uri.and_then(|uri| uri.to_file_path().ok()) {
        Some(root_path) => {
            client
                .log_message(
                    MessageType::INFO,
                    format!("Initializing vault at: {:?}", root_path),
                )
                .await;

            let fs = state.fs.clone();
            let mirror = state.mirror.clone();
            let vault = tokio::task::spawn_blocking(move || Vault::open(root_path, fs, mirror))
                .await
                .map_err(|e| Error {
                    code: ErrorCode::InternalError,
                    message: format!("Failed to initialize vault: {}", e).into(),
                    data: None,
                })?
                .map_err(super::to_rpc_error)?;

            if vault.workspace.config().logging.show_indexing_stats {
                client
                    .log_message(
                        MessageType::INFO,
                        format!(
                            "Loaded {} files, {} folders",
                            vault.workspace.store().len(),
                            vault.workspace.folders().len()
                        ),
                    )
                    .await;
            }

            *state.vault.write().await = Some(vault);
        }
        None => {
            client
                .log_message(MessageType::WARNING, "No rootUri provided!")
                .await;
        }
    }

    Ok(InitializeResult {
        capabilities: ServerCapabilities {
            rename_provider: Some(OneOf::Left(true)),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
                work_done_progress_options: Default::default(),
            }),
            ..Default::default()
        },
        server_info: Some(ServerInfo {
            name: "quire".to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
    })
}

pub async fn handle_shutdown(state: &GlobalState) -> Result<()> {
    state.mutation_history.write().await.clear();
    log::info!("Shutdown requested");
    Ok(())
}
