mod folders;
mod lifecycle;
mod mutation;
mod notifications;
mod query;
mod rename;

pub use folders::*;
pub use lifecycle::*;
pub use mutation::*;
pub use notifications::*;
pub use query::*;
pub use rename::*;

use quire_core::QuireError;
use serde::de::DeserializeOwned;
use tower_lsp::jsonrpc::{Error, ErrorCode, Result};
use tower_lsp::lsp_types::ExecuteCommandParams;

/// Map a core error to a JSON-RPC error carrying the user-facing message.
pub(crate) fn to_rpc_error(e: QuireError) -> Error {
    let code = match e {
        QuireError::InvalidIdentifier(_)
        | QuireError::DuplicateTarget(_)
        | QuireError::NoOp
        | QuireError::NoteNotFound(_) => ErrorCode::InvalidParams,
        _ => ErrorCode::InternalError,
    };
    Error {
        code,
        message: e.user_message().into(),
        data: None,
    }
}

pub(crate) fn vault_not_ready() -> Error {
    Error {
        code: ErrorCode::InternalError,
        message: "Vault not initialized".into(),
        data: None,
    }
}

/// Deserialize the first command argument.
pub(crate) fn first_arg<T: DeserializeOwned>(params: &ExecuteCommandParams) -> Result<T> {
    let first = params
        .arguments
        .first()
        .ok_or_else(|| Error::invalid_params("Missing params"))?;
    serde_json::from_value(first.clone()).map_err(|e| Error::invalid_params(e.to_string()))
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<Option<serde_json::Value>> {
    serde_json::to_value(value)
        .map(Some)
        .map_err(|e| Error {
            code: ErrorCode::InternalError,
            message: e.to_string().into(),
            data: None,
        })
}
