use quire_core::mutation::SkippedMove;
use quire_core::query::TagFrequency;
use serde::{Deserialize, Serialize};

pub const CMD_CREATE_NOTE: &str = "quire/createNote";
pub const CMD_DELETE_NOTE: &str = "quire/deleteNote";
pub const CMD_MOVE_NOTES: &str = "quire/moveNotes";
pub const CMD_SEARCH: &str = "quire/search";
pub const CMD_DECLARE_FOLDER: &str = "quire/declareFolder";
pub const CMD_LIST_FOLDERS: &str = "quire/listFolders";
pub const CMD_UNDO: &str = "quire/undo";
pub const CMD_SAVE_NOTE: &str = "quire/saveNote";
pub const CMD_PUBLISH_NOTE: &str = "quire/publishNote";
pub const CMD_REMOVE_FOLDER: &str = "quire/removeFolder";

pub const COMMANDS: [&str; 10] = [
    CMD_CREATE_NOTE,
    CMD_DELETE_NOTE,
    CMD_MOVE_NOTES,
    CMD_SEARCH,
    CMD_DECLARE_FOLDER,
    CMD_LIST_FOLDERS,
    CMD_UNDO,
    CMD_SAVE_NOTE,
    CMD_PUBLISH_NOTE,
    CMD_REMOVE_FOLDER,
];

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteParams {
    pub title: String,
    #[serde(default)]
    pub folder: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteResult {
    pub id: String,
    pub uri: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNoteParams {
    pub id: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveNoteParams {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishNoteParams {
    pub id: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishNoteResult {
    pub id: String,
    /// `false` when the note already had a remote copy and was only pushed again.
    pub created: bool,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveNotesParams {
    pub ids: Vec<String>,
    /// Empty string moves to the root.
    #[serde(default)]
    pub folder: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveNotesResult {
    pub moved: usize,
    pub skipped: Vec<SkippedMove>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: String,
    #[serde(default)]
    pub folder: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub uri: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub notes: Vec<SearchHit>,
    pub tags: Vec<TagFrequency>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderParams {
    pub path: String,
}
