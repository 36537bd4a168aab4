//! Quire Core Library
//!
//! Note identity and referential integrity for a vault of markdown notes:
//! slugs, wikilink rewriting, rename/move batches, virtual folders and search.
//! Everything except `vfs`, `config` and the `Vault` facade is pure logic.
//!

pub mod config;
pub mod error;
pub mod folders;
pub mod frontmatter;
pub mod line_map;
pub mod mirror;
pub mod model;
pub mod mutation;
pub mod parser;
pub mod query;
pub mod store;
pub mod utils;
pub mod vfs;
pub mod wikilink;
pub mod workspace;

pub use config::QuireConfig;
pub use error::{QuireError, Result};
pub use mirror::{MirrorService, NoopMirror};
pub use model::{Note, NoteId};
pub use mutation::{MoveOutcome, MutationBatch, MutationKind};
pub use query::{parse_query, Query};
pub use utils::{generate_note_id, is_valid_note_id, slugify_segment, to_slug};
pub use vfs::{FileSystem, PhysicalFileSystem};
pub use workspace::{SearchResult, Vault, Workspace};
