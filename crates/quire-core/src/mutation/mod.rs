//! Mutation planning: pure functions from a file-set snapshot to a batch of
//! intended file changes. Nothing here touches the disk.

pub mod audit;
pub mod model;
pub mod moves;
pub mod rename;

pub use audit::{audit_references, DanglingReference};
pub use model::{content_digest, MutationBatch, MutationKind, Precondition};
pub use moves::{calculate_move, destination_id, MoveOutcome, SkipReason, SkippedMove};
pub use rename::calculate_rename;
