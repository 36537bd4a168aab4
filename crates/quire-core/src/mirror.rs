//! Seam for publishing notes to an external service.
//!
//! The remote identifier of a published note is kept in its `gist_id`
//! frontmatter field.

use crate::error::Result;
use crate::model::Note;

pub trait MirrorService: Send + Sync {
    /// Publish `note`, returning its remote identifier.
    fn create(&self, note: &Note) -> Result<String>;

    fn update(&self, remote_id: &str, note: &Note) -> Result<()>;

    fn delete(&self, remote_id: &str) -> Result<()>;
}

/// Mirror that accepts everything and publishes nowhere.
pub struct NoopMirror;

impl MirrorService for NoopMirror {
    fn create(&self, note: &Note) -> Result<String> {
        Ok(format!("local-{}", note.id))
    }

    fn update(&self, _remote_id: &str, _note: &Note) -> Result<()> {
        Ok(())
    }

    fn delete(&self, _remote_id: &str) -> Result<()> {
        Ok(())
    }
}
