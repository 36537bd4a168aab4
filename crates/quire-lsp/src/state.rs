use quire_core::{FileSystem, MirrorService, MutationBatch, Vault};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Undo batches kept per session.
pub const HISTORY_LIMIT: usize = 50;

/// Global state for LSP server
/// Must be Send + Sync
#[derive(Clone)]
pub struct GlobalState {
    /// Read operations (search, folder listing) are concurrent
    /// Write operations (recording a batch, file events) are exclusive
    pub vault: Arc<RwLock<Option<Vault>>>,
    pub fs: Arc<dyn FileSystem>,
    pub mirror: Arc<dyn MirrorService>,
    /// Inverse of every recorded batch, newest last
    pub mutation_history: Arc<RwLock<VecDeque<MutationBatch>>>,
}

impl GlobalState {
    pub fn new(fs: Arc<dyn FileSystem>, mirror: Arc<dyn MirrorService>) -> Self {
        Self {
            vault: Arc::new(RwLock::new(None)),
            fs,
            mirror,
            mutation_history: Arc::new(RwLock::new(VecDeque::new())),
        }
    }

    pub async fn push_undo(&self, inverse: MutationBatch) {
        let mut history = self.mutation_history.write().await;
        history.push_back(inverse);
        while history.len() > HISTORY_LIMIT {
            history.pop_front();
        }
    }
}
