use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Immutable view of the aggregated subgraph context at one point in time.
#[derive(Debug)]
pub struct ContextSnapshot {
    pub text: String,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl ContextSnapshot {
    /// False until the first successful load completes.
    pub fn ready(&self) -> bool {
        self.loaded_at.is_some()
    }
}

/// Single-writer holder for the aggregated context.
///
/// Readers clone out an `Arc` snapshot; a load replaces the snapshot
/// wholesale, so a request never observes a partially written context.
/// Last write wins, matching the original load semantics.
#[derive(Clone)]
pub struct ContextStore {
    inner: Arc<RwLock<Arc<ContextSnapshot>>>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(ContextSnapshot {
                text: String::new(),
                loaded_at: None,
            }))),
        }
    }

    pub async fn snapshot(&self) -> Arc<ContextSnapshot> {
        self.inner.read().await.clone()
    }

    pub async fn replace(&self, text: String) {
        let snapshot = Arc::new(ContextSnapshot {
            text,
            loaded_at: Some(Utc::now()),
        });
        *self.inner.write().await = snapshot;
    }
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new()
    }
}
