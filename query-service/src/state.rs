use crate::context::ContextStore;
use crate::gemini::Inference;
use crate::subgraph::ContextSource;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub ctx: ContextStore,
    pub source: Arc<dyn ContextSource>,
    pub inference: Arc<dyn Inference>,
}

impl AppState {
    pub fn new(source: Arc<dyn ContextSource>, inference: Arc<dyn Inference>) -> Self {
        Self {
            ctx: ContextStore::new(),
            source,
            inference,
        }
    }
}
