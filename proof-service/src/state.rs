use crate::zokrates::ToolInvoker;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub invoker: Arc<dyn ToolInvoker>,
}

impl AppState {
    pub fn new(invoker: Arc<dyn ToolInvoker>) -> Self {
        Self { invoker }
    }
}
