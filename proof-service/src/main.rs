mod api;
mod config;
mod errors;
mod models;
mod state;
mod zokrates;

use crate::config::Config;
use crate::errors::ApiError;
use crate::state::AppState;
use crate::zokrates::ZokratesInvoker;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let config = Config::from_env();

    let invoker = ZokratesInvoker::new(config.zokrates_bin, config.work_dir);
    let state = AppState::new(Arc::new(invoker));

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .map_err(|_| ApiError::Internal)?;

    tracing::info!(addr = %config.addr, "proof service listening");

    axum::serve(listener, app).await.map_err(|_| ApiError::Internal)?;

    Ok(())
}
