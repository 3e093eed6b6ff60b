mod api;
mod config;
mod context;
mod errors;
mod gemini;
mod state;
mod subgraph;

use crate::config::Config;
use crate::errors::ApiError;
use crate::gemini::GeminiClient;
use crate::state::AppState;
use crate::subgraph::SubgraphClient;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let config = Config::from_env()?;

    let subgraph = SubgraphClient::new(config.subgraph_endpoint.clone(), config.upstream_timeout)?;
    let gemini = GeminiClient::new(
        config.gemini_base_url,
        config.gemini_model,
        config.gemini_api_key,
        config.upstream_timeout,
    )?;

    let state = AppState::new(Arc::new(subgraph), Arc::new(gemini));

    // Initial load runs in the background; failure leaves the context
    // unready rather than refusing to start.
    {
        let state = state.clone();
        tokio::spawn(async move {
            match state.source.load_context().await {
                Ok(text) => {
                    state.ctx.replace(text).await;
                    tracing::info!("initial subgraph load complete");
                }
                Err(e) => tracing::warn!(error = %e, "initial subgraph load failed"),
            }
        });
    }

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .map_err(|_| ApiError::Internal)?;

    tracing::info!(addr = %config.addr, endpoint = %config.subgraph_endpoint, "query service listening");

    axum::serve(listener, app).await.map_err(|_| ApiError::Internal)?;

    Ok(())
}
