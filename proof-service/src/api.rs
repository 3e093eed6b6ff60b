use crate::errors::ApiError;
use crate::models::*;
use crate::state::AppState;
use crate::zokrates::{witness_args, ToolOutput, CIRCUIT_SOURCE};
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/compile", post(compile_circuit))
        .route("/generate_witness", get(generate_witness))
        .route("/generate_proof", get(generate_proof))
        .route("/export_verifier", get(export_verifier))
        .route("/verify_proof", get(verify_proof))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Run one toolchain command, mapping a non-zero exit into a typed error.
async fn run_checked(state: &AppState, args: Vec<String>) -> Result<ToolOutput, ApiError> {
    let out = state.invoker.run(&args).await?;
    if !out.success() {
        tracing::warn!(?args, code = ?out.status, "toolchain reported failure");
        return Err(ApiError::Tool {
            code: out.status,
            stderr: out.stderr,
        });
    }
    Ok(out)
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

async fn compile_circuit(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    let compile = run_checked(&state, args(&["compile", "-i", CIRCUIT_SOURCE])).await?;
    run_checked(&state, args(&["setup"])).await?;

    tracing::info!("circuit compiled and setup done");

    Ok(Json(CommandResponse {
        message: "Circuit compiled successfully and setup done".to_string(),
        output: compile.stdout,
    }))
}

async fn generate_witness(
    State(state): State<AppState>,
    Query(params): Query<WitnessParams>,
) -> Result<Json<CommandResponse>, ApiError> {
    let out = run_checked(&state, witness_args(params.unique_ipfs_integer)).await?;

    tracing::info!(unique_ipfs_integer = params.unique_ipfs_integer, "witness generated");

    Ok(Json(CommandResponse {
        message: "Witness generated successfully".to_string(),
        output: out.stdout,
    }))
}

async fn generate_proof(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    let out = run_checked(&state, args(&["generate-proof"])).await?;

    Ok(Json(CommandResponse {
        message: "Proof generated successfully".to_string(),
        output: out.stdout,
    }))
}

async fn export_verifier(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    let out = run_checked(&state, args(&["export-verifier"])).await?;

    Ok(Json(CommandResponse {
        message: "Verifier exported".to_string(),
        output: out.stdout,
    }))
}

async fn verify_proof(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    let out = run_checked(&state, args(&["verify"])).await?;

    Ok(Json(CommandResponse {
        message: "Proof is verified".to_string(),
        output: out.stdout,
    }))
}
