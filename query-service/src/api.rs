use crate::errors::ApiError;
use crate::gemini::build_prompt;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, serde::Deserialize)]
pub struct LoadParams {
    /// Accepted for wire compatibility; the configured endpoint always wins.
    pub api_endpoint: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct QueryParams {
    pub query: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/", get(load_subgraph))
        .route("/query", get(run_query))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn load_subgraph(
    State(state): State<AppState>,
    Query(params): Query<LoadParams>,
) -> Result<String, ApiError> {
    if let Some(endpoint) = params.api_endpoint.as_deref() {
        tracing::warn!(%endpoint, "ignoring caller-supplied endpoint in favor of configuration");
    }

    let text = state.source.load_context().await?;
    state.ctx.replace(text).await;

    tracing::info!("subgraph context loaded");

    Ok("Subgraph Loaded!".to_string())
}

async fn run_query(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<String, ApiError> {
    let snapshot = state.ctx.snapshot().await;
    if !snapshot.ready() {
        tracing::warn!("query served before first subgraph load; sending empty context");
    }

    let prompt = build_prompt(&snapshot.text, &params.query);
    state.inference.generate(&prompt).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::{Inference, PREAMBLE};
    use crate::subgraph::ContextSource;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    struct StaticSource {
        text: String,
    }

    #[async_trait]
    impl ContextSource for StaticSource {
        async fn load_context(&self) -> Result<String, ApiError> {
            Ok(self.text.clone())
        }
    }

    struct UnreachableSource;

    #[async_trait]
    impl ContextSource for UnreachableSource {
        async fn load_context(&self) -> Result<String, ApiError> {
            Err(ApiError::Subgraph("mints: connection refused".to_string()))
        }
    }

    /// Records every prompt and replies with a fixed answer.
    struct RecordingInference {
        prompts: Mutex<Vec<String>>,
    }

    impl RecordingInference {
        fn new() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Inference for RecordingInference {
        async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("model answer".to_string())
        }
    }

    struct FailingInference;

    #[async_trait]
    impl Inference for FailingInference {
        async fn generate(&self, _prompt: &str) -> Result<String, ApiError> {
            Err(ApiError::Inference("HTTP 429".to_string()))
        }
    }

    fn app(state: &AppState) -> Router {
        router(state.clone())
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn load_replaces_context_and_confirms() {
        let state = AppState::new(
            Arc::new(StaticSource {
                text: "=== mints ===\nrow\n \n".to_string(),
            }),
            Arc::new(RecordingInference::new()),
        );

        let response = app(&state)
            .oneshot(Request::get("/?api_endpoint=ignored").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Subgraph Loaded!");

        let snap = state.ctx.snapshot().await;
        assert!(snap.ready());
        assert_eq!(snap.text, "=== mints ===\nrow\n \n");
    }

    #[tokio::test]
    async fn query_uses_loaded_context() {
        let inference = Arc::new(RecordingInference::new());
        let state = AppState::new(
            Arc::new(StaticSource {
                text: "the knowledge base".to_string(),
            }),
            inference.clone(),
        );

        app(&state)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let response = app(&state)
            .oneshot(Request::get("/query?query=hello").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "model answer");

        let prompts = inference.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].starts_with(PREAMBLE));
        assert!(prompts[0].contains("Given Data: the knowledge base"));
        assert!(prompts[0].ends_with("Answer this query: hello"));
    }

    #[tokio::test]
    async fn query_before_first_load_sends_empty_context() {
        let inference = Arc::new(RecordingInference::new());
        let state = AppState::new(
            Arc::new(StaticSource {
                text: "never loaded".to_string(),
            }),
            inference.clone(),
        );

        let response = app(&state)
            .oneshot(Request::get("/query?query=hello").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let prompts = inference.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0], build_prompt("", "hello"));
    }

    #[tokio::test]
    async fn load_failure_maps_to_bad_gateway_and_keeps_old_context() {
        let state = AppState::new(
            Arc::new(UnreachableSource),
            Arc::new(RecordingInference::new()),
        );
        state.ctx.replace("previous".to_string()).await;

        let response = app(&state)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(state.ctx.snapshot().await.text, "previous");
    }

    #[tokio::test]
    async fn inference_failure_maps_to_bad_gateway() {
        let state = AppState::new(
            Arc::new(StaticSource {
                text: String::new(),
            }),
            Arc::new(FailingInference),
        );

        let response = app(&state)
            .oneshot(Request::get("/query?query=hello").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn query_requires_query_parameter() {
        let state = AppState::new(
            Arc::new(StaticSource {
                text: String::new(),
            }),
            Arc::new(RecordingInference::new()),
        );

        let response = app(&state)
            .oneshot(Request::get("/query").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
