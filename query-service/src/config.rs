use crate::errors::ApiError;
use std::time::Duration;

/// Default public subgraph deployment for the zkCDN contract.
pub const DEFAULT_SUBGRAPH_ENDPOINT: &str =
    "https://api.studio.thegraph.com/query/90589/zkcdngraph/version/latest";

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

pub struct Config {
    pub addr: String,
    pub subgraph_endpoint: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub gemini_api_key: String,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ApiError> {
        // The inference key is the one value with no sane default.
        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| ApiError::Config("GEMINI_API_KEY must be set".to_string()))?;

        let upstream_timeout = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS));

        Ok(Self {
            addr: std::env::var("QUERY_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            subgraph_endpoint: std::env::var("SUBGRAPH_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_SUBGRAPH_ENDPOINT.to_string()),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_key,
            upstream_timeout,
        })
    }
}
