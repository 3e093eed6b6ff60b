use crate::errors::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Instructional preamble prepended to every prompt.
pub const PREAMBLE: &str = "You are a system that can answer queries that are regarding a knowledge base. The knowledge base data is given and based on this knowledge base given response to the given query. You will be prompted with a query by the user based on this given data and you have to answer and only consider this given data. If you are unable to find the answer from this given data then you can use the outside data. Answer precisely and make sure to use the given data.";

/// Combine the aggregated context and the caller's query into the prompt
/// sent upstream. An unloaded context yields an empty data section; the
/// prompt is still well-formed.
pub fn build_prompt(context: &str, query: &str) -> String {
    format!("{PREAMBLE} Given Data: {context}Answer this query: {query}")
}

/// Seam over the generative-inference API.
#[async_trait]
pub trait Inference: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;
}

/// Client for the Google Generative Language `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GeminiClient {
    pub fn new(
        base_url: String,
        model: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Inference(format!("client setup: {e}")))?;

        Ok(Self {
            http,
            base_url,
            model,
            api_key,
        })
    }
}

#[async_trait]
impl Inference for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Inference(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Inference(format!("HTTP {status}: {body}")));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Inference(format!("invalid JSON: {e}")))?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ApiError::Inference("response contained no text".to_string()));
        }

        Ok(text)
    }
}
