use crate::errors::ApiError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// The four zkCDN collections aggregated into the prompt context, each with
/// the selection set its entity exposes in the subgraph schema.
pub const COLLECTIONS: [(&str, &str); 4] = [
    (
        "mints",
        "id to encrypted_cid blockNumber blockTimestamp transactionHash",
    ),
    (
        "mappings",
        "id encrypted_cid blockNumber blockTimestamp transactionHash",
    ),
    (
        "convertedStrings",
        "id encrypted_cid blockNumber blockTimestamp transactionHash",
    ),
    (
        "encryptedCIDs",
        "id encrypted_cid blockNumber blockTimestamp transactionHash",
    ),
];

const PAGE_SIZE: usize = 1000;

/// Seam over the subgraph so handlers can be exercised without network
/// access.
#[async_trait]
pub trait ContextSource: Send + Sync {
    /// Fetch all collections and render them into one context blob.
    async fn load_context(&self) -> Result<String, ApiError>;
}

pub struct SubgraphClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SubgraphClient {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Subgraph(format!("client setup: {e}")))?;

        Ok(Self { http, endpoint })
    }

    async fn fetch_collection(&self, name: &str, selection: &str) -> Result<Vec<Value>, ApiError> {
        let query = format!("{{ {name}(first: {PAGE_SIZE}) {{ {selection} }} }}");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(|e| ApiError::Subgraph(format!("{name}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Subgraph(format!("{name}: HTTP {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Subgraph(format!("{name}: invalid JSON: {e}")))?;

        if let Some(errors) = body.get("errors") {
            return Err(ApiError::Subgraph(format!("{name}: {errors}")));
        }

        body.pointer(&format!("/data/{name}"))
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| ApiError::Subgraph(format!("{name}: missing result set")))
    }
}

#[async_trait]
impl ContextSource for SubgraphClient {
    async fn load_context(&self) -> Result<String, ApiError> {
        let mut sections = Vec::with_capacity(COLLECTIONS.len());

        // The four queries run sequentially, one result set each.
        for (name, selection) in COLLECTIONS {
            let rows = self.fetch_collection(name, selection).await?;
            tracing::debug!(collection = name, rows = rows.len(), "fetched collection");
            sections.push((name, rows));
        }

        Ok(render_context(&sections))
    }
}

/// Marker heading one section of the aggregated context.
pub fn section_marker(name: &str) -> String {
    format!("=== {name} ===")
}

/// Render fetched collections into the single context blob.
///
/// Every collection contributes a marked section, zero rows or not.
pub fn render_context(sections: &[(&str, Vec<Value>)]) -> String {
    let mut out = String::new();

    for (name, rows) in sections {
        out.push_str(&section_marker(name));
        out.push('\n');

        if rows.is_empty() {
            out.push_str("(no rows)\n");
        }
        for row in rows {
            out.push_str(&render_row(row));
            out.push('\n');
        }

        out.push_str(" \n");
    }

    out
}

fn render_row(row: &Value) -> String {
    match row {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{k}={}", render_scalar(v)))
            .collect::<Vec<_>>()
            .join(" | "),
        other => other.to_string(),
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_sections() -> Vec<(&'static str, Vec<Value>)> {
        COLLECTIONS.iter().map(|(name, _)| (*name, Vec::new())).collect()
    }

    #[test]
    fn context_always_has_one_marker_per_collection() {
        let text = render_context(&empty_sections());

        for (name, _) in COLLECTIONS {
            let marker = section_marker(name);
            assert_eq!(
                text.matches(&marker).count(),
                1,
                "expected exactly one {marker} section"
            );
        }
    }

    #[test]
    fn empty_collections_still_render_sections() {
        let text = render_context(&empty_sections());

        assert_eq!(text.matches("(no rows)").count(), COLLECTIONS.len());
    }

    #[test]
    fn rows_render_as_field_value_pairs() {
        let rows = vec![json!({
            "id": "0xabc01",
            "encrypted_cid": "Qm123",
            "blockNumber": "19",
        })];

        let text = render_context(&[("mints", rows)]);

        assert!(text.contains("=== mints ==="));
        assert!(text.contains("encrypted_cid=Qm123"));
        assert!(text.contains("blockNumber=19"));
        assert!(text.contains("id=0xabc01"));
    }

    #[test]
    fn sections_are_separated() {
        let text = render_context(&empty_sections());

        // Original context joined sections with a trailing " \n" separator.
        assert_eq!(text.matches(" \n").count(), COLLECTIONS.len());
    }
}
