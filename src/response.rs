//! Response types for the metadata API.

use serde::Serialize;
use serde_json::Value;

use crate::catalog::TokenRecord;

/// Externally visible metadata document for one token. Built fresh per
/// request; never stored.
#[derive(Debug, Serialize)]
pub struct TokenMetadata {
    pub name: String,
    pub attributes: Vec<Value>,
    pub description: String,
    /// This service's own image endpoint for the token.
    pub image: String,
    /// This service's own video endpoint, only for tokens that have one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_url: Option<String>,
}

impl TokenMetadata {
    pub fn build(record: &TokenRecord, token_id: u64, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            name: record.name.clone(),
            attributes: record.attributes.clone(),
            description: record.description.clone(),
            image: format!("{base}/assets/images/{token_id}"),
            animation_url: record
                .video
                .as_ref()
                .map(|_| format!("{base}/assets/videos/{token_id}")),
        }
    }
}

/// Response from the health endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub total_supply: u64,
    pub catalog_records: usize,
    pub uptime_secs: u64,
    pub requests: u64,
    pub rpc: String,
}
