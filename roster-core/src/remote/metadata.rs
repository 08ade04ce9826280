//! Token metadata resolution.
//!
//! Token URIs come in three shapes in the wild: plain HTTP(S) JSON
//! documents, `ipfs://` URIs served through a gateway, and inline
//! `data:application/json;base64,` documents. All three resolve to the
//! document's `image` field.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use tracing::debug;

use super::MetadataResolver;
use crate::error::{Result, RosterError};

const DATA_JSON_PREFIX: &str = "data:application/json;base64,";

/// HTTP-backed metadata resolver with IPFS gateway rewriting.
pub struct HttpMetadataResolver {
    client: Client,
    /// Gateway base URL that `ipfs://` URIs are rewritten onto.
    gateway: String,
}

impl HttpMetadataResolver {
    pub fn new(gateway: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RosterError::Resolution(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            gateway: gateway.into(),
        })
    }
}

#[async_trait]
impl MetadataResolver for HttpMetadataResolver {
    async fn resolve(&self, token_uri: &str) -> Result<String> {
        let metadata: serde_json::Value =
            if let Some(encoded) = token_uri.strip_prefix(DATA_JSON_PREFIX) {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(encoded)
                    .map_err(|e| {
                        RosterError::Resolution(format!("Invalid base64 metadata: {e}"))
                    })?;
                serde_json::from_slice(&bytes).map_err(|e| {
                    RosterError::Resolution(format!("Malformed inline metadata: {e}"))
                })?
            } else {
                let url = rewrite_ipfs(token_uri, &self.gateway);
                let response = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| RosterError::Resolution(format!("Metadata fetch failed: {e}")))?;

                if !response.status().is_success() {
                    return Err(RosterError::Resolution(format!(
                        "Metadata fetch returned status {}",
                        response.status()
                    )));
                }

                response.json().await.map_err(|e| {
                    RosterError::Resolution(format!("Malformed metadata document: {e}"))
                })?
            };

        let image = rewrite_ipfs(&image_url(&metadata)?, &self.gateway);
        debug!(token_uri, image = %image, "Resolved image URL");
        Ok(image)
    }
}

/// Rewrite an `ipfs://` URI onto the gateway; other URIs pass through.
///
/// Handles the legacy `ipfs://ipfs/<cid>` form as well.
fn rewrite_ipfs(uri: &str, gateway: &str) -> String {
    match uri.strip_prefix("ipfs://") {
        Some(path) => format!("{gateway}{}", path.trim_start_matches("ipfs/")),
        None => uri.to_string(),
    }
}

/// Pull the image URL out of a metadata document.
fn image_url(metadata: &serde_json::Value) -> Result<String> {
    metadata
        .get("image")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| RosterError::Resolution("Metadata has no image field".into()))
}
