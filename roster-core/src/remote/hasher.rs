//! Image fetch plus perceptual signature computation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{HashedImage, SignatureComputer};
use crate::error::{Result, RosterError};
use crate::imaging;

/// Fetches image bytes over HTTP and hashes them with Blockhash64.
pub struct BlockhashComputer {
    client: Client,
}

impl BlockhashComputer {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RosterError::Hash(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SignatureComputer for BlockhashComputer {
    async fn compute(&self, image_url: &str) -> Result<HashedImage> {
        let response = self
            .client
            .get(image_url)
            .send()
            .await
            .map_err(|e| RosterError::Hash(format!("Image fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(RosterError::Hash(format!(
                "Image fetch returned status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RosterError::Hash(format!("Image download failed: {e}")))?
            .to_vec();

        let signature = imaging::compute_signature(&bytes)?;
        debug!(
            image_url,
            bytes = bytes.len(),
            signature = %signature.to_hex(),
            "Computed signature"
        );

        Ok(HashedImage { signature, bytes })
    }
}
