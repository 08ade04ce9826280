//! Remote storage of the published membership document.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use super::ListStore;
use crate::error::{Result, RosterError};
use crate::membership::MembershipSet;

/// HTTP-backed list store.
///
/// The document lives at a fixed URL, fetched with GET and replaced with
/// PUT. An optional bearer token covers write authorization.
pub struct HttpListStore {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HttpListStore {
    pub fn new(url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RosterError::Publish(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
            token,
        })
    }

    async fn try_fetch(&self) -> Result<MembershipSet> {
        let mut request = self.client.get(&self.url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ListStore for HttpListStore {
    async fn fetch(&self) -> MembershipSet {
        match self.try_fetch().await {
            Ok(set) => set,
            Err(e) => {
                warn!(error = %e, "Could not fetch previous list, starting from empty set");
                MembershipSet::default()
            }
        }
    }

    async fn publish(&self, set: &MembershipSet) -> Result<()> {
        let mut request = self.client.put(&self.url).json(set);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RosterError::Publish(format!("List publish failed: {e}")))?;

        if !response.status().is_success() {
            return Err(RosterError::Publish(format!(
                "List publish returned status {}",
                response.status()
            )));
        }

        info!(ids = set.len(), "Published membership list");
        Ok(())
    }
}
