//! In-memory collaborators for driving the pipeline in tests.
//!
//! Deterministic and free of I/O. Each mock fails on entries it has not
//! been given, which is how tests exercise the per-item skip paths.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    HashedImage, ImageCache, Item, ItemRegistry, ListStore, MetadataResolver, SignatureComputer,
};
use crate::error::{Result, RosterError};
use crate::membership::MembershipSet;
use crate::signature::Signature;

/// Registry over a fixed in-memory item list.
#[derive(Debug, Default)]
pub struct MockRegistry {
    items: Vec<Item>,
    failing: Option<u64>,
}

impl MockRegistry {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            failing: None,
        }
    }

    /// Make enumeration of the item at `index` fail.
    pub fn failing_at(mut self, index: u64) -> Self {
        self.failing = Some(index);
        self
    }
}

#[async_trait]
impl ItemRegistry for MockRegistry {
    async fn count(&self) -> Result<u64> {
        Ok(self.items.len() as u64)
    }

    async fn item(&self, index: u64) -> Result<Item> {
        if self.failing == Some(index) {
            return Err(RosterError::Registry(format!(
                "Simulated failure at index {index}"
            )));
        }

        self.items
            .get(index as usize)
            .cloned()
            .ok_or_else(|| RosterError::Registry(format!("No item at index {index}")))
    }
}

/// Resolver over a fixed token-uri to image-url table; unknown URIs fail.
#[derive(Debug, Default)]
pub struct MockResolver {
    routes: HashMap<String, String>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, token_uri: &str, image_url: &str) -> Self {
        self.routes.insert(token_uri.into(), image_url.into());
        self
    }
}

#[async_trait]
impl MetadataResolver for MockResolver {
    async fn resolve(&self, token_uri: &str) -> Result<String> {
        self.routes
            .get(token_uri)
            .cloned()
            .ok_or_else(|| RosterError::Resolution(format!("No metadata for {token_uri}")))
    }
}

/// Computer over a fixed image-url to signature table; unknown URLs fail.
#[derive(Debug, Default)]
pub struct MockComputer {
    signatures: HashMap<String, Signature>,
}

impl MockComputer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signature(mut self, image_url: &str, signature: Signature) -> Self {
        self.signatures.insert(image_url.into(), signature);
        self
    }
}

#[async_trait]
impl SignatureComputer for MockComputer {
    async fn compute(&self, image_url: &str) -> Result<HashedImage> {
        let signature = self
            .signatures
            .get(image_url)
            .cloned()
            .ok_or_else(|| RosterError::Hash(format!("No image at {image_url}")))?;

        Ok(HashedImage {
            signature,
            bytes: image_url.as_bytes().to_vec(),
        })
    }
}

/// Cache that records saves in memory.
#[derive(Debug, Default)]
pub struct MemoryCache {
    saved: Mutex<HashMap<u64, Vec<u8>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids saved so far, in ascending order.
    pub fn saved_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.saved.lock().unwrap().keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl ImageCache for MemoryCache {
    fn exists(&self, id: u64) -> bool {
        self.saved.lock().unwrap().contains_key(&id)
    }

    fn save(&self, id: u64, bytes: &[u8]) -> Result<()> {
        self.saved.lock().unwrap().insert(id, bytes.to_vec());
        Ok(())
    }
}

/// List store with a preloaded previous set; records what gets published.
#[derive(Debug, Default)]
pub struct MemoryListStore {
    previous: MembershipSet,
    fail_publish: bool,
    published: Mutex<Option<MembershipSet>>,
}

impl MemoryListStore {
    pub fn new(previous: MembershipSet) -> Self {
        Self {
            previous,
            ..Default::default()
        }
    }

    /// Make every publish attempt fail.
    pub fn failing_publish(mut self) -> Self {
        self.fail_publish = true;
        self
    }

    /// The last published set, if any publish happened.
    pub fn published(&self) -> Option<MembershipSet> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListStore for MemoryListStore {
    async fn fetch(&self) -> MembershipSet {
        self.previous.clone()
    }

    async fn publish(&self, set: &MembershipSet) -> Result<()> {
        if self.fail_publish {
            return Err(RosterError::Publish("Publish rejected".into()));
        }
        *self.published.lock().unwrap() = Some(set.clone());
        Ok(())
    }
}
