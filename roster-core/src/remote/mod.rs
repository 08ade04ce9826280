//! Collaborator contracts for the classification run, plus their production
//! adapters and in-memory mocks.
//!
//! The pure decision core performs no I/O. Everything network- or
//! disk-facing sits behind one of these traits, so the whole pipeline can be
//! driven end to end in tests with the [`mock`] collaborators.

mod cache;
#[cfg(feature = "imaging")]
mod hasher;
mod list_store;
mod metadata;
pub mod mock;
mod registry;

pub use cache::FsImageCache;
#[cfg(feature = "imaging")]
pub use hasher::BlockhashComputer;
pub use list_store::HttpListStore;
pub use metadata::HttpMetadataResolver;
pub use registry::{EthRegistry, EthRegistryConfig};

use async_trait::async_trait;

use crate::error::Result;
use crate::membership::MembershipSet;
use crate::signature::Signature;

/// One collection item as enumerated from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub token_uri: String,
}

/// Image bytes together with their computed signature.
#[derive(Debug, Clone)]
pub struct HashedImage {
    pub signature: Signature,
    pub bytes: Vec<u8>,
}

/// Enumerates the items of a fixed collection.
///
/// Enumeration starts fresh every run; no cursor is persisted between runs.
#[async_trait]
pub trait ItemRegistry: Send + Sync {
    /// Number of items in the collection.
    async fn count(&self) -> Result<u64>;

    /// The item at `index` in enumeration order.
    async fn item(&self, index: u64) -> Result<Item>;
}

/// Resolves an item's token metadata to its current image URL.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    async fn resolve(&self, token_uri: &str) -> Result<String>;
}

/// Fetches an image and computes its perceptual signature.
///
/// The raw bytes come back alongside the signature so the caller can feed
/// the image cache without a second fetch.
#[async_trait]
pub trait SignatureComputer: Send + Sync {
    async fn compute(&self, image_url: &str) -> Result<HashedImage>;
}

/// Byte-for-byte image cache.
///
/// Written as an idempotent side effect; never read back into
/// classification.
pub trait ImageCache: Send + Sync {
    fn exists(&self, id: u64) -> bool;
    fn save(&self, id: u64, bytes: &[u8]) -> Result<()>;
}

/// Remote storage of the published membership document.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Fetch the previously published set.
    ///
    /// Returns the empty set on any failure, including a missing document,
    /// so a first run bootstraps cleanly.
    async fn fetch(&self) -> MembershipSet;

    /// Publish the given set, replacing the stored document.
    async fn publish(&self, set: &MembershipSet) -> Result<()>;
}
