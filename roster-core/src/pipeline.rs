//! The run coordinator: one full classification run, end to end.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::classify::classify;
use crate::error::Result;
use crate::membership::MembershipBuilder;
use crate::reconcile::{reconcile, PublishDecision};
use crate::remote::{
    HashedImage, ImageCache, Item, ItemRegistry, ListStore, MetadataResolver, SignatureComputer,
};
use crate::signature::SignatureStore;

/// The collaborators a run is driven through.
pub struct Collaborators {
    pub registry: Arc<dyn ItemRegistry>,
    pub resolver: Arc<dyn MetadataResolver>,
    pub computer: Arc<dyn SignatureComputer>,
    pub cache: Arc<dyn ImageCache>,
    pub store: Arc<dyn ListStore>,
}

/// Aggregate result of one run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub decision: PublishDecision,
    /// Items the registry enumerated.
    pub total: u64,
    /// Items in the rebuilt membership set.
    pub matched: usize,
    /// Items dropped on per-item failures.
    pub skipped: u64,
    pub published: bool,
}

/// Drives one classification run.
///
/// The coordinator owns no I/O of its own; every external step goes through
/// a collaborator. A failure while enumerating, resolving, or hashing a
/// single item skips that item and the run continues; the item is simply
/// absent from the rebuilt set until the next run picks it up again.
pub struct Coordinator {
    registry: Arc<dyn ItemRegistry>,
    resolver: Arc<dyn MetadataResolver>,
    computer: Arc<dyn SignatureComputer>,
    cache: Arc<dyn ImageCache>,
    store: Arc<dyn ListStore>,
    references: SignatureStore,
    threshold: u32,
}

impl Coordinator {
    pub fn new(collaborators: Collaborators, references: SignatureStore, threshold: u32) -> Self {
        let Collaborators {
            registry,
            resolver,
            computer,
            cache,
            store,
        } = collaborators;

        Self {
            registry,
            resolver,
            computer,
            cache,
            store,
            references,
            threshold,
        }
    }

    /// Execute one full run: rebuild the membership set from scratch and
    /// publish it if it differs from the previously published one.
    #[instrument(skip(self), fields(threshold = self.threshold, references = self.references.len()))]
    pub async fn run(&self) -> Result<RunOutcome> {
        let previous = self.store.fetch().await;
        info!(previous_ids = previous.len(), "Loaded previously published set");

        let total = self.registry.count().await?;
        info!(items = total, "Enumerating collection");

        let mut builder = MembershipBuilder::new();
        let mut skipped = 0u64;

        for index in 0..total {
            let item = match self.registry.item(index).await {
                Ok(item) => item,
                Err(e) => {
                    warn!(index, error = %e, "Skipping item: enumeration failed");
                    skipped += 1;
                    continue;
                }
            };

            let hashed = match self.evaluate(&item).await {
                Ok(hashed) => hashed,
                Err(e) if previous.contains(item.id) => {
                    warn!(
                        id = item.id,
                        error = %e,
                        "Skipping previously listed item; it will drop from the published list"
                    );
                    skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!(id = item.id, error = %e, "Skipping item");
                    skipped += 1;
                    continue;
                }
            };

            if !self.cache.exists(item.id) {
                if let Err(e) = self.cache.save(item.id, &hashed.bytes) {
                    warn!(id = item.id, error = %e, "Failed to cache image");
                }
            }

            let classification =
                classify(item.id, &hashed.signature, &self.references, self.threshold)?;
            match &classification.matched {
                Some(reference) => {
                    debug!(
                        id = item.id,
                        reference = %reference.name,
                        distance = reference.distance,
                        "Item matched"
                    );
                    builder.record(item.id);
                }
                None => debug!(id = item.id, "No reference within threshold"),
            }
        }

        let current = builder.build();
        let matched = current.len();
        let decision = reconcile(&previous, &current);

        let published = if decision.changed {
            self.store.publish(&current).await?;
            info!(
                previous = decision.previous_ids.len(),
                new = decision.new_ids.len(),
                "Membership changed, published new list"
            );
            true
        } else {
            info!(ids = decision.new_ids.len(), "Membership unchanged, nothing to publish");
            false
        };

        Ok(RunOutcome {
            decision,
            total,
            matched,
            skipped,
            published,
        })
    }

    /// Resolve and hash one item's image.
    async fn evaluate(&self, item: &Item) -> Result<HashedImage> {
        let image_url = self.resolver.resolve(&item.token_uri).await?;
        self.computer.compute(&image_url).await
    }
}
