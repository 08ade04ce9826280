//! Run command implementation.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tracing::info;

use roster_core::remote::{
    BlockhashComputer, EthRegistry, EthRegistryConfig, FsImageCache, HttpListStore,
    HttpMetadataResolver, ListStore,
};
use roster_core::{Collaborators, Coordinator, MembershipSet, SignatureStore};

use crate::config::Config;

/// Wraps the real list store for dry runs: fetches pass through, publishes
/// only log.
struct DryRunStore {
    inner: HttpListStore,
}

#[async_trait::async_trait]
impl ListStore for DryRunStore {
    async fn fetch(&self) -> MembershipSet {
        self.inner.fetch().await
    }

    async fn publish(&self, set: &MembershipSet) -> roster_core::Result<()> {
        info!(ids = set.len(), "Dry run: publish skipped");
        Ok(())
    }
}

/// Execute the run command.
pub async fn execute(dry_run: bool) -> Result<()> {
    let config = Config::from_env();

    let Some(rpc_url) = config.rpc_url.clone() else {
        bail!("ROSTER_RPC_URL is not set");
    };
    let Some(contract) = config.contract.clone() else {
        bail!("ROSTER_CONTRACT is not set");
    };
    let Some(list_url) = config.list_url.clone() else {
        bail!("ROSTER_LIST_URL is not set");
    };

    let references = SignatureStore::load(&config.references_path).with_context(|| {
        format!(
            "Failed to load reference signatures from {}",
            config.references_path.display()
        )
    })?;
    info!(references = references.len(), "Loaded reference signatures");

    let registry = EthRegistry::new(EthRegistryConfig {
        rpc_url,
        contract,
        timeout: config.timeout(),
    })?;
    let resolver = HttpMetadataResolver::new(config.ipfs_gateway.clone(), config.timeout())?;
    let computer = BlockhashComputer::new(config.timeout())?;
    let cache = FsImageCache::new(config.cache_dir.clone());
    let list_store = HttpListStore::new(list_url, config.list_token.clone(), config.timeout())?;

    let store: Arc<dyn ListStore> = if dry_run {
        Arc::new(DryRunStore { inner: list_store })
    } else {
        Arc::new(list_store)
    };

    let coordinator = Coordinator::new(
        Collaborators {
            registry: Arc::new(registry),
            resolver: Arc::new(resolver),
            computer: Arc::new(computer),
            cache: Arc::new(cache),
            store,
        },
        references,
        config.threshold,
    );

    let outcome = coordinator.run().await?;

    println!();
    println!("   {} {}", "Items:".dimmed(), outcome.total);
    println!("   {} {}", "Matched:".dimmed(), outcome.matched);
    println!("   {} {}", "Skipped:".dimmed(), outcome.skipped);
    if outcome.decision.changed {
        let label = if dry_run {
            "changed (dry run, not published)".yellow()
        } else {
            "changed, published".green()
        };
        println!("   {} {}", "List:".dimmed(), label);
    } else {
        println!("   {} {}", "List:".dimmed(), "unchanged".green());
    }

    Ok(())
}
