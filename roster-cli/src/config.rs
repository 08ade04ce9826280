//! Run configuration loaded from environment variables with sensible
//! defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a classification run.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON-RPC endpoint of the chain hosting the collection
    pub rpc_url: Option<String>,
    /// Collection contract address, 0x-prefixed
    pub contract: Option<String>,
    /// URL of the published membership document
    pub list_url: Option<String>,
    /// Bearer token for publishing
    pub list_token: Option<String>,
    /// Path to the reference signature file (default: references.json)
    pub references_path: PathBuf,
    /// Directory for cached images (default: images)
    pub cache_dir: PathBuf,
    /// Maximum Hamming distance for a match (default: 5)
    pub threshold: u32,
    /// Gateway that ipfs:// URIs are rewritten onto
    pub ipfs_gateway: String,
    /// HTTP request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: None,
            contract: None,
            list_url: None,
            list_token: None,
            references_path: PathBuf::from("references.json"),
            cache_dir: PathBuf::from("images"),
            threshold: 5,
            ipfs_gateway: "https://ipfs.io/ipfs/".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let references_path = std::env::var("ROSTER_REFERENCES")
            .map(PathBuf::from)
            .unwrap_or(defaults.references_path);

        let cache_dir = std::env::var("ROSTER_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_dir);

        let threshold = std::env::var("ROSTER_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.threshold);

        let ipfs_gateway =
            std::env::var("ROSTER_IPFS_GATEWAY").unwrap_or(defaults.ipfs_gateway);

        let timeout_secs = std::env::var("ROSTER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            rpc_url: std::env::var("ROSTER_RPC_URL").ok(),
            contract: std::env::var("ROSTER_CONTRACT").ok(),
            list_url: std::env::var("ROSTER_LIST_URL").ok(),
            list_token: std::env::var("ROSTER_LIST_TOKEN").ok(),
            references_path,
            cache_dir,
            threshold,
            ipfs_gateway,
            timeout_secs,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.threshold, 5);
        assert_eq!(config.references_path, PathBuf::from("references.json"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.rpc_url.is_none());
    }
}
