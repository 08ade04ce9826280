//! ERC-721 registry enumeration over JSON-RPC.
//!
//! Speaks the minimal ERC-721 Enumerable surface a run needs:
//! `totalSupply()`, `tokenByIndex(uint256)`, and `tokenURI(uint256)`, each
//! issued as an `eth_call` with hand-encoded call data.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Item, ItemRegistry};
use crate::error::{Result, RosterError};

// Function selectors: first four bytes of keccak-256 of the canonical
// signature.
const SEL_TOTAL_SUPPLY: &str = "18160ddd";
const SEL_TOKEN_BY_INDEX: &str = "4f6ccce7";
const SEL_TOKEN_URI: &str = "c87b56dd";

/// Configuration for the JSON-RPC registry client.
#[derive(Debug, Clone)]
pub struct EthRegistryConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Collection contract address, `0x`-prefixed.
    pub contract: String,
    /// Request timeout.
    pub timeout: Duration,
}

/// Read-only ERC-721 Enumerable client.
pub struct EthRegistry {
    client: Client,
    config: EthRegistryConfig,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u32,
    method: &'static str,
    params: (CallParams<'a>, &'static str),
}

#[derive(Debug, Serialize)]
struct CallParams<'a> {
    to: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl EthRegistry {
    pub fn new(config: EthRegistryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RosterError::Registry(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Issue one `eth_call` against the collection contract and decode the
    /// hex payload of its result.
    async fn eth_call(&self, data: String) -> Result<Vec<u8>> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "eth_call",
            params: (
                CallParams {
                    to: &self.config.contract,
                    data,
                },
                "latest",
            ),
        };

        let response: RpcResponse = self
            .client
            .post(&self.config.rpc_url)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(RosterError::Registry(format!(
                "RPC error {}: {}",
                err.code, err.message
            )));
        }

        let result = response
            .result
            .ok_or_else(|| RosterError::Registry("RPC response missing result".into()))?;

        decode_hex_payload(&result)
    }
}

#[async_trait]
impl ItemRegistry for EthRegistry {
    async fn count(&self) -> Result<u64> {
        let payload = self.eth_call(encode_call(SEL_TOTAL_SUPPLY, None)).await?;
        let supply = decode_uint(&payload)?;
        debug!(supply, contract = %self.config.contract, "Fetched collection size");
        Ok(supply)
    }

    async fn item(&self, index: u64) -> Result<Item> {
        let id_payload = self
            .eth_call(encode_call(SEL_TOKEN_BY_INDEX, Some(index)))
            .await?;
        let id = decode_uint(&id_payload)?;

        let uri_payload = self.eth_call(encode_call(SEL_TOKEN_URI, Some(id))).await?;
        let token_uri = decode_string(&uri_payload)?;

        debug!(index, id, "Enumerated item");
        Ok(Item { id, token_uri })
    }
}

/// Build `eth_call` data: selector plus an optional 32-byte big-endian
/// argument.
fn encode_call(selector: &str, arg: Option<u64>) -> String {
    match arg {
        Some(value) => format!("0x{selector}{value:064x}"),
        None => format!("0x{selector}"),
    }
}

/// Strip the `0x` prefix and decode the hex payload of a call result.
fn decode_hex_payload(result: &str) -> Result<Vec<u8>> {
    let hex_str = result.strip_prefix("0x").unwrap_or(result);
    hex::decode(hex_str)
        .map_err(|e| RosterError::Registry(format!("Invalid hex in RPC result: {e}")))
}

/// Decode an ABI `uint256` word into a `u64`.
fn decode_uint(payload: &[u8]) -> Result<u64> {
    if payload.len() < 32 {
        return Err(RosterError::Registry(format!(
            "uint256 payload too short: {} bytes",
            payload.len()
        )));
    }
    if payload[..24].iter().any(|&b| b != 0) {
        return Err(RosterError::Registry("uint256 exceeds u64 range".into()));
    }

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&payload[24..32]);
    Ok(u64::from_be_bytes(bytes))
}

/// Decode a single ABI-encoded `string` return value.
fn decode_string(payload: &[u8]) -> Result<String> {
    let offset = decode_uint(payload)? as usize;
    let head_end = offset
        .checked_add(32)
        .filter(|&end| end <= payload.len())
        .ok_or_else(|| RosterError::Registry("string payload truncated at offset".into()))?;

    let length = decode_uint(&payload[offset..])? as usize;
    let start = head_end;
    let end = start
        .checked_add(length)
        .filter(|&end| end <= payload.len())
        .ok_or_else(|| RosterError::Registry("string payload truncated".into()))?;

    String::from_utf8(payload[start..end].to_vec())
        .map_err(|e| RosterError::Registry(format!("Invalid UTF-8 in token URI: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_call_without_argument() {
        assert_eq!(encode_call(SEL_TOTAL_SUPPLY, None), "0x18160ddd");
    }

    #[test]
    fn test_encode_call_with_argument() {
        let data = encode_call(SEL_TOKEN_BY_INDEX, Some(5));
        assert_eq!(data.len(), 2 + 8 + 64);
        assert!(data.starts_with("0x4f6ccce7"));
        assert!(data.ends_with("0000000000000005"));
    }

    #[test]
    fn test_decode_uint() {
        let mut payload = vec![0u8; 32];
        payload[31] = 42;
        assert_eq!(decode_uint(&payload).unwrap(), 42);
    }

    #[test]
    fn test_decode_uint_rejects_short_payload() {
        assert!(decode_uint(&[0u8; 16]).is_err());
    }

    #[test]
    fn test_decode_uint_rejects_overflow() {
        let mut payload = vec![0u8; 32];
        payload[0] = 1;
        assert!(decode_uint(&payload).is_err());
    }

    fn abi_string(value: &str) -> Vec<u8> {
        let mut payload = vec![0u8; 32];
        payload[31] = 0x20; // offset of the string head
        let mut length = vec![0u8; 32];
        length[24..32].copy_from_slice(&(value.len() as u64).to_be_bytes());
        payload.extend_from_slice(&length);
        payload.extend_from_slice(value.as_bytes());
        // pad the tail to a 32-byte boundary, as the ABI does
        payload.resize(64 + value.len().div_ceil(32) * 32, 0);
        payload
    }

    #[test]
    fn test_decode_string() {
        let payload = abi_string("ipfs://QmExample/12.json");
        assert_eq!(decode_string(&payload).unwrap(), "ipfs://QmExample/12.json");
    }

    #[test]
    fn test_decode_string_rejects_truncated_payload() {
        let mut payload = abi_string("ipfs://QmExample/12.json");
        payload.truncate(70);
        assert!(decode_string(&payload).is_err());
    }

    #[test]
    fn test_decode_hex_payload_strips_prefix() {
        assert_eq!(decode_hex_payload("0x00ff").unwrap(), vec![0x00, 0xff]);
        assert!(decode_hex_payload("0xzz").is_err());
    }
}
