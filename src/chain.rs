//! Ethereum JSON-RPC client with primary → fallback failover.
//!
//! Two chain interactions exist: a one-shot `totalSupply()` read at startup,
//! and a persistent mint-event subscription realized as a server-side log
//! filter (`eth_newFilter`) drained on an interval (`eth_getFilterChanges`).

use serde_json::{json, Value};
use sha3::{Digest, Keccak256};
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{info, warn};

use crate::metrics::METRICS;

const RPC_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const RPC_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// `from` topic that marks a transfer as a mint.
const ZERO_ADDRESS_TOPIC: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

/// JSON-RPC client bound to one ERC-721 contract.
pub struct ChainClient {
    http: reqwest::Client,
    primary_url: String,
    fallback_url: String,
    contract_address: String,
    transfer_topic: String,
    total_supply_selector: String,
}

impl ChainClient {
    pub fn new(
        primary_url: &str,
        fallback_url: &str,
        contract_address: &str,
    ) -> Result<Self, crate::Error> {
        let addr = contract_address
            .strip_prefix("0x")
            .ok_or_else(|| {
                crate::Error::Config(format!("Contract address must be 0x-prefixed: {contract_address}"))
            })?;
        if addr.len() != 40 || hex::decode(addr).is_err() {
            return Err(crate::Error::Config(format!(
                "Contract address must be 20 hex bytes: {contract_address}"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(RPC_REQUEST_TIMEOUT)
            .connect_timeout(RPC_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| crate::Error::Config(format!("Failed to build RPC client: {e}")))?;

        info!(
            primary = primary_url,
            fallback = fallback_url,
            contract = contract_address,
            "Chain client initialized with failover"
        );

        Ok(Self {
            http,
            primary_url: primary_url.to_string(),
            fallback_url: fallback_url.to_string(),
            contract_address: contract_address.to_string(),
            transfer_topic: event_topic("Transfer(address,address,uint256)"),
            total_supply_selector: selector("totalSupply()"),
        })
    }

    /// The primary RPC URL.
    pub fn primary_url(&self) -> &str {
        &self.primary_url
    }

    /// Read the contract's current total supply at the latest block.
    pub async fn total_supply(&self) -> Result<u64, crate::Error> {
        let params = json!([
            { "to": self.contract_address, "data": self.total_supply_selector },
            "latest"
        ]);
        let result = self.call("eth_call", params).await?;
        let raw = result
            .as_str()
            .ok_or_else(|| crate::Error::Chain(format!("eth_call returned non-string: {result}")))?;
        decode_quantity(raw)
    }

    /// Install a log filter for mints: Transfer events from the zero address
    /// on the tracked contract. Returns the chain-side filter ID.
    pub async fn install_mint_filter(&self) -> Result<String, crate::Error> {
        let params = json!([{
            "address": self.contract_address,
            "topics": [self.transfer_topic, ZERO_ADDRESS_TOPIC],
        }]);
        let result = self.call("eth_newFilter", params).await?;
        result
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| crate::Error::Chain(format!("eth_newFilter returned non-string: {result}")))
    }

    /// Drain new mint logs from an installed filter. Returns the minted token
    /// IDs in delivery order; malformed log entries are skipped, not fatal.
    pub async fn drain_mint_filter(&self, filter_id: &str) -> Result<Vec<u64>, crate::Error> {
        let result = self.call("eth_getFilterChanges", json!([filter_id])).await?;
        let logs = result
            .as_array()
            .ok_or_else(|| {
                crate::Error::Chain(format!("eth_getFilterChanges returned non-array: {result}"))
            })?;

        let mut token_ids = Vec::with_capacity(logs.len());
        for log in logs {
            match mint_token_id(log) {
                Some(id) => token_ids.push(id),
                None => warn!(%log, "Skipping mint log without a decodable token ID"),
            }
        }
        Ok(token_ids)
    }

    // --- Transport ---

    /// Issue one JSON-RPC call, failing over to the fallback provider when
    /// the primary errors.
    async fn call(&self, method: &str, params: Value) -> Result<Value, crate::Error> {
        match self.call_one(&self.primary_url, method, &params).await {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!(method, error = %e, "Primary RPC failed, trying fallback");
                self.call_one(&self.fallback_url, method, &params)
                    .await
                    .map_err(|e2| {
                        crate::Error::Chain(format!(
                            "{method} failed on both RPCs: primary={e}, fallback={e2}"
                        ))
                    })
            }
        }
    }

    async fn call_one(
        &self,
        url: &str,
        method: &str,
        params: &Value,
    ) -> Result<Value, crate::Error> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1,
        });

        let response: Value = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                METRICS.rpc_errors.fetch_add(1, Ordering::Relaxed);
                crate::Error::Chain(format!("{method} request failed: {e}"))
            })?
            .json()
            .await
            .map_err(|e| {
                METRICS.rpc_errors.fetch_add(1, Ordering::Relaxed);
                crate::Error::Chain(format!("{method} returned invalid JSON: {e}"))
            })?;

        if let Some(err) = response.get("error") {
            METRICS.rpc_errors.fetch_add(1, Ordering::Relaxed);
            return Err(crate::Error::Chain(format!("{method} rejected: {err}")));
        }
        response
            .get("result")
            .cloned()
            .ok_or_else(|| crate::Error::Chain(format!("{method} response missing result")))
    }
}

// --- ABI helpers ---

fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// 4-byte call selector for a function signature, 0x-prefixed.
fn selector(signature: &str) -> String {
    format!("0x{}", hex::encode(&keccak256(signature.as_bytes())[..4]))
}

/// 32-byte topic hash for an event signature, 0x-prefixed.
fn event_topic(signature: &str) -> String {
    format!("0x{}", hex::encode(keccak256(signature.as_bytes())))
}

/// Decode a 0x-prefixed hex quantity (possibly zero-padded to 32 bytes).
fn decode_quantity(raw: &str) -> Result<u64, crate::Error> {
    let digits = raw.trim_start_matches("0x");
    if digits.is_empty() {
        return Err(crate::Error::Chain(format!("Empty hex quantity: {raw}")));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| crate::Error::Chain(format!("Invalid hex quantity {raw}: {e}")))
}

/// Token ID of a mint log: the third indexed Transfer argument.
fn mint_token_id(log: &Value) -> Option<u64> {
    let raw = log.get("topics")?.as_array()?.get(3)?.as_str()?;
    decode_quantity(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_topic_matches_erc721() {
        assert_eq!(
            event_topic("Transfer(address,address,uint256)"),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn test_total_supply_selector() {
        assert_eq!(selector("totalSupply()"), "0x18160ddd");
    }

    #[test]
    fn test_decode_quantity() {
        assert_eq!(decode_quantity("0x0").unwrap(), 0);
        assert_eq!(decode_quantity("0x7b").unwrap(), 123);
        // 32-byte padded form as returned by eth_call
        assert_eq!(
            decode_quantity(
                "0x00000000000000000000000000000000000000000000000000000000000004d2"
            )
            .unwrap(),
            1234
        );
        assert!(decode_quantity("0x").is_err());
        assert!(decode_quantity("0xzz").is_err());
    }

    #[test]
    fn test_mint_token_id_from_log() {
        let log = serde_json::json!({
            "address": "0xf47ecc3b549a1e96ffdbd3c1aa421936826f3be5",
            "topics": [
                "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef",
                "0x0000000000000000000000000000000000000000000000000000000000000000",
                "0x000000000000000000000000c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
                "0x0000000000000000000000000000000000000000000000000000000000000009"
            ],
            "data": "0x"
        });
        assert_eq!(mint_token_id(&log), Some(9));
    }

    #[test]
    fn test_mint_token_id_rejects_short_topics() {
        // Anonymous or non-indexed variants carry fewer topics.
        let log = serde_json::json!({ "topics": ["0xddf252ad"] });
        assert_eq!(mint_token_id(&log), None);
    }

    #[test]
    fn test_rejects_malformed_contract_address() {
        assert!(ChainClient::new("http://127.0.0.1:1", "http://127.0.0.1:2", "f47e").is_err());
        assert!(ChainClient::new("http://127.0.0.1:1", "http://127.0.0.1:2", "0x1234").is_err());
        assert!(ChainClient::new(
            "http://127.0.0.1:1",
            "http://127.0.0.1:2",
            "0xf47ecc3b549a1e96ffdbd3c1aa421936826f3be5"
        )
        .is_ok());
    }
}
