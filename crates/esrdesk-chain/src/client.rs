//! Router client: JSON-RPC over HTTP against the protocol router.
//!
//! The router fronts the deployed contracts for one chain. Every call is
//! stateless and resolves to a value or an error within the HTTP timeout;
//! the client never waits indefinitely.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::get_router_endpoints;
use crate::error::GatewayError;
use esrdesk_core::Network;

/// Per-request timeout. Bounds every refresh sub-fetch so a hung call
/// delays one cycle rather than wedging the scheduler.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Router metadata returned by the info probe at connect time.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RouterInfo {
    /// Chain id the router is wired to.
    pub chain_id: u64,
    /// Router service version string.
    pub version: String,
}

/// HTTP JSON-RPC client bound to one network's router.
pub struct RouterClient {
    network: Network,
    endpoint: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl RouterClient {
    /// Connect to a network's router, trying endpoints in order.
    /// Uses the custom endpoint if provided, otherwise the defaults.
    pub async fn connect(
        network: Network,
        custom_endpoint: Option<&str>,
    ) -> Result<Self, GatewayError> {
        let default_endpoints = get_router_endpoints(network);
        let endpoints: Vec<&str> = if let Some(endpoint) = custom_endpoint {
            vec![endpoint]
        } else {
            default_endpoints.to_vec()
        };

        if endpoints.is_empty() {
            return Err(GatewayError::Connection(
                "No router endpoints configured".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let mut last_error = None;
        for endpoint in endpoints {
            tracing::info!("Trying {} router via {}", network, endpoint);

            let client = Self {
                network,
                endpoint: endpoint.to_string(),
                http: http.clone(),
                next_id: AtomicU64::new(1),
            };

            match client.call::<_, RouterInfo>("esr_info", json!([])).await {
                Ok(info) => {
                    tracing::info!(
                        "Connected to {} router via {} (version {})",
                        network,
                        endpoint,
                        info.version
                    );
                    if info.chain_id != network.chain_id() {
                        tracing::warn!(
                            "Router reports chain id {} but {} expects {}",
                            info.chain_id,
                            network,
                            network.chain_id()
                        );
                    }
                    return Ok(client);
                }
                Err(e) => {
                    tracing::warn!("Failed to connect to {}: {}", endpoint, e);
                    last_error = Some(e.to_string());
                }
            }
        }

        Err(GatewayError::Connection(
            last_error.unwrap_or_else(|| "All router endpoints failed".to_string()),
        ))
    }

    /// Get the connected network.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Get the endpoint this client settled on.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue one JSON-RPC call and decode the `result` field.
    pub(crate) async fn call<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<T, GatewayError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response: serde_json::Value = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.get("error")
            && !err.is_null()
        {
            let code = err.get("code").and_then(|c| c.as_i64()).unwrap_or(0);
            let message = err
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown router error")
                .to_string();
            return Err(GatewayError::Rpc { code, message });
        }

        let result = response
            .get("result")
            .cloned()
            .ok_or_else(|| GatewayError::InvalidData(format!("{method}: missing result")))?;
        serde_json::from_value(result)
            .map_err(|e| GatewayError::InvalidData(format!("{method}: {e}")))
    }
}
