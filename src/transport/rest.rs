//! LCD (REST gateway) transport with per-request timeouts.
//!
//! # Responsibilities
//! - Resolve account number / sequence, balances and bank metadata
//! - Simulate and broadcast signed transactions
//! - Look transactions up by hash

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::proto::Coin;
use crate::transport::{AccountInfo, BroadcastResult, ChainConnector, ChainTransport, TransportError};
use crate::units::{DenominationMetadata, MetadataSource};

/// REST client bound to one LCD endpoint.
#[derive(Clone)]
pub struct RestTransport {
    client: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
}

impl RestTransport {
    /// Create a transport for `endpoint` (e.g. `https://lcd.cosmos.network`).
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, TransportError> {
        Self::with_client(reqwest::Client::new(), endpoint, timeout_secs)
    }

    pub fn with_client(
        client: reqwest::Client,
        endpoint: &str,
        timeout_secs: u64,
    ) -> Result<Self, TransportError> {
        let url = url::Url::parse(endpoint).map_err(|e| TransportError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransportError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    async fn with_timeout<T, F>(&self, fut: F) -> Result<T, TransportError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        match timeout(Duration::from_secs(self.timeout_secs), fut).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.timeout_secs)),
        }
    }

    /// GET `path`; a 404 maps to `Ok(None)`.
    async fn get_optional(&self, path: &str) -> Result<Option<Value>, TransportError> {
        let url = self.url(path);
        self.with_timeout(async {
            let res = self.client.get(&url).send().await?;
            if res.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            read_json(res).await.map(Some)
        })
        .await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        let url = self.url(path);
        self.with_timeout(async {
            let res = self.client.post(&url).json(&body).send().await?;
            read_json(res).await
        })
        .await
    }
}

async fn read_json(res: reqwest::Response) -> Result<Value, TransportError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(res.json().await?)
}

/// Depth-first search for `name`, skipping `@type` style keys.
///
/// Account payloads nest the base account differently per chain (plain, vesting,
/// ethermint `EthAccount`), so the fields are located wherever they live.
pub(crate) fn find_field<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    let obj = value.as_object()?;
    if let Some(found) = obj.get(name) {
        return Some(found);
    }
    obj.iter()
        .filter(|(k, _)| !k.starts_with('@'))
        .filter(|(_, v)| v.is_object())
        .find_map(|(_, v)| find_field(v, name))
}

/// Numbers arrive as JSON strings from the gateway; accept both forms.
fn as_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

fn as_string(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

pub(crate) fn parse_tx_response(value: &Value) -> Result<BroadcastResult, TransportError> {
    let tx = value
        .get("tx_response")
        .ok_or_else(|| TransportError::Decode("missing tx_response".to_string()))?;
    let code = as_u64(tx.get("code")).unwrap_or(0);
    Ok(BroadcastResult {
        tx_hash: as_string(tx.get("txhash")),
        code: u32::try_from(code).map_err(|_| TransportError::Decode(format!("code {code}")))?,
        codespace: as_string(tx.get("codespace")),
        raw_log: as_string(tx.get("raw_log")),
        height: as_u64(tx.get("height")).unwrap_or(0),
        gas_wanted: as_u64(tx.get("gas_wanted")).unwrap_or(0),
        gas_used: as_u64(tx.get("gas_used")).unwrap_or(0),
    })
}

#[async_trait]
impl MetadataSource for RestTransport {
    async fn denom_metadata(
        &self,
        denom: &str,
    ) -> Result<Option<DenominationMetadata>, TransportError> {
        let path = format!("/cosmos/bank/v1beta1/denoms_metadata/{denom}");
        let Some(body) = self.get_optional(&path).await? else {
            return Ok(None);
        };
        let Some(meta) = body.get("metadata") else {
            return Ok(None);
        };
        serde_json::from_value(meta.clone())
            .map(Some)
            .map_err(|e| TransportError::Decode(format!("denom metadata: {e}")))
    }
}

#[async_trait]
impl ChainTransport for RestTransport {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn account(&self, address: &str) -> Result<Option<AccountInfo>, TransportError> {
        let path = format!("/cosmos/auth/v1beta1/accounts/{address}");
        let Some(body) = self.get_optional(&path).await? else {
            return Ok(None);
        };
        let account_number = as_u64(find_field(&body, "account_number"))
            .ok_or_else(|| TransportError::Decode("account_number not found".to_string()))?;
        let sequence = as_u64(find_field(&body, "sequence")).unwrap_or(0);
        Ok(Some(AccountInfo {
            account_number,
            sequence,
        }))
    }

    async fn balances(&self, address: &str) -> Result<Vec<Coin>, TransportError> {
        let path = format!("/cosmos/bank/v1beta1/balances/{address}");
        let Some(body) = self.get_optional(&path).await? else {
            return Ok(Vec::new());
        };
        let balances = body.get("balances").cloned().unwrap_or(Value::Array(Vec::new()));
        serde_json::from_value(balances).map_err(|e| TransportError::Decode(format!("balances: {e}")))
    }

    async fn simulate(&self, tx_bytes: &[u8]) -> Result<u64, TransportError> {
        let body = self
            .post(
                "/cosmos/tx/v1beta1/simulate",
                json!({ "tx_bytes": BASE64.encode(tx_bytes) }),
            )
            .await?;
        as_u64(body.get("gas_info").and_then(|g| g.get("gas_used")))
            .ok_or_else(|| TransportError::Decode("gas_info.gas_used missing".to_string()))
    }

    async fn broadcast_tx(&self, tx_bytes: &[u8]) -> Result<BroadcastResult, TransportError> {
        let body = self
            .post(
                "/cosmos/tx/v1beta1/txs",
                json!({
                    "tx_bytes": BASE64.encode(tx_bytes),
                    "mode": "BROADCAST_MODE_SYNC",
                }),
            )
            .await?;
        parse_tx_response(&body)
    }

    async fn tx_by_hash(&self, hash: &str) -> Result<Option<BroadcastResult>, TransportError> {
        let path = format!("/cosmos/tx/v1beta1/txs/{hash}");
        match self.get_optional(&path).await? {
            Some(body) => parse_tx_response(&body).map(Some),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for RestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestTransport")
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Opens [`RestTransport`]s sharing one HTTP connection pool.
#[derive(Debug, Clone)]
pub struct RestConnector {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl RestConnector {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout_secs,
        }
    }
}

#[async_trait]
impl ChainConnector for RestConnector {
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn ChainTransport>, TransportError> {
        let transport = RestTransport::with_client(self.client.clone(), endpoint, self.timeout_secs)?;
        tracing::debug!(endpoint = %endpoint, "REST transport ready");
        Ok(Arc::new(transport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_field_in_nested_eth_account() {
        let body = json!({
            "account": {
                "@type": "/ethermint.types.v1.EthAccount",
                "base_account": {
                    "address": "evmos1abc",
                    "account_number": "42",
                    "sequence": "7"
                },
                "code_hash": "0x00"
            }
        });
        assert_eq!(as_u64(find_field(&body, "account_number")), Some(42));
        assert_eq!(as_u64(find_field(&body, "sequence")), Some(7));
        assert!(find_field(&body, "pub_key").is_none());
    }

    #[test]
    fn test_parse_tx_response() {
        let body = json!({
            "tx_response": {
                "height": "0",
                "txhash": "ABCDEF",
                "codespace": "sdk",
                "code": 13,
                "raw_log": "insufficient fee",
                "gas_wanted": "200000",
                "gas_used": "0"
            }
        });
        let result = parse_tx_response(&body).unwrap();
        assert_eq!(result.tx_hash, "ABCDEF");
        assert_eq!(result.code, 13);
        assert!(!result.is_success());
        assert_eq!(result.gas_wanted, 200_000);
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let err = RestTransport::new("ws://localhost:26657", 5).unwrap_err();
        assert!(matches!(err, TransportError::InvalidEndpoint { .. }));
        assert!(RestTransport::new("not a url", 5).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails_without_panic() {
        let transport = RestTransport::new("http://127.0.0.1:1", 2).unwrap();
        assert!(transport.account("cosmos1xyz").await.is_err());
    }
}
