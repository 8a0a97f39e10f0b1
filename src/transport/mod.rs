//! Chain query and broadcast transport.
//!
//! # Data Flow
//! ```text
//! signing client / unit converter
//!     → ChainConnector::connect(endpoint)
//!     → ChainTransport (account, simulate, broadcast, metadata, tx lookup)
//!     → rest.rs (LCD over HTTP) or any embedding-supplied implementation
//! ```
//!
//! # Design Decisions
//! - The core only depends on the traits; transports are swappable
//! - No retries here: a failed call surfaces immediately to the caller

pub mod rest;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::proto::Coin;
use crate::units::MetadataSource;

pub use rest::{RestConnector, RestTransport};

/// Errors raised by a chain transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Endpoint string could not be used.
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded the configured timeout.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Node answered with a non-success status.
    #[error("node returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Any other failure reported by an embedding-supplied transport.
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// Account number and sequence needed to sign for an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub account_number: u64,
    pub sequence: u64,
}

/// Node response to a broadcast or a transaction lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BroadcastResult {
    pub tx_hash: String,
    /// 0 on success; anything else is an on-chain or check-tx rejection.
    pub code: u32,
    #[serde(default)]
    pub codespace: String,
    pub raw_log: String,
    #[serde(default)]
    pub height: u64,
    #[serde(default)]
    pub gas_wanted: u64,
    #[serde(default)]
    pub gas_used: u64,
}

impl BroadcastResult {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Query and broadcast access to one chain endpoint.
#[async_trait]
pub trait ChainTransport: MetadataSource {
    /// Endpoint this transport talks to.
    fn endpoint(&self) -> &str;

    /// `Ok(None)` when the account does not exist on chain yet.
    async fn account(&self, address: &str) -> Result<Option<AccountInfo>, TransportError>;

    async fn balances(&self, address: &str) -> Result<Vec<Coin>, TransportError>;

    /// Gas consumed when executing `tx_bytes` without committing it.
    async fn simulate(&self, tx_bytes: &[u8]) -> Result<u64, TransportError>;

    async fn broadcast_tx(&self, tx_bytes: &[u8]) -> Result<BroadcastResult, TransportError>;

    async fn tx_by_hash(&self, hash: &str) -> Result<Option<BroadcastResult>, TransportError>;
}

/// Opens a transport for an endpoint.
#[async_trait]
pub trait ChainConnector: Send + Sync {
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn ChainTransport>, TransportError>;
}
