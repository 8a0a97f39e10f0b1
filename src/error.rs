//! Error taxonomy shared by every public entry point.

use thiserror::Error;

use crate::transport::TransportError;

/// Top-level error: every public operation either succeeds or fails with one of
/// these kinds.
#[derive(Debug, Error)]
pub enum Error {
    /// No wallet backend matches the requested identity or connection arguments.
    #[error("unsupported wallet: {0}")]
    UnsupportedWallet(String),

    /// Message fields were malformed or incomplete; nothing was sent.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Signer acquisition or raw signing failed.
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// Client construction, submission or node-side failure.
    #[error(transparent)]
    Broadcast(#[from] BroadcastError),
}

/// Result type for wallet-station operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed or incomplete message content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid amount '{amount}' for {field}: expected a non-negative integer")]
    InvalidAmount { field: &'static str, amount: String },

    #[error("no protobuf encoder registered for {0}")]
    UnregisteredType(String),

    #[error("no amino converter registered for {0}")]
    MissingAminoConverter(String),
}

/// Failures obtaining a signer or producing a signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    #[error("no signer available for chain {chain_id}: {reason}")]
    Unavailable { chain_id: String, reason: String },

    #[error("request rejected by user: {0}")]
    Rejected(String),

    #[error("wallet backend unreachable: {0}")]
    Unreachable(String),

    #[error("coin type {0} is not supported by this wallet")]
    UnsupportedCoinType(String),

    #[error("{0} wallets cannot sign")]
    NotSupported(String),

    #[error("account {0} is not held by this signer")]
    AccountNotFound(String),

    #[error("invalid hd path '{0}'")]
    InvalidHdPath(String),

    #[error("signer error: {0}")]
    Backend(String),
}

/// Failures after a signer was obtained: connecting, querying, submitting.
#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: TransportError,
    },

    #[error("account {0} does not exist on chain")]
    AccountNotFound(String),

    #[error("account query failed: {0}")]
    Account(#[source] TransportError),

    #[error("gas simulation failed: {0}")]
    Simulation(#[source] TransportError),

    #[error("broadcast failed: {0}")]
    Submit(#[source] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = Error::from(EncodingError::MissingField("title"));
        assert_eq!(err.to_string(), "missing required field: title");

        let err = Error::from(SigningError::NotSupported("Address".to_string()));
        assert_eq!(err.to_string(), "Address wallets cannot sign");
    }

    #[test]
    fn test_broadcast_error_keeps_cause() {
        let err = BroadcastError::Submit(TransportError::Timeout(10));
        let source = err.source().expect("cause attached");
        assert_eq!(source.to_string(), "request timed out after 10 seconds");
    }
}
