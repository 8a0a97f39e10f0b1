//! EVM bridge wallets.
//!
//! # Responsibilities
//! - Direct signing with a local secp256k1 key on Ethereum-style HD paths
//! - Snap-mediated signing for every other derivation path
//!
//! # Security
//! - Private keys are loaded ONLY from the caller or an environment variable
//! - Keys are never logged or serialized

use alloy::primitives::{keccak256, B256};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use prost::Message;
use std::fmt;
use std::sync::Arc;

use crate::error::SigningError;
use crate::proto::{MessageRegistry, SignDoc};
use crate::wallet::chain::{is_secp256k1_coin_type, to_bech32, HdPath};
use crate::wallet::signer::{AbstractWallet, OfflineSigner};
use crate::wallet::types::{Account, WalletName};

/// Environment variable read by [`EvmWallet::from_env`].
pub const PRIVATE_KEY_ENV_VAR: &str = "STATION_PRIVATE_KEY";

/// Signing algorithm tag reported for EVM-derived accounts.
pub const ETH_SECP256K1: &str = "ethsecp256k1";

/// A local key able to sign 32-byte digests.
#[async_trait]
pub trait EvmKeySigner: Send + Sync {
    /// 20-byte account address.
    fn address_bytes(&self) -> [u8; 20];

    /// Compressed SEC1 public key.
    fn public_key(&self) -> Vec<u8>;

    /// 64-byte `r || s` signature over `digest`.
    async fn sign_digest(&self, digest: B256) -> Result<Vec<u8>, SigningError>;
}

#[async_trait]
impl EvmKeySigner for PrivateKeySigner {
    fn address_bytes(&self) -> [u8; 20] {
        alloy::signers::Signer::address(self).into_array()
    }

    fn public_key(&self) -> Vec<u8> {
        self.credential()
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    async fn sign_digest(&self, digest: B256) -> Result<Vec<u8>, SigningError> {
        let signature = alloy::signers::Signer::sign_hash(self, &digest)
            .await
            .map_err(|e| SigningError::Backend(format!("signing failed: {e}")))?;
        Ok(signature.as_bytes()[..64].to_vec())
    }
}

/// Direct EVM signer: the sign doc is keccak-hashed and signed locally.
#[derive(Clone)]
pub struct EvmWallet {
    signer: Arc<dyn EvmKeySigner>,
    hd_path: HdPath,
    prefix: String,
    registry: Arc<MessageRegistry>,
}

impl EvmWallet {
    pub fn new(
        signer: Arc<dyn EvmKeySigner>,
        hd_path: HdPath,
        prefix: impl Into<String>,
        registry: Arc<MessageRegistry>,
    ) -> Self {
        Self {
            signer,
            hd_path,
            prefix: prefix.into(),
            registry,
        }
    }

    /// Parse a hex private key (with or without `0x`).
    pub fn from_private_key(
        private_key_hex: &str,
        hd_path: HdPath,
        prefix: impl Into<String>,
        registry: Arc<MessageRegistry>,
    ) -> Result<Self, SigningError> {
        let signer = parse_private_key(private_key_hex)?;
        let wallet = Self::new(Arc::new(signer), hd_path, prefix, registry);
        tracing::info!(address = %wallet.address()?, "EVM wallet initialized");
        Ok(wallet)
    }

    /// Load the key from `STATION_PRIVATE_KEY`.
    pub fn from_env(
        hd_path: HdPath,
        prefix: impl Into<String>,
        registry: Arc<MessageRegistry>,
    ) -> Result<Self, SigningError> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            SigningError::Backend(format!(
                "environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;
        Self::from_private_key(&private_key, hd_path, prefix, registry)
    }

    /// Bech32 account address under the wallet's prefix.
    pub fn address(&self) -> Result<String, SigningError> {
        to_bech32(&self.prefix, &self.signer.address_bytes())
    }

    pub fn hd_path(&self) -> &HdPath {
        &self.hd_path
    }
}

/// Parse a hex-encoded secp256k1 private key.
pub fn parse_private_key(private_key_hex: &str) -> Result<PrivateKeySigner, SigningError> {
    let key_hex = private_key_hex
        .trim()
        .strip_prefix("0x")
        .unwrap_or(private_key_hex.trim());
    key_hex
        .parse()
        .map_err(|e| SigningError::Backend(format!("invalid private key format: {e}")))
}

#[async_trait]
impl OfflineSigner for EvmWallet {
    async fn get_accounts(&self) -> Result<Vec<Account>, SigningError> {
        Ok(vec![Account {
            address: self.address()?,
            algo: ETH_SECP256K1.to_string(),
            pubkey: self.signer.public_key(),
        }])
    }

    async fn sign_direct(
        &self,
        signer_address: &str,
        doc: &SignDoc,
    ) -> Result<Vec<u8>, SigningError> {
        if self.address()? != signer_address {
            return Err(SigningError::AccountNotFound(signer_address.to_string()));
        }
        let digest = keccak256(doc.encode_to_vec());
        self.signer.sign_digest(digest).await
    }
}

impl AbstractWallet for EvmWallet {
    fn name(&self) -> WalletName {
        WalletName::Metamask
    }

    fn supports_coin_type(&self, coin_type: Option<&str>) -> bool {
        is_secp256k1_coin_type(coin_type)
    }

    fn registry(&self) -> &MessageRegistry {
        &self.registry
    }
}

impl fmt::Debug for EvmWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvmWallet")
            .field("hd_path", &self.hd_path)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

/// Cosmos snap running inside the EVM wallet.
#[async_trait]
pub trait SnapProvider: Send + Sync {
    async fn get_key(&self, chain_id: &str, hd_path: &HdPath) -> Result<Account, SigningError>;

    async fn sign_direct(
        &self,
        chain_id: &str,
        hd_path: &HdPath,
        signer_address: &str,
        doc: &SignDoc,
    ) -> Result<Vec<u8>, SigningError>;
}

/// Snap-mediated signer used for non-Ethereum derivation paths.
#[derive(Clone)]
pub struct SnapWallet {
    name: WalletName,
    chain_id: String,
    hd_path: HdPath,
    provider: Arc<dyn SnapProvider>,
    registry: Arc<MessageRegistry>,
}

impl SnapWallet {
    pub fn new(
        name: WalletName,
        chain_id: impl Into<String>,
        hd_path: HdPath,
        provider: Arc<dyn SnapProvider>,
        registry: Arc<MessageRegistry>,
    ) -> Self {
        Self {
            name,
            chain_id: chain_id.into(),
            hd_path,
            provider,
            registry,
        }
    }

    pub fn hd_path(&self) -> &HdPath {
        &self.hd_path
    }
}

#[async_trait]
impl OfflineSigner for SnapWallet {
    async fn get_accounts(&self) -> Result<Vec<Account>, SigningError> {
        let key = self.provider.get_key(&self.chain_id, &self.hd_path).await?;
        Ok(vec![key])
    }

    async fn sign_direct(
        &self,
        signer_address: &str,
        doc: &SignDoc,
    ) -> Result<Vec<u8>, SigningError> {
        self.provider
            .sign_direct(&self.chain_id, &self.hd_path, signer_address, doc)
            .await
    }
}

impl AbstractWallet for SnapWallet {
    fn name(&self) -> WalletName {
        self.name
    }

    fn supports_coin_type(&self, coin_type: Option<&str>) -> bool {
        is_secp256k1_coin_type(coin_type)
    }

    fn registry(&self) -> &MessageRegistry {
        &self.registry
    }
}

impl fmt::Debug for SnapWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapWallet")
            .field("name", &self.name)
            .field("chain_id", &self.chain_id)
            .field("hd_path", &self.hd_path)
            .finish()
    }
}
