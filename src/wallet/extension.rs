//! Browser-extension wallets (Keplr, Leap, Owallet).
//!
//! Key custody stays with the injected provider; this side only asks it to
//! enable a chain, report the active key and sign documents.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::error::SigningError;
use crate::proto::{MessageRegistry, SignDoc};
use crate::wallet::signer::{AbstractWallet, OfflineSigner};
use crate::wallet::types::{Account, WalletName};

/// Provider injected by the extension, keyed by chain id.
#[async_trait]
pub trait ExtensionProvider: Send + Sync {
    /// Ask the user to approve access to `chain_id`.
    async fn enable(&self, chain_id: &str) -> Result<(), SigningError>;

    /// Active key for `chain_id`.
    async fn get_key(&self, chain_id: &str) -> Result<Account, SigningError>;

    async fn sign_direct(
        &self,
        chain_id: &str,
        signer_address: &str,
        doc: &SignDoc,
    ) -> Result<Vec<u8>, SigningError>;
}

#[derive(Clone)]
pub struct ExtensionWallet {
    name: WalletName,
    chain_id: String,
    provider: Arc<dyn ExtensionProvider>,
    registry: Arc<MessageRegistry>,
}

impl ExtensionWallet {
    pub fn new(
        name: WalletName,
        chain_id: impl Into<String>,
        provider: Arc<dyn ExtensionProvider>,
        registry: Arc<MessageRegistry>,
    ) -> Self {
        Self {
            name,
            chain_id: chain_id.into(),
            provider,
            registry,
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }
}

#[async_trait]
impl OfflineSigner for ExtensionWallet {
    async fn get_accounts(&self) -> Result<Vec<Account>, SigningError> {
        self.provider.enable(&self.chain_id).await?;
        let key = self.provider.get_key(&self.chain_id).await?;
        Ok(vec![key])
    }

    async fn sign_direct(
        &self,
        signer_address: &str,
        doc: &SignDoc,
    ) -> Result<Vec<u8>, SigningError> {
        if doc.chain_id != self.chain_id {
            return Err(SigningError::Unavailable {
                chain_id: doc.chain_id.clone(),
                reason: format!("{} is connected to {}", self.name, self.chain_id),
            });
        }
        self.provider
            .sign_direct(&self.chain_id, signer_address, doc)
            .await
    }
}

impl AbstractWallet for ExtensionWallet {
    fn name(&self) -> WalletName {
        self.name
    }

    // The extension derives keys per chain itself.
    fn supports_coin_type(&self, _coin_type: Option<&str>) -> bool {
        true
    }

    fn registry(&self) -> &MessageRegistry {
        &self.registry
    }
}

impl fmt::Debug for ExtensionWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionWallet")
            .field("name", &self.name)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}
