//! Read-only wallets: a bare address, or a name resolved to one.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::error::SigningError;
use crate::proto::{MessageRegistry, SignDoc};
use crate::wallet::signer::{AbstractWallet, OfflineSigner};
use crate::wallet::types::{Account, WalletName};

/// Resolves human-readable names (e.g. `alice.cosmos`) to addresses.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve(&self, name: &str, prefix: &str) -> Result<String, SigningError>;
}

/// Watch-only wallet over a fixed address.
#[derive(Debug, Clone)]
pub struct AddressWallet {
    address: String,
    registry: Arc<MessageRegistry>,
}

impl AddressWallet {
    pub fn new(address: impl Into<String>, registry: Arc<MessageRegistry>) -> Self {
        Self {
            address: address.into(),
            registry,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl OfflineSigner for AddressWallet {
    async fn get_accounts(&self) -> Result<Vec<Account>, SigningError> {
        Ok(vec![Account::watch_only(&self.address)])
    }

    async fn sign_direct(&self, _signer: &str, _doc: &SignDoc) -> Result<Vec<u8>, SigningError> {
        Err(SigningError::NotSupported(WalletName::Address.to_string()))
    }
}

impl AbstractWallet for AddressWallet {
    fn name(&self) -> WalletName {
        WalletName::Address
    }

    fn supports_coin_type(&self, _coin_type: Option<&str>) -> bool {
        false
    }

    fn registry(&self) -> &MessageRegistry {
        &self.registry
    }
}

/// Watch-only wallet whose address is looked up by name on demand.
#[derive(Clone)]
pub struct NameServiceWallet {
    name: String,
    prefix: String,
    resolver: Arc<dyn NameResolver>,
    registry: Arc<MessageRegistry>,
}

impl NameServiceWallet {
    pub fn new(
        name: impl Into<String>,
        prefix: impl Into<String>,
        resolver: Arc<dyn NameResolver>,
        registry: Arc<MessageRegistry>,
    ) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            resolver,
            registry,
        }
    }

    pub fn lookup_name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl OfflineSigner for NameServiceWallet {
    async fn get_accounts(&self) -> Result<Vec<Account>, SigningError> {
        let address = self.resolver.resolve(&self.name, &self.prefix).await?;
        tracing::debug!(name = %self.name, address = %address, "name resolved");
        Ok(vec![Account::watch_only(address)])
    }

    async fn sign_direct(&self, _signer: &str, _doc: &SignDoc) -> Result<Vec<u8>, SigningError> {
        Err(SigningError::NotSupported(WalletName::NameService.to_string()))
    }
}

impl AbstractWallet for NameServiceWallet {
    fn name(&self) -> WalletName {
        WalletName::NameService
    }

    fn supports_coin_type(&self, _coin_type: Option<&str>) -> bool {
        false
    }

    fn registry(&self) -> &MessageRegistry {
        &self.registry
    }
}

impl fmt::Debug for NameServiceWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameServiceWallet")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .finish()
    }
}
