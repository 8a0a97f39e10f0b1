//! Hardware wallets reached over USB or Bluetooth.

use async_trait::async_trait;
use prost::Message;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::SigningError;
use crate::proto::{MessageRegistry, SignDoc};
use crate::wallet::chain::{is_secp256k1_coin_type, HdPath};
use crate::wallet::signer::{AbstractWallet, OfflineSigner};
use crate::wallet::types::{Account, WalletName};

/// Physical link to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Usb,
    Bluetooth,
}

impl TransportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransportKind::Usb => "usb",
            TransportKind::Bluetooth => "ble",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "usb" | "hid" => Ok(TransportKind::Usb),
            "ble" | "bluetooth" => Ok(TransportKind::Bluetooth),
            other => Err(format!("unknown hardware transport '{other}'")),
        }
    }
}

/// Device session handle. Implementations talk to the device app.
#[async_trait]
pub trait HardwareTransport: Send + Sync {
    fn kind(&self) -> TransportKind;

    /// Derive the account at `hd_path`, encoding its address under `prefix`.
    async fn get_address_and_pubkey(
        &self,
        hd_path: &HdPath,
        prefix: &str,
    ) -> Result<Account, SigningError>;

    /// Have the device sign `message` with the key at `hd_path`.
    async fn sign(&self, hd_path: &HdPath, message: &[u8]) -> Result<Vec<u8>, SigningError>;
}

/// Wallet whose keys never leave the device.
#[derive(Clone)]
pub struct HardwareWallet {
    name: WalletName,
    hd_path: HdPath,
    prefix: String,
    transport: Arc<dyn HardwareTransport>,
    registry: Arc<MessageRegistry>,
}

impl HardwareWallet {
    pub fn new(
        name: WalletName,
        hd_path: HdPath,
        prefix: impl Into<String>,
        transport: Arc<dyn HardwareTransport>,
        registry: Arc<MessageRegistry>,
    ) -> Self {
        Self {
            name,
            hd_path,
            prefix: prefix.into(),
            transport,
            registry,
        }
    }

    pub fn hd_path(&self) -> &HdPath {
        &self.hd_path
    }

    pub fn transport_kind(&self) -> TransportKind {
        self.transport.kind()
    }
}

#[async_trait]
impl OfflineSigner for HardwareWallet {
    async fn get_accounts(&self) -> Result<Vec<Account>, SigningError> {
        let account = self
            .transport
            .get_address_and_pubkey(&self.hd_path, &self.prefix)
            .await?;
        Ok(vec![account])
    }

    async fn sign_direct(
        &self,
        signer_address: &str,
        doc: &SignDoc,
    ) -> Result<Vec<u8>, SigningError> {
        let account = self
            .transport
            .get_address_and_pubkey(&self.hd_path, &self.prefix)
            .await?;
        if account.address != signer_address {
            return Err(SigningError::AccountNotFound(signer_address.to_string()));
        }
        tracing::info!(
            wallet = %self.name,
            transport = %self.transport.kind(),
            hd_path = %self.hd_path,
            "confirm the transaction on the device"
        );
        self.transport.sign(&self.hd_path, &doc.encode_to_vec()).await
    }
}

impl AbstractWallet for HardwareWallet {
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

impl fmt::Debug for HardwareWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HardwareWallet")
            .field("name", &self.name)
            .field("hd_path", &self.hd_path)
            .field("prefix", &self.prefix)
            .field("transport", &self.transport.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeDevice;

    #[async_trait]
    impl HardwareTransport for FakeDevice {
        fn kind(&self) -> TransportKind {
            TransportKind::Usb
        }

        async fn get_address_and_pubkey(
            &self,
            hd_path: &HdPath,
            prefix: &str,
        ) -> Result<Account, SigningError> {
            Ok(Account {
                address: format!("{prefix}1device{}", hd_path.coin_type().unwrap_or(0)),
                algo: "secp256k1".to_string(),
                pubkey: vec![3; 33],
            })
        }

        async fn sign(&self, _hd_path: &HdPath, message: &[u8]) -> Result<Vec<u8>, SigningError> {
            if message.is_empty() {
                return Err(SigningError::Rejected("empty payload".to_string()));
            }
            Ok(vec![0xaa; 64])
        }
    }

    fn wallet() -> HardwareWallet {
        HardwareWallet::new(
            WalletName::Ledger,
            "m/44'/118'/0'/0/1".parse().unwrap(),
            "cosmos",
            Arc::new(FakeDevice),
            Arc::new(MessageRegistry::default()),
        )
    }

    #[test]
    fn test_transport_kind_parsing() {
        assert_eq!("USB".parse::<TransportKind>().unwrap(), TransportKind::Usb);
        assert_eq!("bluetooth".parse::<TransportKind>().unwrap(), TransportKind::Bluetooth);
        assert!("nfc".parse::<TransportKind>().is_err());
    }

    #[test]
    fn test_only_secp256k1_coin_types() {
        let wallet = wallet();
        assert!(wallet.supports_coin_type(Some("118")));
        assert!(wallet.supports_coin_type(None));
        assert!(!wallet.supports_coin_type(Some("501")));
    }

    #[tokio::test]
    async fn test_accounts_come_from_device() {
        let accounts = wallet().get_accounts().await.unwrap();
        assert_eq!(accounts[0].address, "cosmos1device118");
    }

    #[tokio::test]
    async fn test_sign_direct_for_foreign_address_fails() {
        let doc = SignDoc::default();
        let err = wallet().sign_direct("cosmos1other", &doc).await.unwrap_err();
        assert_eq!(err, SigningError::AccountNotFound("cosmos1other".to_string()));
    }
}
