//! Wallet identities, connection arguments and accounts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Wallet identity tag chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletName {
    Owallet,
    Keplr,
    #[serde(rename = "LedgerUSB")]
    Ledger,
    #[serde(rename = "LedgerBLE")]
    LedgerBle,
    Metamask,
    MetamaskSnap,
    Leap,
    /// Watch-only: an address with no signing capability.
    Address,
    #[serde(rename = "Nameservice")]
    NameService,
}

/// Backend family a [`WalletName`] is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalletFamily {
    Hardware,
    BrowserExtension,
    EvmBridge,
    AddressOnly,
    NameService,
}

impl WalletName {
    pub const ALL: [WalletName; 9] = [
        WalletName::Owallet,
        WalletName::Keplr,
        WalletName::Ledger,
        WalletName::LedgerBle,
        WalletName::Metamask,
        WalletName::MetamaskSnap,
        WalletName::Leap,
        WalletName::Address,
        WalletName::NameService,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WalletName::Owallet => "Owallet",
            WalletName::Keplr => "Keplr",
            WalletName::Ledger => "LedgerUSB",
            WalletName::LedgerBle => "LedgerBLE",
            WalletName::Metamask => "Metamask",
            WalletName::MetamaskSnap => "MetamaskSnap",
            WalletName::Leap => "Leap",
            WalletName::Address => "Address",
            WalletName::NameService => "Nameservice",
        }
    }

    pub fn family(self) -> WalletFamily {
        match self {
            WalletName::Ledger | WalletName::LedgerBle => WalletFamily::Hardware,
            WalletName::Owallet | WalletName::Keplr | WalletName::Leap => {
                WalletFamily::BrowserExtension
            }
            WalletName::Metamask | WalletName::MetamaskSnap => WalletFamily::EvmBridge,
            WalletName::Address => WalletFamily::AddressOnly,
            WalletName::NameService => WalletFamily::NameService,
        }
    }

    /// Whether wallets of this kind can produce signatures.
    pub fn can_sign(self) -> bool {
        !matches!(
            self.family(),
            WalletFamily::AddressOnly | WalletFamily::NameService
        )
    }
}

impl fmt::Display for WalletName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WalletName::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnsupportedWallet(s.to_string()))
    }
}

/// Connection arguments handed to the wallet factory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalletArgument {
    pub chain_id: Option<String>,
    pub hd_path: Option<String>,
    pub address: Option<String>,
    /// Human-readable name for name-service wallets.
    pub name: Option<String>,
    /// `usb` or `ble` for hardware wallets.
    pub transport: Option<String>,
    /// Bech32 address prefix.
    pub prefix: Option<String>,
}

impl WalletArgument {
    pub fn for_chain(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: Some(chain_id.into()),
            ..Self::default()
        }
    }

    pub fn with_hd_path(mut self, hd_path: impl Into<String>) -> Self {
        self.hd_path = Some(hd_path.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// An account exposed by a wallet backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    /// Signing algorithm, e.g. `secp256k1` or `ethsecp256k1`.
    pub algo: String,
    /// Compressed public key; empty for watch-only accounts.
    #[serde(with = "hex_bytes")]
    pub pubkey: Vec<u8>,
}

impl Account {
    pub fn watch_only(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            algo: "secp256k1".to_string(),
            pubkey: Vec::new(),
        }
    }
}

/// Record persisted for the last connected wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectedWallet {
    pub wallet: Option<WalletName>,
    pub cosmos_address: String,
    pub hd_path: Option<String>,
}

impl ConnectedWallet {
    pub fn is_empty(&self) -> bool {
        self.wallet.is_none() && self.cosmos_address.is_empty()
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_name_round_trips_tag() {
        for name in WalletName::ALL {
            assert_eq!(name.as_str().parse::<WalletName>().unwrap(), name);
        }
        assert_eq!("ledgerusb".parse::<WalletName>().unwrap(), WalletName::Ledger);
    }

    #[test]
    fn test_unknown_tag_is_unsupported() {
        let err = "Trezor".parse::<WalletName>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedWallet(tag) if tag == "Trezor"));
    }

    #[test]
    fn test_families() {
        assert_eq!(WalletName::LedgerBle.family(), WalletFamily::Hardware);
        assert_eq!(WalletName::Leap.family(), WalletFamily::BrowserExtension);
        assert_eq!(WalletName::MetamaskSnap.family(), WalletFamily::EvmBridge);
        assert!(!WalletName::Address.can_sign());
        assert!(!WalletName::NameService.can_sign());
        assert!(WalletName::Keplr.can_sign());
    }

    #[test]
    fn test_connected_wallet_json_shape() {
        let connected = ConnectedWallet {
            wallet: Some(WalletName::Ledger),
            cosmos_address: "cosmos1abc".to_string(),
            hd_path: Some("m/44'/118/0'/0/0".to_string()),
        };
        let json = serde_json::to_value(&connected).unwrap();
        assert_eq!(json["wallet"], "LedgerUSB");
        assert_eq!(json["cosmosAddress"], "cosmos1abc");

        let empty: ConnectedWallet = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
