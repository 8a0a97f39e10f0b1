//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::proposal::EncoderOptions;
use crate::signing::{GasSetting, StationSettings};
use crate::units::Decimal;
use crate::wallet::DEFAULT_HDPATH;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StationConfig {
    /// Target chain.
    pub chain: ChainConfig,

    /// Fee and gas settings.
    pub signing: SigningConfig,

    /// Proposal envelope settings.
    pub proposals: ProposalConfig,

    /// Chain transport settings.
    pub transport: TransportConfig,

    /// Wallet persistence.
    pub wallet: WalletConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Target chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// LCD (REST gateway) endpoint.
    pub rest_endpoint: String,

    pub chain_id: String,

    /// Denomination fees and deposits are paid in.
    pub fee_denom: String,

    /// Bech32 address prefix.
    pub address_prefix: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rest_endpoint: "http://localhost:1317".to_string(),
            chain_id: "cosmoshub-4".to_string(),
            fee_denom: "uatom".to_string(),
            address_prefix: "cosmos".to_string(),
        }
    }
}

/// How gas limits are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GasMode {
    /// Simulate and scale by `gas_adjustment`.
    #[default]
    Auto,
    /// Always use `gas_limit`.
    Fixed,
}

/// Fee and gas settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SigningConfig {
    /// Gas price amount in `chain.fee_denom` (decimal string, "0" = free).
    pub gas_price: String,

    /// Multiplier applied to simulated gas.
    pub gas_adjustment: f64,

    pub gas_mode: GasMode,

    /// Used when `gas_mode = "fixed"`.
    pub gas_limit: u64,

    pub memo: String,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            gas_price: "0".to_string(),
            gas_adjustment: 1.4,
            gas_mode: GasMode::Auto,
            gas_limit: 200_000,
            memo: String::new(),
        }
    }
}

/// Proposal envelope settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProposalConfig {
    /// Mark admin-update proposals as expedited.
    pub expedite_admin_update: bool,

    /// `metadata` field of every submission.
    pub metadata: String,

    /// Governance module account (authority for executed messages).
    pub authority: Option<String>,
}

impl Default for ProposalConfig {
    fn default() -> Self {
        Self {
            expedite_admin_update: true,
            metadata: String::new(),
            authority: None,
        }
    }
}

/// Chain transport settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Wallet persistence.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// JSON file holding connected-wallet records.
    pub store_path: String,

    /// Record key used when no HD path is given.
    pub default_hd_path: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            store_path: "wallet-station.json".to_string(),
            default_hd_path: DEFAULT_HDPATH.to_string(),
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level when `RUST_LOG` is unset (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl StationConfig {
    /// Pipeline settings derived from this configuration.
    ///
    /// Call after validation; unparseable numbers fall back to defaults.
    pub fn station_settings(&self) -> StationSettings {
        let defaults = StationSettings::default();
        let gas_price = Decimal::from_str(&self.signing.gas_price).unwrap_or(defaults.gas_price);
        let gas_adjustment = Decimal::from_str(&self.signing.gas_adjustment.to_string())
            .unwrap_or(defaults.gas_adjustment);
        let gas = match self.signing.gas_mode {
            GasMode::Auto => GasSetting::Auto,
            GasMode::Fixed => GasSetting::Fixed(self.signing.gas_limit),
        };
        StationSettings {
            gas_price,
            gas_adjustment,
            gas,
            memo: self.signing.memo.clone(),
            encoder: EncoderOptions {
                expedite_admin_update: self.proposals.expedite_admin_update,
                metadata: self.proposals.metadata.clone(),
            },
            ..defaults
        }
    }
}
