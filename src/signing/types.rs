//! Signing-client configuration and pipeline states.

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::error::EncodingError;
use crate::proto::{coin, AminoTypes, Any, Coin, MessageRegistry};
use crate::units::Decimal;
use crate::wallet::signer::check_registered;

/// Where to submit: an LCD endpoint plus the chain id it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    pub endpoint: String,
    pub chain_id: String,
}

impl ChainDescriptor {
    pub fn new(endpoint: impl Into<String>, chain_id: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            chain_id: chain_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid gas price '{0}': expected <amount><denom>, e.g. 0.025uatom")]
pub struct ParseGasPriceError(pub String);

/// Price of one unit of gas, e.g. `0.025uatom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasPrice {
    pub amount: Decimal,
    pub denom: String,
}

impl GasPrice {
    /// Zero-baseline price in `denom`.
    pub fn zero(denom: impl Into<String>) -> Self {
        Self {
            amount: Decimal::zero(),
            denom: denom.into(),
        }
    }

    /// Fee owed for `gas_limit`, rounded up to a whole base unit.
    pub fn fee_for(&self, gas_limit: u64) -> Coin {
        let amount = self.amount.mul(&Decimal::from(gas_limit)).ceil();
        coin(amount.to_string(), self.denom.clone())
    }
}

impl FromStr for GasPrice {
    type Err = ParseGasPriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseGasPriceError(s.to_string());
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(err)?;
        let (amount, denom) = s.split_at(split);
        if amount.is_empty() || denom.is_empty() {
            return Err(err());
        }
        Ok(Self {
            amount: amount.parse().map_err(|_| err())?,
            denom: denom.to_string(),
        })
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// How the gas limit is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasSetting {
    /// Simulate, then scale by the gas adjustment.
    Auto,
    Fixed(u64),
}

/// Options applied when a signing client is built.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub gas_price: GasPrice,
    pub gas_adjustment: Decimal,
    pub gas: GasSetting,
    pub amino_types: AminoTypes,
    pub registry: Arc<MessageRegistry>,
}

impl ClientOptions {
    /// Zero gas price in `denom`, automatic gas, every amino family.
    pub fn for_denom(denom: impl Into<String>) -> Self {
        Self {
            gas_price: GasPrice::zero(denom),
            gas_adjustment: default_gas_adjustment(),
            gas: GasSetting::Auto,
            amino_types: AminoTypes::default(),
            registry: Arc::new(MessageRegistry::default()),
        }
    }

    /// Refuse messages the amino table or the message registry cannot handle.
    pub fn check_messages(&self, messages: &[Any]) -> Result<(), EncodingError> {
        if let Some(msg) = messages
            .iter()
            .find(|msg| self.amino_types.amino_name(&msg.type_url).is_none())
        {
            return Err(EncodingError::MissingAminoConverter(msg.type_url.clone()));
        }
        check_registered(&self.registry, messages)
    }

    /// Gas limit for a transaction that simulated at `simulated` gas.
    pub fn adjusted_gas(&self, simulated: u64) -> u64 {
        self.gas_adjustment
            .mul(&Decimal::from(simulated))
            .ceil()
            .to_u64()
            .unwrap_or(u64::MAX)
    }
}

/// 1.4, the multiplier applied to simulated gas.
pub fn default_gas_adjustment() -> Decimal {
    Decimal::from(14u64).div_pow10(1)
}

/// Stages of one sign-and-broadcast invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Disconnected,
    SignerAcquired,
    ClientReady,
    Broadcasting,
    Confirmed,
    Rejected,
}

impl PipelineStage {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStage::Disconnected => "disconnected",
            PipelineStage::SignerAcquired => "signer_acquired",
            PipelineStage::ClientReady => "client_ready",
            PipelineStage::Broadcasting => "broadcasting",
            PipelineStage::Confirmed => "confirmed",
            PipelineStage::Rejected => "rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Confirmed | PipelineStage::Rejected)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{type_urls, MessageFamily};

    #[test]
    fn test_parse_gas_price() {
        let price: GasPrice = "0.025uatom".parse().unwrap();
        assert_eq!(price.denom, "uatom");
        assert_eq!(price.to_string(), "0.025uatom");

        assert!("uatom".parse::<GasPrice>().is_err());
        assert!("0.025".parse::<GasPrice>().is_err());
        assert!("1.2.3uatom".parse::<GasPrice>().is_err());
    }

    #[test]
    fn test_fee_rounds_up() {
        let price: GasPrice = "0.025uatom".parse().unwrap();
        assert_eq!(price.fee_for(100_001), coin("2501", "uatom"));
        assert_eq!(GasPrice::zero("uatom").fee_for(250_000), coin("0", "uatom"));
    }

    #[test]
    fn test_adjusted_gas() {
        let options = ClientOptions::for_denom("uatom");
        assert_eq!(options.adjusted_gas(100_000), 140_000);
        assert_eq!(options.adjusted_gas(3), 5);
        assert_eq!(options.gas, GasSetting::Auto);
    }

    #[test]
    fn test_message_without_amino_converter_is_refused() {
        let mut options = ClientOptions::for_denom("uatom");
        options.amino_types = AminoTypes::new(&[MessageFamily::Bank]);
        let proposal = Any {
            type_url: type_urls::SUBMIT_PROPOSAL.to_string(),
            value: Vec::new(),
        };
        assert_eq!(
            options.check_messages(&[proposal.clone()]).unwrap_err(),
            EncodingError::MissingAminoConverter(type_urls::SUBMIT_PROPOSAL.to_string())
        );
        assert!(ClientOptions::for_denom("uatom").check_messages(&[proposal]).is_ok());
    }

    #[test]
    fn test_terminal_stages() {
        assert!(PipelineStage::Confirmed.is_terminal());
        assert!(PipelineStage::Rejected.is_terminal());
        assert!(!PipelineStage::Broadcasting.is_terminal());
    }
}
