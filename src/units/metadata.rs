//! Denomination metadata as published by the bank module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transport::TransportError;

/// One named unit of a denomination, `10^exponent` base units large.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenomUnit {
    #[serde(rename = "denom")]
    pub name: String,
    #[serde(default)]
    pub exponent: u32,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Metadata describing every unit of a denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenominationMetadata {
    #[serde(default)]
    pub description: String,
    pub denom_units: Vec<DenomUnit>,
    /// Name of the exponent-0 unit.
    pub base: String,
    /// Name of the human-facing unit.
    pub display: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

/// Metadata that breaks the base/display unit invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("denomination {base} must have exactly one exponent-0 unit, found {count}")]
    BaseUnitCount { base: String, count: usize },

    #[error("exponent-0 unit {found} does not match base denomination {base}")]
    BaseUnitMismatch { base: String, found: String },

    #[error("display unit {display} is not a unit of {base}")]
    MissingDisplayUnit { base: String, display: String },
}

impl DenominationMetadata {
    /// Check the base and display unit invariants.
    pub fn validate(&self) -> Result<(), MetadataError> {
        let zero: Vec<&DenomUnit> = self
            .denom_units
            .iter()
            .filter(|u| u.exponent == 0)
            .collect();
        if zero.len() != 1 {
            return Err(MetadataError::BaseUnitCount {
                base: self.base.clone(),
                count: zero.len(),
            });
        }
        if zero[0].name != self.base {
            return Err(MetadataError::BaseUnitMismatch {
                base: self.base.clone(),
                found: zero[0].name.clone(),
            });
        }
        if self.unit(&self.display).is_none() {
            return Err(MetadataError::MissingDisplayUnit {
                base: self.base.clone(),
                display: self.display.clone(),
            });
        }
        Ok(())
    }

    /// Look up a unit by exact name.
    pub fn unit(&self, name: &str) -> Option<&DenomUnit> {
        self.denom_units.iter().find(|u| u.name == name)
    }

    /// Look up a unit by exact name, falling back to an ASCII case-insensitive match
    /// so upper-cased display denominations still resolve.
    pub fn unit_loose(&self, name: &str) -> Option<&DenomUnit> {
        self.unit(name).or_else(|| {
            self.denom_units
                .iter()
                .find(|u| u.name.eq_ignore_ascii_case(name))
        })
    }

    pub fn display_unit(&self) -> Option<&DenomUnit> {
        self.unit(&self.display)
    }
}

/// Anything that can resolve metadata for a denomination.
///
/// Returns `Ok(None)` when the chain has no metadata registered for `denom`.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn denom_metadata(
        &self,
        denom: &str,
    ) -> Result<Option<DenominationMetadata>, TransportError>;
}

#[cfg(test)]
pub(crate) fn atom_metadata() -> DenominationMetadata {
    DenominationMetadata {
        description: "The native staking token of the Cosmos Hub.".to_string(),
        denom_units: vec![
            DenomUnit {
                name: "uatom".to_string(),
                exponent: 0,
                aliases: vec!["microatom".to_string()],
            },
            DenomUnit {
                name: "matom".to_string(),
                exponent: 3,
                aliases: vec![],
            },
            DenomUnit {
                name: "atom".to_string(),
                exponent: 6,
                aliases: vec![],
            },
        ],
        base: "uatom".to_string(),
        display: "atom".to_string(),
        name: "Cosmos Hub Atom".to_string(),
        symbol: "ATOM".to_string(),
    }
}
