//! Type-URL registries.
//!
//! [`MessageRegistry`] lists the protobuf messages a wallet may place in a
//! transaction body. [`AminoTypes`] maps those messages to their legacy amino
//! names; the signing client refuses any message without an amino entry.

use std::collections::{BTreeMap, BTreeSet};

use crate::proto::type_urls;

/// Message families with amino converters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageFamily {
    Bank,
    Staking,
    Distribution,
    Wasm,
    Gov,
}

impl MessageFamily {
    pub const ALL: [MessageFamily; 5] = [
        MessageFamily::Staking,
        MessageFamily::Distribution,
        MessageFamily::Bank,
        MessageFamily::Wasm,
        MessageFamily::Gov,
    ];

    /// `(type_url, amino name)` pairs belonging to this family.
    pub fn converters(self) -> &'static [(&'static str, &'static str)] {
        match self {
            MessageFamily::Bank => &[
                ("/cosmos.bank.v1beta1.MsgSend", "cosmos-sdk/MsgSend"),
                ("/cosmos.bank.v1beta1.MsgMultiSend", "cosmos-sdk/MsgMultiSend"),
            ],
            MessageFamily::Staking => &[
                ("/cosmos.staking.v1beta1.MsgCreateValidator", "cosmos-sdk/MsgCreateValidator"),
                ("/cosmos.staking.v1beta1.MsgEditValidator", "cosmos-sdk/MsgEditValidator"),
                ("/cosmos.staking.v1beta1.MsgDelegate", "cosmos-sdk/MsgDelegate"),
                ("/cosmos.staking.v1beta1.MsgBeginRedelegate", "cosmos-sdk/MsgBeginRedelegate"),
                ("/cosmos.staking.v1beta1.MsgUndelegate", "cosmos-sdk/MsgUndelegate"),
                (
                    "/cosmos.staking.v1beta1.MsgCancelUnbondingDelegation",
                    "cosmos-sdk/MsgCancelUnbondingDelegation",
                ),
            ],
            MessageFamily::Distribution => &[
                (
                    "/cosmos.distribution.v1beta1.MsgFundCommunityPool",
                    "cosmos-sdk/MsgFundCommunityPool",
                ),
                (
                    "/cosmos.distribution.v1beta1.MsgSetWithdrawAddress",
                    "cosmos-sdk/MsgModifyWithdrawAddress",
                ),
                (
                    "/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward",
                    "cosmos-sdk/MsgWithdrawDelegationReward",
                ),
                (
                    "/cosmos.distribution.v1beta1.MsgWithdrawValidatorCommission",
                    "cosmos-sdk/MsgWithdrawValidatorCommission",
                ),
                (type_urls::COMMUNITY_POOL_SPEND, "cosmos-sdk/distr/MsgCommunityPoolSpend"),
            ],
            MessageFamily::Wasm => &[
                ("/cosmwasm.wasm.v1.MsgStoreCode", "wasm/MsgStoreCode"),
                ("/cosmwasm.wasm.v1.MsgInstantiateContract", "wasm/MsgInstantiateContract"),
                ("/cosmwasm.wasm.v1.MsgExecuteContract", "wasm/MsgExecuteContract"),
                ("/cosmwasm.wasm.v1.MsgMigrateContract", "wasm/MsgMigrateContract"),
                (type_urls::UPDATE_ADMIN, "wasm/MsgUpdateAdmin"),
                ("/cosmwasm.wasm.v1.MsgClearAdmin", "wasm/MsgClearAdmin"),
            ],
            MessageFamily::Gov => &[
                ("/cosmos.gov.v1beta1.MsgSubmitProposal", "cosmos-sdk/MsgSubmitProposal"),
                ("/cosmos.gov.v1beta1.MsgDeposit", "cosmos-sdk/MsgDeposit"),
                ("/cosmos.gov.v1beta1.MsgVote", "cosmos-sdk/MsgVote"),
                ("/cosmos.gov.v1beta1.MsgVoteWeighted", "cosmos-sdk/MsgVoteWeighted"),
                (type_urls::SUBMIT_PROPOSAL, "cosmos-sdk/v1/MsgSubmitProposal"),
                (type_urls::EXEC_LEGACY_CONTENT, "cosmos-sdk/v1/MsgExecLegacyContent"),
                ("/cosmos.gov.v1.MsgDeposit", "cosmos-sdk/v1/MsgDeposit"),
                ("/cosmos.gov.v1.MsgVote", "cosmos-sdk/v1/MsgVote"),
                ("/cosmos.gov.v1.MsgVoteWeighted", "cosmos-sdk/v1/MsgVoteWeighted"),
            ],
        }
    }
}

/// Amino converter table keyed by type URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AminoTypes {
    converters: BTreeMap<String, String>,
}

impl AminoTypes {
    pub fn new(families: &[MessageFamily]) -> Self {
        let converters = families
            .iter()
            .flat_map(|family| family.converters().iter())
            .map(|(url, name)| (url.to_string(), name.to_string()))
            .collect();
        Self { converters }
    }

    pub fn register(&mut self, type_url: impl Into<String>, amino_name: impl Into<String>) {
        self.converters.insert(type_url.into(), amino_name.into());
    }

    pub fn amino_name(&self, type_url: &str) -> Option<&str> {
        self.converters.get(type_url).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl Default for AminoTypes {
    /// Staking, distribution, bank, wasm and gov converters.
    fn default() -> Self {
        Self::new(&MessageFamily::ALL)
    }
}

/// Protobuf type URLs a wallet is allowed to encode into a transaction body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRegistry {
    types: BTreeSet<String>,
}

impl MessageRegistry {
    /// An empty registry; every message will be refused.
    pub fn empty() -> Self {
        Self {
            types: BTreeSet::new(),
        }
    }

    pub fn register(&mut self, type_url: impl Into<String>) {
        self.types.insert(type_url.into());
    }

    pub fn contains(&self, type_url: &str) -> bool {
        self.types.contains(type_url)
    }
}

impl Default for MessageRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for family in MessageFamily::ALL {
            for (url, _) in family.converters() {
                registry.register(*url);
            }
        }
        for url in [
            "/ibc.applications.transfer.v1.MsgTransfer",
            "/cosmos.authz.v1beta1.MsgExec",
            "/cosmos.authz.v1beta1.MsgGrant",
            "/cosmos.authz.v1beta1.MsgRevoke",
            "/cosmos.feegrant.v1beta1.MsgGrantAllowance",
            "/cosmos.feegrant.v1beta1.MsgRevokeAllowance",
        ] {
            registry.register(url);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_amino_covers_governance_messages() {
        let amino = AminoTypes::default();
        assert_eq!(
            amino.amino_name(type_urls::SUBMIT_PROPOSAL),
            Some("cosmos-sdk/v1/MsgSubmitProposal")
        );
        assert_eq!(amino.amino_name(type_urls::UPDATE_ADMIN), Some("wasm/MsgUpdateAdmin"));
        assert_eq!(amino.amino_name("/cosmos.bank.v1beta1.MsgSend"), Some("cosmos-sdk/MsgSend"));
    }

    #[test]
    fn test_amino_without_family_misses() {
        let amino = AminoTypes::new(&[MessageFamily::Bank]);
        assert!(amino.amino_name("/cosmos.staking.v1beta1.MsgDelegate").is_none());
        assert_eq!(amino.len(), 2);
    }

    #[test]
    fn test_message_registry_includes_ibc() {
        let registry = MessageRegistry::default();
        assert!(registry.contains("/ibc.applications.transfer.v1.MsgTransfer"));
        assert!(registry.contains(type_urls::EXEC_LEGACY_CONTENT));
        assert!(!registry.contains("/osmosis.gamm.v1beta1.MsgSwapExactAmountIn"));
    }
}
