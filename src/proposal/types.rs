//! Caller-facing proposal records.

use serde::{Deserialize, Serialize};

/// Plain-text proposal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextChange {
    pub title: String,
    pub description: String,
    /// Deposit denomination.
    pub denom: String,
    /// Deposit amount in base units.
    pub amount: String,
}

/// Hand a CosmWasm contract to a new admin through governance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateAdminChange {
    pub title: String,
    pub description: String,
    pub contract: String,
    pub new_admin: String,
    pub denom: String,
    pub amount: String,
}

/// Pay `amount` of `denom` from the community pool to `recipient`.
///
/// `deposit` is the proposal deposit, in the same denomination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommunityPoolSpendChange {
    pub title: String,
    pub description: String,
    pub recipient: String,
    pub denom: String,
    pub amount: String,
    pub deposit: String,
}

/// Single `x/params` change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParameterChange {
    pub title: String,
    pub description: String,
    pub subspace: String,
    pub key: String,
    /// JSON-encoded parameter value, passed through verbatim.
    pub value: String,
    pub denom: String,
    pub amount: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProposalKind {
    Text,
    UpdateAdmin,
    CommunityPoolSpend,
    ParameterChange,
}

impl ProposalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProposalKind::Text => "text",
            ProposalKind::UpdateAdmin => "update_admin",
            ProposalKind::CommunityPoolSpend => "community_pool_spend",
            ProposalKind::ParameterChange => "parameter_change",
        }
    }
}

impl std::fmt::Display for ProposalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific proposal fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProposalContent {
    Text(TextChange),
    UpdateAdmin(UpdateAdminChange),
    CommunityPoolSpend(CommunityPoolSpendChange),
    ParameterChange(ParameterChange),
}

impl ProposalContent {
    pub fn kind(&self) -> ProposalKind {
        match self {
            ProposalContent::Text(_) => ProposalKind::Text,
            ProposalContent::UpdateAdmin(_) => ProposalKind::UpdateAdmin,
            ProposalContent::CommunityPoolSpend(_) => ProposalKind::CommunityPoolSpend,
            ProposalContent::ParameterChange(_) => ProposalKind::ParameterChange,
        }
    }

    /// Denomination of the deposit (and of the spend, for pool spends).
    pub fn denom(&self) -> &str {
        match self {
            ProposalContent::Text(c) => &c.denom,
            ProposalContent::UpdateAdmin(c) => &c.denom,
            ProposalContent::CommunityPoolSpend(c) => &c.denom,
            ProposalContent::ParameterChange(c) => &c.denom,
        }
    }

    pub fn deposit_amount(&self) -> &str {
        match self {
            ProposalContent::Text(c) => &c.amount,
            ProposalContent::UpdateAdmin(c) => &c.amount,
            ProposalContent::CommunityPoolSpend(c) => &c.deposit,
            ProposalContent::ParameterChange(c) => &c.amount,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ProposalContent::Text(c) => &c.title,
            ProposalContent::UpdateAdmin(c) => &c.title,
            ProposalContent::CommunityPoolSpend(c) => &c.title,
            ProposalContent::ParameterChange(c) => &c.title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ProposalContent::Text(c) => &c.description,
            ProposalContent::UpdateAdmin(c) => &c.description,
            ProposalContent::CommunityPoolSpend(c) => &c.description,
            ProposalContent::ParameterChange(c) => &c.description,
        }
    }
}

impl From<TextChange> for ProposalContent {
    fn from(change: TextChange) -> Self {
        ProposalContent::Text(change)
    }
}

impl From<UpdateAdminChange> for ProposalContent {
    fn from(change: UpdateAdminChange) -> Self {
        ProposalContent::UpdateAdmin(change)
    }
}

impl From<CommunityPoolSpendChange> for ProposalContent {
    fn from(change: CommunityPoolSpendChange) -> Self {
        ProposalContent::CommunityPoolSpend(change)
    }
}

impl From<ParameterChange> for ProposalContent {
    fn from(change: ParameterChange) -> Self {
        ProposalContent::ParameterChange(change)
    }
}

/// A proposal to submit, with who submits it and which authority executes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRequest {
    pub proposer: String,
    /// Governance module account.
    pub authority: String,
    pub content: ProposalContent,
}

impl ProposalRequest {
    pub fn new(
        proposer: impl Into<String>,
        authority: impl Into<String>,
        content: impl Into<ProposalContent>,
    ) -> Self {
        Self {
            proposer: proposer.into(),
            authority: authority.into(),
            content: content.into(),
        }
    }
}
