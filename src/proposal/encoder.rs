//! Governance proposal encoding.
//!
//! # Data Flow
//! ```text
//! ProposalRequest
//!     → validate (required fields, integer amounts)
//!     → inner payload (TextProposal / ParameterChangeProposal / MsgUpdateAdmin /
//!       MsgCommunityPoolSpend)
//!     → legacy content shim for text and parameter-change kinds
//!     → SubmissionEnvelope (MsgSubmitProposal)
//! ```
//!
//! Pure construction: nothing here touches the network.

use prost::Message;

use crate::error::EncodingError;
use crate::observability::metrics;
use crate::proposal::types::{
    CommunityPoolSpendChange, ParameterChange, ProposalContent, ProposalKind, ProposalRequest,
    TextChange, UpdateAdminChange,
};
use crate::proto::cosmos::{
    MsgCommunityPoolSpend, MsgExecLegacyContent, MsgSubmitProposal, MsgUpdateAdmin, ParamChange,
    ParameterChangeProposal, TextProposal,
};
use crate::proto::{coin, pack_any, type_urls, Any, Coin};

/// Envelope settings that vary between chains and governance versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Set `expedited` on admin-update proposals.
    pub expedite_admin_update: bool,
    /// Free-form `metadata` string on every envelope.
    pub metadata: String,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            expedite_admin_update: true,
            metadata: String::new(),
        }
    }
}

/// Outer `MsgSubmitProposal`, built once per request.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionEnvelope {
    pub kind: ProposalKind,
    pub messages: Vec<Any>,
    pub initial_deposit: Vec<Coin>,
    pub proposer: String,
    pub metadata: String,
    pub title: String,
    pub summary: String,
    pub expedited: bool,
}

impl SubmissionEnvelope {
    pub fn to_msg(&self) -> MsgSubmitProposal {
        MsgSubmitProposal {
            messages: self.messages.clone(),
            initial_deposit: self.initial_deposit.clone(),
            proposer: self.proposer.clone(),
            metadata: self.metadata.clone(),
            title: self.title.clone(),
            summary: self.summary.clone(),
            expedited: self.expedited,
        }
    }

    /// Tagged message ready for a transaction body.
    pub fn to_any(&self) -> Any {
        pack_any(type_urls::SUBMIT_PROPOSAL, &self.to_msg())
    }

    pub fn encode(&self) -> Vec<u8> {
        self.to_msg().encode_to_vec()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProposalEncoder {
    options: EncoderOptions,
}

impl ProposalEncoder {
    pub fn new(options: EncoderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Build the submission envelope for `request`.
    pub fn encode(&self, request: &ProposalRequest) -> Result<SubmissionEnvelope, EncodingError> {
        require("proposer", &request.proposer)?;
        require("authority", &request.authority)?;
        let content = &request.content;
        require("title", content.title())?;
        require("description", content.description())?;
        require("denom", content.denom())?;
        let deposit_field = match content {
            ProposalContent::CommunityPoolSpend(_) => "deposit",
            _ => "amount",
        };
        let deposit = integer_coin(deposit_field, content.deposit_amount(), content.denom())?;

        let (inner, expedited) = match content {
            ProposalContent::Text(change) => (text_payload(&request.authority, change), false),
            ProposalContent::UpdateAdmin(change) => (
                update_admin_payload(&request.authority, change)?,
                self.options.expedite_admin_update,
            ),
            ProposalContent::CommunityPoolSpend(change) => {
                (community_pool_spend_payload(&request.authority, change)?, false)
            }
            ProposalContent::ParameterChange(change) => {
                (parameter_change_payload(&request.authority, change)?, false)
            }
        };

        let kind = content.kind();
        metrics::record_proposal_encoded(kind.as_str());
        tracing::debug!(
            kind = %kind,
            proposer = %request.proposer,
            inner_type = %inner.type_url,
            expedited,
            "proposal encoded"
        );

        Ok(SubmissionEnvelope {
            kind,
            messages: vec![inner],
            initial_deposit: vec![deposit],
            proposer: request.proposer.clone(),
            metadata: self.options.metadata.clone(),
            title: content.title().to_string(),
            summary: content.description().to_string(),
            expedited,
        })
    }
}

fn require(field: &'static str, value: &str) -> Result<(), EncodingError> {
    if value.trim().is_empty() {
        Err(EncodingError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Coin whose amount must be a non-negative base-unit integer.
fn integer_coin(field: &'static str, amount: &str, denom: &str) -> Result<Coin, EncodingError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(EncodingError::MissingField(field));
    }
    if !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EncodingError::InvalidAmount {
            field,
            amount: amount.to_string(),
        });
    }
    Ok(coin(amount, denom))
}

/// Wrap a legacy content payload so the v1 governance module can execute it.
fn legacy_content(authority: &str, content: Any) -> Any {
    pack_any(
        type_urls::EXEC_LEGACY_CONTENT,
        &MsgExecLegacyContent {
            content: Some(content),
            authority: authority.to_string(),
        },
    )
}

fn text_payload(authority: &str, change: &TextChange) -> Any {
    let text = TextProposal {
        title: change.title.clone(),
        description: change.description.clone(),
    };
    legacy_content(authority, pack_any(type_urls::TEXT_PROPOSAL, &text))
}

fn update_admin_payload(authority: &str, change: &UpdateAdminChange) -> Result<Any, EncodingError> {
    require("contract", &change.contract)?;
    require("new_admin", &change.new_admin)?;
    Ok(pack_any(
        type_urls::UPDATE_ADMIN,
        &MsgUpdateAdmin {
            sender: authority.to_string(),
            new_admin: change.new_admin.clone(),
            contract: change.contract.clone(),
        },
    ))
}

fn community_pool_spend_payload(
    authority: &str,
    change: &CommunityPoolSpendChange,
) -> Result<Any, EncodingError> {
    require("recipient", &change.recipient)?;
    let amount = integer_coin("amount", &change.amount, &change.denom)?;
    Ok(pack_any(
        type_urls::COMMUNITY_POOL_SPEND,
        &MsgCommunityPoolSpend {
            authority: authority.to_string(),
            recipient: change.recipient.clone(),
            amount: vec![amount],
        },
    ))
}

fn parameter_change_payload(
    authority: &str,
    change: &ParameterChange,
) -> Result<Any, EncodingError> {
    require("subspace", &change.subspace)?;
    require("key", &change.key)?;
    require("value", &change.value)?;
    let proposal = ParameterChangeProposal {
        title: change.title.clone(),
        description: change.description.clone(),
        changes: vec![ParamChange {
            subspace: change.subspace.clone(),
            key: change.key.clone(),
            value: change.value.clone(),
        }],
    };
    Ok(legacy_content(
        authority,
        pack_any(type_urls::PARAMETER_CHANGE_PROPOSAL, &proposal),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOV: &str = "cosmos10d07y265gmmuvt4z0w9aw880jnsr700j6zn9kn";

    fn text(title: &str, description: &str) -> ProposalRequest {
        ProposalRequest::new(
            "cosmos1proposer",
            GOV,
            TextChange {
                title: title.to_string(),
                description: description.to_string(),
                denom: "uatom".to_string(),
                amount: "1000000".to_string(),
            },
        )
    }

    #[test]
    fn test_text_proposal_envelope() {
        let envelope = ProposalEncoder::default().encode(&text("T", "D")).unwrap();
        assert_eq!(envelope.messages.len(), 1);
        assert_eq!(envelope.initial_deposit, vec![coin("1000000", "uatom")]);
        assert_eq!(envelope.summary, "D");
        assert_eq!(envelope.title, "T");
        assert_eq!(envelope.proposer, "cosmos1proposer");
        assert!(!envelope.expedited);

        let exec = &envelope.messages[0];
        assert_eq!(exec.type_url, type_urls::EXEC_LEGACY_CONTENT);
        let exec = MsgExecLegacyContent::decode(exec.value.as_slice()).unwrap();
        assert_eq!(exec.authority, GOV);
        let content = exec.content.unwrap();
        assert_eq!(content.type_url, type_urls::TEXT_PROPOSAL);
        let inner = TextProposal::decode(content.value.as_slice()).unwrap();
        assert_eq!(inner.title, "T");
        assert_eq!(inner.description, "D");
    }

    #[test]
    fn test_update_admin_is_direct_and_expedited() {
        let request = ProposalRequest::new(
            "wasm1proposer",
            GOV,
            UpdateAdminChange {
                title: "Move admin".to_string(),
                description: "hand over".to_string(),
                contract: "wasm1contract".to_string(),
                new_admin: "wasm1admin".to_string(),
                denom: "uwasm".to_string(),
                amount: "10".to_string(),
            },
        );
        let envelope = ProposalEncoder::default().encode(&request).unwrap();
        assert!(envelope.expedited);
        assert_eq!(envelope.messages[0].type_url, type_urls::UPDATE_ADMIN);
        let msg = MsgUpdateAdmin::decode(envelope.messages[0].value.as_slice()).unwrap();
        assert_eq!(msg.sender, GOV);
        assert_eq!(msg.new_admin, "wasm1admin");

        let encoder = ProposalEncoder::new(EncoderOptions {
            expedite_admin_update: false,
            ..EncoderOptions::default()
        });
        assert!(!encoder.encode(&request).unwrap().expedited);
    }

    #[test]
    fn test_community_pool_spend_uses_separate_deposit() {
        let request = ProposalRequest::new(
            "cosmos1proposer",
            GOV,
            CommunityPoolSpendChange {
                title: "Fund".to_string(),
                description: "grant".to_string(),
                recipient: "cosmos1recipient".to_string(),
                denom: "uatom".to_string(),
                amount: "5000".to_string(),
                deposit: "250".to_string(),
            },
        );
        let envelope = ProposalEncoder::default().encode(&request).unwrap();
        assert_eq!(envelope.initial_deposit, vec![coin("250", "uatom")]);
        let msg =
            MsgCommunityPoolSpend::decode(envelope.messages[0].value.as_slice()).unwrap();
        assert_eq!(msg.amount, vec![coin("5000", "uatom")]);
        assert_eq!(msg.authority, GOV);
    }

    #[test]
    fn test_parameter_change_is_wrapped() {
        let request = ProposalRequest::new(
            "cosmos1proposer",
            GOV,
            ParameterChange {
                title: "Raise".to_string(),
                description: "more validators".to_string(),
                subspace: "staking".to_string(),
                key: "MaxValidators".to_string(),
                value: "\"150\"".to_string(),
                denom: "uatom".to_string(),
                amount: "1".to_string(),
            },
        );
        let envelope = ProposalEncoder::default().encode(&request).unwrap();
        let exec = MsgExecLegacyContent::decode(envelope.messages[0].value.as_slice()).unwrap();
        let content = exec.content.unwrap();
        assert_eq!(content.type_url, type_urls::PARAMETER_CHANGE_PROPOSAL);
        let inner = ParameterChangeProposal::decode(content.value.as_slice()).unwrap();
        assert_eq!(inner.changes[0].key, "MaxValidators");
        assert_eq!(inner.changes[0].value, "\"150\"");
    }

    #[test]
    fn test_missing_fields_fail() {
        let err = ProposalEncoder::default().encode(&text("", "D")).unwrap_err();
        assert_eq!(err, EncodingError::MissingField("title"));

        let mut request = text("T", "D");
        request.authority.clear();
        assert_eq!(
            ProposalEncoder::default().encode(&request).unwrap_err(),
            EncodingError::MissingField("authority")
        );
    }

    #[test]
    fn test_fractional_deposit_is_rejected() {
        let mut request = text("T", "D");
        if let ProposalContent::Text(change) = &mut request.content {
            change.amount = "1.5".to_string();
        }
        let err = ProposalEncoder::default().encode(&request).unwrap_err();
        assert_eq!(
            err,
            EncodingError::InvalidAmount {
                field: "amount",
                amount: "1.5".to_string()
            }
        );
    }
}
