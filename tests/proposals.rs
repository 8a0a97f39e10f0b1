//! Proposal requests from JSON through to the encoded submission.

use prost::Message;

use wallet_station::config::parse_config;
use wallet_station::proposal::{ProposalContent, ProposalEncoder, ProposalKind, ProposalRequest};
use wallet_station::proto::cosmos::{
    MsgCommunityPoolSpend, MsgExecLegacyContent, MsgSubmitProposal, MsgUpdateAdmin,
    ParameterChangeProposal,
};
use wallet_station::proto::{coin, type_urls};

const PROPOSER: &str = "cosmos1proposer";
const AUTHORITY: &str = "cosmos10d07y265gmmuvt4z0w9aw880jnsr700j6zn9kn";

fn content(json: &str) -> ProposalContent {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_update_admin_from_json() {
    let content = content(
        r#"{
            "kind": "update_admin",
            "title": "Rotate admin",
            "description": "Hand the contract to the DAO",
            "contract": "cosmos1contract",
            "newAdmin": "cosmos1dao",
            "denom": "uatom",
            "amount": "250000"
        }"#,
    );
    assert_eq!(content.kind(), ProposalKind::UpdateAdmin);

    let envelope = ProposalEncoder::default()
        .encode(&ProposalRequest::new(PROPOSER, AUTHORITY, content))
        .unwrap();
    let msg = MsgSubmitProposal::decode(envelope.encode().as_slice()).unwrap();
    assert_eq!(msg.initial_deposit, vec![coin("250000", "uatom")]);
    assert!(msg.expedited);

    let inner = MsgUpdateAdmin::decode(msg.messages[0].value.as_slice()).unwrap();
    assert_eq!(inner.sender, AUTHORITY);
    assert_eq!(inner.new_admin, "cosmos1dao");
    assert_eq!(inner.contract, "cosmos1contract");
}

#[test]
fn test_parameter_change_from_json() {
    let content = content(
        r#"{
            "kind": "parameter_change",
            "title": "Raise max validators",
            "description": "Grow the active set",
            "subspace": "staking",
            "key": "MaxValidators",
            "value": "\"200\"",
            "denom": "uatom",
            "amount": "1"
        }"#,
    );

    let envelope = ProposalEncoder::default()
        .encode(&ProposalRequest::new(PROPOSER, AUTHORITY, content))
        .unwrap();
    assert_eq!(envelope.kind, ProposalKind::ParameterChange);
    assert!(!envelope.expedited);

    let any = envelope.to_any();
    assert_eq!(any.type_url, type_urls::SUBMIT_PROPOSAL);
    let msg = MsgSubmitProposal::decode(any.value.as_slice()).unwrap();
    let exec = MsgExecLegacyContent::decode(msg.messages[0].value.as_slice()).unwrap();
    assert_eq!(exec.authority, AUTHORITY);
    let legacy = exec.content.unwrap();
    assert_eq!(legacy.type_url, type_urls::PARAMETER_CHANGE_PROPOSAL);

    let proposal = ParameterChangeProposal::decode(legacy.value.as_slice()).unwrap();
    assert_eq!(proposal.changes.len(), 1);
    assert_eq!(proposal.changes[0].subspace, "staking");
    assert_eq!(proposal.changes[0].key, "MaxValidators");
    assert_eq!(proposal.changes[0].value, "\"200\"");
}

#[test]
fn test_community_pool_spend_amount_and_deposit_differ() {
    let content = content(
        r#"{
            "kind": "community_pool_spend",
            "title": "Fund explorer",
            "description": "Six months of maintenance",
            "recipient": "cosmos1recipient",
            "denom": "uatom",
            "amount": "90000000000",
            "deposit": "5000000"
        }"#,
    );

    let envelope = ProposalEncoder::default()
        .encode(&ProposalRequest::new(PROPOSER, AUTHORITY, content))
        .unwrap();
    assert_eq!(envelope.initial_deposit, vec![coin("5000000", "uatom")]);

    let spend = MsgCommunityPoolSpend::decode(envelope.messages[0].value.as_slice()).unwrap();
    assert_eq!(spend.authority, AUTHORITY);
    assert_eq!(spend.amount, vec![coin("90000000000", "uatom")]);
}

#[test]
fn test_configured_envelope_options() {
    let config = parse_config(
        r#"
        [proposals]
        expedite_admin_update = false
        metadata = "ipfs://proposal"
        "#,
    )
    .unwrap();
    let encoder = ProposalEncoder::new(config.station_settings().encoder);

    let content = content(
        r#"{
            "kind": "update_admin",
            "title": "Rotate admin",
            "description": "Hand the contract to the DAO",
            "contract": "cosmos1contract",
            "newAdmin": "cosmos1dao",
            "denom": "uatom",
            "amount": "250000"
        }"#,
    );
    let envelope = encoder
        .encode(&ProposalRequest::new(PROPOSER, AUTHORITY, content))
        .unwrap();
    assert!(!envelope.expedited);
    assert_eq!(envelope.metadata, "ipfs://proposal");
}

#[test]
fn test_missing_kind_fields_are_reported() {
    let content = content(
        r#"{
            "kind": "update_admin",
            "title": "Rotate admin",
            "description": "Hand the contract to the DAO",
            "contract": "cosmos1contract",
            "denom": "uatom",
            "amount": "250000"
        }"#,
    );
    let err = ProposalEncoder::default()
        .encode(&ProposalRequest::new(PROPOSER, AUTHORITY, content))
        .unwrap_err();
    assert_eq!(err.to_string(), "missing required field: new_admin");
}
