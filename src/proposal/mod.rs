//! Governance proposal construction.
//!
//! Four kinds are supported: plain text, contract admin update, community pool
//! spend and `x/params` change. Text and parameter-change payloads predate the
//! v1 governance module and travel inside `MsgExecLegacyContent`; the other two
//! are v1 messages placed in the envelope directly.

pub mod encoder;
pub mod types;

pub use encoder::{EncoderOptions, ProposalEncoder, SubmissionEnvelope};
pub use types::{
    CommunityPoolSpendChange, ParameterChange, ProposalContent, ProposalKind, ProposalRequest,
    TextChange, UpdateAdminChange,
};
