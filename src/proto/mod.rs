//! Wire types and type-URL registries.
//!
//! # Data Flow
//! ```text
//! proposal / wallet code
//!     → cosmos.rs (ibc-proto tx types, hand-declared gov messages, Any packing)
//!     → registry.rs (which type URLs may be encoded / amino-converted)
//!     → bytes handed to the signing client
//! ```

pub mod cosmos;
pub mod registry;

pub use cosmos::{coin, pack_any, Any, Coin, Fee, SignDoc, TxRaw};
pub use registry::{AminoTypes, MessageFamily, MessageRegistry};

/// Type URLs of the messages this crate builds itself.
pub mod type_urls {
    pub const SUBMIT_PROPOSAL: &str = "/cosmos.gov.v1.MsgSubmitProposal";
    pub const EXEC_LEGACY_CONTENT: &str = "/cosmos.gov.v1.MsgExecLegacyContent";
    pub const TEXT_PROPOSAL: &str = "/cosmos.gov.v1beta1.TextProposal";
    pub const PARAMETER_CHANGE_PROPOSAL: &str = "/cosmos.params.v1beta1.ParameterChangeProposal";
    pub const UPDATE_ADMIN: &str = "/cosmwasm.wasm.v1.MsgUpdateAdmin";
    pub const COMMUNITY_POOL_SPEND: &str = "/cosmos.distribution.v1beta1.MsgCommunityPoolSpend";
}
