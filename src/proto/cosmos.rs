//! Protobuf messages for the Cosmos SDK types this crate encodes.
//!
//! Transaction, coin and `Any` types come from `ibc-proto`. The governance,
//! params, distribution and wasm messages it does not ship are declared here
//! with field tags matching the upstream `.proto` files; only the fields the
//! crate writes are declared.

pub use ibc_proto::cosmos::base::v1beta1::Coin;
pub use ibc_proto::cosmos::tx::signing::v1beta1::SignMode;
pub use ibc_proto::cosmos::tx::v1beta1::mode_info::{Single as ModeInfoSingle, Sum as ModeInfoSum};
pub use ibc_proto::cosmos::tx::v1beta1::{
    AuthInfo, Fee, ModeInfo, SignDoc, SignerInfo, TxBody, TxRaw,
};
pub use ibc_proto::google::protobuf::Any;

/// Build a coin from an amount and a denomination.
pub fn coin(amount: impl Into<String>, denom: impl Into<String>) -> Coin {
    Coin {
        denom: denom.into(),
        amount: amount.into(),
    }
}

/// Encode `message` and tag it with `type_url`.
pub fn pack_any<M: ::prost::Message>(type_url: &str, message: &M) -> Any {
    Any {
        type_url: type_url.to_string(),
        value: message.encode_to_vec(),
    }
}

/// `cosmos.gov.v1.MsgSubmitProposal`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgSubmitProposal {
    #[prost(message, repeated, tag = "1")]
    pub messages: ::prost::alloc::vec::Vec<Any>,
    #[prost(message, repeated, tag = "2")]
    pub initial_deposit: ::prost::alloc::vec::Vec<Coin>,
    #[prost(string, tag = "3")]
    pub proposer: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub metadata: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub title: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub summary: ::prost::alloc::string::String,
    #[prost(bool, tag = "7")]
    pub expedited: bool,
}

/// `cosmos.gov.v1.MsgExecLegacyContent`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgExecLegacyContent {
    #[prost(message, optional, tag = "1")]
    pub content: ::core::option::Option<Any>,
    #[prost(string, tag = "2")]
    pub authority: ::prost::alloc::string::String,
}

/// `cosmos.gov.v1beta1.TextProposal`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TextProposal {
    #[prost(string, tag = "1")]
    pub title: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub description: ::prost::alloc::string::String,
}

/// `cosmos.params.v1beta1.ParameterChangeProposal`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ParameterChangeProposal {
    #[prost(string, tag = "1")]
    pub title: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub description: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "3")]
    pub changes: ::prost::alloc::vec::Vec<ParamChange>,
}

/// `cosmos.params.v1beta1.ParamChange`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ParamChange {
    #[prost(string, tag = "1")]
    pub subspace: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub key: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub value: ::prost::alloc::string::String,
}

/// `cosmwasm.wasm.v1.MsgUpdateAdmin`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgUpdateAdmin {
    #[prost(string, tag = "1")]
    pub sender: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub new_admin: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub contract: ::prost::alloc::string::String,
}

/// `cosmos.distribution.v1beta1.MsgCommunityPoolSpend`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgCommunityPoolSpend {
    #[prost(string, tag = "1")]
    pub authority: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub recipient: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "3")]
    pub amount: ::prost::alloc::vec::Vec<Coin>,
}

/// `cosmos.crypto.secp256k1.PubKey`; the ethsecp256k1 variants share the layout.
/// `ibc-proto` carries no crypto key messages.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PubKey {
    #[prost(bytes = "vec", tag = "1")]
    pub key: ::prost::alloc::vec::Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_coin_wire_layout() {
        // denom is field 1, amount is field 2
        let bytes = coin("5", "uatom").encode_to_vec();
        assert_eq!(bytes, [0x0a, 5, b'u', b'a', b't', b'o', b'm', 0x12, 1, b'5']);
    }

    #[test]
    fn test_expedited_flag_is_field_seven() {
        let msg = MsgSubmitProposal {
            expedited: true,
            ..Default::default()
        };
        assert_eq!(msg.encode_to_vec(), [0x38, 0x01]);
    }

    #[test]
    fn test_any_pack_decodes_back() {
        let text = TextProposal {
            title: "T".to_string(),
            description: "D".to_string(),
        };
        let any = pack_any("/cosmos.gov.v1beta1.TextProposal", &text);
        assert_eq!(any.type_url, "/cosmos.gov.v1beta1.TextProposal");
        assert_eq!(TextProposal::decode(any.value.as_slice()).unwrap(), text);
    }
}
