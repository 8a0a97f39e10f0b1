//! Signing capability traits and direct-mode transaction assembly.
//!
//! # Data Flow
//! ```text
//! Transaction (messages, fee, account number, sequence)
//!     → registry check (every message type must be encodable)
//!     → TxBody + AuthInfo (public key tagged with the chain's key type)
//!     → SignDoc → OfflineSigner::sign_direct
//!     → TxRaw bytes ready for broadcast
//! ```

use async_trait::async_trait;
use prost::Message;
use sha2::{Digest, Sha256};

use crate::error::{EncodingError, SigningError};
use crate::proto::cosmos::{
    AuthInfo, ModeInfo, ModeInfoSingle, ModeInfoSum, PubKey, SignMode, SignerInfo, TxBody,
};
use crate::proto::{pack_any, Any, Fee, MessageRegistry, SignDoc, TxRaw};
use crate::wallet::chain::key_type_for_chain;
use crate::wallet::types::{Account, WalletName};

/// Account listing plus raw direct-mode signing.
#[async_trait]
pub trait OfflineSigner: Send + Sync {
    async fn get_accounts(&self) -> Result<Vec<Account>, SigningError>;

    /// Sign `doc` on behalf of `signer_address`, returning the raw signature.
    async fn sign_direct(
        &self,
        signer_address: &str,
        doc: &SignDoc,
    ) -> Result<Vec<u8>, SigningError>;
}

/// Capability set every wallet backend exposes.
#[async_trait]
pub trait AbstractWallet: OfflineSigner {
    fn name(&self) -> WalletName;

    /// Whether the wallet can derive keys for `coin_type` (`None` = default).
    fn supports_coin_type(&self, coin_type: Option<&str>) -> bool;

    /// Message types this wallet accepts in a transaction body.
    fn registry(&self) -> &MessageRegistry;

    /// Sign `transaction` and return the encoded `TxRaw`.
    async fn sign(&self, transaction: &Transaction) -> crate::Result<Vec<u8>> {
        sign_transaction(self, self.registry(), transaction).await
    }
}

/// Everything needed to produce a signed transaction offline.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub chain_id: String,
    pub signer_address: String,
    pub messages: Vec<Any>,
    pub fee: Fee,
    pub memo: String,
    pub account_number: u64,
    pub sequence: u64,
}

/// Locate `address` among the signer's accounts.
pub async fn find_account<S>(signer: &S, address: &str) -> Result<Account, SigningError>
where
    S: OfflineSigner + ?Sized,
{
    signer
        .get_accounts()
        .await?
        .into_iter()
        .find(|account| account.address == address)
        .ok_or_else(|| SigningError::AccountNotFound(address.to_string()))
}

/// Refuse messages whose type URL is not in `registry`.
pub fn check_registered(registry: &MessageRegistry, messages: &[Any]) -> Result<(), EncodingError> {
    match messages.iter().find(|msg| !registry.contains(&msg.type_url)) {
        Some(msg) => Err(EncodingError::UnregisteredType(msg.type_url.clone())),
        None => Ok(()),
    }
}

/// Build the direct-mode sign document for `transaction` signed by `pubkey`.
pub fn build_sign_doc(transaction: &Transaction, pubkey: &[u8]) -> SignDoc {
    let body = TxBody {
        messages: transaction.messages.clone(),
        memo: transaction.memo.clone(),
        ..Default::default()
    };
    let public_key = pack_any(
        key_type_for_chain(&transaction.chain_id),
        &PubKey {
            key: pubkey.to_vec(),
        },
    );
    let auth_info = AuthInfo {
        signer_infos: vec![SignerInfo {
            public_key: Some(public_key),
            mode_info: Some(ModeInfo {
                sum: Some(ModeInfoSum::Single(ModeInfoSingle {
                    mode: SignMode::Direct as i32,
                })),
            }),
            sequence: transaction.sequence,
        }],
        fee: Some(transaction.fee.clone()),
        ..Default::default()
    };
    SignDoc {
        body_bytes: body.encode_to_vec(),
        auth_info_bytes: auth_info.encode_to_vec(),
        chain_id: transaction.chain_id.clone(),
        account_number: transaction.account_number,
    }
}

/// Encode `doc` with a single signature.
pub fn assemble_tx(doc: SignDoc, signature: Vec<u8>) -> Vec<u8> {
    TxRaw {
        body_bytes: doc.body_bytes,
        auth_info_bytes: doc.auth_info_bytes,
        signatures: vec![signature],
    }
    .encode_to_vec()
}

/// Transaction hash as reported by CometBFT: upper-case hex SHA-256 of the raw bytes.
pub fn tx_hash(tx_bytes: &[u8]) -> String {
    hex::encode_upper(Sha256::digest(tx_bytes))
}

/// Transaction bytes with an empty signature, for gas simulation.
pub fn unsigned_tx_bytes(transaction: &Transaction, pubkey: &[u8]) -> Vec<u8> {
    assemble_tx(build_sign_doc(transaction, pubkey), Vec::new())
}

/// Sign `transaction` with `signer` after checking it against `registry`.
pub async fn sign_transaction<S>(
    signer: &S,
    registry: &MessageRegistry,
    transaction: &Transaction,
) -> crate::Result<Vec<u8>>
where
    S: OfflineSigner + ?Sized,
{
    check_registered(registry, &transaction.messages)?;
    let account = find_account(signer, &transaction.signer_address).await?;
    let doc = build_sign_doc(transaction, &account.pubkey);
    let signature = signer
        .sign_direct(&transaction.signer_address, &doc)
        .await?;
    tracing::debug!(
        signer = %transaction.signer_address,
        chain_id = %transaction.chain_id,
        messages = transaction.messages.len(),
        "transaction signed"
    );
    Ok(assemble_tx(doc, signature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::type_urls;
    use crate::proto::coin;
    use crate::wallet::chain::{COSMOS_KEY_TYPE, ETHERMINT_KEY_TYPE};

    struct StaticSigner;

    #[async_trait]
    impl OfflineSigner for StaticSigner {
        async fn get_accounts(&self) -> Result<Vec<Account>, SigningError> {
            Ok(vec![Account {
                address: "cosmos1signer".to_string(),
                algo: "secp256k1".to_string(),
                pubkey: vec![2; 33],
            }])
        }

        async fn sign_direct(
            &self,
            _signer_address: &str,
            doc: &SignDoc,
        ) -> Result<Vec<u8>, SigningError> {
            Ok(vec![doc.account_number as u8; 64])
        }
    }

    fn transaction(chain_id: &str, type_url: &str) -> Transaction {
        Transaction {
            chain_id: chain_id.to_string(),
            signer_address: "cosmos1signer".to_string(),
            messages: vec![Any {
                type_url: type_url.to_string(),
                value: vec![1, 2, 3],
            }],
            fee: Fee {
                amount: vec![coin("500", "uatom")],
                gas_limit: 200_000,
                ..Default::default()
            },
            memo: "hello".to_string(),
            account_number: 9,
            sequence: 4,
        }
    }

    fn signer_key_type(doc: &SignDoc) -> String {
        let auth = AuthInfo::decode(doc.auth_info_bytes.as_slice()).unwrap();
        auth.signer_infos[0]
            .public_key
            .as_ref()
            .unwrap()
            .type_url
            .clone()
    }

    #[test]
    fn test_sign_doc_uses_chain_key_type() {
        let doc = build_sign_doc(&transaction("cosmoshub-4", type_urls::SUBMIT_PROPOSAL), &[2; 33]);
        assert_eq!(signer_key_type(&doc), COSMOS_KEY_TYPE);
        assert_eq!(doc.account_number, 9);

        let doc = build_sign_doc(&transaction("evmos_9001-2", type_urls::SUBMIT_PROPOSAL), &[2; 33]);
        assert_eq!(signer_key_type(&doc), ETHERMINT_KEY_TYPE);
    }

    #[test]
    fn test_signer_info_uses_direct_mode() {
        let doc = build_sign_doc(&transaction("cosmoshub-4", type_urls::SUBMIT_PROPOSAL), &[2; 33]);
        let auth = AuthInfo::decode(doc.auth_info_bytes.as_slice()).unwrap();
        let mode_info = auth.signer_infos[0].mode_info.clone().unwrap();
        assert_eq!(
            mode_info.sum,
            Some(ModeInfoSum::Single(ModeInfoSingle {
                mode: SignMode::Direct as i32,
            }))
        );
        assert_eq!(auth.signer_infos[0].sequence, 4);
        assert_eq!(auth.fee.unwrap().gas_limit, 200_000);
    }

    #[tokio::test]
    async fn test_sign_transaction_produces_tx_raw() {
        let tx = transaction("cosmoshub-4", type_urls::SUBMIT_PROPOSAL);
        let bytes = sign_transaction(&StaticSigner, &MessageRegistry::default(), &tx)
            .await
            .unwrap();
        let raw = TxRaw::decode(bytes.as_slice()).unwrap();
        assert_eq!(raw.signatures, vec![vec![9u8; 64]]);
        let body = TxBody::decode(raw.body_bytes.as_slice()).unwrap();
        assert_eq!(body.memo, "hello");
        assert_eq!(body.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_unregistered_message_is_refused() {
        let tx = transaction("cosmoshub-4", "/unknown.v1.MsgThing");
        let err = sign_transaction(&StaticSigner, &MessageRegistry::default(), &tx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Encoding(EncodingError::UnregisteredType(url)) if url == "/unknown.v1.MsgThing"
        ));
    }

    #[tokio::test]
    async fn test_unknown_signer_address() {
        let mut tx = transaction("cosmoshub-4", type_urls::SUBMIT_PROPOSAL);
        tx.signer_address = "cosmos1other".to_string();
        let err = sign_transaction(&StaticSigner, &MessageRegistry::default(), &tx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Signing(SigningError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_unsigned_bytes_carry_empty_signature() {
        let tx = transaction("cosmoshub-4", type_urls::SUBMIT_PROPOSAL);
        let raw = TxRaw::decode(unsigned_tx_bytes(&tx, &[2; 33]).as_slice()).unwrap();
        assert_eq!(raw.signatures, vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_tx_hash_is_upper_hex_sha256() {
        assert_eq!(
            tx_hash(b""),
            "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855"
        );
    }
}
