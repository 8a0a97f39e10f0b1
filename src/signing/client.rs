//! Signing + query client bound to one endpoint and one signer.

use std::sync::Arc;

use crate::error::BroadcastError;
use crate::proto::{Any, Fee};
use crate::signing::types::{ClientOptions, GasSetting};
use crate::transport::{BroadcastResult, ChainConnector, ChainTransport};
use crate::wallet::signer::{
    assemble_tx, build_sign_doc, find_account, tx_hash, unsigned_tx_bytes, OfflineSigner,
    Transaction,
};
use crate::wallet::types::Account;

/// How the fee of one submission is chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum FeeChoice {
    /// Gas per the client options, priced at the client's gas price.
    Auto,
    /// Use this fee verbatim.
    Explicit(Fee),
}

/// Client owning a transport and a signer for the duration of one call.
pub struct SigningClient {
    transport: Arc<dyn ChainTransport>,
    signer: Arc<dyn OfflineSigner>,
    chain_id: String,
    options: ClientOptions,
}

impl SigningClient {
    /// Open a transport to `endpoint` and bind it to `signer`.
    pub async fn connect_with_signer(
        connector: &dyn ChainConnector,
        endpoint: &str,
        chain_id: &str,
        signer: Arc<dyn OfflineSigner>,
        options: ClientOptions,
    ) -> Result<Self, BroadcastError> {
        let transport = connector
            .connect(endpoint)
            .await
            .map_err(|source| BroadcastError::Connect {
                endpoint: endpoint.to_string(),
                source,
            })?;
        Ok(Self {
            transport,
            signer,
            chain_id: chain_id.to_string(),
            options,
        })
    }

    pub fn transport(&self) -> &Arc<dyn ChainTransport> {
        &self.transport
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Sign `messages` as `signer_address` and broadcast them.
    ///
    /// A node-side rejection (non-zero code) is returned as `Ok`; only
    /// failures to reach that point are errors.
    pub async fn sign_and_broadcast(
        &self,
        signer_address: &str,
        messages: Vec<Any>,
        fee: FeeChoice,
        memo: &str,
    ) -> crate::Result<BroadcastResult> {
        self.options.check_messages(&messages)?;
        let account = find_account(self.signer.as_ref(), signer_address).await?;
        self.sign_and_broadcast_as(&account, messages, fee, memo)
            .await
    }

    /// Like [`SigningClient::sign_and_broadcast`], for a caller that already
    /// resolved `account` from this client's signer.
    pub async fn sign_and_broadcast_as(
        &self,
        account: &Account,
        messages: Vec<Any>,
        fee: FeeChoice,
        memo: &str,
    ) -> crate::Result<BroadcastResult> {
        self.options.check_messages(&messages)?;
        let signer_address = account.address.as_str();

        let info = self
            .transport
            .account(signer_address)
            .await
            .map_err(BroadcastError::Account)?
            .ok_or_else(|| BroadcastError::AccountNotFound(signer_address.to_string()))?;

        let mut tx = Transaction {
            chain_id: self.chain_id.clone(),
            signer_address: signer_address.to_string(),
            messages,
            fee: Fee::default(),
            memo: memo.to_string(),
            account_number: info.account_number,
            sequence: info.sequence,
        };

        tx.fee = match fee {
            FeeChoice::Explicit(fee) => fee,
            FeeChoice::Auto => {
                let gas_limit = match self.options.gas {
                    GasSetting::Fixed(limit) => limit,
                    GasSetting::Auto => {
                        let simulated = self
                            .transport
                            .simulate(&unsigned_tx_bytes(&tx, &account.pubkey))
                            .await
                            .map_err(BroadcastError::Simulation)?;
                        let adjusted = self.options.adjusted_gas(simulated);
                        tracing::debug!(simulated, adjusted, "gas estimated");
                        adjusted
                    }
                };
                Fee {
                    amount: vec![self.options.gas_price.fee_for(gas_limit)],
                    gas_limit,
                    ..Default::default()
                }
            }
        };

        let doc = build_sign_doc(&tx, &account.pubkey);
        let signature = self.signer.sign_direct(signer_address, &doc).await?;
        let tx_bytes = assemble_tx(doc, signature);
        tracing::debug!(tx_hash = %tx_hash(&tx_bytes), size = tx_bytes.len(), "submitting transaction");

        let result = self
            .transport
            .broadcast_tx(&tx_bytes)
            .await
            .map_err(BroadcastError::Submit)?;
        Ok(result)
    }
}

impl std::fmt::Debug for SigningClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningClient")
            .field("endpoint", &self.transport.endpoint())
            .field("chain_id", &self.chain_id)
            .field("gas_price", &self.options.gas_price.to_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;

    struct NoConnect;

    #[async_trait::async_trait]
    impl ChainConnector for NoConnect {
        async fn connect(
            &self,
            endpoint: &str,
        ) -> Result<Arc<dyn ChainTransport>, TransportError> {
            Err(TransportError::Unavailable(format!("{endpoint} is down")))
        }
    }

    struct NoSigner;

    #[async_trait::async_trait]
    impl OfflineSigner for NoSigner {
        async fn get_accounts(
            &self,
        ) -> Result<Vec<crate::wallet::Account>, crate::error::SigningError> {
            Ok(Vec::new())
        }

        async fn sign_direct(
            &self,
            _signer_address: &str,
            _doc: &crate::proto::SignDoc,
        ) -> Result<Vec<u8>, crate::error::SigningError> {
            Err(crate::error::SigningError::Rejected("no".to_string()))
        }
    }

    #[tokio::test]
    async fn test_connect_failure_is_broadcast_error() {
        let err = SigningClient::connect_with_signer(
            &NoConnect,
            "http://lcd.invalid",
            "cosmoshub-4",
            Arc::new(NoSigner),
            ClientOptions::for_denom("uatom"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BroadcastError::Connect { ref endpoint, .. } if endpoint == "http://lcd.invalid"));
    }
}
