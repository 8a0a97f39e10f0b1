//! Sign-and-broadcast pipeline and the proposal submission entry points.
//!
//! # Data Flow
//! ```text
//! caller (chain descriptor, denom, sender, messages)
//!     → message check (amino + registry; nothing sent on failure)
//!     → WalletProvider::signer(chain_id)             [SignerAcquired]
//!     → sender lookup on the signer
//!     → SigningClient::connect_with_signer(endpoint) [ClientReady]
//!     → account → simulate → sign → broadcast        [Broadcasting]
//!     → BroadcastResult                              [Confirmed | Rejected]
//! ```
//!
//! # Design Decisions
//! - One signer and one client per invocation, dropped on every exit path
//! - No retries: a rejected broadcast is terminal for the call
//! - Concurrent calls for the same sender are not serialized here

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::observability::metrics;
use crate::proposal::{
    CommunityPoolSpendChange, EncoderOptions, ParameterChange, ProposalEncoder, ProposalRequest,
    TextChange, UpdateAdminChange,
};
use crate::proto::{AminoTypes, Any, MessageRegistry};
use crate::signing::client::{FeeChoice, SigningClient};
use crate::signing::types::{
    default_gas_adjustment, ChainDescriptor, ClientOptions, GasPrice, GasSetting, PipelineStage,
};
use crate::transport::{BroadcastResult, ChainConnector};
use crate::units::Decimal;
use crate::wallet::factory::WalletFactory;
use crate::wallet::signer::{find_account, OfflineSigner};
use crate::wallet::types::{WalletArgument, WalletName};

/// Supplies a signer bound to a chain id.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn signer(&self, chain_id: &str) -> crate::Result<Arc<dyn OfflineSigner>>;
}

/// Hands out the same signer for every chain.
#[derive(Clone)]
pub struct FixedSignerProvider {
    signer: Arc<dyn OfflineSigner>,
}

impl FixedSignerProvider {
    pub fn new(signer: Arc<dyn OfflineSigner>) -> Self {
        Self { signer }
    }
}

#[async_trait]
impl WalletProvider for FixedSignerProvider {
    async fn signer(&self, _chain_id: &str) -> crate::Result<Arc<dyn OfflineSigner>> {
        Ok(self.signer.clone())
    }
}

/// Builds a fresh wallet of one kind per requested chain.
#[derive(Debug, Clone)]
pub struct FactoryWalletProvider {
    factory: WalletFactory,
    name: WalletName,
    args: WalletArgument,
}

impl FactoryWalletProvider {
    pub fn new(factory: WalletFactory, name: WalletName, args: WalletArgument) -> Self {
        Self {
            factory,
            name,
            args,
        }
    }
}

#[async_trait]
impl WalletProvider for FactoryWalletProvider {
    async fn signer(&self, chain_id: &str) -> crate::Result<Arc<dyn OfflineSigner>> {
        let args = WalletArgument {
            chain_id: Some(chain_id.to_string()),
            ..self.args.clone()
        };
        let wallet = self.factory.create_wallet(self.name, &args)?;
        Ok(Arc::new(wallet))
    }
}

/// Pipeline settings that are not part of a single call.
#[derive(Debug, Clone)]
pub struct StationSettings {
    /// Gas price amount, in the denomination of each call. Zero by default.
    pub gas_price: Decimal,
    pub gas_adjustment: Decimal,
    pub gas: GasSetting,
    pub memo: String,
    pub encoder: EncoderOptions,
    pub amino_types: AminoTypes,
    pub registry: Arc<MessageRegistry>,
}

impl Default for StationSettings {
    fn default() -> Self {
        Self {
            gas_price: Decimal::zero(),
            gas_adjustment: default_gas_adjustment(),
            gas: GasSetting::Auto,
            memo: String::new(),
            encoder: EncoderOptions::default(),
            amino_types: AminoTypes::default(),
            registry: Arc::new(MessageRegistry::default()),
        }
    }
}

impl StationSettings {
    /// Signing-client options for a call paying fees in `denom`.
    pub fn client_options(&self, denom: &str) -> ClientOptions {
        ClientOptions {
            gas_price: GasPrice {
                amount: self.gas_price.clone(),
                denom: denom.to_string(),
            },
            gas_adjustment: self.gas_adjustment.clone(),
            gas: self.gas,
            amino_types: self.amino_types.clone(),
            registry: self.registry.clone(),
        }
    }
}

/// Entry point for signing, broadcasting and proposal submission.
#[derive(Clone)]
pub struct WalletStation {
    provider: Arc<dyn WalletProvider>,
    connector: Arc<dyn ChainConnector>,
    settings: StationSettings,
    encoder: ProposalEncoder,
}

impl WalletStation {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        connector: Arc<dyn ChainConnector>,
        settings: StationSettings,
    ) -> Self {
        let encoder = ProposalEncoder::new(settings.encoder.clone());
        Self {
            provider,
            connector,
            settings,
            encoder,
        }
    }

    pub fn settings(&self) -> &StationSettings {
        &self.settings
    }

    pub fn encoder(&self) -> &ProposalEncoder {
        &self.encoder
    }

    /// Sign `messages` as `sender` and broadcast them to `chain`.
    ///
    /// The node's result is returned unmodified, including non-zero codes.
    pub async fn sign_and_broadcast(
        &self,
        chain: &ChainDescriptor,
        denom: &str,
        sender: &str,
        messages: Vec<Any>,
    ) -> crate::Result<BroadcastResult> {
        let invocation_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "sign_and_broadcast",
            %invocation_id,
            chain_id = %chain.chain_id,
            sender = %sender
        );
        self.run(chain, denom, sender, messages).instrument(span).await
    }

    async fn run(
        &self,
        chain: &ChainDescriptor,
        denom: &str,
        sender: &str,
        messages: Vec<Any>,
    ) -> crate::Result<BroadcastResult> {
        let started = Instant::now();
        let mut stage = PipelineStage::Disconnected;
        let outcome = self
            .drive(chain, denom, sender, messages, &mut stage)
            .await;

        match &outcome {
            Ok(result) => {
                metrics::record_broadcast(stage.as_str(), started.elapsed());
                tracing::info!(
                    stage = %stage,
                    tx_hash = %result.tx_hash,
                    code = result.code,
                    raw_log = %result.raw_log,
                    "broadcast finished"
                );
            }
            Err(e) => {
                metrics::record_broadcast("failed", started.elapsed());
                tracing::warn!(stage = %stage, error = %e, "sign and broadcast failed");
            }
        }
        outcome
    }

    async fn drive(
        &self,
        chain: &ChainDescriptor,
        denom: &str,
        sender: &str,
        messages: Vec<Any>,
        stage: &mut PipelineStage,
    ) -> crate::Result<BroadcastResult> {
        let options = self.settings.client_options(denom);
        options.check_messages(&messages)?;

        let signer = self.provider.signer(&chain.chain_id).await?;
        *stage = PipelineStage::SignerAcquired;
        let account = find_account(signer.as_ref(), sender).await?;
        tracing::debug!(stage = %stage, "signer acquired");

        let client = SigningClient::connect_with_signer(
            self.connector.as_ref(),
            &chain.endpoint,
            &chain.chain_id,
            signer,
            options,
        )
        .await?;
        *stage = PipelineStage::ClientReady;
        tracing::debug!(stage = %stage, endpoint = %chain.endpoint, "client ready");

        *stage = PipelineStage::Broadcasting;
        let result = client
            .sign_and_broadcast_as(&account, messages, FeeChoice::Auto, &self.settings.memo)
            .await?;
        *stage = if result.is_success() {
            PipelineStage::Confirmed
        } else {
            PipelineStage::Rejected
        };
        Ok(result)
    }

    /// Encode `request` and submit it, paying the deposit denomination.
    pub async fn submit_proposal(
        &self,
        request: &ProposalRequest,
        chain: &ChainDescriptor,
    ) -> crate::Result<BroadcastResult> {
        let envelope = self.encoder.encode(request)?;
        self.sign_and_broadcast(
            chain,
            request.content.denom(),
            &request.proposer,
            vec![envelope.to_any()],
        )
        .await
    }

    pub async fn text_proposal(
        &self,
        sender: &str,
        authority: &str,
        change: TextChange,
        chain: &ChainDescriptor,
    ) -> crate::Result<BroadcastResult> {
        self.submit_proposal(&ProposalRequest::new(sender, authority, change), chain)
            .await
    }

    pub async fn update_admin_proposal(
        &self,
        sender: &str,
        authority: &str,
        change: UpdateAdminChange,
        chain: &ChainDescriptor,
    ) -> crate::Result<BroadcastResult> {
        self.submit_proposal(&ProposalRequest::new(sender, authority, change), chain)
            .await
    }

    pub async fn community_pool_spend_proposal(
        &self,
        sender: &str,
        authority: &str,
        change: CommunityPoolSpendChange,
        chain: &ChainDescriptor,
    ) -> crate::Result<BroadcastResult> {
        self.submit_proposal(&ProposalRequest::new(sender, authority, change), chain)
            .await
    }

    pub async fn parameter_change_proposal(
        &self,
        sender: &str,
        authority: &str,
        change: ParameterChange,
        chain: &ChainDescriptor,
    ) -> crate::Result<BroadcastResult> {
        self.submit_proposal(&ProposalRequest::new(sender, authority, change), chain)
            .await
    }
}

impl std::fmt::Debug for WalletStation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletStation")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
