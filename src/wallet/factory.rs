//! Wallet backend selection.
//!
//! # Responsibilities
//! - Map a [`WalletName`] plus connection arguments to exactly one backend
//! - Hold the device, extension and resolver handles backends are built from
//! - Expose the built backend as one closed [`Wallet`] type

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, SigningError};
use crate::observability::metrics;
use crate::proto::{Any, Fee, MessageRegistry, SignDoc};
use crate::signing::{ClientOptions, FeeChoice, SigningClient};
use crate::transport::{BroadcastResult, ChainConnector};
use crate::wallet::chain::{is_ethereum_path, is_secp256k1_coin_type, HdPath, DEFAULT_HDPATH};
use crate::wallet::evm::{EvmKeySigner, EvmWallet, SnapProvider, SnapWallet};
use crate::wallet::extension::{ExtensionProvider, ExtensionWallet};
use crate::wallet::hardware::{HardwareTransport, HardwareWallet, TransportKind};
use crate::wallet::signer::{AbstractWallet, OfflineSigner};
use crate::wallet::types::{Account, WalletArgument, WalletName};
use crate::wallet::watch::{AddressWallet, NameResolver, NameServiceWallet};

/// Address prefix used when the arguments do not name one.
pub const DEFAULT_PREFIX: &str = "cosmos";

/// Handles to the outside world that backends are built from.
#[derive(Clone, Default)]
pub struct WalletConnectors {
    hardware: HashMap<TransportKind, Arc<dyn HardwareTransport>>,
    extensions: HashMap<WalletName, Arc<dyn ExtensionProvider>>,
    evm_signer: Option<Arc<dyn EvmKeySigner>>,
    snap: Option<Arc<dyn SnapProvider>>,
    name_resolver: Option<Arc<dyn NameResolver>>,
}

impl WalletConnectors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hardware(mut self, transport: Arc<dyn HardwareTransport>) -> Self {
        self.hardware.insert(transport.kind(), transport);
        self
    }

    pub fn with_extension(mut self, name: WalletName, provider: Arc<dyn ExtensionProvider>) -> Self {
        self.extensions.insert(name, provider);
        self
    }

    pub fn with_evm_signer(mut self, signer: Arc<dyn EvmKeySigner>) -> Self {
        self.evm_signer = Some(signer);
        self
    }

    pub fn with_snap(mut self, snap: Arc<dyn SnapProvider>) -> Self {
        self.snap = Some(snap);
        self
    }

    pub fn with_name_resolver(mut self, resolver: Arc<dyn NameResolver>) -> Self {
        self.name_resolver = Some(resolver);
        self
    }
}

impl fmt::Debug for WalletConnectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConnectors")
            .field("hardware", &self.hardware.keys().collect::<Vec<_>>())
            .field("extensions", &self.extensions.keys().collect::<Vec<_>>())
            .field("evm_signer", &self.evm_signer.is_some())
            .field("snap", &self.snap.is_some())
            .field("name_resolver", &self.name_resolver.is_some())
            .finish()
    }
}

/// Which concrete backend a [`Wallet`] runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendVariant {
    Hardware(TransportKind),
    Extension,
    EvmDirect,
    EvmSnap,
    AddressOnly,
    NameService,
}

/// The two EVM bridge signers.
#[derive(Debug, Clone)]
pub enum EvmBridge {
    Direct(EvmWallet),
    Snap(SnapWallet),
}

/// A constructed wallet backend.
#[derive(Debug, Clone)]
pub enum Wallet {
    Hardware(HardwareWallet),
    Extension(ExtensionWallet),
    EvmBridge(EvmBridge),
    AddressOnly(AddressWallet),
    NameService(NameServiceWallet),
}

impl Wallet {
    pub fn variant(&self) -> BackendVariant {
        match self {
            Wallet::Hardware(w) => BackendVariant::Hardware(w.transport_kind()),
            Wallet::Extension(_) => BackendVariant::Extension,
            Wallet::EvmBridge(EvmBridge::Direct(_)) => BackendVariant::EvmDirect,
            Wallet::EvmBridge(EvmBridge::Snap(_)) => BackendVariant::EvmSnap,
            Wallet::AddressOnly(_) => BackendVariant::AddressOnly,
            Wallet::NameService(_) => BackendVariant::NameService,
        }
    }

    fn as_abstract(&self) -> &dyn AbstractWallet {
        match self {
            Wallet::Hardware(w) => w,
            Wallet::Extension(w) => w,
            Wallet::EvmBridge(EvmBridge::Direct(w)) => w,
            Wallet::EvmBridge(EvmBridge::Snap(w)) => w,
            Wallet::AddressOnly(w) => w,
            Wallet::NameService(w) => w,
        }
    }

    /// Sign and submit in one step through a client built for this call.
    pub async fn sign_and_broadcast(
        &self,
        connector: &dyn ChainConnector,
        request: BroadcastRequest,
    ) -> crate::Result<BroadcastResult> {
        if !self.name().can_sign() {
            return Err(SigningError::NotSupported(self.name().to_string()).into());
        }
        let mut options = request.options;
        if let Some(denom) = request.denom {
            options.gas_price.denom = denom;
        }
        let client = SigningClient::connect_with_signer(
            connector,
            &request.rpc,
            &request.chain_id,
            Arc::new(self.clone()),
            options,
        )
        .await?;
        let fee = match request.fee {
            Some(fee) => FeeChoice::Explicit(fee),
            None => FeeChoice::Auto,
        };
        client
            .sign_and_broadcast(
                &request.signer_address,
                request.messages,
                fee,
                request.memo.as_deref().unwrap_or_default(),
            )
            .await
    }
}

#[async_trait]
impl OfflineSigner for Wallet {
    async fn get_accounts(&self) -> Result<Vec<Account>, SigningError> {
        self.as_abstract().get_accounts().await
    }

    async fn sign_direct(
        &self,
        signer_address: &str,
        doc: &SignDoc,
    ) -> Result<Vec<u8>, SigningError> {
        self.as_abstract().sign_direct(signer_address, doc).await
    }
}

impl AbstractWallet for Wallet {
    fn name(&self) -> WalletName {
        self.as_abstract().name()
    }

    fn supports_coin_type(&self, coin_type: Option<&str>) -> bool {
        self.as_abstract().supports_coin_type(coin_type)
    }

    fn registry(&self) -> &MessageRegistry {
        self.as_abstract().registry()
    }
}

/// Arguments of [`Wallet::sign_and_broadcast`].
#[derive(Debug, Clone)]
pub struct BroadcastRequest {
    pub chain_id: String,
    pub signer_address: String,
    pub messages: Vec<Any>,
    /// LCD endpoint to submit to.
    pub rpc: String,
    /// Explicit fee; automatic gas when absent.
    pub fee: Option<Fee>,
    /// Fee denomination for automatic gas.
    pub denom: Option<String>,
    pub memo: Option<String>,
    pub options: ClientOptions,
}

impl BroadcastRequest {
    pub fn new(
        chain_id: impl Into<String>,
        signer_address: impl Into<String>,
        messages: Vec<Any>,
        rpc: impl Into<String>,
        denom: impl Into<String>,
    ) -> Self {
        let denom = denom.into();
        Self {
            chain_id: chain_id.into(),
            signer_address: signer_address.into(),
            messages,
            rpc: rpc.into(),
            fee: None,
            options: ClientOptions::for_denom(denom.clone()),
            denom: Some(denom),
            memo: None,
        }
    }
}

/// Builds [`Wallet`]s from identities and connection arguments.
#[derive(Debug, Clone, Default)]
pub struct WalletFactory {
    connectors: WalletConnectors,
    registry: Arc<MessageRegistry>,
}

impl WalletFactory {
    pub fn new(connectors: WalletConnectors) -> Self {
        Self {
            connectors,
            registry: Arc::new(MessageRegistry::default()),
        }
    }

    /// Replace the message registry handed to every wallet.
    pub fn with_registry(mut self, registry: MessageRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn registry(&self) -> &Arc<MessageRegistry> {
        &self.registry
    }

    /// Build a wallet from a tag such as `"LedgerUSB"` or `"Keplr"`.
    pub fn create_wallet_by_tag(&self, tag: &str, args: &WalletArgument) -> crate::Result<Wallet> {
        self.create_wallet(tag.parse()?, args)
    }

    /// Build the backend for `name`.
    pub fn create_wallet(&self, name: WalletName, args: &WalletArgument) -> crate::Result<Wallet> {
        let wallet = match name {
            WalletName::Ledger | WalletName::LedgerBle => self.hardware(name, args)?,
            WalletName::Keplr | WalletName::Leap | WalletName::Owallet => {
                self.extension(name, args)?
            }
            WalletName::Metamask => {
                let direct = args.hd_path.as_deref().is_some_and(is_ethereum_path);
                if direct {
                    self.evm_direct(args)?
                } else {
                    self.snap(name, args)?
                }
            }
            WalletName::MetamaskSnap => self.snap(name, args)?,
            WalletName::Address => {
                let address = required(name, "address", args.address.as_deref())?;
                Wallet::AddressOnly(AddressWallet::new(address, self.registry.clone()))
            }
            WalletName::NameService => {
                let lookup = required(name, "name", args.name.as_deref())?;
                let resolver = self
                    .connectors
                    .name_resolver
                    .clone()
                    .ok_or_else(|| unavailable(name, "no name resolver configured"))?;
                Wallet::NameService(NameServiceWallet::new(
                    lookup,
                    prefix(args),
                    resolver,
                    self.registry.clone(),
                ))
            }
        };
        metrics::record_wallet_created(name.as_str());
        tracing::info!(wallet = %name, variant = ?wallet.variant(), "wallet created");
        Ok(wallet)
    }

    fn hardware(&self, name: WalletName, args: &WalletArgument) -> crate::Result<Wallet> {
        let raw_path = required(name, "hd_path", args.hd_path.as_deref())?;
        let hd_path: HdPath = raw_path.parse().map_err(Error::Signing)?;
        if hd_path.is_default() {
            return Err(unavailable(name, "an explicit non-default hd_path is required"));
        }
        let coin_type = hd_path.coin_type().map(|c| c.to_string());
        if !is_secp256k1_coin_type(coin_type.as_deref()) {
            return Err(SigningError::UnsupportedCoinType(coin_type.unwrap_or_default()).into());
        }
        let kind = match (name, args.transport.as_deref()) {
            (WalletName::LedgerBle, _) => TransportKind::Bluetooth,
            (_, Some(transport)) => transport
                .parse()
                .map_err(|e: String| unavailable(name, &e))?,
            (_, None) => TransportKind::Usb,
        };
        let transport = self
            .connectors
            .hardware
            .get(&kind)
            .cloned()
            .ok_or_else(|| unavailable(name, &format!("no {kind} device connected")))?;
        Ok(Wallet::Hardware(HardwareWallet::new(
            name,
            hd_path,
            prefix(args),
            transport,
            self.registry.clone(),
        )))
    }

    fn extension(&self, name: WalletName, args: &WalletArgument) -> crate::Result<Wallet> {
        let chain_id = required(name, "chain_id", args.chain_id.as_deref())?;
        let provider = self
            .connectors
            .extensions
            .get(&name)
            .cloned()
            .ok_or_else(|| unavailable(name, "extension not installed"))?;
        Ok(Wallet::Extension(ExtensionWallet::new(
            name,
            chain_id,
            provider,
            self.registry.clone(),
        )))
    }

    fn evm_direct(&self, args: &WalletArgument) -> crate::Result<Wallet> {
        let name = WalletName::Metamask;
        let hd_path: HdPath = required(name, "hd_path", args.hd_path.as_deref())?
            .parse()
            .map_err(Error::Signing)?;
        let signer = self
            .connectors
            .evm_signer
            .clone()
            .ok_or_else(|| unavailable(name, "no EVM signer connected"))?;
        Ok(Wallet::EvmBridge(EvmBridge::Direct(EvmWallet::new(
            signer,
            hd_path,
            prefix(args),
            self.registry.clone(),
        ))))
    }

    fn snap(&self, name: WalletName, args: &WalletArgument) -> crate::Result<Wallet> {
        let chain_id = required(name, "chain_id", args.chain_id.as_deref())?;
        let hd_path: HdPath = args
            .hd_path
            .as_deref()
            .unwrap_or(DEFAULT_HDPATH)
            .parse()
            .map_err(Error::Signing)?;
        let provider = self
            .connectors
            .snap
            .clone()
            .ok_or_else(|| unavailable(name, "cosmos snap not installed"))?;
        Ok(Wallet::EvmBridge(EvmBridge::Snap(SnapWallet::new(
            name,
            chain_id,
            hd_path,
            provider,
            self.registry.clone(),
        ))))
    }
}

fn required<'a>(name: WalletName, field: &str, value: Option<&'a str>) -> crate::Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(unavailable(name, &format!("missing {field}"))),
    }
}

fn unavailable(name: WalletName, reason: &str) -> Error {
    Error::UnsupportedWallet(format!("{name}: {reason}"))
}

fn prefix(args: &WalletArgument) -> String {
    args.prefix
        .clone()
        .unwrap_or_else(|| DEFAULT_PREFIX.to_string())
}
