//! Wallet backends behind one signing capability.
//!
//! # Data Flow
//! ```text
//! WalletName + WalletArgument
//!     → factory.rs (select backend, validate connection arguments)
//!     → hardware.rs | extension.rs | evm.rs | watch.rs
//!     → signer.rs (OfflineSigner / AbstractWallet, direct-mode tx assembly)
//! ```
//!
//! # Design Decisions
//! - Backends form a closed enum ([`Wallet`]) so selection is exhaustive
//! - Devices, extensions and resolvers are injected as trait objects
//! - The last connected wallet is persisted through [`WalletStore`] only

pub mod chain;
pub mod evm;
pub mod extension;
pub mod factory;
pub mod hardware;
pub mod signer;
pub mod store;
pub mod types;
pub mod watch;

pub use chain::{
    extract_numeric_chain_suffix, key_type_for_chain, HdPath, COSMOS_KEY_TYPE, DEFAULT_HDPATH,
    ETHERMINT_KEY_TYPE, INJECTIVE_KEY_TYPE,
};
pub use evm::{EvmKeySigner, EvmWallet, SnapProvider, SnapWallet};
pub use extension::{ExtensionProvider, ExtensionWallet};
pub use factory::{
    BackendVariant, BroadcastRequest, EvmBridge, Wallet, WalletConnectors, WalletFactory,
};
pub use hardware::{HardwareTransport, HardwareWallet, TransportKind};
pub use signer::{tx_hash, AbstractWallet, OfflineSigner, Transaction};
pub use store::{
    read_wallet, remove_wallet, write_wallet, FileStore, MemoryStore, StoreError, WalletStore,
};
pub use types::{Account, ConnectedWallet, WalletArgument, WalletFamily, WalletName};
pub use watch::{AddressWallet, NameResolver, NameServiceWallet};
