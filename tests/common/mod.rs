//! Shared fakes for integration tests: an in-memory chain, a scripted signer
//! and a failing wallet provider.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use wallet_station::error::SigningError;
use wallet_station::proto::{coin, Coin, SignDoc};
use wallet_station::signing::WalletProvider;
use wallet_station::transport::{
    AccountInfo, BroadcastResult, ChainConnector, ChainTransport, TransportError,
};
use wallet_station::units::{DenomUnit, DenominationMetadata, MetadataSource};
use wallet_station::wallet::{tx_hash, Account, OfflineSigner};

pub const SENDER: &str = "cosmos1sender";
pub const AUTHORITY: &str = "cosmos10d07y265gmmuvt4z0w9aw880jnsr700j6zn9kn";
pub const ENDPOINT: &str = "http://localhost:1317";
pub const CHAIN_ID: &str = "cosmoshub-4";

/// Call counts observed by [`MockChain`].
#[derive(Debug, Default)]
pub struct Calls {
    pub connects: AtomicU32,
    pub simulations: AtomicU32,
    pub broadcasts: AtomicU32,
}

impl Calls {
    pub fn connects(&self) -> u32 {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn simulations(&self) -> u32 {
        self.simulations.load(Ordering::SeqCst)
    }

    pub fn broadcasts(&self) -> u32 {
        self.broadcasts.load(Ordering::SeqCst)
    }
}

/// In-memory chain node.
pub struct MockChain {
    pub calls: Arc<Calls>,
    pub accounts: HashMap<String, AccountInfo>,
    pub metadata: HashMap<String, DenominationMetadata>,
    pub simulated_gas: u64,
    pub broadcast_code: u32,
    pub submitted: Mutex<Vec<Vec<u8>>>,
}

impl MockChain {
    pub fn new() -> Self {
        let mut accounts = HashMap::new();
        accounts.insert(
            SENDER.to_string(),
            AccountInfo {
                account_number: 12,
                sequence: 3,
            },
        );
        let mut metadata = HashMap::new();
        metadata.insert("uatom".to_string(), atom_metadata());
        Self {
            calls: Arc::new(Calls::default()),
            accounts,
            metadata,
            simulated_gas: 100_000,
            broadcast_code: 0,
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(code: u32) -> Self {
        Self {
            broadcast_code: code,
            ..Self::new()
        }
    }

    pub fn submitted(&self) -> Vec<Vec<u8>> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataSource for MockChain {
    async fn denom_metadata(
        &self,
        denom: &str,
    ) -> Result<Option<DenominationMetadata>, TransportError> {
        Ok(self.metadata.get(denom).cloned())
    }
}

#[async_trait]
impl ChainTransport for MockChain {
    fn endpoint(&self) -> &str {
        ENDPOINT
    }

    async fn account(&self, address: &str) -> Result<Option<AccountInfo>, TransportError> {
        Ok(self.accounts.get(address).copied())
    }

    async fn balances(&self, _address: &str) -> Result<Vec<Coin>, TransportError> {
        Ok(vec![coin("5000000", "uatom")])
    }

    async fn simulate(&self, _tx_bytes: &[u8]) -> Result<u64, TransportError> {
        self.calls.simulations.fetch_add(1, Ordering::SeqCst);
        Ok(self.simulated_gas)
    }

    async fn broadcast_tx(&self, tx_bytes: &[u8]) -> Result<BroadcastResult, TransportError> {
        self.calls.broadcasts.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(tx_bytes.to_vec());
        Ok(BroadcastResult {
            tx_hash: tx_hash(tx_bytes),
            code: self.broadcast_code,
            codespace: if self.broadcast_code == 0 {
                String::new()
            } else {
                "sdk".to_string()
            },
            raw_log: if self.broadcast_code == 0 {
                String::new()
            } else {
                "insufficient funds".to_string()
            },
            height: 100,
            gas_wanted: 140_000,
            gas_used: 98_000,
        })
    }

    async fn tx_by_hash(&self, _hash: &str) -> Result<Option<BroadcastResult>, TransportError> {
        Ok(None)
    }
}

/// Hands out one shared [`MockChain`] and counts connections.
pub struct MockConnector {
    pub chain: Arc<MockChain>,
    pub refuse: bool,
}

impl MockConnector {
    pub fn new(chain: MockChain) -> Self {
        Self {
            chain: Arc::new(chain),
            refuse: false,
        }
    }

    pub fn calls(&self) -> Arc<Calls> {
        self.chain.calls.clone()
    }
}

#[async_trait]
impl ChainConnector for MockConnector {
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn ChainTransport>, TransportError> {
        self.chain.calls.connects.fetch_add(1, Ordering::SeqCst);
        if self.refuse {
            return Err(TransportError::Unavailable(format!("{endpoint} refused")));
        }
        Ok(self.chain.clone())
    }
}

/// How [`ScriptedSigner`] behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerBehavior {
    Works,
    AccountsFail,
    UserRejects,
}

/// Signer with a fixed address and a fake 64-byte signature.
pub struct ScriptedSigner {
    pub address: String,
    pub behavior: SignerBehavior,
    pub signed: AtomicU32,
    pub account_queries: AtomicU32,
}

impl ScriptedSigner {
    pub fn new(behavior: SignerBehavior) -> Self {
        Self {
            address: SENDER.to_string(),
            behavior,
            signed: AtomicU32::new(0),
            account_queries: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl OfflineSigner for ScriptedSigner {
    async fn get_accounts(&self) -> Result<Vec<Account>, SigningError> {
        self.account_queries.fetch_add(1, Ordering::SeqCst);
        if self.behavior == SignerBehavior::AccountsFail {
            return Err(SigningError::Unreachable("device locked".to_string()));
        }
        Ok(vec![Account {
            address: self.address.clone(),
            algo: "secp256k1".to_string(),
            pubkey: vec![2; 33],
        }])
    }

    async fn sign_direct(
        &self,
        _signer_address: &str,
        _doc: &SignDoc,
    ) -> Result<Vec<u8>, SigningError> {
        if self.behavior == SignerBehavior::UserRejects {
            return Err(SigningError::Rejected("user denied the request".to_string()));
        }
        self.signed.fetch_add(1, Ordering::SeqCst);
        Ok(vec![7; 64])
    }
}

/// Provider whose wallet never becomes available.
pub struct UnavailableProvider;

#[async_trait]
impl WalletProvider for UnavailableProvider {
    async fn signer(&self, chain_id: &str) -> wallet_station::Result<Arc<dyn OfflineSigner>> {
        Err(SigningError::Unavailable {
            chain_id: chain_id.to_string(),
            reason: "extension not installed".to_string(),
        }
        .into())
    }
}

pub fn atom_metadata() -> DenominationMetadata {
    DenominationMetadata {
        description: "The native staking token of the Cosmos Hub.".to_string(),
        denom_units: vec![
            DenomUnit {
                name: "uatom".to_string(),
                exponent: 0,
                aliases: vec!["microatom".to_string()],
            },
            DenomUnit {
                name: "matom".to_string(),
                exponent: 3,
                aliases: vec!["milliatom".to_string()],
            },
            DenomUnit {
                name: "atom".to_string(),
                exponent: 6,
                aliases: vec![],
            },
        ],
        base: "uatom".to_string(),
        display: "atom".to_string(),
        name: "Cosmos Hub Atom".to_string(),
        symbol: "ATOM".to_string(),
    }
}
