//! Signing and broadcasting.
//!
//! [`WalletStation`] is the produced interface: a generic sign-and-broadcast
//! call plus one submission function per proposal kind. [`SigningClient`] is
//! the per-call client it builds on top of a [`ChainConnector`].
//!
//! [`ChainConnector`]: crate::transport::ChainConnector

pub mod client;
pub mod pipeline;
pub mod types;

pub use client::{FeeChoice, SigningClient};
pub use pipeline::{
    FactoryWalletProvider, FixedSignerProvider, StationSettings, WalletProvider, WalletStation,
};
pub use types::{
    default_gas_adjustment, ChainDescriptor, ClientOptions, GasPrice, GasSetting,
    ParseGasPriceError, PipelineStage,
};
