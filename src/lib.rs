//! Wallet Station Library
//!
//! Signs and broadcasts Cosmos SDK transactions through interchangeable wallet
//! backends, builds governance proposals and converts token amounts between
//! base and display units.

pub mod config;
pub mod error;
pub mod observability;
pub mod proposal;
pub mod proto;
pub mod signing;
pub mod transport;
pub mod units;
pub mod wallet;

pub use config::schema::StationConfig;
pub use error::{Error, Result};
pub use signing::WalletStation;
pub use wallet::WalletFactory;
