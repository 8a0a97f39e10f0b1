//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → StationConfig (validated, immutable)
//!     → station_settings() for the signing pipeline
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, parse_config, ConfigError};
pub use schema::{
    ChainConfig, GasMode, ObservabilityConfig, ProposalConfig, SigningConfig, StationConfig,
    TransportConfig, WalletConfig,
};
pub use validation::{validate_config, ValidationError};
