//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, adjustment ≥ 1)
//! - Check chain identifiers, endpoints and decimal strings parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: StationConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::str::FromStr;

use crate::config::schema::{GasMode, StationConfig};
use crate::units::Decimal;
use crate::wallet::HdPath;

/// A single semantic problem, located by its dotted config path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &StationConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.chain.rest_endpoint) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "chain.rest_endpoint",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("chain.rest_endpoint", e.to_string())),
    }
    if config.chain.chain_id.trim().is_empty() {
        errors.push(ValidationError::new("chain.chain_id", "must not be empty"));
    }
    if config.chain.fee_denom.trim().is_empty() {
        errors.push(ValidationError::new("chain.fee_denom", "must not be empty"));
    }
    if config.chain.address_prefix.trim().is_empty() {
        errors.push(ValidationError::new("chain.address_prefix", "must not be empty"));
    }

    if Decimal::from_str(&config.signing.gas_price).is_err() {
        errors.push(ValidationError::new(
            "signing.gas_price",
            format!("'{}' is not a non-negative decimal", config.signing.gas_price),
        ));
    }
    let adjustment = config.signing.gas_adjustment;
    if !adjustment.is_finite() || adjustment < 1.0 {
        errors.push(ValidationError::new(
            "signing.gas_adjustment",
            format!("must be a finite number >= 1, got {adjustment}"),
        ));
    }
    if config.signing.gas_mode == GasMode::Fixed && config.signing.gas_limit == 0 {
        errors.push(ValidationError::new(
            "signing.gas_limit",
            "must be > 0 when gas_mode = \"fixed\"",
        ));
    }

    if config.transport.timeout_secs == 0 {
        errors.push(ValidationError::new("transport.timeout_secs", "must be > 0"));
    }

    if let Err(e) = config.wallet.default_hd_path.parse::<HdPath>() {
        errors.push(ValidationError::new("wallet.default_hd_path", e.to_string()));
    }

    if !matches!(
        config.observability.log_level.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
