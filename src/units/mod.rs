//! Token unit conversion.
//!
//! # Data Flow
//! ```text
//! bank metadata (query collaborator)
//!     → metadata.rs (validated DenominationMetadata)
//!     → converter.rs (session cache + to_display / to_unit / to_base)
//!     → decimal.rs (exact arbitrary-precision arithmetic)
//! ```
//!
//! # Design Decisions
//! - No floating point anywhere; amounts are moved on-chain
//! - Unknown denominations and units pass the input through unchanged

pub mod converter;
pub mod decimal;
pub mod metadata;

pub use converter::{TokenUnitConverter, DEFAULT_PRECISION};
pub use decimal::{Decimal, ParseDecimalError, MAX_EXPONENT};
pub use metadata::{DenomUnit, DenominationMetadata, MetadataError, MetadataSource};
