//! Base/display unit conversion driven by cached denomination metadata.

use dashmap::DashMap;
use std::sync::Arc;

use crate::observability::metrics;
use crate::proto::{coin, Coin};
use crate::transport::TransportError;
use crate::units::decimal::Decimal;
use crate::units::metadata::{DenominationMetadata, MetadataError, MetadataSource};

/// Fractional digits used when the caller does not ask for a precision.
pub const DEFAULT_PRECISION: u32 = 6;

/// Session cache of denomination metadata plus the conversions built on it.
///
/// Conversions never fail: an unknown denomination, an unknown unit or an
/// unparseable amount returns the input coin untouched.
#[derive(Clone, Default)]
pub struct TokenUnitConverter {
    metadata: Arc<DashMap<String, Arc<DenominationMetadata>>>,
}

impl TokenUnitConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the cache, skipping entries that break the metadata invariants.
    pub fn with_metadata<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, DenominationMetadata)>,
    {
        let converter = Self::new();
        for (denom, meta) in entries {
            if let Err(e) = converter.add_metadata(&denom, meta) {
                tracing::warn!(denom = %denom, error = %e, "Skipping invalid denomination metadata");
            }
        }
        converter
    }

    /// Cache metadata for `denom`.
    ///
    /// Returns `Ok(false)` when metadata was already cached; stored entries are
    /// never replaced.
    pub fn add_metadata(
        &self,
        denom: &str,
        meta: DenominationMetadata,
    ) -> Result<bool, MetadataError> {
        meta.validate()?;
        let mut inserted = false;
        self.metadata.entry(denom.to_string()).or_insert_with(|| {
            inserted = true;
            Arc::new(meta)
        });
        Ok(inserted)
    }

    pub fn metadata(&self, denom: &str) -> Option<Arc<DenominationMetadata>> {
        self.metadata.get(denom).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    /// Fetch and cache metadata for `denom` if it has not been seen yet.
    ///
    /// Returns whether usable metadata is cached afterwards. Metadata the chain
    /// reports but that fails validation is logged and left out of the cache.
    pub async fn ensure_metadata<S>(&self, source: &S, denom: &str) -> Result<bool, TransportError>
    where
        S: MetadataSource + ?Sized,
    {
        if self.metadata.contains_key(denom) {
            return Ok(true);
        }
        let Some(meta) = source.denom_metadata(denom).await? else {
            tracing::debug!(denom = %denom, "No metadata published for denomination");
            return Ok(false);
        };
        match self.add_metadata(denom, meta) {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!(denom = %denom, error = %e, "Chain returned invalid denomination metadata");
                Ok(false)
            }
        }
    }

    /// Express a base-unit amount in the display unit, with exactly `precision`
    /// fractional digits and an upper-cased denomination.
    pub fn to_display(&self, token: &Coin, precision: u32) -> Coin {
        let Some(meta) = self.metadata(&token.denom) else {
            return noop("to_display", token);
        };
        let Some(unit) = meta.display_unit() else {
            return noop("to_display", token);
        };
        let Some(amount) = parse_amount(token) else {
            return noop("to_display", token);
        };
        coin(
            amount.div_pow10(unit.exponent).to_fixed(precision),
            unit.name.to_uppercase(),
        )
    }

    /// Express a base-unit amount in `unit_name`, rounded to `precision` digits and
    /// printed without trailing zeros.
    pub fn to_unit(&self, token: &Coin, unit_name: &str, precision: u32) -> Coin {
        let Some(meta) = self.metadata(&token.denom) else {
            return noop("to_unit", token);
        };
        let Some(unit) = meta.unit(unit_name) else {
            return noop("to_unit", token);
        };
        let Some(amount) = parse_amount(token) else {
            return noop("to_unit", token);
        };
        coin(
            amount
                .div_pow10(unit.exponent)
                .round_half_up(precision)
                .to_string(),
            unit.name.clone(),
        )
    }

    /// Convert an amount in any unit of `base_denom` back to base units.
    ///
    /// The multiplication is exact; nothing is rounded.
    pub fn to_base(&self, base_denom: &str, display: &Coin) -> Coin {
        let Some(meta) = self.metadata(base_denom) else {
            return noop("to_base", display);
        };
        let Some(unit) = meta.unit_loose(&display.denom) else {
            return noop("to_base", display);
        };
        let Some(amount) = parse_amount(display) else {
            return noop("to_base", display);
        };
        coin(amount.mul_pow10(unit.exponent).to_string(), base_denom)
    }
}

impl std::fmt::Debug for TokenUnitConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenUnitConverter")
            .field("denominations", &self.metadata.len())
            .finish()
    }
}

fn parse_amount(token: &Coin) -> Option<Decimal> {
    token.amount.parse().ok()
}

fn noop(op: &'static str, token: &Coin) -> Coin {
    tracing::debug!(op, denom = %token.denom, amount = %token.amount, "Conversion skipped");
    metrics::record_conversion_noop(op);
    token.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::metadata::atom_metadata;

    fn converter() -> TokenUnitConverter {
        TokenUnitConverter::with_metadata([("uatom".to_string(), atom_metadata())])
    }

    #[test]
    fn test_to_display() {
        let c = converter();
        let out = c.to_display(&coin("1234567", "uatom"), DEFAULT_PRECISION);
        assert_eq!(out, coin("1.234567", "ATOM"));

        let out = c.to_display(&coin("1234567", "uatom"), 2);
        assert_eq!(out, coin("1.23", "ATOM"));
    }

    #[test]
    fn test_to_unit_is_normalized() {
        let c = converter();
        assert_eq!(
            c.to_unit(&coin("1500000", "uatom"), "atom", 6),
            coin("1.5", "atom")
        );
        assert_eq!(
            c.to_unit(&coin("2000", "uatom"), "matom", 6),
            coin("2", "matom")
        );
    }

    #[test]
    fn test_to_base_is_exact() {
        let c = converter();
        assert_eq!(
            c.to_base("uatom", &coin("1.000001", "atom")),
            coin("1000001", "uatom")
        );
        // Upper-cased display output still resolves.
        assert_eq!(
            c.to_base("uatom", &coin("2.5", "ATOM")),
            coin("2500000", "uatom")
        );
    }

    #[test]
    fn test_to_base_keeps_sub_unit_fraction() {
        let c = converter();
        assert_eq!(
            c.to_base("uatom", &coin("0.0000015", "atom")),
            coin("1.5", "uatom")
        );
    }

    #[test]
    fn test_unknown_denom_and_unit_are_noops() {
        let c = converter();
        let stranger = coin("42", "ibc/27394FB092D2ECCD");
        assert_eq!(c.to_display(&stranger, 6), stranger);
        assert_eq!(c.to_unit(&stranger, "atom", 6), stranger);
        assert_eq!(c.to_base("ibc/27394FB092D2ECCD", &stranger), stranger);

        let atom = coin("42", "uatom");
        assert_eq!(c.to_unit(&atom, "katom", 6), atom);
        assert_eq!(c.to_base("uatom", &coin("1", "katom")), coin("1", "katom"));
    }

    #[test]
    fn test_garbage_amount_is_noop() {
        let c = converter();
        let bad = coin("12abc", "uatom");
        assert_eq!(c.to_display(&bad, 6), bad);
    }

    #[test]
    fn test_exponent_beyond_float_range() {
        let meta = DenominationMetadata {
            description: String::new(),
            denom_units: vec![
                crate::units::metadata::DenomUnit {
                    name: "aevmos".to_string(),
                    exponent: 0,
                    aliases: vec![],
                },
                crate::units::metadata::DenomUnit {
                    name: "evmos".to_string(),
                    exponent: 18,
                    aliases: vec![],
                },
            ],
            base: "aevmos".to_string(),
            display: "evmos".to_string(),
            name: String::new(),
            symbol: String::new(),
        };
        let c = TokenUnitConverter::with_metadata([("aevmos".to_string(), meta)]);
        let base = coin("123456789123456789123456789", "aevmos");
        let display = c.to_display(&base, 18);
        assert_eq!(display.amount, "123456789.123456789123456789");
        assert_eq!(c.to_base("aevmos", &display), base);
    }

    #[test]
    fn test_metadata_is_immutable_once_cached() {
        let c = converter();
        let mut other = atom_metadata();
        other.display = "matom".to_string();
        assert_eq!(c.add_metadata("uatom", other), Ok(false));
        assert_eq!(c.metadata("uatom").unwrap().display, "atom");
    }
}
