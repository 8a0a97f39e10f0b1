//! Chain-id conventions, HD paths and address encoding.

use bech32::{FromBase32, ToBase32, Variant};
use std::fmt;
use std::str::FromStr;

use crate::error::SigningError;

/// Persistence key and derivation path used when none is given.
pub const DEFAULT_HDPATH: &str = "m/44'/118/0'/0/0";

pub const COSMOS_KEY_TYPE: &str = "/cosmos.crypto.secp256k1.PubKey";
pub const ETHERMINT_KEY_TYPE: &str = "/ethermint.crypto.v1.ethsecp256k1.PubKey";
pub const INJECTIVE_KEY_TYPE: &str = "/injective.crypto.v1beta1.ethsecp256k1.PubKey";

/// SLIP-44 coin types whose keys live on the secp256k1 curve.
pub const SECP256K1_COIN_TYPES: &[u32] = &[
    118, // cosmos hub and most sdk chains
    60,  // ethereum / ethermint / injective
    330, // terra
    459, // kava
    529, // secret
    564, // agoric
    750, // vidulum
    852, // desmos
    880, // lum
    931, // thorchain
];

/// Public-key type URL a chain expects in `SignerInfo`.
///
/// Broadcast rejects a mismatched key type, so this dispatch is exact:
/// `<name>_<number>-<number>` anywhere in the id selects ethermint, an
/// `injective` prefix selects injective, everything else is plain cosmos.
pub fn key_type_for_chain(chain_id: &str) -> &'static str {
    if has_ethermint_chain_id(chain_id) {
        ETHERMINT_KEY_TYPE
    } else if chain_id.starts_with("injective") {
        INJECTIVE_KEY_TYPE
    } else {
        COSMOS_KEY_TYPE
    }
}

/// Unanchored match of `\w+_\d+-\d+`.
fn has_ethermint_chain_id(chain_id: &str) -> bool {
    let bytes = chain_id.as_bytes();
    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';

    bytes.iter().enumerate().any(|(i, &b)| {
        if b != b'_' || i == 0 || !is_word(bytes[i - 1]) {
            return false;
        }
        let rest = &bytes[i + 1..];
        let epoch_len = rest.iter().take_while(|c| c.is_ascii_digit()).count();
        if epoch_len == 0 || rest.get(epoch_len) != Some(&b'-') {
            return false;
        }
        rest.get(epoch_len + 1).is_some_and(u8::is_ascii_digit)
    })
}

/// EVM chain number embedded in an ethermint-style chain id.
///
/// `evmos_9001-2` yields 9001. Ids without an `_` before the first `-`, with
/// a leading `_`, or with a non-numeric segment yield 0.
pub fn extract_numeric_chain_suffix(chain_id: &str) -> u64 {
    let (Some(start), Some(end)) = (chain_id.find('_'), chain_id.find('-')) else {
        return 0;
    };
    if start == 0 || end <= start {
        return 0;
    }
    chain_id[start + 1..end].parse().unwrap_or(0)
}

/// A BIP-44 style derivation path such as `m/44'/118'/0'/0/0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HdPath {
    raw: String,
    components: Vec<(u32, bool)>,
}

impl HdPath {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Second path component, if present.
    pub fn coin_type(&self) -> Option<u32> {
        self.components.get(1).map(|(index, _)| *index)
    }

    /// Ethereum-style derivation: `m/44/60...` or `m/44'/60...`.
    pub fn is_ethereum(&self) -> bool {
        is_ethereum_path(&self.raw)
    }

    /// Whether the path is the session default.
    pub fn is_default(&self) -> bool {
        self.raw == DEFAULT_HDPATH
    }
}

/// Prefix check used for EVM backend selection.
pub fn is_ethereum_path(path: &str) -> bool {
    path.starts_with("m/44/60") || path.starts_with("m/44'/60")
}

impl FromStr for HdPath {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SigningError::InvalidHdPath(s.to_string());
        let mut parts = s.split('/');
        if parts.next() != Some("m") {
            return Err(invalid());
        }
        let components = parts
            .map(|part| {
                let (digits, hardened) = match part.strip_suffix('\'') {
                    Some(digits) => (digits, true),
                    None => (part, false),
                };
                digits.parse::<u32>().map(|index| (index, hardened))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;
        if components.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            raw: s.to_string(),
            components,
        })
    }
}

impl fmt::Display for HdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Whether `coin_type` (a decimal string, optionally hardened) is secp256k1.
///
/// `None` asks about the wallet's default coin type, which is always 118.
pub fn is_secp256k1_coin_type(coin_type: Option<&str>) -> bool {
    let Some(coin_type) = coin_type else {
        return true;
    };
    coin_type
        .trim_end_matches('\'')
        .parse::<u32>()
        .map(|c| SECP256K1_COIN_TYPES.contains(&c))
        .unwrap_or(false)
}

/// Bech32-encode raw address bytes under `prefix`.
pub fn to_bech32(prefix: &str, bytes: &[u8]) -> Result<String, SigningError> {
    bech32::encode(prefix, bytes.to_base32(), Variant::Bech32)
        .map_err(|e| SigningError::Backend(format!("bech32 encode: {e}")))
}

/// Decode a bech32 address into `(prefix, bytes)`.
pub fn from_bech32(address: &str) -> Result<(String, Vec<u8>), SigningError> {
    let (hrp, data, _) = bech32::decode(address)
        .map_err(|e| SigningError::Backend(format!("bech32 decode: {e}")))?;
    let bytes = Vec::<u8>::from_base32(&data)
        .map_err(|e| SigningError::Backend(format!("bech32 decode: {e}")))?;
    Ok((hrp, bytes))
}
