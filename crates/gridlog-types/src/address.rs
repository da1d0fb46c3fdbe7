use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Scheme prefix carried by every non-empty chain address.
const SCHEME_PREFIX: &str = "Qm";

/// Sentinel address of the empty chain.
const EMPTY_SENTINEL: &str = "0x0";

/// Content-derived address of a payload file.
///
/// A `ChainAddress` is either the literal sentinel `0x0` (the chain has no
/// entries yet) or `Qm<base58(digest)>`, where the digest is computed over
/// the file's bytes. Identical file contents always produce the same
/// address, which is what makes recorded `previous_hash` values verifiable
/// after the fact.
///
/// The digest itself is computed in `gridlog-crypto`; this type owns the
/// textual format.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainAddress(String);

impl ChainAddress {
    /// The address of the empty chain, the literal sentinel `0x0`.
    pub fn empty() -> Self {
        Self(EMPTY_SENTINEL.to_string())
    }

    /// Build an address from a raw content digest.
    pub fn from_digest(digest: &[u8]) -> Self {
        let encoded = bs58::encode(digest).into_string();
        Self(format!("{SCHEME_PREFIX}{encoded}"))
    }

    /// Parse and validate an address string.
    ///
    /// Accepts the empty-chain sentinel or a `Qm`-prefixed base-58 digest.
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        if value == EMPTY_SENTINEL {
            return Ok(Self::empty());
        }
        let Some(digest) = value.strip_prefix(SCHEME_PREFIX) else {
            return Err(TypeError::InvalidAddress {
                value: value.to_string(),
                reason: format!("missing {SCHEME_PREFIX:?} scheme prefix"),
            });
        };
        if digest.is_empty() {
            return Err(TypeError::InvalidAddress {
                value: value.to_string(),
                reason: "empty digest".to_string(),
            });
        }
        if let Err(e) = bs58::decode(digest).into_vec() {
            return Err(TypeError::InvalidAddress {
                value: value.to_string(),
                reason: format!("digest is not base-58: {e}"),
            });
        }
        Ok(Self(value.to_string()))
    }

    /// Returns `true` if this is the empty-chain sentinel.
    pub fn is_empty_chain(&self) -> bool {
        self.0 == EMPTY_SENTINEL
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainAddress({})", self.0)
    }
}

impl fmt::Display for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ChainAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
