//! Asset, account and pair identifiers
//!
//! Assets and accounts are opaque 20-byte identifiers. A `PairKey` is the
//! canonical (order-independent) key for a two-asset pool: construction
//! sorts the assets by byte value so a pair and its reverse map to the
//! same pool.

use crate::error::AmmError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Opaque identifier for a fungible asset.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(pub [u8; 20]);

impl AssetId {
    pub const ZERO: AssetId = AssetId([0u8; 20]);

    /// Deterministic test/demo identifier: the byte repeated across all 20 bytes.
    pub fn from_low_byte(b: u8) -> Self {
        AssetId([b; 20])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form for logs: first 4 bytes are enough to tell assets apart
        write!(f, "Asset(0x{}…)", hex::encode(&self.0[..4]))
    }
}

/// Opaque identifier for an account holding pool shares or asset balances.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 20]);

impl AccountId {
    pub const ZERO: AccountId = AccountId([0u8; 20]);

    pub fn from_low_byte(b: u8) -> Self {
        AccountId([b; 20])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account(0x{}…)", hex::encode(&self.0[..4]))
    }
}

/// Canonical key for a two-asset pool.
///
/// `token0 < token1` always holds; `new` rejects identical and zero assets
/// before any pool state is touched.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    token0: AssetId,
    token1: AssetId,
}

impl PairKey {
    pub fn new(a: AssetId, b: AssetId) -> Result<Self, AmmError> {
        if a.is_zero() || b.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        match a.cmp(&b) {
            Ordering::Less => Ok(Self { token0: a, token1: b }),
            Ordering::Greater => Ok(Self { token0: b, token1: a }),
            Ordering::Equal => Err(AmmError::IdenticalAddresses),
        }
    }

    pub fn token0(&self) -> AssetId {
        self.token0
    }

    pub fn token1(&self) -> AssetId {
        self.token1
    }

    /// True when `asset` is the canonical first token of this pair.
    pub fn is_token0(&self, asset: AssetId) -> bool {
        self.token0 == asset
    }

    pub fn contains(&self, asset: AssetId) -> bool {
        self.token0 == asset || self.token1 == asset
    }
}

impl fmt::Debug for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pair(0x{}…, 0x{}…)",
            hex::encode(&self.token0.0[..4]),
            hex::encode(&self.token1.0[..4])
        )
    }
}
