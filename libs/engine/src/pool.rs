//! Pool ledger state
//!
//! A `Pool` owns the canonical reserves and share supply for one asset
//! pair. `apply_delta` is the only mutation entry point: every other
//! component computes deltas but never touches storage directly, which
//! keeps the invariants in one place.

use std::collections::HashMap;
use types::{AccountId, AmmError, PairKey};

/// Signed adjustment to an unsigned ledger value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delta {
    Add(u128),
    Sub(u128),
}

impl Delta {
    pub const NONE: Delta = Delta::Add(0);

    /// Checked application; a would-be-negative result is the internal
    /// `Underflow` fault, a wrap past the amount width is `Overflow`.
    pub fn apply(self, value: u128) -> Result<u128, AmmError> {
        match self {
            Delta::Add(n) => value.checked_add(n).ok_or(AmmError::Overflow),
            Delta::Sub(n) => value.checked_sub(n).ok_or(AmmError::Underflow),
        }
    }

    /// The delta that undoes this one (compensating action).
    pub fn inverse(self) -> Delta {
        match self {
            Delta::Add(n) => Delta::Sub(n),
            Delta::Sub(n) => Delta::Add(n),
        }
    }
}

/// Consistent read-only view of one pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub reserve0: u128,
    pub reserve1: u128,
    pub total_shares: u128,
}

/// Reserve and share-supply state for one canonical pair.
#[derive(Debug)]
pub struct Pool {
    pair: PairKey,
    reserve0: u128,
    reserve1: u128,
    total_shares: u128,
    share_balances: HashMap<AccountId, u128>,
}

impl Pool {
    pub fn new(pair: PairKey) -> Self {
        Self {
            pair,
            reserve0: 0,
            reserve1: 0,
            total_shares: 0,
            share_balances: HashMap::new(),
        }
    }

    pub fn pair(&self) -> PairKey {
        self.pair
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            reserve0: self.reserve0,
            reserve1: self.reserve1,
            total_shares: self.total_shares,
        }
    }

    pub fn share_balance(&self, account: AccountId) -> u128 {
        self.share_balances.get(&account).copied().unwrap_or(0)
    }

    /// Atomically apply signed deltas to both reserves, the share supply
    /// and `account`'s share balance.
    ///
    /// All new values are computed before any is written, so a failing
    /// delta leaves the pool untouched. Zero-share balance entries are
    /// dropped rather than kept at zero.
    pub fn apply_delta(
        &mut self,
        d_reserve0: Delta,
        d_reserve1: Delta,
        d_shares: Delta,
        account: AccountId,
    ) -> Result<(), AmmError> {
        let reserve0 = d_reserve0.apply(self.reserve0)?;
        let reserve1 = d_reserve1.apply(self.reserve1)?;
        let total_shares = d_shares.apply(self.total_shares)?;
        let balance = d_shares.apply(self.share_balance(account))?;

        self.reserve0 = reserve0;
        self.reserve1 = reserve1;
        self.total_shares = total_shares;
        if balance == 0 {
            self.share_balances.remove(&account);
        } else {
            self.share_balances.insert(account, balance);
        }

        debug_assert_eq!(
            self.share_balances.values().sum::<u128>(),
            self.total_shares,
            "share-balance sum diverged from total supply"
        );
        Ok(())
    }
}
