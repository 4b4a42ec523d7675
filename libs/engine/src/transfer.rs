//! Asset-transfer collaborator
//!
//! The engine never holds asset balances itself; it instructs an external
//! ledger to move them and treats any refusal as fatal to the enclosing
//! operation. `transfer` moves assets out of the engine's custody
//! account, `transfer_from` pulls them in from a user account.

use dashmap::DashMap;
use tracing::warn;
use types::{AccountId, AmmError, AssetId};

/// The account under which the engine custodies pool reserves.
pub const CUSTODY_ACCOUNT: AccountId = AccountId([0xFE; 20]);

/// Debit/credit interface onto the external asset ledgers.
///
/// Implementations are untrusted collaborators: they may fail, succeed,
/// or attempt to call back into the engine. The engine commits all
/// internal state before the last outbound call, so a callback observes
/// either a fully committed pool or a `Reentrant` rejection.
pub trait AssetTransfer: Send + Sync {
    fn transfer_from(
        &self,
        asset: AssetId,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), AmmError>;

    fn transfer(&self, asset: AssetId, to: AccountId, amount: u128) -> Result<(), AmmError>;
}

/// DashMap-backed ledger for tests and local runs.
///
/// Balances are keyed by (asset, account). `set_failing` forces every
/// transfer of one asset to fail, for rollback testing.
#[derive(Default)]
pub struct InMemoryLedger {
    balances: DashMap<(AssetId, AccountId), u128>,
    failing: DashMap<AssetId, ()>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&self, asset: AssetId, account: AccountId, amount: u128) {
        *self.balances.entry((asset, account)).or_insert(0) += amount;
    }

    pub fn balance_of(&self, asset: AssetId, account: AccountId) -> u128 {
        self.balances
            .get(&(asset, account))
            .map(|b| *b)
            .unwrap_or(0)
    }

    pub fn set_failing(&self, asset: AssetId, failing: bool) {
        if failing {
            self.failing.insert(asset, ());
        } else {
            self.failing.remove(&asset);
        }
    }

    fn move_balance(
        &self,
        asset: AssetId,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), AmmError> {
        if self.failing.contains_key(&asset) {
            return Err(AmmError::TransferFailed {
                asset,
                reason: "ledger rejected transfer".into(),
            });
        }

        {
            let mut src = self.balances.entry((asset, from)).or_insert(0);
            if *src < amount {
                warn!(%asset, %from, have = *src, need = amount, "transfer short of balance");
                return Err(AmmError::TransferFailed {
                    asset,
                    reason: format!("balance {} short of {}", *src, amount),
                });
            }
            *src -= amount;
        }
        *self.balances.entry((asset, to)).or_insert(0) += amount;
        Ok(())
    }
}

impl AssetTransfer for InMemoryLedger {
    fn transfer_from(
        &self,
        asset: AssetId,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), AmmError> {
        self.move_balance(asset, from, to, amount)
    }

    fn transfer(&self, asset: AssetId, to: AccountId, amount: u128) -> Result<(), AmmError> {
        self.move_balance(asset, CUSTODY_ACCOUNT, to, amount)
    }
}
