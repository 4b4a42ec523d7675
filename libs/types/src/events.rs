//! Observable pool events
//!
//! Emitted exactly once per successfully committed mutation, never on a
//! rolled-back one. Carries everything an external auditor needs to replay
//! pool accounting: the acting account, the assets and the realized
//! amounts.

use crate::identifiers::{AccountId, AssetId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEvent {
    LiquidityAdded {
        account: AccountId,
        recipient: AccountId,
        asset_a: AssetId,
        asset_b: AssetId,
        amount_a: u128,
        amount_b: u128,
        shares_minted: u128,
    },
    LiquidityRemoved {
        account: AccountId,
        recipient: AccountId,
        asset_a: AssetId,
        asset_b: AssetId,
        amount_a: u128,
        amount_b: u128,
        shares_burned: u128,
    },
    Swapped {
        account: AccountId,
        recipient: AccountId,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_in: u128,
        amount_out: u128,
    },
}

impl PoolEvent {
    pub fn account(&self) -> AccountId {
        match self {
            PoolEvent::LiquidityAdded { account, .. }
            | PoolEvent::LiquidityRemoved { account, .. }
            | PoolEvent::Swapped { account, .. } => *account,
        }
    }
}
