//! Operation surface
//!
//! One public entry point per AMM operation. Every mutating operation
//! follows the same shape: guard checks before any state read, quote the
//! amounts from a consistent snapshot, pull inbound transfers, commit the
//! ledger delta, and only then issue outbound transfers — the pool lock
//! stays held across the outbound call, so a collaborator calling back in
//! is rejected as `Reentrant` instead of observing partial state.
//!
//! A failure at any point rolls the operation back completely: before the
//! commit nothing has changed, after it a compensating delta (plus refund
//! of any inbound leg) restores the pool before the error surfaces.

use crate::config::EngineConfig;
use crate::guard;
use crate::pool::{Delta, Pool, PoolSnapshot};
use crate::registry::{PoolRegistry, RegistryStats};
use crate::time::Clock;
use crate::transfer::{AssetTransfer, CUSTODY_ACCOUNT};
use crossbeam_channel::{bounded, Receiver, Sender};
use sluice_amm::{Fee, LiquidityMath, SwapMath};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use types::{AccountId, AmmError, AssetId, PairKey, PoolEvent};

pub struct AmmEngine {
    registry: PoolRegistry,
    fee: Fee,
    event_buffer: usize,
    transfers: Arc<dyn AssetTransfer>,
    clock: Arc<dyn Clock>,
    events: Option<Sender<PoolEvent>>,
}

impl AmmEngine {
    pub fn new(
        config: EngineConfig,
        transfers: Arc<dyn AssetTransfer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        info!(fee = ?config.fee, "AMM engine initialized");
        Self {
            registry: PoolRegistry::new(),
            fee: config.fee,
            event_buffer: config.event_buffer,
            transfers,
            clock,
            events: None,
        }
    }

    /// Open the pool-event stream. Events are emitted exactly once per
    /// successfully committed operation.
    pub fn subscribe(&mut self) -> Receiver<PoolEvent> {
        let (tx, rx) = bounded(self.event_buffer);
        self.events = Some(tx);
        rx
    }

    pub fn fee(&self) -> Fee {
        self.fee
    }

    pub fn stats(&self) -> RegistryStats {
        self.registry.stats()
    }

    /// Deposit up to the desired amounts of both assets, minting
    /// proportional pool shares to `recipient`.
    ///
    /// Returns the realized deposit amounts and the shares minted.
    #[allow(clippy::too_many_arguments)]
    pub fn add_liquidity(
        &self,
        caller: AccountId,
        asset_a: AssetId,
        asset_b: AssetId,
        amount_a_desired: u128,
        amount_b_desired: u128,
        amount_a_min: u128,
        amount_b_min: u128,
        recipient: AccountId,
        deadline: u64,
    ) -> Result<(u128, u128, u128), AmmError> {
        guard::check_deadline(&*self.clock, deadline)?;
        guard::check_account(caller)?;
        guard::check_account(recipient)?;
        let pair = PairKey::new(asset_a, asset_b)?;

        let pool_arc = self.registry.get_or_create(pair);
        let mut pool = guard::enter_pool(&pool_arc)?;

        let snapshot = pool.snapshot();
        let a_is_token0 = pair.is_token0(asset_a);
        let (reserve_a, reserve_b) = orient(snapshot, a_is_token0);

        let (amount_a, amount_b) = LiquidityMath::optimal_deposit(
            amount_a_desired,
            amount_b_desired,
            amount_a_min,
            amount_b_min,
            reserve_a,
            reserve_b,
        )?;
        let shares =
            LiquidityMath::shares_to_mint(amount_a, amount_b, reserve_a, reserve_b, snapshot.total_shares)?;

        // Inbound transfers after all checks; nothing is committed yet,
        // so a failed second leg only needs the first refunded.
        self.transfers
            .transfer_from(asset_a, caller, CUSTODY_ACCOUNT, amount_a)?;
        if let Err(err) = self
            .transfers
            .transfer_from(asset_b, caller, CUSTODY_ACCOUNT, amount_b)
        {
            self.refund(asset_a, caller, amount_a);
            return Err(err);
        }

        let (d0, d1) = if a_is_token0 {
            (Delta::Add(amount_a), Delta::Add(amount_b))
        } else {
            (Delta::Add(amount_b), Delta::Add(amount_a))
        };
        if let Err(err) = pool.apply_delta(d0, d1, Delta::Add(shares), recipient) {
            self.refund(asset_a, caller, amount_a);
            self.refund(asset_b, caller, amount_b);
            return Err(err);
        }

        self.registry.record_operation();
        debug!(?pair, amount_a, amount_b, shares, "liquidity added");
        self.emit(PoolEvent::LiquidityAdded {
            account: caller,
            recipient,
            asset_a,
            asset_b,
            amount_a,
            amount_b,
            shares_minted: shares,
        });
        Ok((amount_a, amount_b, shares))
    }

    /// Redeem `shares` for the proportional slice of both reserves.
    #[allow(clippy::too_many_arguments)]
    pub fn remove_liquidity(
        &self,
        caller: AccountId,
        asset_a: AssetId,
        asset_b: AssetId,
        shares: u128,
        amount_a_min: u128,
        amount_b_min: u128,
        recipient: AccountId,
        deadline: u64,
    ) -> Result<(u128, u128), AmmError> {
        guard::check_deadline(&*self.clock, deadline)?;
        guard::check_account(caller)?;
        guard::check_account(recipient)?;
        let pair = PairKey::new(asset_a, asset_b)?;

        let pool_arc = self.registry.get(pair).ok_or(AmmError::NoLiquidity)?;
        let mut pool = guard::enter_pool(&pool_arc)?;

        if shares == 0 {
            return Err(AmmError::NoLiquidity);
        }
        let held = pool.share_balance(caller);
        if shares > held {
            return Err(AmmError::InsufficientLiquidityBalance {
                requested: shares,
                held,
            });
        }

        let snapshot = pool.snapshot();
        let (amount0, amount1) = LiquidityMath::amounts_for_burn(
            shares,
            snapshot.reserve0,
            snapshot.reserve1,
            snapshot.total_shares,
        )?;
        let a_is_token0 = pair.is_token0(asset_a);
        let (amount_a, amount_b) = if a_is_token0 {
            (amount0, amount1)
        } else {
            (amount1, amount0)
        };
        if amount_a < amount_a_min {
            return Err(AmmError::InsufficientAmountA {
                got: amount_a,
                min: amount_a_min,
            });
        }
        if amount_b < amount_b_min {
            return Err(AmmError::InsufficientAmountB {
                got: amount_b,
                min: amount_b_min,
            });
        }

        // Commit before paying out: the outbound calls are the last
        // steps, made against an already-consistent pool.
        let (d0, d1) = (Delta::Sub(amount0), Delta::Sub(amount1));
        pool.apply_delta(d0, d1, Delta::Sub(shares), caller)?;

        if let Err(err) = self.transfers.transfer(asset_a, recipient, amount_a) {
            self.compensate(&mut pool, d0, d1, Delta::Sub(shares), caller);
            return Err(err);
        }
        if let Err(err) = self.transfers.transfer(asset_b, recipient, amount_b) {
            self.claw_back(asset_a, recipient, amount_a);
            self.compensate(&mut pool, d0, d1, Delta::Sub(shares), caller);
            return Err(err);
        }

        self.registry.record_operation();
        debug!(?pair, amount_a, amount_b, shares, "liquidity removed");
        self.emit(PoolEvent::LiquidityRemoved {
            account: caller,
            recipient,
            asset_a,
            asset_b,
            amount_a,
            amount_b,
            shares_burned: shares,
        });
        Ok((amount_a, amount_b))
    }

    /// Swap an exact input along a 2-element path for as much output as
    /// the curve allows, subject to the caller's minimum.
    pub fn swap_exact_tokens_for_tokens(
        &self,
        caller: AccountId,
        amount_in: u128,
        amount_out_min: u128,
        path: &[AssetId],
        recipient: AccountId,
        deadline: u64,
    ) -> Result<(u128, u128), AmmError> {
        guard::check_deadline(&*self.clock, deadline)?;
        guard::check_account(caller)?;
        guard::check_account(recipient)?;
        let (asset_in, asset_out, pair) = guard::check_path(path)?;

        let pool_arc = self
            .registry
            .get(pair)
            .ok_or(AmmError::InsufficientLiquidity)?;
        let mut pool = guard::enter_pool(&pool_arc)?;

        let snapshot = pool.snapshot();
        let in_is_token0 = pair.is_token0(asset_in);
        let (reserve_in, reserve_out) = orient(snapshot, in_is_token0);

        let amount_out = SwapMath::amount_out(amount_in, reserve_in, reserve_out, self.fee)?;
        if amount_out < amount_out_min {
            return Err(AmmError::InsufficientOutputAmount {
                got: amount_out,
                min: amount_out_min,
            });
        }

        self.transfers
            .transfer_from(asset_in, caller, CUSTODY_ACCOUNT, amount_in)?;

        let (d0, d1) = if in_is_token0 {
            (Delta::Add(amount_in), Delta::Sub(amount_out))
        } else {
            (Delta::Sub(amount_out), Delta::Add(amount_in))
        };
        if let Err(err) = pool.apply_delta(d0, d1, Delta::NONE, caller) {
            self.refund(asset_in, caller, amount_in);
            return Err(err);
        }

        // Outbound last; the pool lock is still held, so a callback from
        // the collaborator re-entering the engine observes `Reentrant`.
        if let Err(err) = self.transfers.transfer(asset_out, recipient, amount_out) {
            self.compensate(&mut pool, d0, d1, Delta::NONE, caller);
            self.refund(asset_in, caller, amount_in);
            return Err(err);
        }

        self.registry.record_operation();
        debug!(?pair, amount_in, amount_out, "swap executed");
        self.emit(PoolEvent::Swapped {
            account: caller,
            recipient,
            asset_in,
            asset_out,
            amount_in,
            amount_out,
        });
        Ok((amount_in, amount_out))
    }

    /// Pure quote against explicit reserves using the engine's fee.
    pub fn get_amount_out(
        &self,
        amount_in: u128,
        reserve_in: u128,
        reserve_out: u128,
    ) -> Result<u128, AmmError> {
        SwapMath::amount_out(amount_in, reserve_in, reserve_out, self.fee)
    }

    /// Spot price of `asset_a` denominated in `asset_b`, scaled by 10^18.
    pub fn get_price(&self, asset_a: AssetId, asset_b: AssetId) -> Result<u128, AmmError> {
        let pair = PairKey::new(asset_a, asset_b)?;
        let pool_arc = self.registry.get(pair).ok_or(AmmError::NoLiquidity)?;
        let pool = guard::enter_pool(&pool_arc)?;

        let snapshot = pool.snapshot();
        if snapshot.total_shares == 0 {
            return Err(AmmError::NoLiquidity);
        }
        let (reserve_a, reserve_b) = orient(snapshot, pair.is_token0(asset_a));
        SwapMath::spot_price(reserve_b, reserve_a)
    }

    /// Reserves and share supply, oriented to the caller's argument
    /// order. An absent pool reads as an empty one.
    pub fn get_pool_info(
        &self,
        asset_a: AssetId,
        asset_b: AssetId,
    ) -> Result<(u128, u128, u128), AmmError> {
        let pair = PairKey::new(asset_a, asset_b)?;
        let Some(pool_arc) = self.registry.get(pair) else {
            return Ok((0, 0, 0));
        };
        let pool = guard::enter_pool(&pool_arc)?;
        let snapshot = pool.snapshot();
        let (reserve_a, reserve_b) = orient(snapshot, pair.is_token0(asset_a));
        Ok((reserve_a, reserve_b, snapshot.total_shares))
    }

    pub fn get_share_balance(
        &self,
        account: AccountId,
        asset_a: AssetId,
        asset_b: AssetId,
    ) -> Result<u128, AmmError> {
        let pair = PairKey::new(asset_a, asset_b)?;
        let Some(pool_arc) = self.registry.get(pair) else {
            return Ok(0);
        };
        let pool = guard::enter_pool(&pool_arc)?;
        Ok(pool.share_balance(account))
    }

    fn emit(&self, event: PoolEvent) {
        if let Some(tx) = &self.events {
            if let Err(err) = tx.try_send(event) {
                warn!(%err, "dropping pool event: channel full or disconnected");
            }
        }
    }

    /// Return an inbound leg to its sender after a rolled-back operation.
    /// Best effort: the operation already failed, so a refund failure is
    /// logged rather than surfaced.
    fn refund(&self, asset: AssetId, to: AccountId, amount: u128) {
        if amount == 0 {
            return;
        }
        if let Err(err) = self.transfers.transfer(asset, to, amount) {
            error!(%asset, %to, amount, %err, "refund failed after rolled-back operation");
        }
    }

    /// Pull back an already-paid outbound leg during rollback.
    fn claw_back(&self, asset: AssetId, from: AccountId, amount: u128) {
        if amount == 0 {
            return;
        }
        if let Err(err) = self
            .transfers
            .transfer_from(asset, from, CUSTODY_ACCOUNT, amount)
        {
            error!(%asset, %from, amount, %err, "claw-back failed after rolled-back operation");
        }
    }

    /// Undo a committed delta after a failed outbound transfer. The
    /// inverse of a just-applied delta cannot fault in a consistent
    /// ledger; if it does, the divergence is logged as fatal.
    fn compensate(&self, pool: &mut Pool, d0: Delta, d1: Delta, ds: Delta, account: AccountId) {
        if let Err(err) = pool.apply_delta(d0.inverse(), d1.inverse(), ds.inverse(), account) {
            error!(%err, "compensating delta failed: pool state diverged");
        }
    }
}

/// Map a canonical snapshot into the caller's (asset_a, asset_b) order.
fn orient(snapshot: PoolSnapshot, a_is_token0: bool) -> (u128, u128) {
    if a_is_token0 {
        (snapshot.reserve0, snapshot.reserve1)
    } else {
        (snapshot.reserve1, snapshot.reserve0)
    }
}
