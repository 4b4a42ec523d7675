//! Deposit and withdrawal sizing
//!
//! Deposit sizing keeps the pool ratio intact, share minting follows the
//! geometric-mean / proportional-minimum rule, and burns pay out strictly
//! proportional claims. All functions are pure; the engine commits the
//! resulting deltas through the pool ledger.

use crate::fixed_point::{geometric_mean, mul_div};
use types::AmmError;

/// Share mint/burn and deposit sizing rules.
pub struct LiquidityMath;

impl LiquidityMath {
    /// Proportional quote: the amount of the other asset matching
    /// `amount_a` at the current reserve ratio.
    ///
    /// Precondition: `reserve_a > 0`.
    pub fn quote(amount_a: u128, reserve_a: u128, reserve_b: u128) -> Result<u128, AmmError> {
        mul_div(amount_a, reserve_b, reserve_a)
    }

    /// Resolve the actual deposit amounts from desired amounts and
    /// slippage minimums.
    ///
    /// On the first deposit (both reserves zero) the desired amounts are
    /// taken verbatim — the first depositor sets the price. Otherwise the
    /// engine first tries to match asset 1 to the full desired amount of
    /// asset 0, and only when that overshoots falls back to matching
    /// asset 0 to the desired amount of asset 1. The branch order decides
    /// which minimum is checked, and is part of the engine's contract.
    pub fn optimal_deposit(
        desired_0: u128,
        desired_1: u128,
        min_0: u128,
        min_1: u128,
        reserve_0: u128,
        reserve_1: u128,
    ) -> Result<(u128, u128), AmmError> {
        if reserve_0 == 0 && reserve_1 == 0 {
            return Ok((desired_0, desired_1));
        }

        let optimal_1 = Self::quote(desired_0, reserve_0, reserve_1)?;
        if optimal_1 <= desired_1 {
            if optimal_1 < min_1 {
                return Err(AmmError::InsufficientAmountB {
                    got: optimal_1,
                    min: min_1,
                });
            }
            Ok((desired_0, optimal_1))
        } else {
            let optimal_0 = Self::quote(desired_1, reserve_1, reserve_0)?;
            // Holds by construction: optimal_1 > desired_1 implies the
            // reverse quote lands at or below desired_0. A violation is a
            // math defect, not a user error.
            assert!(
                optimal_0 <= desired_0,
                "deposit sizing inconsistency: {} > {}",
                optimal_0,
                desired_0
            );
            if optimal_0 < min_0 {
                return Err(AmmError::InsufficientAmountA {
                    got: optimal_0,
                    min: min_0,
                });
            }
            Ok((optimal_0, desired_1))
        }
    }

    /// Shares minted for a deposit.
    ///
    /// First deposit mints the geometric mean of the amounts; later
    /// deposits mint the minimum of the two proportional claims, so an
    /// unbalanced deposit donates the excess to the pool.
    pub fn shares_to_mint(
        amount_0: u128,
        amount_1: u128,
        reserve_0: u128,
        reserve_1: u128,
        total_shares: u128,
    ) -> Result<u128, AmmError> {
        let minted = if total_shares == 0 {
            geometric_mean(amount_0, amount_1)
        } else {
            let by_0 = mul_div(amount_0, total_shares, reserve_0)?;
            let by_1 = mul_div(amount_1, total_shares, reserve_1)?;
            by_0.min(by_1)
        };

        if minted == 0 {
            return Err(AmmError::InsufficientLiquidityMinted);
        }
        Ok(minted)
    }

    /// Amounts paid out for burning `shares`.
    pub fn amounts_for_burn(
        shares: u128,
        reserve_0: u128,
        reserve_1: u128,
        total_shares: u128,
    ) -> Result<(u128, u128), AmmError> {
        if total_shares == 0 {
            return Err(AmmError::NoLiquidity);
        }
        let amount_0 = mul_div(shares, reserve_0, total_shares)?;
        let amount_1 = mul_div(shares, reserve_1, total_shares)?;
        Ok((amount_0, amount_1))
    }
}
