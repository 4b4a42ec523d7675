//! Constant-product swap math with exact integer calculations
//!
//! Quote functions are pure and exposed independently of any pool state,
//! so callers can price a trade before committing it.

use crate::fixed_point::{mul_div, PRICE_SCALE};
use ethereum_types::U256;
use serde::{Deserialize, Serialize};
use types::AmmError;

/// Swap fee as an exact rational `numerator / denominator`.
///
/// The default is the canonical 0.3% (3/1000). Scaling both terms by the
/// same factor leaves every floored quotient unchanged, so `from_bps(30)`
/// quotes identically to the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub numerator: u128,
    pub denominator: u128,
}

impl Fee {
    /// Fee-free schedule (the single-pair engine variant).
    pub const ZERO: Fee = Fee {
        numerator: 0,
        denominator: 1000,
    };

    /// Fee in basis points (30 = 0.3%).
    pub fn from_bps(bps: u32) -> Self {
        Fee {
            numerator: bps as u128,
            denominator: 10_000,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.denominator > 0 && self.numerator < self.denominator
    }
}

impl Default for Fee {
    fn default() -> Self {
        Fee {
            numerator: 3,
            denominator: 1000,
        }
    }
}

/// Constant-product (x*y=k) quote functions.
pub struct SwapMath;

impl SwapMath {
    /// Output amount for an exact input against the given reserves.
    ///
    /// `in_with_fee = amount_in * (denom - num)`
    /// `out = in_with_fee * reserve_out / (reserve_in * denom + in_with_fee)`
    ///
    /// Floor semantics throughout; the fee keeps the post-trade reserve
    /// product at or above the pre-trade product.
    pub fn amount_out(
        amount_in: u128,
        reserve_in: u128,
        reserve_out: u128,
        fee: Fee,
    ) -> Result<u128, AmmError> {
        if amount_in == 0 {
            return Err(AmmError::InsufficientInputAmount);
        }
        if reserve_in == 0 || reserve_out == 0 {
            return Err(AmmError::InsufficientLiquidity);
        }
        debug_assert!(fee.is_valid());

        let in_with_fee = U256::from(amount_in) * U256::from(fee.denominator - fee.numerator);
        let numerator = in_with_fee * U256::from(reserve_out);
        let denominator = U256::from(reserve_in) * U256::from(fee.denominator) + in_with_fee;

        let out = numerator / denominator;
        // Output is bounded by reserve_out, so it always fits the amount width
        Ok(out.low_u128())
    }

    /// Required input for an exact output (reverse quote, rounded up).
    pub fn amount_in(
        amount_out: u128,
        reserve_in: u128,
        reserve_out: u128,
        fee: Fee,
    ) -> Result<u128, AmmError> {
        if amount_out == 0 {
            return Err(AmmError::InsufficientOutputAmount {
                got: 0,
                min: 1,
            });
        }
        if reserve_in == 0 || amount_out >= reserve_out {
            return Err(AmmError::InsufficientLiquidity);
        }
        debug_assert!(fee.is_valid());

        let numerator =
            U256::from(reserve_in) * U256::from(amount_out) * U256::from(fee.denominator);
        let denominator = U256::from(reserve_out - amount_out)
            * U256::from(fee.denominator - fee.numerator);

        // +1 rounds up so the computed input is always sufficient
        let required = numerator / denominator + U256::one();
        if required.bits() > 128 {
            return Err(AmmError::Overflow);
        }
        Ok(required.low_u128())
    }

    /// Spot price of the base asset denominated in the quote asset,
    /// scaled by `PRICE_SCALE`.
    pub fn spot_price(reserve_quote: u128, reserve_base: u128) -> Result<u128, AmmError> {
        if reserve_base == 0 || reserve_quote == 0 {
            return Err(AmmError::NoLiquidity);
        }
        mul_div(reserve_quote, PRICE_SCALE, reserve_base)
    }

    /// Fee-free price impact of a trade, in basis points.
    ///
    /// Compares the marginal price before and after moving along the
    /// curve; useful for slippage display, not for execution decisions.
    pub fn price_impact_bps(
        amount_in: u128,
        reserve_in: u128,
        reserve_out: u128,
    ) -> Result<u128, AmmError> {
        let out = Self::amount_out(amount_in, reserve_in, reserve_out, Fee::ZERO)?;

        let price_before = Self::spot_price(reserve_out, reserve_in)?;
        let price_after = Self::spot_price(reserve_out - out, reserve_in + amount_in)?;

        let drop = price_before.saturating_sub(price_after);
        mul_div(drop, 10_000, price_before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_schedules_are_validated() {
        assert!(Fee::default().is_valid());
        assert!(Fee::ZERO.is_valid());
        assert!(Fee::from_bps(30).is_valid());
        assert!(!Fee { numerator: 1000, denominator: 1000 }.is_valid());
        assert!(!Fee { numerator: 0, denominator: 0 }.is_valid());
    }

    #[test]
    fn amount_out_matches_worked_vector() {
        // in=100 against (10000, 5) at 0.3%: in_with_fee = 99700,
        // out = floor(99700 * 5 / (10000 * 1000 + 99700)) = 0
        let out = SwapMath::amount_out(100, 10_000, 5, Fee::default()).unwrap();
        assert_eq!(out, 99_700 * 5 / (10_000 * 1000 + 99_700));
        assert_eq!(out, 0);
    }

    #[test]
    fn fee_output_is_below_fee_free_output() {
        let with_fee = SwapMath::amount_out(1_000, 10_000, 5_000, Fee::default()).unwrap();
        let no_fee = SwapMath::amount_out(1_000, 10_000, 5_000, Fee::ZERO).unwrap();
        assert!(with_fee < no_fee);
        assert_eq!(no_fee, 454);
        assert_eq!(with_fee, 453);
    }

    #[test]
    fn bps_schedule_quotes_identically_to_rational() {
        for amount in [1u128, 97, 1_000, 123_456_789] {
            let a = SwapMath::amount_out(amount, 1_000_000, 2_500_000, Fee::default()).unwrap();
            let b = SwapMath::amount_out(amount, 1_000_000, 2_500_000, Fee::from_bps(30)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn amount_out_rejects_zero_input_and_empty_reserves() {
        assert_eq!(
            SwapMath::amount_out(0, 1000, 1000, Fee::default()),
            Err(AmmError::InsufficientInputAmount)
        );
        assert_eq!(
            SwapMath::amount_out(10, 0, 1000, Fee::default()),
            Err(AmmError::InsufficientLiquidity)
        );
        assert_eq!(
            SwapMath::amount_out(10, 1000, 0, Fee::default()),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn amount_in_is_sufficient_for_requested_output() {
        let reserve_in = 10_000;
        let reserve_out = 5_000;
        for want in [1u128, 10, 499, 2_000] {
            let need = SwapMath::amount_in(want, reserve_in, reserve_out, Fee::default()).unwrap();
            let got = SwapMath::amount_out(need, reserve_in, reserve_out, Fee::default()).unwrap();
            assert!(got >= want, "need {} produced {} < {}", need, got, want);
        }
    }

    #[test]
    fn amount_in_rejects_output_draining_reserves() {
        assert_eq!(
            SwapMath::amount_in(5_000, 10_000, 5_000, Fee::default()),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn spot_price_matches_worked_vector() {
        // reserves (1000, 20): price of A in B = 20 * 1e18 / 1000
        let price = SwapMath::spot_price(20, 1_000).unwrap();
        assert_eq!(price, 20 * PRICE_SCALE / 1_000);
        assert_eq!(price, PRICE_SCALE / 50);
    }

    #[test]
    fn spot_price_requires_liquidity() {
        assert_eq!(SwapMath::spot_price(0, 1000), Err(AmmError::NoLiquidity));
        assert_eq!(SwapMath::spot_price(1000, 0), Err(AmmError::NoLiquidity));
    }

    #[test]
    fn price_impact_grows_with_trade_size() {
        let small = SwapMath::price_impact_bps(100, 1_000_000, 2_000_000).unwrap();
        let large = SwapMath::price_impact_bps(100_000, 1_000_000, 2_000_000).unwrap();
        assert!(small < large);
        assert!(large < 10_000);
    }

    #[test]
    fn swap_preserves_reserve_product() {
        let (r_in, r_out) = (10_000u128, 5_000u128);
        let k_before = U256::from(r_in) * U256::from(r_out);
        for amount in [1u128, 100, 5_000, 50_000] {
            let out = SwapMath::amount_out(amount, r_in, r_out, Fee::default()).unwrap();
            let k_after = U256::from(r_in + amount) * U256::from(r_out - out);
            assert!(k_after >= k_before, "k decreased for input {}", amount);
        }
    }
}
