//! Full-width integer arithmetic primitives
//!
//! `mul_div` is the single rounding point for the whole engine: floor
//! semantics, 256-bit intermediates, typed overflow fault. `isqrt` is the
//! exact integer square root used for first-deposit share sizing.

use ethereum_types::U256;
use types::AmmError;

/// Fixed scaling factor for spot prices: prices are returned as
/// `reserve_quote * PRICE_SCALE / reserve_base`.
pub const PRICE_SCALE: u128 = 1_000_000_000_000_000_000;

/// `floor(a * b / denom)` without intermediate overflow.
///
/// The 128x128 product always fits in 256 bits; only the final quotient
/// can exceed the amount width, which surfaces as the internal `Overflow`
/// fault. A zero denominator is a caller-precondition violation, not a
/// recoverable result, and panics.
pub fn mul_div(a: u128, b: u128, denom: u128) -> Result<u128, AmmError> {
    debug_assert!(denom != 0, "mul_div denominator must be non-zero");
    let quotient = U256::from(a) * U256::from(b) / U256::from(denom);
    if quotient.bits() > 128 {
        return Err(AmmError::Overflow);
    }
    Ok(quotient.low_u128())
}

/// `floor(sqrt(n))` via the Babylonian method.
///
/// Exact for perfect squares; converges in at most 255 iterations for the
/// full 256-bit range (each step at least halves the error).
pub fn isqrt(n: U256) -> U256 {
    if n <= U256::one() {
        return n;
    }

    // Start above the root: 2^ceil(bits/2) >= sqrt(n)
    let mut x0 = U256::one() << ((n.bits() + 1) / 2);
    let mut x1 = (x0 + n / x0) >> 1;
    while x1 < x0 {
        x0 = x1;
        x1 = (x0 + n / x0) >> 1;
    }
    x0
}

/// `floor(sqrt(a * b))` with a full-width product.
///
/// The root of a 256-bit product always fits in 128 bits.
pub fn geometric_mean(a: u128, b: u128) -> u128 {
    isqrt(U256::from(a) * U256::from(b)).low_u128()
}
