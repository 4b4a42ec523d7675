//! # Sluice AMM Library - Constant-Product Pool Mathematics
//!
//! ## Purpose
//!
//! Pure mathematical core for the Sluice liquidity engine: exact integer
//! arithmetic for constant-product (x*y=k) swap quoting and proportional
//! share mint/burn sizing. All amounts are `u128`; every multiply-then-
//! divide widens to 256 bits internally, so no operand pair can overflow
//! an intermediate. No floating point anywhere — results are consensus-
//! grade deterministic.
//!
//! ## Integration Points
//!
//! - **Input Sources**: reserve snapshots from the pool ledger, trade and
//!   deposit parameters from the engine surface
//! - **Output Destinations**: the engine's liquidity and swap operations,
//!   plus read-only quoting for callers
//! - **Precision**: floor semantics on every division, exact integer
//!   square root for first-deposit share sizing
//!
//! ## Architecture Role
//!
//! This crate is stateless. The engine computes deltas here and commits
//! them through the pool ledger; nothing in this crate touches storage.

pub mod fixed_point;
pub mod liquidity;
pub mod swap;

pub use fixed_point::{geometric_mean, isqrt, mul_div, PRICE_SCALE};
pub use liquidity::LiquidityMath;
pub use swap::{Fee, SwapMath};

pub use ethereum_types::U256;
