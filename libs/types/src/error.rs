//! Engine-wide error taxonomy
//!
//! Every failure an operation can surface, as one typed enum. User-input
//! failures (bad minimums, expired deadlines, thin liquidity) are expected
//! and retryable by the caller with adjusted parameters; `Underflow` and
//! `Overflow` are internal-consistency faults that indicate a defect in the
//! accounting itself and must never occur in a correct build.

use crate::identifiers::AssetId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    /// Deadline passed before the operation entered the engine.
    #[error("Operation expired: deadline {deadline} is before current time {now}")]
    Expired { deadline: u64, now: u64 },

    #[error("Identical addresses: a pool requires two distinct assets")]
    IdenticalAddresses,

    #[error("Zero address is not a valid asset or recipient")]
    ZeroAddress,

    #[error("Insufficient input amount: swap input must be non-zero")]
    InsufficientInputAmount,

    #[error("Insufficient liquidity: both reserves must be non-zero to quote a swap")]
    InsufficientLiquidity,

    /// Swap output fell below the caller's slippage minimum.
    #[error("Insufficient output amount: got {got}, minimum {min}")]
    InsufficientOutputAmount { got: u128, min: u128 },

    /// Deposit so small it rounds to zero shares.
    #[error("Insufficient liquidity minted: deposit rounds to zero shares")]
    InsufficientLiquidityMinted,

    #[error("Insufficient amount of token A: got {got}, minimum {min}")]
    InsufficientAmountA { got: u128, min: u128 },

    #[error("Insufficient amount of token B: got {got}, minimum {min}")]
    InsufficientAmountB { got: u128, min: u128 },

    /// Caller tried to redeem more shares than it holds.
    #[error("Insufficient liquidity balance: redeeming {requested}, holding {held}")]
    InsufficientLiquidityBalance { requested: u128, held: u128 },

    #[error("No liquidity: pool is empty")]
    NoLiquidity,

    #[error("Invalid path: expected exactly 2 assets, got {len}")]
    InvalidPath { len: usize },

    /// Pool is already executing an operation (concurrent call or a
    /// callback re-entering during a pending external transfer).
    #[error("Reentrant call: pool operation already in progress")]
    Reentrant,

    /// Internal fault: a balance update would drive a value negative.
    #[error("Underflow applying ledger delta: internal consistency violation")]
    Underflow,

    /// Internal fault: a mul-div quotient exceeded the amount width.
    #[error("Overflow in fixed-point arithmetic: internal consistency violation")]
    Overflow,

    /// The external asset ledger rejected a transfer; the enclosing
    /// operation is rolled back.
    #[error("Transfer failed for asset {asset}: {reason}")]
    TransferFailed { asset: AssetId, reason: String },
}

impl AmmError {
    /// Internal-consistency faults, as opposed to user-input errors.
    /// These indicate a defect in the math or ledger, not a bad request.
    pub fn is_internal_fault(&self) -> bool {
        matches!(self, AmmError::Underflow | AmmError::Overflow)
    }
}
