//! Access guard
//!
//! Precondition checks that run before any pool state is read, plus the
//! per-pool mutual-exclusion entry. Pool entry uses `try_lock` rather
//! than a boolean flag: a held lock rejects both a callback re-entering
//! during a pending external transfer and a concurrent thread, which is
//! the full non-reentrancy contract.

use crate::pool::Pool;
use crate::time::Clock;
use parking_lot::{Mutex, MutexGuard};
use types::{AccountId, AmmError, AssetId, PairKey};

/// Fail with `Expired` once the logical time passes the deadline.
pub fn check_deadline(clock: &dyn Clock, deadline: u64) -> Result<(), AmmError> {
    let now = clock.now();
    if now > deadline {
        return Err(AmmError::Expired { deadline, now });
    }
    Ok(())
}

pub fn check_account(account: AccountId) -> Result<(), AmmError> {
    if account.is_zero() {
        return Err(AmmError::ZeroAddress);
    }
    Ok(())
}

/// Validate a 2-element swap path and resolve its canonical pair.
/// Length errors surface as `InvalidPath`; zero or identical assets keep
/// their own error kinds from pair construction.
pub fn check_path(path: &[AssetId]) -> Result<(AssetId, AssetId, PairKey), AmmError> {
    if path.len() != 2 {
        return Err(AmmError::InvalidPath { len: path.len() });
    }
    let pair = PairKey::new(path[0], path[1])?;
    Ok((path[0], path[1], pair))
}

/// Enter a pool operation: `Idle -> InProgress`, or `Reentrant` when an
/// operation already holds the pool.
pub fn enter_pool(pool: &Mutex<Pool>) -> Result<MutexGuard<'_, Pool>, AmmError> {
    pool.try_lock().ok_or(AmmError::Reentrant)
}
