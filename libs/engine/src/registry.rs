//! Pool registry
//!
//! Owning container for all pools, keyed by canonical pair. Pools are
//! independent: each lives behind its own mutex, so operations on
//! different pairs run concurrently while same-pool operations serialize.

use crate::pool::Pool;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use types::PairKey;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegistryStats {
    pub total_pools: usize,
    pub total_operations: u64,
}

pub struct PoolRegistry {
    pools: DashMap<PairKey, Arc<Mutex<Pool>>>,
    stats: Arc<RwLock<RegistryStats>>,
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self {
            pools: DashMap::new(),
            stats: Arc::new(RwLock::new(RegistryStats::default())),
        }
    }

    /// Existing pool for the pair, or a freshly initialized empty one.
    /// Never fails; pools are created lazily on first deposit.
    pub fn get_or_create(&self, pair: PairKey) -> Arc<Mutex<Pool>> {
        let pool = self.pools.entry(pair).or_insert_with(|| {
            let mut stats = self.stats.write();
            stats.total_pools += 1;
            info!(?pair, total_pools = stats.total_pools, "created pool");
            Arc::new(Mutex::new(Pool::new(pair)))
        });
        Arc::clone(pool.value())
    }

    pub fn get(&self, pair: PairKey) -> Option<Arc<Mutex<Pool>>> {
        self.pools.get(&pair).map(|p| Arc::clone(p.value()))
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn record_operation(&self) {
        self.stats.write().total_operations += 1;
    }

    pub fn stats(&self) -> RegistryStats {
        self.stats.read().clone()
    }
}
