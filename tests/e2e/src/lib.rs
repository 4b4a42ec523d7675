//! Shared fixtures for the end-to-end suite
//!
//! A bench wiring the engine to the in-memory ledger with a manual clock,
//! plus a ledger wrapper whose outbound transfers call back into the
//! engine — the hostile collaborator the reentrancy contract exists for.

use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use sluice_engine::{
    AccountId, AmmEngine, AmmError, AssetId, AssetTransfer, EngineConfig, InMemoryLedger,
    ManualClock, PoolEvent,
};
use std::sync::Arc;

pub const START_TIME: u64 = 1_000;
pub const DEADLINE: u64 = 2_000;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub fn asset(b: u8) -> AssetId {
    AssetId::from_low_byte(b)
}

pub fn account(b: u8) -> AccountId {
    AccountId::from_low_byte(b)
}

/// Engine + ledger + clock + event stream, ready to trade.
pub struct Bench {
    pub engine: Arc<AmmEngine>,
    pub ledger: Arc<InMemoryLedger>,
    pub clock: Arc<ManualClock>,
    pub events: Receiver<PoolEvent>,
}

impl Bench {
    pub fn new() -> Self {
        init_tracing();
        let ledger = Arc::new(InMemoryLedger::new());
        let clock = Arc::new(ManualClock::at(START_TIME));
        let mut engine = AmmEngine::new(
            EngineConfig::default(),
            Arc::clone(&ledger) as Arc<dyn AssetTransfer>,
            Arc::clone(&clock) as Arc<dyn sluice_engine::Clock>,
        );
        let events = engine.subscribe();
        Self {
            engine: Arc::new(engine),
            ledger,
            clock,
            events,
        }
    }

    /// Seed `account` with both assets of a pair.
    pub fn fund(&self, account: AccountId, asset_a: AssetId, asset_b: AssetId, amount: u128) {
        self.ledger.mint(asset_a, account, amount);
        self.ledger.mint(asset_b, account, amount);
    }

    pub fn drain_events(&self) -> Vec<PoolEvent> {
        self.events.try_iter().collect()
    }
}

impl Default for Bench {
    fn default() -> Self {
        Self::new()
    }
}

/// Ledger whose outbound transfer of one marked asset re-enters the
/// engine before moving the balance, recording what the nested call
/// observed.
pub struct ReenteringLedger {
    inner: InMemoryLedger,
    engine: RwLock<Option<Arc<AmmEngine>>>,
    reenter_on: RwLock<Option<(AssetId, Vec<AssetId>)>>,
    observed: RwLock<Vec<Result<(u128, u128), AmmError>>>,
}

impl ReenteringLedger {
    pub fn new() -> Self {
        Self {
            inner: InMemoryLedger::new(),
            engine: RwLock::new(None),
            reenter_on: RwLock::new(None),
            observed: RwLock::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &InMemoryLedger {
        &self.inner
    }

    /// Wire the engine in after construction (the engine owns the ledger
    /// handle, so the cycle closes here).
    pub fn attach_engine(&self, engine: Arc<AmmEngine>) {
        *self.engine.write() = Some(engine);
    }

    /// On the next outbound transfer of `asset`, fire a nested swap along
    /// `path` before completing the transfer.
    pub fn reenter_on(&self, asset: AssetId, path: Vec<AssetId>) {
        *self.reenter_on.write() = Some((asset, path));
    }

    pub fn observed(&self) -> Vec<Result<(u128, u128), AmmError>> {
        self.observed.read().clone()
    }
}

impl Default for ReenteringLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetTransfer for ReenteringLedger {
    fn transfer_from(
        &self,
        asset: AssetId,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), AmmError> {
        self.inner.transfer_from(asset, from, to, amount)
    }

    fn transfer(&self, asset: AssetId, to: AccountId, amount: u128) -> Result<(), AmmError> {
        let trigger = {
            let mut pending = self.reenter_on.write();
            match &*pending {
                Some((armed, _)) if *armed == asset => pending.take(),
                _ => None,
            }
        };
        if let Some((_, path)) = trigger {
            if let Some(engine) = self.engine.read().clone() {
                let nested =
                    engine.swap_exact_tokens_for_tokens(to, 1, 0, &path, to, u64::MAX);
                self.observed.write().push(nested);
            }
        }
        self.inner.transfer(asset, to, amount)
    }
}
