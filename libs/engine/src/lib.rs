//! # Sluice Engine - AMM Pool Ledger and Operation Surface
//!
//! ## Purpose
//!
//! The stateful half of the Sluice AMM: a registry of constant-product
//! pools keyed by canonical asset pair, the single-entry-point ledger
//! that applies atomic reserve/share deltas, the access guard enforcing
//! deadlines and per-pool mutual exclusion, and the public operations
//! (add/remove liquidity, swap, read-only queries) defined over them.
//!
//! ## Integration Points
//!
//! - **Input Sources**: caller operations with slippage minimums and
//!   deadlines; engine configuration from TOML
//! - **Output Destinations**: external asset ledgers via the
//!   [`AssetTransfer`] collaborator; pool events over a bounded channel;
//!   structured logs via `tracing`
//! - **Concurrency**: pools are independent and run concurrently; each
//!   pool serializes its operations behind a mutex, which doubles as the
//!   reentrancy guard
//!
//! ## Architecture Role
//!
//! All pricing and sizing math lives in `sluice-amm`; this crate owns
//! state and sequencing. Every mutation is transactional: fully
//! committed, or rolled back with compensating transfers.

pub mod config;
pub mod engine;
pub mod guard;
pub mod pool;
pub mod registry;
pub mod time;
pub mod transfer;

pub use config::{load_config, load_from_env, EngineConfig};
pub use engine::AmmEngine;
pub use pool::{Delta, Pool, PoolSnapshot};
pub use registry::{PoolRegistry, RegistryStats};
pub use time::{Clock, ManualClock, SystemClock};
pub use transfer::{AssetTransfer, InMemoryLedger, CUSTODY_ACCOUNT};

pub use sluice_amm::{Fee, PRICE_SCALE};
pub use types::{AccountId, AmmError, AssetId, PairKey, PoolEvent};
