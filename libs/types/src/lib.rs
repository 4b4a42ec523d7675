//! Shared types for the Sluice AMM engine
//!
//! Identifier newtypes (assets, accounts, canonical pair keys), the engine
//! error taxonomy, and the observable pool events emitted on successful
//! mutations. Pure data — no pool logic lives here.

pub mod error;
pub mod events;
pub mod identifiers;

pub use error::AmmError;
pub use events::PoolEvent;
pub use identifiers::{AccountId, AssetId, PairKey};
