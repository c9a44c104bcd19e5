//! Cache Engine
//!
//! Capacity-bounded memoization maps with LRU eviction.

mod bounded;
mod eviction;

pub use bounded::{BoundedCache, InsertOutcome};
pub use eviction::EvictionPolicy;
