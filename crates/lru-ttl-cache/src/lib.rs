//! Bounded expiring cache
//!
//! An in-memory key/value cache with a fixed entry capacity, least-recently-used
//! eviction on overflow, and lazy time-to-live expiry checked on read.
//! There is no background sweeper: expired entries are purged when they are
//! next read, evicted by capacity pressure, or cleared.

mod cache;
mod error;
mod order;
mod types;

pub use cache::LruTtlCache;
pub use error::{CacheError, Result};
pub use types::CacheStats;
