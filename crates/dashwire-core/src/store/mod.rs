// ── Widget stores ──
//
// Last-known payload per widget (TTL cache) and the single-flight
// tracker that keeps at most one network call per widget outstanding.

mod cache;
mod in_flight;

pub(crate) use cache::millis;
pub use cache::{CacheEntry, CacheEntryStats, CacheStats, CacheStore};
pub use in_flight::{InFlight, InFlightTracker};
