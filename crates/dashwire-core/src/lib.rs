//! Widget data cache-and-validation engine.
//!
//! Sits between a remote widget endpoint (`dashwire-api`) and whatever
//! renders the dashboard:
//!
//! - **[`WidgetManager`]**: the facade. [`fetch_widget_data`](WidgetManager::fetch_widget_data)
//!   and [`fetch_multiple`](WidgetManager::fetch_multiple) never fail; every
//!   result is a [`WidgetData`] tagged with its provenance (`api`, `cache`
//!   or `mock`) and its validity.
//!
//! - **Fetch strategies** ([`FetchStrategy`]): `cache-first`, `network-first`,
//!   `network-only` and `cache-only`, merged per call from manager defaults,
//!   per-widget profiles and call overrides ([`ManagerConfig`]).
//!
//! - **Stores** ([`store`]): a lazily expiring TTL cache and a single-flight
//!   tracker so overlapping requests for one widget share one network call.
//!
//! - **[`ValidationRegistry`]**: declarative per-widget schemas ([`schema`])
//!   and the mock payloads served when the network can't be used.
//!
//! - **Subscriptions**: callbacks via [`WidgetManager::subscribe_to_widget`]
//!   (isolated from each other's panics) and watch-channel
//!   [`WidgetStream`]s.

pub mod broadcast;
pub mod config;
pub mod error;
pub mod fetch;
pub mod loading;
pub mod manager;
pub mod mock;
pub mod model;
pub mod network;
pub mod registry;
pub mod schema;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use broadcast::Subscription;
pub use config::{
    DEFAULT_TIMEOUT, DEFAULT_TTL, FetchConfig, FetchOverrides, FetchStrategy, ManagerConfig,
};
pub use error::CoreError;
pub use fetch::NetworkOutcome;
pub use loading::LoadingState;
pub use manager::WidgetManager;
pub use model::{DataSource, ValidationResult, WidgetData};
pub use network::WidgetSource;
pub use registry::ValidationRegistry;
pub use schema::{Rule, StringFormat, WidgetSchema};
pub use store::{CacheStats, CacheStore};
pub use stream::WidgetStream;
