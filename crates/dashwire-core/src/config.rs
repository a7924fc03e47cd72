// ── Fetch configuration ──
//
// Manager-wide defaults, per-widget profiles and per-call overrides.
// Each call merges the three layers field by field; nothing a caller
// passes outlives that call.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Default time a successful network read stays fresh in the cache.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default budget for a single network attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

// ── FetchStrategy ────────────────────────────────────────────────────

/// Ordering of cache vs. network consultation for one request.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FetchStrategy {
    /// Serve a fresh cache entry without networking; fetch on miss.
    #[default]
    CacheFirst,
    /// Always try the network; fall back to a fresh cache entry.
    NetworkFirst,
    /// Always try the network; never read the cache.
    NetworkOnly,
    /// Never touch the network; a miss goes straight to mock data.
    CacheOnly,
}

// ── FetchConfig ──────────────────────────────────────────────────────

/// Fully resolved configuration for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    pub strategy: FetchStrategy,
    pub ttl: Duration,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            strategy: FetchStrategy::default(),
            ttl: DEFAULT_TTL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl FetchConfig {
    /// Shallow-merge `overrides` on top of this config.
    pub fn apply(self, overrides: &FetchOverrides) -> Self {
        Self {
            strategy: overrides.strategy.unwrap_or(self.strategy),
            ttl: overrides.ttl.unwrap_or(self.ttl),
            timeout: overrides.timeout.unwrap_or(self.timeout),
        }
    }
}

// ── FetchOverrides ───────────────────────────────────────────────────

/// Partial configuration: each `Some` field replaces the layer below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOverrides {
    pub strategy: Option<FetchStrategy>,
    pub ttl: Option<Duration>,
    pub timeout: Option<Duration>,
}

impl FetchOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.strategy.is_none() && self.ttl.is_none() && self.timeout.is_none()
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: &Self) -> Self {
        Self {
            strategy: other.strategy.or(self.strategy),
            ttl: other.ttl.or(self.ttl),
            timeout: other.timeout.or(self.timeout),
        }
    }
}

// ── ManagerConfig ────────────────────────────────────────────────────

/// Configuration held by one manager instance.
///
/// `defaults` applies to every widget; `widgets` holds per-widget
/// profiles layered on top. `Default` carries the built-in dashboard
/// profiles, [`ManagerConfig::bare`] starts without any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    pub defaults: FetchConfig,
    pub widgets: HashMap<String, FetchOverrides>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            defaults: FetchConfig::default(),
            widgets: builtin_profiles(),
        }
    }
}

impl ManagerConfig {
    /// Defaults only, no per-widget profiles.
    pub fn bare() -> Self {
        Self {
            defaults: FetchConfig::default(),
            widgets: HashMap::new(),
        }
    }

    pub fn with_defaults(mut self, defaults: FetchConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Add or replace the profile for one widget.
    pub fn with_widget(mut self, widget_id: impl Into<String>, profile: FetchOverrides) -> Self {
        self.widgets.insert(widget_id.into(), profile);
        self
    }

    /// Resolve the config for one call: defaults, then the widget's
    /// profile, then the per-call overrides.
    pub fn effective(&self, widget_id: &str, overrides: &FetchOverrides) -> FetchConfig {
        let base = match self.widgets.get(widget_id) {
            Some(profile) => self.defaults.apply(profile),
            None => self.defaults,
        };
        base.apply(overrides)
    }
}

/// Refresh profiles of the stock dashboard widgets.
pub fn builtin_profiles() -> HashMap<String, FetchOverrides> {
    const MINUTE: u64 = 60;
    let profile = |minutes: u64, strategy: FetchStrategy| {
        FetchOverrides::new()
            .with_strategy(strategy)
            .with_ttl(Duration::from_secs(minutes * MINUTE))
    };

    [
        ("research-progress", profile(5, FetchStrategy::CacheFirst)),
        ("quick-stats", profile(3, FetchStrategy::CacheFirst)),
        ("recent-papers", profile(10, FetchStrategy::CacheFirst)),
        ("writing-goals", profile(5, FetchStrategy::CacheFirst)),
        ("collaboration", profile(2, FetchStrategy::NetworkFirst)),
        ("calendar", profile(10, FetchStrategy::CacheFirst)),
        ("trends", profile(15, FetchStrategy::CacheFirst)),
        ("notes", profile(5, FetchStrategy::CacheFirst)),
        ("citations", profile(30, FetchStrategy::CacheFirst)),
        ("suggestions", profile(10, FetchStrategy::NetworkFirst)),
        ("time-tracker", profile(5, FetchStrategy::CacheFirst)),
        ("custom", profile(5, FetchStrategy::CacheFirst)),
    ]
    .into_iter()
    .map(|(id, p)| (id.to_owned(), p))
    .collect()
}
