// ── Widget manager ──
//
// Public surface of the engine. Resolves widgets through the strategy
// resolver, records loading state and broadcasts every resolved value.

use std::sync::Arc;

use dashwire_api::WidgetClient;
use futures_util::future::join_all;
use indexmap::IndexMap;
use tracing::debug;

use crate::broadcast::{Broadcaster, Subscription};
use crate::config::{FetchConfig, FetchOverrides, ManagerConfig};
use crate::fetch::{NetworkOutcome, Resolver};
use crate::loading::{LoadingState, LoadingTracker};
use crate::model::WidgetData;
use crate::network::WidgetSource;
use crate::registry::ValidationRegistry;
use crate::store::{CacheStats, millis};
use crate::stream::WidgetStream;

/// Entry point for consumers.
///
/// Cheaply cloneable via `Arc<ManagerInner>`; clones share one cache,
/// one in-flight tracker and one set of subscribers. None of the fetch
/// operations can fail: see [`WidgetData`] for how failures are reported.
pub struct WidgetManager<S: WidgetSource = WidgetClient> {
    inner: Arc<ManagerInner<S>>,
}

struct ManagerInner<S> {
    config: ManagerConfig,
    resolver: Resolver<S>,
    broadcaster: Broadcaster,
    loading: LoadingTracker,
}

impl<S: WidgetSource> Clone for WidgetManager<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: WidgetSource> WidgetManager<S> {
    /// Manager over `source` using the stock widget registry.
    pub fn new(source: S, config: ManagerConfig) -> Self {
        Self::with_registry(source, config, ValidationRegistry::builtin())
    }

    pub fn with_registry(source: S, config: ManagerConfig, registry: ValidationRegistry) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                config,
                resolver: Resolver::new(source, Arc::new(registry)),
                broadcaster: Broadcaster::new(),
                loading: LoadingTracker::default(),
            }),
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &ValidationRegistry {
        self.inner.resolver.registry()
    }

    pub fn source(&self) -> &S {
        self.inner.resolver.source()
    }

    /// Configuration a call for `widget_id` with `overrides` would use.
    pub fn effective_config(&self, widget_id: &str, overrides: &FetchOverrides) -> FetchConfig {
        self.inner.config.effective(widget_id, overrides)
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Resolve one widget, then notify its subscribers.
    pub async fn fetch_widget_data(
        &self,
        widget_id: &str,
        overrides: FetchOverrides,
    ) -> WidgetData {
        let config = self.effective_config(widget_id, &overrides);
        debug!(
            widget_id,
            strategy = %config.strategy,
            ttl_ms = millis(config.ttl),
            "fetching widget"
        );

        let inner = &self.inner;
        inner.loading.start(widget_id);
        let resolution = inner.resolver.resolve(widget_id, config).await;
        match &resolution.network {
            NetworkOutcome::Succeeded => inner.loading.clear_error(widget_id),
            NetworkOutcome::Failed(err) => inner.loading.record_error(widget_id, err),
            NetworkOutcome::Skipped => {}
        }
        inner.loading.finish(widget_id);

        inner.broadcaster.notify(&resolution.data);
        resolution.data
    }

    /// Resolve several widgets concurrently, keyed by id in input order.
    ///
    /// Each widget resolves independently; one falling back to mock data
    /// has no effect on the others. Repeated ids collapse into one entry.
    pub async fn fetch_multiple<I, T>(
        &self,
        widget_ids: I,
        overrides: FetchOverrides,
    ) -> IndexMap<String, WidgetData>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let ids: Vec<String> = widget_ids
            .into_iter()
            .map(|id| id.as_ref().to_owned())
            .collect();
        let results = join_all(ids.iter().map(|id| self.fetch_widget_data(id, overrides))).await;
        ids.into_iter().zip(results).collect()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Call `callback` with every value resolved for `widget_id`.
    pub fn subscribe_to_widget<F>(&self, widget_id: &str, callback: F) -> Subscription
    where
        F: Fn(&WidgetData) + Send + Sync + 'static,
    {
        self.inner.broadcaster.subscribe(widget_id, callback)
    }

    /// Watch-channel view of the values resolved for `widget_id`.
    pub fn watch_widget(&self, widget_id: &str) -> WidgetStream {
        self.inner.broadcaster.watch(widget_id)
    }

    pub fn subscriber_count(&self, widget_id: &str) -> usize {
        self.inner.broadcaster.subscriber_count(widget_id)
    }

    // ── Cache & state ────────────────────────────────────────────────

    /// Drop one widget's cache entry, or every entry when `None`.
    pub fn invalidate_cache(&self, widget_id: Option<&str>) {
        let cache = self.inner.resolver.cache();
        match widget_id {
            Some(id) => {
                cache.invalidate(id);
            }
            None => cache.clear(),
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.resolver.cache().stats()
    }

    pub fn loading_state(&self) -> LoadingState {
        self.inner.loading.snapshot()
    }

    /// Empty the cache and loading state. Subscriptions are kept.
    pub fn clear(&self) {
        self.inner.resolver.cache().clear();
        self.inner.loading.clear();
    }
}
