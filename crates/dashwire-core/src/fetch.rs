// ── Fetch strategy resolver ──
//
// Orchestrates cache, single-flight tracker and network fetcher for one
// call, then runs the result through validation. Never fails: every
// network problem turns into a cache or mock fallback.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{FetchConfig, FetchStrategy};
use crate::error::CoreError;
use crate::model::{DataSource, WidgetData};
use crate::network::{WidgetSource, fetch_with_timeout};
use crate::registry::ValidationRegistry;
use crate::store::{CacheEntry, CacheStore, InFlightTracker, millis};

/// What happened on the network side of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkOutcome {
    /// No network call was needed (cache hit, or `cache-only`).
    Skipped,
    Succeeded,
    Failed(CoreError),
}

/// A resolved fetch plus how the network attempt went.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub data: WidgetData,
    pub network: NetworkOutcome,
}

impl Resolution {
    fn skipped(data: WidgetData) -> Self {
        Self {
            data,
            network: NetworkOutcome::Skipped,
        }
    }
}

pub(crate) struct Resolver<S> {
    source: Arc<S>,
    cache: Arc<CacheStore>,
    in_flight: InFlightTracker,
    registry: Arc<ValidationRegistry>,
}

impl<S: WidgetSource> Resolver<S> {
    pub(crate) fn new(source: S, registry: Arc<ValidationRegistry>) -> Self {
        Self {
            source: Arc::new(source),
            cache: Arc::new(CacheStore::new()),
            in_flight: InFlightTracker::new(),
            registry,
        }
    }

    pub(crate) fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub(crate) fn registry(&self) -> &ValidationRegistry {
        &self.registry
    }

    pub(crate) fn source(&self) -> &S {
        &self.source
    }

    /// Resolve one widget under `config`.
    pub(crate) async fn resolve(&self, widget_id: &str, config: FetchConfig) -> Resolution {
        match config.strategy {
            FetchStrategy::CacheFirst => {
                if let Some(entry) = self.cached(widget_id) {
                    return Resolution::skipped(self.from_cache(widget_id, entry));
                }
                self.network_or_mock(widget_id, config).await
            }
            FetchStrategy::NetworkFirst => match self.network(widget_id, config).await {
                Ok(data) => self.succeeded(widget_id, data),
                Err(err) => {
                    let data = match self.cached(widget_id) {
                        Some(entry) => {
                            warn!(widget_id, error = %err, "network failed, serving cached data");
                            self.from_cache(widget_id, entry)
                        }
                        None => {
                            warn!(widget_id, error = %err, "network failed, serving mock data");
                            self.mock(widget_id)
                        }
                    };
                    Resolution {
                        data,
                        network: NetworkOutcome::Failed(err),
                    }
                }
            },
            FetchStrategy::NetworkOnly => self.network_or_mock(widget_id, config).await,
            FetchStrategy::CacheOnly => {
                let data = match self.cached(widget_id) {
                    Some(entry) => self.from_cache(widget_id, entry),
                    None => self.mock(widget_id),
                };
                Resolution::skipped(data)
            }
        }
    }

    // ── Steps ────────────────────────────────────────────────────────

    fn cached(&self, widget_id: &str) -> Option<CacheEntry> {
        let entry = self.cache.get(widget_id);
        if entry.is_some() {
            debug!(widget_id, "cache hit");
        } else {
            debug!(widget_id, "cache miss");
        }
        entry
    }

    async fn network_or_mock(&self, widget_id: &str, config: FetchConfig) -> Resolution {
        match self.network(widget_id, config).await {
            Ok(data) => self.succeeded(widget_id, data),
            Err(err) => {
                warn!(widget_id, error = %err, "network failed, serving mock data");
                Resolution {
                    data: self.mock(widget_id),
                    network: NetworkOutcome::Failed(err),
                }
            }
        }
    }

    /// One coalesced network attempt. The shared operation writes the
    /// cache on success; each caller bounds its own wait by its timeout.
    async fn network(&self, widget_id: &str, config: FetchConfig) -> Result<Arc<Value>, CoreError> {
        let FetchConfig { ttl, timeout, .. } = config;
        let pending = self.in_flight.run_exclusive(widget_id, || {
            let source = Arc::clone(&self.source);
            let cache = Arc::clone(&self.cache);
            let key = widget_id.to_owned();
            async move {
                let data = Arc::new(fetch_with_timeout(source.as_ref(), &key, timeout).await?);
                cache.set(&key, Arc::clone(&data), ttl);
                Ok(data)
            }
        });
        if pending.joined() {
            debug!(widget_id, "joined in-flight network call");
        }

        tokio::time::timeout(timeout, pending)
            .await
            .map_err(|_| CoreError::Timeout {
                timeout_ms: millis(timeout),
            })?
    }

    // ── Result builders ──────────────────────────────────────────────

    fn succeeded(&self, widget_id: &str, data: Arc<Value>) -> Resolution {
        Resolution {
            data: self.build(widget_id, data, DataSource::Api, Utc::now()),
            network: NetworkOutcome::Succeeded,
        }
    }

    fn from_cache(&self, widget_id: &str, entry: CacheEntry) -> WidgetData {
        self.build(widget_id, entry.data, DataSource::Cache, entry.stored_at)
    }

    fn mock(&self, widget_id: &str) -> WidgetData {
        let data = Arc::new(self.registry.mock_data(widget_id));
        self.build(widget_id, data, DataSource::Mock, Utc::now())
    }

    fn build(
        &self,
        widget_id: &str,
        data: Arc<Value>,
        source: DataSource,
        last_updated: DateTime<Utc>,
    ) -> WidgetData {
        let validation = self.registry.validate(widget_id, &data);
        if !validation.valid {
            warn!(
                widget_id,
                %source,
                errors = ?validation.errors(),
                "widget payload failed validation"
            );
        }

        WidgetData {
            widget_id: widget_id.to_owned(),
            data,
            last_updated,
            source,
            is_valid: validation.valid,
            validation_errors: validation.errors,
        }
    }
}
