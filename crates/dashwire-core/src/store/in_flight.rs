// ── Single-flight request tracker ──
//
// At most one network operation per key is outstanding. Concurrent
// callers join the pending operation and all observe its settled result.
// Operations run as spawned tasks, so they finish (or time out) even if
// every waiter goes away.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use serde_json::Value;
use tracing::trace;

use crate::error::CoreError;

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<Value>, CoreError>>>;

struct Pending {
    generation: u64,
    future: SharedFetch,
}

/// Handle on a pending (possibly shared) operation.
#[must_use = "an in-flight handle does nothing unless awaited"]
pub struct InFlight {
    future: SharedFetch,
    joined: bool,
}

impl InFlight {
    /// `true` if this caller joined an operation someone else started.
    pub fn joined(&self) -> bool {
        self.joined
    }
}

impl Future for InFlight {
    type Output = Result<Arc<Value>, CoreError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // Shared<BoxFuture> is Unpin.
        Pin::new(&mut self.future).poll(cx)
    }
}

/// Removes the marker when the operation settles, panics included.
struct MarkerGuard {
    pending: Arc<DashMap<String, Pending>>,
    key: String,
    generation: u64,
}

impl Drop for MarkerGuard {
    fn drop(&mut self) {
        let generation = self.generation;
        self.pending
            .remove_if(&self.key, |_, p| p.generation == generation);
    }
}

/// Coalesces concurrent operations per key.
#[derive(Default)]
pub struct InFlightTracker {
    pending: Arc<DashMap<String, Pending>>,
    next_generation: AtomicU64,
}

impl fmt::Debug for InFlightTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InFlightTracker")
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the operation outstanding for `key`, or start one with `start`.
    ///
    /// `start` is only called when nothing is pending. Must be called
    /// from within a Tokio runtime.
    pub fn run_exclusive<F, Fut>(&self, key: &str, start: F) -> InFlight
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<Value>, CoreError>> + Send + 'static,
    {
        match self.pending.entry(key.to_owned()) {
            Entry::Occupied(slot) => {
                trace!(key, "joining in-flight request");
                InFlight {
                    future: slot.get().future.clone(),
                    joined: true,
                }
            }
            Entry::Vacant(slot) => {
                let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
                let guard = MarkerGuard {
                    pending: Arc::clone(&self.pending),
                    key: key.to_owned(),
                    generation,
                };
                let operation = start();

                // The task's cleanup blocks on this shard until the marker
                // below is inserted, so it can never remove it early.
                let handle = tokio::spawn(async move {
                    let _guard = guard;
                    operation.await
                });
                let future = async move {
                    handle.await.unwrap_or_else(|e| {
                        Err(CoreError::Internal(format!("widget fetch task failed: {e}")))
                    })
                }
                .boxed()
                .shared();

                slot.insert(Pending {
                    generation,
                    future: future.clone(),
                });
                InFlight {
                    future,
                    joined: false,
                }
            }
        }
    }

    /// Whether an operation for `key` is outstanding.
    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
