// ── Reactive widget streams ──
//
// Watch-channel view of the latest resolved value for one widget.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::WidgetData;

type Slot = Option<Arc<WidgetData>>;

/// A subscription to one widget's resolved values.
///
/// Provides point-in-time access to the latest value and reactive change
/// notification via [`changed()`](Self::changed) or by converting into a
/// `Stream`.
pub struct WidgetStream {
    current: Slot,
    receiver: watch::Receiver<Slot>,
}

impl WidgetStream {
    pub(crate) fn new(receiver: watch::Receiver<Slot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Value captured at creation (or at the last `changed()`).
    pub fn current(&self) -> Option<&Arc<WidgetData>> {
        self.current.as_ref()
    }

    /// Most recent value, which may be newer than `current()`.
    pub fn latest(&self) -> Option<Arc<WidgetData>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next resolved value.
    /// Returns `None` once the manager has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<WidgetData>> {
        loop {
            self.receiver.changed().await.ok()?;
            let value = self.receiver.borrow_and_update().clone();
            if value.is_some() {
                self.current.clone_from(&value);
                return value;
            }
        }
    }

    /// Convert into a `Stream`. The latest value (if any) is yielded first.
    pub fn into_stream(self) -> WidgetWatchStream {
        WidgetWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct WidgetWatchStream {
    inner: WatchStream<Slot>,
}

impl Stream for WidgetWatchStream {
    type Item = Arc<WidgetData>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            // Skip the empty slot a watcher sees before the first fetch.
            match ready!(Pin::new(&mut self.inner).poll_next(cx)) {
                Some(Some(data)) => return Poll::Ready(Some(data)),
                Some(None) => {}
                None => return Poll::Ready(None),
            }
        }
    }
}
