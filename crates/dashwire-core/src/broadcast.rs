// ── Subscription broadcaster ──
//
// Callback and watch-channel fan-out of resolved widget values. Each
// callback runs in isolation: a panicking subscriber is logged and
// skipped, the rest still get notified.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::model::WidgetData;
use crate::stream::WidgetStream;

type Callback = Arc<dyn Fn(&WidgetData) + Send + Sync>;
type SubscriberMap = DashMap<String, Vec<Subscriber>>;

#[derive(Clone)]
struct Subscriber {
    id: Uuid,
    active: Arc<AtomicBool>,
    callback: Callback,
}

/// Handle returned by a callback subscription.
///
/// Dropping the handle leaves the callback registered; it stays active
/// for the manager's lifetime unless [`unsubscribe`](Self::unsubscribe)
/// is called.
#[must_use = "the callback stays registered; keep the handle to unsubscribe"]
pub struct Subscription {
    id: Uuid,
    widget_id: String,
    active: Arc<AtomicBool>,
    subscribers: Weak<SubscriberMap>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Stop notifications to this callback. Idempotent.
    ///
    /// No invocation starts after this returns. An invocation already
    /// running on another task is not interrupted and may still finish.
    /// Safe to call from inside the callback itself.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        let Some(subscribers) = self.subscribers.upgrade() else {
            return;
        };
        if let Some(mut list) = subscribers.get_mut(&self.widget_id) {
            list.retain(|s| s.id != self.id);
        }
        subscribers.remove_if(&self.widget_id, |_, list| list.is_empty());
        debug!(widget_id = %self.widget_id, subscription = %self.id, "unsubscribed");
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("widget_id", &self.widget_id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Fan-out of resolved values to callbacks and watchers.
#[derive(Default)]
pub(crate) struct Broadcaster {
    subscribers: Arc<SubscriberMap>,
    watchers: DashMap<String, watch::Sender<Option<Arc<WidgetData>>>>,
}

impl Broadcaster {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe<F>(&self, widget_id: &str, callback: F) -> Subscription
    where
        F: Fn(&WidgetData) + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        let active = Arc::new(AtomicBool::new(true));
        self.subscribers
            .entry(widget_id.to_owned())
            .or_default()
            .push(Subscriber {
                id,
                active: Arc::clone(&active),
                callback: Arc::new(callback),
            });
        debug!(widget_id, subscription = %id, "subscribed");

        Subscription {
            id,
            widget_id: widget_id.to_owned(),
            active,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    pub(crate) fn watch(&self, widget_id: &str) -> WidgetStream {
        let receiver = self
            .watchers
            .entry(widget_id.to_owned())
            .or_insert_with(|| watch::channel(None).0)
            .subscribe();
        WidgetStream::new(receiver)
    }

    pub(crate) fn subscriber_count(&self, widget_id: &str) -> usize {
        self.subscribers.get(widget_id).map_or(0, |list| list.len())
    }

    /// Deliver `data` to every active callback and watcher of its widget.
    pub(crate) fn notify(&self, data: &WidgetData) {
        let widget_id = data.widget_id.as_str();

        // Snapshot so callbacks may (un)subscribe without deadlocking.
        let snapshot = self
            .subscribers
            .get(widget_id)
            .map(|list| list.value().clone())
            .unwrap_or_default();

        for subscriber in snapshot {
            if !subscriber.active.load(Ordering::Acquire) {
                continue;
            }
            let callback: &(dyn Fn(&WidgetData) + Send + Sync) = subscriber.callback.as_ref();
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(data))) {
                warn!(
                    widget_id,
                    subscription = %subscriber.id,
                    reason = panic_message(panic.as_ref()),
                    "widget subscriber panicked"
                );
            }
        }

        if let Some(sender) = self.watchers.get(widget_id) {
            sender.send_replace(Some(Arc::new(data.clone())));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::model::DataSource;

    fn data(widget_id: &str, n: i64) -> WidgetData {
        WidgetData {
            widget_id: widget_id.to_owned(),
            data: Arc::new(json!({ "n": n })),
            last_updated: Utc::now(),
            source: DataSource::Api,
            is_valid: true,
            validation_errors: None,
        }
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&WidgetData) + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        (count, move |_: &WidgetData| {
            handle.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn every_subscriber_is_notified() {
        let b = Broadcaster::new();
        let (a_count, a) = counter();
        let (b_count, b_cb) = counter();
        let _a = b.subscribe("notes", a);
        let _b = b.subscribe("notes", b_cb);

        b.notify(&data("notes", 1));
        assert_eq!(a_count.load(Ordering::SeqCst), 1);
        assert_eq!(b_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn other_widgets_are_not_notified() {
        let b = Broadcaster::new();
        let (count, cb) = counter();
        let _s = b.subscribe("notes", cb);
        b.notify(&data("trends", 1));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn panicking_subscriber_does_not_stop_others() {
        let b = Broadcaster::new();
        let _bad = b.subscribe("notes", |_| panic!("subscriber blew up"));
        let (count, cb) = counter();
        let _good = b.subscribe("notes", cb);

        b.notify(&data("notes", 1));
        b.notify(&data("notes", 2));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unsubscribed_callback_is_never_called_again() {
        let b = Broadcaster::new();
        let (count, cb) = counter();
        let sub = b.subscribe("notes", cb);

        b.notify(&data("notes", 1));
        sub.unsubscribe();
        sub.unsubscribe();
        b.notify(&data("notes", 2));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!sub.is_active());
        assert_eq!(b.subscriber_count("notes"), 0);
    }

    #[test]
    fn dropping_handle_keeps_subscription() {
        let b = Broadcaster::new();
        let (count, cb) = counter();
        drop(b.subscribe("notes", cb));
        b.notify(&data("notes", 1));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_may_unsubscribe_a_later_subscriber() {
        let b = Broadcaster::new();
        let victim: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&victim);
        let _first = b.subscribe("notes", move |_| {
            if let Some(sub) = slot.lock().unwrap().as_ref() {
                sub.unsubscribe();
            }
        });
        let (count, cb) = counter();
        *victim.lock().unwrap() = Some(b.subscribe("notes", cb));

        b.notify(&data("notes", 1));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let b = Broadcaster::new();
        let own: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&own);
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let sub = b.subscribe("notes", move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            if let Some(sub) = slot.lock().unwrap().as_ref() {
                sub.unsubscribe();
            }
        });
        *own.lock().unwrap() = Some(sub);

        b.notify(&data("notes", 1));
        b.notify(&data("notes", 2));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!own.lock().unwrap().as_ref().unwrap().is_active());
        assert_eq!(b.subscriber_count("notes"), 0);
    }

    #[tokio::test]
    async fn watchers_see_latest_value() {
        let b = Broadcaster::new();
        let mut stream = b.watch("notes");
        assert!(stream.current().is_none());

        b.notify(&data("notes", 7));
        let next = stream.changed().await.unwrap();
        assert_eq!(*next.data, json!({ "n": 7 }));
        assert_eq!(stream.current().unwrap().data, next.data);

        b.notify(&data("notes", 8));
        assert_eq!(*stream.latest().unwrap().data, json!({ "n": 8 }));
    }
}
