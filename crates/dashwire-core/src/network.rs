// ── Network fetcher ──
//
// The remote side of a widget fetch, behind a trait so the engine can
// run against the HTTP client or an in-process stub.

use std::future::Future;
use std::time::Duration;

use dashwire_api::WidgetClient;
use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;
use crate::store::millis;

/// Anything that can produce the raw payload for a widget id.
pub trait WidgetSource: Send + Sync + 'static {
    fn fetch_widget(&self, widget_id: &str)
    -> impl Future<Output = Result<Value, CoreError>> + Send;
}

impl WidgetSource for WidgetClient {
    async fn fetch_widget(&self, widget_id: &str) -> Result<Value, CoreError> {
        Ok(WidgetClient::fetch_widget(self, widget_id).await?)
    }
}

/// Race one remote call against `timeout`.
pub async fn fetch_with_timeout<S: WidgetSource>(
    source: &S,
    widget_id: &str,
    timeout: Duration,
) -> Result<Value, CoreError> {
    let timeout_ms = millis(timeout);
    debug!(widget_id, timeout_ms, "fetching widget from network");

    tokio::time::timeout(timeout, source.fetch_widget(widget_id))
        .await
        .map_err(|_| CoreError::Timeout { timeout_ms })?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Slow(Duration);

    impl WidgetSource for Slow {
        async fn fetch_widget(&self, _widget_id: &str) -> Result<Value, CoreError> {
            tokio::time::sleep(self.0).await;
            Ok(json!({ "late": true }))
        }
    }

    #[tokio::test]
    async fn fast_source_wins_the_race() {
        let value = fetch_with_timeout(&Slow(Duration::ZERO), "notes", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(value, json!({ "late": true }));
    }

    #[tokio::test]
    async fn timer_wins_against_slow_source() {
        let err = fetch_with_timeout(
            &Slow(Duration::from_millis(50)),
            "notes",
            Duration::from_millis(10),
        )
        .await
        .unwrap_err();
        assert_eq!(err, CoreError::Timeout { timeout_ms: 10 });
    }
}
