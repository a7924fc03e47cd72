// ── Loading state ──
//
// Per-widget loading flags and last network error, plus an overall
// progress figure for dashboards that render a global spinner.

use std::collections::BTreeMap;

use dashmap::DashMap;
use serde::Serialize;

use crate::error::CoreError;

/// Snapshot of the manager's loading state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadingState {
    pub loading: BTreeMap<String, bool>,
    /// Last network error per widget, cleared by the next successful read.
    pub errors: BTreeMap<String, String>,
    /// Share of tracked widgets that have settled, `0..=100`.
    pub progress: u8,
}

impl LoadingState {
    pub fn is_loading(&self, widget_id: &str) -> bool {
        self.loading.get(widget_id).copied().unwrap_or(false)
    }
}

#[derive(Debug, Default)]
pub(crate) struct LoadingTracker {
    loading: DashMap<String, bool>,
    errors: DashMap<String, String>,
}

impl LoadingTracker {
    pub(crate) fn start(&self, widget_id: &str) {
        self.loading.insert(widget_id.to_owned(), true);
    }

    pub(crate) fn finish(&self, widget_id: &str) {
        self.loading.insert(widget_id.to_owned(), false);
    }

    pub(crate) fn record_error(&self, widget_id: &str, error: &CoreError) {
        self.errors.insert(widget_id.to_owned(), error.to_string());
    }

    pub(crate) fn clear_error(&self, widget_id: &str) {
        self.errors.remove(widget_id);
    }

    pub(crate) fn clear(&self) {
        self.loading.clear();
        self.errors.clear();
    }

    pub(crate) fn snapshot(&self) -> LoadingState {
        let loading: BTreeMap<String, bool> = self
            .loading
            .iter()
            .map(|r| (r.key().clone(), *r.value()))
            .collect();
        let errors = self
            .errors
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        let settled = loading.values().filter(|busy| !**busy).count();

        LoadingState {
            progress: progress(settled, loading.len()),
            loading,
            errors,
        }
    }
}

/// `round(settled / total * 100)`, `0` when nothing is tracked.
fn progress(settled: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (settled * 100 + total / 2) / total;
    u8::try_from(percent).unwrap_or(100)
}
