// ── Public result types ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

/// Where a [`WidgetData`] value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DataSource {
    Api,
    Cache,
    Mock,
}

/// The result of every fetch.
///
/// Fetches never fail: a failed network attempt shows up as
/// `source == Mock` (or `Cache` under `network-first`), and a payload
/// that breaks its widget's schema as `is_valid == false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetData {
    pub widget_id: String,
    /// Shared, read-only view of the payload; the cache keeps its own handle.
    pub data: Arc<Value>,
    pub last_updated: DateTime<Utc>,
    pub source: DataSource,
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<String>>,
}

impl WidgetData {
    /// Validation errors, empty when the payload is valid.
    pub fn errors(&self) -> &[String] {
        self.validation_errors.as_deref().unwrap_or_default()
    }
}

/// Outcome of checking one payload against a widget schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: None,
        }
    }

    /// Build from collected errors; an empty list means valid.
    pub fn from_errors(errors: Vec<String>) -> Self {
        if errors.is_empty() {
            Self::ok()
        } else {
            Self {
                valid: false,
                errors: Some(errors),
            }
        }
    }

    pub fn errors(&self) -> &[String] {
        self.errors.as_deref().unwrap_or_default()
    }
}
