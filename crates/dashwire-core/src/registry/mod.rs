// ── Validation registry ──
//
// Maps widget ids to a schema and a mock payload. Unknown ids are legal:
// they validate as anything and mock as `{}`.

mod widgets;

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;
use crate::mock::{builtin_mock, empty_mock};
use crate::model::ValidationResult;
use crate::schema::WidgetSchema;

#[derive(Debug, Clone)]
struct RegisteredWidget {
    schema: WidgetSchema,
    mock: Value,
}

/// Per-widget schemas plus the mock payload served on fallback.
///
/// Built once and shared read-only by the manager; register custom
/// widgets before handing the registry over.
#[derive(Debug, Clone, Default)]
pub struct ValidationRegistry {
    widgets: BTreeMap<String, RegisteredWidget>,
}

impl ValidationRegistry {
    /// An empty registry: every id is unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the twelve stock dashboard widgets.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for id in widgets::BUILTIN_WIDGETS {
            if let (Some(schema), Some(mock)) = (widgets::schema(id), builtin_mock(id)) {
                registry
                    .widgets
                    .insert(id.to_owned(), RegisteredWidget { schema, mock });
            }
        }
        registry
    }

    /// Add or replace a widget. The mock must satisfy the schema.
    pub fn register(
        &mut self,
        widget_id: impl Into<String>,
        schema: WidgetSchema,
        mock: Value,
    ) -> Result<(), CoreError> {
        let widget_id = widget_id.into();
        let check = schema.validate(&mock);
        if !check.valid {
            return Err(CoreError::Config {
                message: format!(
                    "mock data for widget {widget_id:?} fails its schema: {}",
                    check.errors().join("; ")
                ),
            });
        }
        self.widgets
            .insert(widget_id, RegisteredWidget { schema, mock });
        Ok(())
    }

    /// Validate `data` against the widget's schema.
    pub fn validate(&self, widget_id: &str, data: &Value) -> ValidationResult {
        match self.widgets.get(widget_id) {
            Some(widget) => widget.schema.validate(data),
            None => {
                debug!(widget_id, "no schema registered, accepting payload");
                ValidationResult::ok()
            }
        }
    }

    /// Mock payload for the widget; `{}` for unknown ids.
    pub fn mock_data(&self, widget_id: &str) -> Value {
        self.widgets
            .get(widget_id)
            .map_or_else(empty_mock, |w| w.mock.clone())
    }

    pub fn schema(&self, widget_id: &str) -> Option<&WidgetSchema> {
        self.widgets.get(widget_id).map(|w| &w.schema)
    }

    pub fn contains(&self, widget_id: &str) -> bool {
        self.widgets.contains_key(widget_id)
    }

    /// Registered ids in sorted order.
    pub fn widget_ids(&self) -> Vec<&str> {
        self.widgets.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::schema::Rule;

    #[test]
    fn builtin_registers_all_dashboard_widgets() {
        let registry = ValidationRegistry::builtin();
        assert_eq!(registry.widget_ids().len(), 12);
        for id in widgets::BUILTIN_WIDGETS {
            assert!(registry.contains(id), "{id} missing");
        }
    }

    #[test]
    fn every_mock_passes_its_own_schema() {
        let registry = ValidationRegistry::builtin();
        for id in registry.widget_ids() {
            let mock = registry.mock_data(id);
            let result = registry.validate(id, &mock);
            assert!(result.valid, "{id}: {:?}", result.errors);
            assert_ne!(mock, json!({}), "{id} mock is empty");
        }
    }

    #[test]
    fn unknown_widget_is_always_valid_with_empty_mock() {
        let registry = ValidationRegistry::builtin();
        assert!(registry.validate("unknown-widget", &json!([1, "x"])).valid);
        assert!(registry.validate("unknown-widget", &json!(null)).valid);
        assert_eq!(registry.mock_data("unknown-widget"), json!({}));
        assert!(registry.schema("unknown-widget").is_none());
    }

    #[test]
    fn out_of_range_accuracy_is_reported() {
        let registry = ValidationRegistry::builtin();
        let result = registry.validate("research-progress", &json!({ "researchAccuracy": 150 }));
        assert!(!result.valid);
        assert_eq!(result.errors(), ["researchAccuracy: must be between 0 and 100"]);
    }

    #[test]
    fn minimal_payload_passes() {
        let registry = ValidationRegistry::builtin();
        assert!(registry.validate("research-progress", &json!({ "papersRead": 42 })).valid);
    }

    #[test]
    fn custom_widget_requires_title() {
        let registry = ValidationRegistry::builtin();
        let result = registry.validate("custom", &json!({ "html": "<p/>" }));
        assert_eq!(result.errors(), ["title: is required"]);
    }

    #[test]
    fn nested_member_email_is_checked() {
        let registry = ValidationRegistry::builtin();
        let result = registry.validate(
            "collaboration",
            &json!({ "teamMembers": [{ "id": "1", "name": "A", "email": "nope" }] }),
        );
        assert_eq!(result.errors(), ["teamMembers.0.email: must be a valid email"]);
    }

    #[test]
    fn register_adds_and_replaces() {
        let mut registry = ValidationRegistry::new();
        let schema = WidgetSchema::new().required("count", Rule::number());
        registry
            .register("counter", schema.clone(), json!({ "count": 1 }))
            .unwrap();
        assert_eq!(registry.mock_data("counter"), json!({ "count": 1 }));

        registry
            .register("counter", schema, json!({ "count": 2 }))
            .unwrap();
        assert_eq!(registry.widget_ids(), ["counter"]);
        assert_eq!(registry.mock_data("counter"), json!({ "count": 2 }));
    }

    #[test]
    fn register_rejects_invalid_mock() {
        let mut registry = ValidationRegistry::new();
        let schema = WidgetSchema::new().required("count", Rule::number());
        let err = registry
            .register("counter", schema, json!({ "count": "many" }))
            .unwrap_err();
        assert!(matches!(err, CoreError::Config { ref message } if message.contains("count: expected number")));
        assert!(!registry.contains("counter"));
    }
}
