// ── Declarative widget schemas ──
//
// A schema is an ordered list of fields, each with a rule. Fields are
// optional unless declared required, unknown fields are ignored, and
// every violation is reported as `"<path>: <rule>"`.

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::model::ValidationResult;

const ROOT_PATH: &str = "(root)";

/// Accepted shape of a string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Any,
    Url,
    Email,
    /// RFC 3339 / ISO-8601 timestamp with offset.
    DateTime,
}

/// Rule applied to a single JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Number { min: Option<f64>, max: Option<f64> },
    String(StringFormat),
    Boolean,
    /// String restricted to a fixed set of values.
    Enum(Vec<String>),
    NumberOrString,
    /// Array whose every element satisfies the inner rule.
    List(Box<Rule>),
    Object(WidgetSchema),
    /// Any JSON object, contents unchecked.
    Record,
}

impl Rule {
    pub fn number() -> Self {
        Self::Number {
            min: None,
            max: None,
        }
    }

    pub fn range(min: f64, max: f64) -> Self {
        Self::Number {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Number in `0..=100`.
    pub fn percentage() -> Self {
        Self::range(0.0, 100.0)
    }

    pub fn string() -> Self {
        Self::String(StringFormat::Any)
    }

    pub fn url() -> Self {
        Self::String(StringFormat::Url)
    }

    pub fn email() -> Self {
        Self::String(StringFormat::Email)
    }

    pub fn datetime() -> Self {
        Self::String(StringFormat::DateTime)
    }

    pub fn one_of(values: &[&str]) -> Self {
        Self::Enum(values.iter().map(|v| (*v).to_owned()).collect())
    }

    pub fn list_of(rule: Rule) -> Self {
        Self::List(Box::new(rule))
    }

    pub fn object(schema: WidgetSchema) -> Self {
        Self::Object(schema)
    }

    fn expected(&self) -> &'static str {
        match self {
            Self::Number { .. } => "number",
            Self::String(_) | Self::Enum(_) => "string",
            Self::Boolean => "boolean",
            Self::NumberOrString => "number or string",
            Self::List(_) => "array",
            Self::Object(_) | Self::Record => "object",
        }
    }

    fn check(&self, value: &Value, path: &mut Vec<String>, errors: &mut Vec<String>) {
        match (self, value) {
            (Self::Number { min, max }, Value::Number(n)) => {
                let Some(n) = n.as_f64() else { return };
                let below = min.is_some_and(|m| n < m);
                let above = max.is_some_and(|m| n > m);
                if below || above {
                    errors.push(violation(path, &range_message(*min, *max)));
                }
            }
            (Self::String(format), Value::String(s)) => {
                if let Some(message) = format.check(s) {
                    errors.push(violation(path, message));
                }
            }
            (Self::Enum(allowed), Value::String(s)) => {
                if !allowed.iter().any(|a| a == s) {
                    let message = format!("must be one of {}", allowed.join(", "));
                    errors.push(violation(path, &message));
                }
            }
            (Self::Boolean, Value::Bool(_))
            | (Self::NumberOrString, Value::Number(_) | Value::String(_))
            | (Self::Record, Value::Object(_)) => {}
            (Self::List(item), Value::Array(items)) => {
                for (index, element) in items.iter().enumerate() {
                    path.push(index.to_string());
                    item.check(element, path, errors);
                    path.pop();
                }
            }
            (Self::Object(schema), Value::Object(map)) => schema.check_object(map, path, errors),
            _ => {
                let message = format!("expected {}, received {}", self.expected(), kind(value));
                errors.push(violation(path, &message));
            }
        }
    }
}

impl StringFormat {
    fn check(self, s: &str) -> Option<&'static str> {
        let ok = match self {
            Self::Any => true,
            Self::Url => url::Url::parse(s).is_ok(),
            Self::Email => is_email(s),
            Self::DateTime => DateTime::parse_from_rfc3339(s).is_ok(),
        };
        if ok {
            return None;
        }
        Some(match self {
            Self::Any => "is invalid",
            Self::Url => "must be a valid URL",
            Self::Email => "must be a valid email",
            Self::DateTime => "must be an ISO-8601 datetime",
        })
    }
}

/// One named field of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub rule: Rule,
    pub required: bool,
}

/// Ordered set of field rules for one object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetSchema {
    fields: Vec<Field>,
}

impl WidgetSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: &str, rule: Rule) -> Self {
        self.fields.push(Field {
            name: name.to_owned(),
            rule,
            required: true,
        });
        self
    }

    pub fn optional(mut self, name: &str, rule: Rule) -> Self {
        self.fields.push(Field {
            name: name.to_owned(),
            rule,
            required: false,
        });
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Check a payload, collecting every violation rather than stopping
    /// at the first.
    pub fn validate(&self, value: &Value) -> ValidationResult {
        let mut errors = Vec::new();
        let mut path = Vec::new();
        match value {
            Value::Object(map) => self.check_object(map, &mut path, &mut errors),
            other => errors.push(violation(
                &path,
                &format!("expected object, received {}", kind(other)),
            )),
        }
        ValidationResult::from_errors(errors)
    }

    fn check_object(&self, map: &Map<String, Value>, path: &mut Vec<String>, errors: &mut Vec<String>) {
        for field in &self.fields {
            path.push(field.name.clone());
            match map.get(&field.name) {
                Some(value) => field.rule.check(value, path, errors),
                None if field.required => errors.push(violation(path, "is required")),
                None => {}
            }
            path.pop();
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn violation(path: &[String], message: &str) -> String {
    if path.is_empty() {
        format!("{ROOT_PATH}: {message}")
    } else {
        format!("{}: {message}", path.join("."))
    }
}

fn range_message(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("must be between {lo} and {hi}"),
        (Some(lo), None) => format!("must be at least {lo}"),
        (None, Some(hi)) => format!("must be at most {hi}"),
        (None, None) => "is out of range".to_owned(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn paper() -> WidgetSchema {
        WidgetSchema::new()
            .required("id", Rule::string())
            .required("authors", Rule::list_of(Rule::string()))
            .optional("url", Rule::url())
            .optional("readAt", Rule::datetime())
            .optional("status", Rule::one_of(&["reading", "completed", "saved"]))
    }

    fn library() -> WidgetSchema {
        WidgetSchema::new()
            .optional("papers", Rule::list_of(Rule::object(paper())))
            .optional("accuracy", Rule::percentage())
    }

    #[test]
    fn partial_payload_is_valid() {
        assert!(library().validate(&json!({})).valid);
        assert!(library().validate(&json!({ "accuracy": 50 })).valid);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let result = library().validate(&json!({ "accuracy": 1, "extra": [1, 2, 3] }));
        assert!(result.valid);
    }

    #[test]
    fn out_of_range_number_names_field_and_rule() {
        let result = library().validate(&json!({ "accuracy": 150 }));
        assert_eq!(result.errors(), ["accuracy: must be between 0 and 100"]);
    }

    #[test]
    fn nested_errors_carry_index_path() {
        let result = library().validate(&json!({
            "papers": [
                { "id": "1", "authors": ["A"] },
                { "authors": ["B", 7], "url": "not a url", "status": "lost" }
            ]
        }));
        assert_eq!(
            result.errors(),
            [
                "papers.1.id: is required",
                "papers.1.authors.1: expected string, received number",
                "papers.1.url: must be a valid URL",
                "papers.1.status: must be one of reading, completed, saved",
            ]
        );
    }

    #[test]
    fn null_is_a_type_mismatch() {
        let result = library().validate(&json!({ "accuracy": null }));
        assert_eq!(result.errors(), ["accuracy: expected number, received null"]);
    }

    #[test]
    fn non_object_root_is_reported_at_root() {
        let result = library().validate(&json!([1, 2]));
        assert_eq!(result.errors(), ["(root): expected object, received array"]);
    }

    #[test]
    fn datetime_requires_full_timestamp() {
        let schema = WidgetSchema::new().optional("at", Rule::datetime());
        assert!(schema.validate(&json!({ "at": "2024-11-24T10:30:00Z" })).valid);
        assert!(schema.validate(&json!({ "at": "2024-11-24T10:30:00+02:00" })).valid);
        assert_eq!(
            schema.validate(&json!({ "at": "2024-11-24" })).errors(),
            ["at: must be an ISO-8601 datetime"]
        );
    }

    #[test]
    fn email_format() {
        assert!(is_email("alice@example.com"));
        assert!(!is_email("alice@localhost"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("a b@example.com"));
        assert!(!is_email("alice"));
    }

    #[test]
    fn number_or_string_accepts_both() {
        let schema = WidgetSchema::new().required("value", Rule::NumberOrString);
        assert!(schema.validate(&json!({ "value": 3 })).valid);
        assert!(schema.validate(&json!({ "value": "45.2K" })).valid);
        assert_eq!(
            schema.validate(&json!({ "value": true })).errors(),
            ["value: expected number or string, received boolean"]
        );
    }

    #[test]
    fn one_sided_ranges() {
        let schema = WidgetSchema::new()
            .optional(
                "low",
                Rule::Number {
                    min: Some(1.0),
                    max: None,
                },
            )
            .optional(
                "high",
                Rule::Number {
                    min: None,
                    max: Some(2.5),
                },
            );
        assert_eq!(
            schema.validate(&json!({ "low": 0, "high": 3 })).errors(),
            ["low: must be at least 1", "high: must be at most 2.5"]
        );
    }
}
