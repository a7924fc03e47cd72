// Async HTTP client for dashboard widget endpoints.
//
// Base path: {base_url}/{path_prefix}/{widget_id}
// Auth: optional `Authorization: Bearer` header

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Default path under the base URL that serves widget payloads.
pub const DEFAULT_PATH_PREFIX: &str = "api/dashboard/widgets";

// ── Error response shape ─────────────────────────────────────────────

/// Backends answer failures with `{"error": "...", "code": "..."}`.
#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Payload envelope ─────────────────────────────────────────────────

/// How the widget payload is laid out in a successful response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayloadEnvelope {
    /// The whole body is the widget payload.
    #[default]
    Raw,
    /// The body is `{ "success": bool, "data": <payload>, ... }`.
    SuccessData,
}

impl PayloadEnvelope {
    /// Extract the widget payload from a decoded response body.
    pub fn open(self, body: Value) -> Result<Value, Error> {
        match self {
            Self::Raw => Ok(body),
            Self::SuccessData => {
                let Value::Object(mut map) = body else {
                    return Err(Error::Deserialization {
                        message: "expected an object envelope".into(),
                        body: body.to_string(),
                    });
                };

                if map.get("success").and_then(Value::as_bool) == Some(false) {
                    let message = map
                        .get("error")
                        .or_else(|| map.get("message"))
                        .and_then(Value::as_str)
                        .unwrap_or("request failed")
                        .to_owned();
                    let code = map.get("code").and_then(Value::as_str).map(String::from);
                    return Err(Error::Rejected { message, code });
                }

                map.remove("data").ok_or_else(|| Error::Deserialization {
                    message: "envelope has no `data` field".into(),
                    body: Value::Object(map).to_string(),
                })
            }
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for per-widget data endpoints.
///
/// One `GET` per widget id, returning the decoded JSON payload. Non-success
/// statuses, transport failures and undecodable bodies all surface as
/// [`Error`]; the caller decides what to fall back to.
#[derive(Debug, Clone)]
pub struct WidgetClient {
    http: reqwest::Client,
    base_url: String,
    endpoint: Url,
    envelope: PayloadEnvelope,
}

impl WidgetClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build an unauthenticated client from a base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Build a client that sends `Authorization: Bearer <token>` on every request.
    pub fn with_token(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid token header value: {e}"),
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        let http = transport.build_client_with_headers(headers)?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: base_url.to_owned(),
            endpoint: Self::endpoint_url(base_url, DEFAULT_PATH_PREFIX)?,
            envelope: PayloadEnvelope::default(),
        })
    }

    /// Serve widgets from `{base_url}/{prefix}/` instead of the default path.
    pub fn with_path_prefix(mut self, prefix: &str) -> Result<Self, Error> {
        self.endpoint = Self::endpoint_url(&self.base_url, prefix)?;
        Ok(self)
    }

    pub fn with_envelope(mut self, envelope: PayloadEnvelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Normalize `{base}` + `{prefix}` into a directory URL ending in `/`.
    fn endpoint_url(base_url: &str, prefix: &str) -> Result<Url, Error> {
        let mut url = Url::parse(base_url)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let path = url.path().trim_end_matches('/').to_owned();
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/{prefix}/"));
        }

        Ok(url)
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The directory URL widget ids are appended to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn envelope(&self) -> PayloadEnvelope {
        self.envelope
    }

    /// Full URL for one widget. The id is percent-encoded as a single segment.
    pub fn widget_url(&self, widget_id: &str) -> Result<Url, Error> {
        if widget_id.is_empty() {
            return Err(Error::InvalidWidgetId(widget_id.to_owned()));
        }

        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidWidgetId(widget_id.to_owned()))?
            .pop_if_empty()
            .push(widget_id);
        Ok(url)
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Fetch the raw payload for one widget.
    pub async fn fetch_widget(&self, widget_id: &str) -> Result<Value, Error> {
        let url = self.widget_url(widget_id)?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        self.handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        let decoded: Value = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        self.envelope.open(decoded)
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<ErrorResponse>(&raw).ok();

        let message = parsed
            .as_ref()
            .and_then(|e| e.error.clone().or_else(|| e.message.clone()))
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.chars().take(200).collect()
                }
            });

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Authentication { message };
        }

        Error::Api {
            status: status.as_u16(),
            message,
            code: parsed.and_then(|e| e.code),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn client(base: &str) -> WidgetClient {
        WidgetClient::from_reqwest(base, reqwest::Client::new()).unwrap()
    }

    #[test]
    fn widget_url_appends_default_prefix() {
        let c = client("https://dash.example.com");
        assert_eq!(
            c.widget_url("research-progress").unwrap().as_str(),
            "https://dash.example.com/api/dashboard/widgets/research-progress"
        );
    }

    #[test]
    fn widget_url_keeps_base_path() {
        let c = client("https://dash.example.com/app/");
        assert_eq!(
            c.widget_url("notes").unwrap().as_str(),
            "https://dash.example.com/app/api/dashboard/widgets/notes"
        );
    }

    #[test]
    fn widget_url_escapes_id_as_one_segment() {
        let c = client("https://dash.example.com");
        let url = c.widget_url("a b/c").unwrap();
        assert_eq!(url.path(), "/api/dashboard/widgets/a%20b%2Fc");
    }

    #[test]
    fn empty_widget_id_is_rejected() {
        let c = client("https://dash.example.com");
        assert!(matches!(
            c.widget_url(""),
            Err(Error::InvalidWidgetId(id)) if id.is_empty()
        ));
    }

    #[test]
    fn custom_prefix_replaces_default() {
        let c = client("https://dash.example.com/app")
            .with_path_prefix("/v2/widgets/")
            .unwrap();
        assert_eq!(c.endpoint().as_str(), "https://dash.example.com/app/v2/widgets/");
    }

    #[test]
    fn cannot_be_a_base_url_is_rejected() {
        let err = WidgetClient::from_reqwest("mailto:ops@example.com", reqwest::Client::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn raw_envelope_passes_body_through() {
        let body = json!({ "papersRead": 3 });
        assert_eq!(PayloadEnvelope::Raw.open(body.clone()).unwrap(), body);
    }

    #[test]
    fn success_data_envelope_unwraps_data() {
        let body = json!({ "success": true, "data": { "totalNotes": 4 }, "cached": false });
        assert_eq!(
            PayloadEnvelope::SuccessData.open(body).unwrap(),
            json!({ "totalNotes": 4 })
        );
    }

    #[test]
    fn success_data_envelope_reports_rejection() {
        let body = json!({ "success": false, "error": "Unknown widget", "code": "VALIDATION_ERROR" });
        let err = PayloadEnvelope::SuccessData.open(body).unwrap_err();
        assert_eq!(err.api_error_code(), Some("VALIDATION_ERROR"));
        assert!(matches!(err, Error::Rejected { message, .. } if message == "Unknown widget"));
    }

    #[test]
    fn success_data_envelope_requires_data() {
        let err = PayloadEnvelope::SuccessData
            .open(json!({ "success": true }))
            .unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }
}
