use thiserror::Error;

/// Top-level error type for the `dashwire-api` crate.
///
/// Covers every way a single widget request can fail: transport,
/// non-success HTTP status, authentication rejection, and payload decoding.
/// `dashwire-core` folds these into its own cloneable error type.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The endpoint rejected the request credentials (HTTP 401).
    #[error("Authentication rejected: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Widget endpoint ─────────────────────────────────────────────
    /// Non-success HTTP status, with the `{error, code}` body when present.
    #[error("Widget API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// HTTP 200 carrying a `{success: false}` envelope.
    #[error("Widget API rejected the request: {message}")]
    Rejected {
        message: String,
        code: Option<String>,
    },

    /// Widget ids must be non-empty path segments.
    #[error("Invalid widget id: {0:?}")]
    InvalidWidgetId(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Authentication { .. } => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Extract the API error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } | Self::Rejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
