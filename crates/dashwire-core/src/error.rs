// ── Core error types ──
//
// Errors from the network side of a widget fetch. These never reach
// callers of the public fetch operations; the resolver turns them into
// cache or mock fallbacks and records them in the loading state.
// `Clone` so one settled network result can be handed to every
// single-flight waiter.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Network errors ───────────────────────────────────────────────
    #[error("Cannot reach widget endpoint: {reason}")]
    Transport { reason: String },

    #[error("Widget request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Widget endpoint returned HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        /// Error code from the `{error, code}` body, when present.
        code: Option<String>,
    },

    #[error("Widget endpoint rejected the request: {message}")]
    Rejected {
        message: String,
        code: Option<String>,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Malformed widget payload: {message}")]
    Deserialization { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the network attempt lost its race against the timer.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// HTTP status reported by the endpoint, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Authentication { .. } => Some(401),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<dashwire_api::Error> for CoreError {
    fn from(err: dashwire_api::Error) -> Self {
        match err {
            dashwire_api::Error::Authentication { message } => Self::Authentication { message },
            // reqwest's own client timeout stays a transport failure;
            // `Timeout` is reserved for the per-call race.
            dashwire_api::Error::Transport(ref e) => {
                if let Some(status) = e.status() {
                    Self::Status {
                        status: status.as_u16(),
                        message: e.to_string(),
                        code: None,
                    }
                } else {
                    Self::Transport {
                        reason: e.to_string(),
                    }
                }
            }
            dashwire_api::Error::Api {
                status,
                message,
                code,
            } => Self::Status {
                status,
                message,
                code,
            },
            dashwire_api::Error::Rejected { message, code } => Self::Rejected { message, code },
            dashwire_api::Error::Deserialization { message, .. } => {
                Self::Deserialization { message }
            }
            dashwire_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("invalid widget endpoint URL: {e}"),
            },
            dashwire_api::Error::InvalidWidgetId(id) => Self::Config {
                message: format!("invalid widget id {id:?}"),
            },
            dashwire_api::Error::Tls(message) => Self::Config { message },
        }
    }
}
