//! CLI error types with miette diagnostics.
//!
//! Maps configuration and validation failures into user-facing errors
//! with actionable help text. Fetches themselves never fail; a network
//! problem only surfaces here when a command needs live data.

use miette::Diagnostic;
use thiserror::Error;

use dashwire_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const INVALID_DATA: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("No backend configured")]
    #[diagnostic(
        code(dashwire::no_config),
        help(
            "Pass --base-url (or set DASHWIRE_BASE_URL), or add a profile to\n\
             {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(dashwire::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No token available for profile '{profile}'")]
    #[diagnostic(
        code(dashwire::no_credentials),
        help("Export ${var}, pass --token, or set `token` in the profile.")
    )]
    NoCredentials { profile: String, var: String },

    #[error("Configuration could not be loaded: {message}")]
    #[diagnostic(code(dashwire::config), help("Check the TOML syntax in {path}"))]
    Config { message: String, path: String },

    #[error("Could not build the widget client: {message}")]
    #[diagnostic(
        code(dashwire::client),
        help("Check base_url, ca_cert and path_prefix in the active profile.")
    )]
    Client { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(dashwire::validation))]
    Validation { field: String, reason: String },

    #[error("Payload for '{widget_id}' failed validation ({count} error(s))")]
    #[diagnostic(code(dashwire::invalid_data))]
    InvalidData { widget_id: String, count: usize },

    // ── Network ──────────────────────────────────────────────────────
    #[error("Could not fetch '{widget_id}': {reason}")]
    #[diagnostic(
        code(dashwire::fetch_failed),
        help(
            "Check that the backend is reachable, or use --insecure (-k)\n\
             for self-signed certificates and --timeout for slow endpoints."
        )
    )]
    FetchFailed { widget_id: String, reason: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(dashwire::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(dashwire::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoCredentials { .. } => exit_code::AUTH,
            Self::FetchFailed { .. } => exit_code::CONNECTION,
            Self::InvalidData { .. } => exit_code::INVALID_DATA,
            Self::Validation { .. } | Self::NoConfig { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::MissingToken { profile, var } => Self::NoCredentials { profile, var },
            ConfigError::Client(e) => Self::Client {
                message: e.to_string(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
                path: dashwire_config::config_path().display().to_string(),
            },
        }
    }
}
