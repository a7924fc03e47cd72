//! Configuration for the dashwire CLI.
//!
//! TOML profiles (one per widget backend), token resolution (env +
//! plaintext), and translation into `dashwire_api::WidgetClient` and
//! `dashwire_core::ManagerConfig`. The engine itself never reads files or
//! the environment; only this crate does.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dashwire_api::{PayloadEnvelope, TlsMode, TransportConfig, WidgetClient};
use dashwire_core::config::builtin_profiles;
use dashwire_core::{FetchConfig, FetchOverrides, FetchStrategy, ManagerConfig};

/// Prefix of environment variables that override file settings.
/// Nested keys are separated by `__`, e.g. `DASHWIRE_DEFAULTS__TIMEOUT_MS`.
pub const ENV_PREFIX: &str = "DASHWIRE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("profile '{profile}' reads its token from ${var}, which is not set")]
    MissingToken { profile: String, var: String },

    #[error("failed to build widget client: {0}")]
    Client(#[from] dashwire_api::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named widget backends.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub strategy: FetchStrategy,

    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            strategy: FetchStrategy::default(),
            ttl_ms: default_ttl_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_ttl_ms() -> u64 {
    duration_ms(dashwire_core::DEFAULT_TTL)
}
fn default_timeout_ms() -> u64 {
    duration_ms(dashwire_core::DEFAULT_TIMEOUT)
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// A named widget backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Base URL of the dashboard (e.g. "https://dash.example.com").
    pub base_url: String,

    /// Bearer token (plaintext; prefer `token_env`).
    pub token: Option<String>,

    /// Environment variable holding the bearer token.
    pub token_env: Option<String>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Response layout: "raw" or "success-data".
    #[serde(default)]
    pub envelope: PayloadEnvelope,

    /// Path under `base_url` serving widgets (default "api/dashboard/widgets").
    pub path_prefix: Option<String>,

    /// Per-widget refresh profiles, layered over the built-in ones.
    #[serde(default)]
    pub widgets: HashMap<String, WidgetProfile>,
}

/// Per-widget overrides as written in TOML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WidgetProfile {
    pub strategy: Option<FetchStrategy>,
    pub ttl_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
}

impl WidgetProfile {
    pub fn to_overrides(self) -> FetchOverrides {
        FetchOverrides {
            strategy: self.strategy,
            ttl: self.ttl_ms.map(Duration::from_millis),
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "dashwire", "dashwire").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("dashwire");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn file_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
}

/// Load the config from `path` plus `DASHWIRE_` environment overrides.
pub fn load_config_at(path: &Path) -> Result<Config, ConfigError> {
    let config = file_figment(path)
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    Ok(config)
}

/// Load the config from `path` only, ignoring the environment.
/// A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    Ok(file_figment(path).extract()?)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profiles ────────────────────────────────────────────────────────

impl Config {
    /// Look up a profile by name, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }

    /// Engine configuration: global defaults, built-in widget profiles,
    /// then the profile's own widget entries.
    pub fn manager_config(&self, profile: Option<&Profile>) -> ManagerConfig {
        let defaults = FetchConfig {
            strategy: self.defaults.strategy,
            ttl: Duration::from_millis(self.defaults.ttl_ms),
            timeout: Duration::from_millis(self.defaults.timeout_ms),
        };

        let mut widgets = builtin_profiles();
        if let Some(profile) = profile {
            for (id, entry) in &profile.widgets {
                let layered = widgets
                    .get(id)
                    .copied()
                    .unwrap_or_default()
                    .merge(&entry.to_overrides());
                widgets.insert(id.clone(), layered);
            }
        }

        ManagerConfig { defaults, widgets }
    }
}

// ── Token resolution ────────────────────────────────────────────────

/// Resolve the bearer token: `token_env` first, then plaintext `token`.
///
/// `Ok(None)` means the profile is unauthenticated. Naming an unset
/// variable with no plaintext fallback is an error.
pub fn resolve_token(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<SecretString>, ConfigError> {
    if let Some(ref var) = profile.token_env {
        if let Ok(value) = std::env::var(var) {
            return Ok(Some(SecretString::from(value)));
        }
        if profile.token.is_none() {
            return Err(ConfigError::MissingToken {
                profile: profile_name.into(),
                var: var.clone(),
            });
        }
    }

    Ok(profile.token.clone().map(SecretString::from))
}

// ── Client construction ─────────────────────────────────────────────

impl Profile {
    /// A profile with only a base URL: raw payloads at the default path,
    /// no token, system TLS.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            token_env: None,
            insecure: None,
            ca_cert: None,
            envelope: PayloadEnvelope::Raw,
            path_prefix: None,
            widgets: HashMap::new(),
        }
    }

    /// Transport settings. The HTTP client timeout is a safety net above
    /// the engine's per-call timeout.
    pub fn transport_config(&self, defaults: &Defaults) -> TransportConfig {
        let tls = if self.insecure.unwrap_or(false) {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca) = self.ca_cert {
            TlsMode::CustomCa(ca.clone())
        } else {
            TlsMode::System
        };

        let base = TransportConfig::default();
        let timeout = base.timeout.max(Duration::from_millis(defaults.timeout_ms));
        base.with_tls(tls).with_timeout(timeout)
    }

    /// Check the base URL without building anything.
    pub fn validate(&self) -> Result<url::Url, ConfigError> {
        let url: url::Url = self
            .base_url
            .parse()
            .map_err(|e| ConfigError::Validation {
                field: "base_url".into(),
                reason: format!("{e}: {}", self.base_url),
            })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "base_url".into(),
                reason: format!("expected an http(s) URL, got {}", self.base_url),
            });
        }
        Ok(url)
    }
}

/// Build the widget client for a profile.
pub fn build_client(
    profile: &Profile,
    profile_name: &str,
    transport: &TransportConfig,
) -> Result<WidgetClient, ConfigError> {
    profile.validate()?;

    let client = match resolve_token(profile, profile_name)? {
        Some(token) => WidgetClient::with_token(&profile.base_url, &token, transport)?,
        None => WidgetClient::new(&profile.base_url, transport)?,
    };
    let client = match profile.path_prefix.as_deref() {
        Some(prefix) => client.with_path_prefix(prefix)?,
        None => client,
    };
    Ok(client.with_envelope(profile.envelope))
}
