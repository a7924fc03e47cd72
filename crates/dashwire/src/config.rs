//! CLI configuration: thin wrapper around `dashwire_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--config, --profile, --base-url, --token, --insecure, --timeout).

use std::path::PathBuf;

use clap::ValueEnum;

use dashwire_core::{FetchOverrides, WidgetManager};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use dashwire_config::{Config, Profile};

/// Config file in effect: `--config` / `DASHWIRE_CONFIG`, else the platform path.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(dashwire_config::config_path)
}

/// Load the config file plus `DASHWIRE_` environment overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(dashwire_config::load_config_at(&config_file(global))?)
}

/// `--output` wins, then `defaults.output` from the file, then table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&config.defaults.output, true).unwrap_or(OutputFormat::Table)
    })
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// The active profile with CLI flag overrides applied.
///
/// `Ok(None)` when no profile matches and no `--base-url` was given,
/// unless a profile was named explicitly, which is an error.
pub fn resolve_profile(
    global: &GlobalOpts,
    config: &Config,
) -> Result<Option<(String, Profile)>, CliError> {
    let name = active_profile_name(global, config);

    let mut profile = match (config.profiles.get(&name), global.base_url.as_deref()) {
        (Some(profile), _) => profile.clone(),
        (None, Some(url)) => Profile::new(url),
        (None, None) if global.profile.is_some() => {
            let mut available: Vec<_> = config.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        (None, None) => return Ok(None),
    };

    // Flags beat the profile
    if let Some(ref url) = global.base_url {
        profile.base_url.clone_from(url);
    }
    if let Some(ref token) = global.token {
        profile.token = Some(token.clone());
        profile.token_env = None;
    }
    if global.insecure {
        profile.insecure = Some(true);
    }

    Ok(Some((name, profile)))
}

/// Per-call overrides from global flags.
pub fn call_overrides(global: &GlobalOpts) -> FetchOverrides {
    let mut overrides = FetchOverrides::new();
    if let Some(timeout) = global.timeout {
        overrides = overrides.with_timeout(timeout);
    }
    overrides
}

/// Build the manager for the active profile.
pub fn build_manager(global: &GlobalOpts, config: &Config) -> Result<WidgetManager, CliError> {
    let Some((name, profile)) = resolve_profile(global, config)? else {
        return Err(CliError::NoConfig {
            path: config_file(global).display().to_string(),
        });
    };

    let mut transport = profile.transport_config(&config.defaults);
    if let Some(timeout) = global.timeout.filter(|t| *t > transport.timeout) {
        transport = transport.with_timeout(timeout);
    }

    let client = dashwire_config::build_client(&profile, &name, &transport)?;
    tracing::debug!(profile = %name, endpoint = %client.endpoint(), "built widget client");
    Ok(WidgetManager::new(client, config.manager_config(Some(&profile))))
}
