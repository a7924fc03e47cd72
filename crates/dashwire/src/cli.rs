//! Clap derive structures for the `dashwire` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use dashwire_core::FetchStrategy;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// dashwire -- fetch, validate and watch dashboard widget data
#[derive(Debug, Parser)]
#[command(
    name = "dashwire",
    version,
    about = "Fetch, validate and watch dashboard widget data",
    long_about = "Command-line client for dashboard widget endpoints.\n\n\
        Every fetch goes through a TTL cache with per-widget strategies and\n\
        falls back to built-in mock data when the network can't be used.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "DASHWIRE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "DASHWIRE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Dashboard base URL (overrides profile)
    #[arg(long, short = 'u', env = "DASHWIRE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Bearer token (overrides profile)
    #[arg(long, env = "DASHWIRE_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "DASHWIRE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "DASHWIRE_INSECURE", global = true)]
    pub insecure: bool,

    /// Per-widget network timeout (e.g. "8s", "500ms")
    #[arg(long, env = "DASHWIRE_TIMEOUT", value_parser = humantime::parse_duration, global = true)]
    pub timeout: Option<Duration>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List known widgets with their effective refresh settings
    #[command(alias = "ls")]
    Widgets,

    /// Fetch one or more widgets through the cache
    #[command(alias = "get")]
    Fetch(FetchArgs),

    /// Subscribe to a widget and refresh it periodically
    Watch(WatchArgs),

    /// Print the built-in mock payload for a widget
    Mock(MockArgs),

    /// Validate a payload against a widget's schema
    Validate(ValidateArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Fetch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Widget ids to fetch
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Fetch strategy for this call
    #[arg(long, short = 's', value_parser = parse_strategy)]
    pub strategy: Option<FetchStrategy>,

    /// Cache lifetime for values stored by this call (e.g. "5m")
    #[arg(long, value_parser = humantime::parse_duration)]
    pub ttl: Option<Duration>,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Widget id to watch
    pub id: String,

    /// Time between refreshes
    #[arg(long, short = 'i', default_value = "30s", value_parser = humantime::parse_duration)]
    pub interval: Duration,

    /// Stop after this many refreshes (runs until Ctrl-C if omitted)
    #[arg(long, short = 'n')]
    pub count: Option<u32>,

    /// Fetch strategy for each refresh
    #[arg(long, short = 's', value_parser = parse_strategy)]
    pub strategy: Option<FetchStrategy>,
}

// ── Mock / Validate ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MockArgs {
    /// Widget id
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Widget id whose schema applies
    pub id: String,

    /// JSON payload file ("-" for stdin); fetches from the network if omitted
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display current resolved configuration (secrets masked)
    Show,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

fn parse_strategy(s: &str) -> Result<FetchStrategy, String> {
    s.parse().map_err(|_| {
        format!("expected one of cache-first, network-first, network-only, cache-only; got '{s}'")
    })
}
