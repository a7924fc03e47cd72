//! Command dispatch: bridges CLI args -> engine calls -> output formatting.

pub mod config_cmd;
pub mod fetch;
pub mod mock;
pub mod util;
pub mod validate;
pub mod watch;
pub mod widgets;

use dashwire_core::{FetchOverrides, WidgetManager};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

/// Flags and loaded config shared by every handler.
pub struct Context {
    pub global: GlobalOpts,
    pub config: Config,
}

impl Context {
    pub fn format(&self) -> OutputFormat {
        config::output_format(&self.global, &self.config)
    }

    pub fn color(&self) -> bool {
        output::should_color(self.global.color)
    }

    pub fn overrides(&self) -> FetchOverrides {
        config::call_overrides(&self.global)
    }

    pub fn manager(&self) -> Result<WidgetManager, CliError> {
        config::build_manager(&self.global, &self.config)
    }

    pub fn print(&self, rendered: &str) {
        output::print_output(rendered, self.global.quiet);
    }
}

/// Dispatch a config-loaded command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Widgets => widgets::handle(ctx),
        Command::Fetch(args) => fetch::handle(args, ctx).await,
        Command::Watch(args) => watch::handle(args, ctx).await,
        Command::Mock(args) => mock::handle(&args, ctx),
        Command::Validate(args) => validate::handle(args, ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
