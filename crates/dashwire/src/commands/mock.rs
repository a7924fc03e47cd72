//! `mock`: print the built-in mock payload for a widget.

use dashwire_core::ValidationRegistry;

use crate::cli::MockArgs;
use crate::error::CliError;
use crate::output;

use super::Context;

pub fn handle(args: &MockArgs, ctx: &Context) -> Result<(), CliError> {
    let registry = ValidationRegistry::builtin();
    if !registry.contains(&args.id) {
        tracing::warn!(widget_id = %args.id, "no mock registered, printing an empty payload");
    }

    let data = registry.mock_data(&args.id);
    let out = output::render_single(ctx.format(), &data, output::pretty_json, ToString::to_string)?;
    ctx.print(&out);
    Ok(())
}
