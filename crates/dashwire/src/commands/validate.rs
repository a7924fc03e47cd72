//! `validate`: check a payload against a widget's schema.
//!
//! Reads the payload from `--file` (or stdin with `-`); without one, the
//! widget is fetched live with `network-only` so the answer describes what
//! the backend serves right now.

use serde_json::Value;

use dashwire_core::{FetchStrategy, ValidationRegistry, ValidationResult};

use crate::cli::ValidateArgs;
use crate::error::CliError;
use crate::output;

use super::{Context, util};

fn detail(widget_id: &str, result: &ValidationResult, color: bool) -> String {
    let mut out = format!("{widget_id}: {}", output::validity_label(result.valid, color));
    for err in result.errors() {
        out.push_str("\n  - ");
        out.push_str(err);
    }
    out
}

async fn live_payload(widget_id: &str, ctx: &Context) -> Result<Value, CliError> {
    let manager = ctx.manager()?;
    let overrides = ctx.overrides().with_strategy(FetchStrategy::NetworkOnly);
    let data = manager.fetch_widget_data(widget_id, overrides).await;

    // network-only falls back to mock data; that payload proves nothing
    if let Some(reason) = manager.loading_state().errors.remove(widget_id) {
        return Err(CliError::FetchFailed {
            widget_id: widget_id.into(),
            reason,
        });
    }
    Ok(Value::clone(&data.data))
}

pub async fn handle(args: ValidateArgs, ctx: &Context) -> Result<(), CliError> {
    let payload = match args.file {
        Some(ref path) => util::read_json_payload(path)?,
        None => live_payload(&args.id, ctx).await?,
    };

    let registry = ValidationRegistry::builtin();
    if registry.schema(&args.id).is_none() {
        tracing::warn!(widget_id = %args.id, "no schema registered, any payload is accepted");
    }
    let result = registry.validate(&args.id, &payload);

    let color = ctx.color();
    let out = output::render_single(
        ctx.format(),
        &result,
        |r| detail(&args.id, r, color),
        |r| r.errors().join("\n"),
    )?;
    ctx.print(&out);

    if result.valid {
        Ok(())
    } else {
        Err(CliError::InvalidData {
            widget_id: args.id,
            count: result.errors().len(),
        })
    }
}
