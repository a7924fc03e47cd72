//! `fetch`: resolve widgets through the cache and print the results.

use tabled::Tabled;

use dashwire_core::WidgetData;

use crate::cli::{FetchArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FetchRow {
    #[tabled(rename = "Widget")]
    id: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Valid")]
    valid: String,
    #[tabled(rename = "Updated")]
    updated: String,
    #[tabled(rename = "Errors")]
    errors: usize,
}

impl From<&WidgetData> for FetchRow {
    fn from(w: &WidgetData) -> Self {
        Self {
            id: w.widget_id.clone(),
            source: w.source.to_string(),
            valid: if w.is_valid { "yes".into() } else { "no".into() },
            updated: w.last_updated.to_rfc3339(),
            errors: w.errors().len(),
        }
    }
}

/// Single-widget table view: summary line, then the payload.
fn detail(data: &WidgetData, color: bool) -> String {
    format!(
        "{}\n{}",
        output::summary_line(data, color),
        output::pretty_json(&data.data)
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: FetchArgs, ctx: &Context) -> Result<(), CliError> {
    let manager = ctx.manager()?;

    let mut overrides = util::with_strategy(ctx.overrides(), args.strategy);
    if let Some(ttl) = args.ttl {
        overrides = overrides.with_ttl(ttl);
    }

    let results = manager.fetch_multiple(&args.ids, overrides).await;
    let items: Vec<WidgetData> = results.into_values().collect();

    let format = ctx.format();
    let out = match (format, items.as_slice()) {
        (OutputFormat::Table, [single]) => detail(single, ctx.color()),
        _ => output::render_list(
            format,
            &items,
            |w| FetchRow::from(w),
            |w| format!("{}\t{}\t{}", w.widget_id, w.source, w.is_valid),
        )?,
    };
    ctx.print(&out);

    for (widget_id, err) in manager.loading_state().errors {
        tracing::info!(widget_id = %widget_id, error = %err, "served fallback data");
    }
    Ok(())
}
