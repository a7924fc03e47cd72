//! `widgets`: registered widgets and their effective refresh settings.

use std::collections::BTreeSet;

use serde::Serialize;
use tabled::Tabled;

use dashwire_core::{FetchStrategy, ValidationRegistry};

use crate::config;
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WidgetInfo {
    widget_id: String,
    strategy: FetchStrategy,
    ttl_ms: u64,
    timeout_ms: u64,
    /// Top-level schema fields; 0 for widgets without a schema.
    fields: usize,
    has_mock: bool,
}

#[derive(Tabled)]
struct WidgetRow {
    #[tabled(rename = "Widget")]
    id: String,
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "TTL")]
    ttl: String,
    #[tabled(rename = "Timeout")]
    timeout: String,
    #[tabled(rename = "Fields")]
    fields: usize,
}

impl From<&WidgetInfo> for WidgetRow {
    fn from(w: &WidgetInfo) -> Self {
        Self {
            id: w.widget_id.clone(),
            strategy: w.strategy.to_string(),
            ttl: util::human_duration(std::time::Duration::from_millis(w.ttl_ms)),
            timeout: util::human_duration(std::time::Duration::from_millis(w.timeout_ms)),
            fields: w.fields,
        }
    }
}

fn millis(d: std::time::Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(ctx: &Context) -> Result<(), CliError> {
    let registry = ValidationRegistry::builtin();
    let profile = config::resolve_profile(&ctx.global, &ctx.config)?;
    let manager_config = ctx
        .config
        .manager_config(profile.as_ref().map(|(_, p)| p));

    // Widgets known by schema or by refresh profile
    let ids: BTreeSet<&str> = registry
        .widget_ids()
        .into_iter()
        .chain(manager_config.widgets.keys().map(String::as_str))
        .collect();

    let overrides = ctx.overrides();
    let infos: Vec<WidgetInfo> = ids
        .into_iter()
        .map(|id| {
            let effective = manager_config.effective(id, &overrides);
            WidgetInfo {
                widget_id: id.to_owned(),
                strategy: effective.strategy,
                ttl_ms: millis(effective.ttl),
                timeout_ms: millis(effective.timeout),
                fields: registry.schema(id).map_or(0, |s| s.fields().len()),
                has_mock: registry.contains(id),
            }
        })
        .collect();

    let out = output::render_list(
        ctx.format(),
        &infos,
        |w| WidgetRow::from(w),
        |w| w.widget_id.clone(),
    )?;
    ctx.print(&out);
    Ok(())
}
