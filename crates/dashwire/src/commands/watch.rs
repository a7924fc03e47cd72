//! `watch`: subscribe to a widget and refresh it on an interval.

use tokio::time::MissedTickBehavior;

use crate::cli::{OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

pub async fn handle(args: WatchArgs, ctx: &Context) -> Result<(), CliError> {
    let manager = ctx.manager()?;
    let overrides = util::with_strategy(ctx.overrides(), args.strategy);

    let format = ctx.format();
    let color = ctx.color();
    let quiet = ctx.global.quiet;
    let subscription = manager.subscribe_to_widget(&args.id, move |data| {
        let rendered = match format {
            OutputFormat::Table | OutputFormat::Plain => Ok(output::summary_line(data, color)),
            // One document per update
            OutputFormat::Json | OutputFormat::JsonCompact => output::render_single(
                OutputFormat::JsonCompact,
                data,
                |_| String::new(),
                |_| String::new(),
            ),
            OutputFormat::Yaml => {
                output::render_single(format, data, |_| String::new(), |_| String::new())
                    .map(|doc| format!("---\n{doc}"))
            }
        };
        match rendered {
            Ok(text) => output::print_output(&text, quiet),
            Err(e) => tracing::warn!(error = %e, "failed to render update"),
        }
    });

    let mut ticker = tokio::time::interval(args.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut remaining = args.count;

    while remaining != Some(0) {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }
        manager.fetch_widget_data(&args.id, overrides).await;
        if let Some(n) = remaining.as_mut() {
            *n = n.saturating_sub(1);
        }
    }

    subscription.unsubscribe();
    tracing::debug!(widget_id = %args.id, "watch finished");
    Ok(())
}
