use super::Host;
use super::common::CommonArgs;
use crate::Result;
use crate::watch::{Watcher, watch_forever};
use clap::Parser;
use core::time::Duration;
use ohno::bail;
use std::io::Write;

const LOG_TARGET: &str = "     watch";

#[derive(Parser, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Polling interval in milliseconds (overrides `poll_interval_ms` from the configuration)
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,
}

/// Generate the calculator script, then regenerate it whenever a watched document changes.
///
/// A failed initial generation is reported and watching starts anyway, so fixing the
/// document brings the script back. Only returns if the watch cannot be set up.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the polling interval is zero
pub async fn watch_documents<H: Host>(host: &mut H, args: &WatchArgs) -> Result<()> {
    args.common.init_logging();

    let config = args.common.load_config()?;
    let period = args.interval_ms.map_or_else(|| config.poll_interval(), Duration::from_millis);
    if period.is_zero() {
        bail!("the polling interval must be at least 1ms");
    }

    let root = &args.common.root;
    let pipeline = config.pipeline(root);
    let watcher = Watcher::baselined(config.watched_paths(root));

    match pipeline.regenerate() {
        Ok(summary) => {
            let _ = writeln!(host.output(), "{summary}");
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Initial generation failed: {e}");
        }
    }

    watch_forever(watcher, period, move || {
        let summary = pipeline.regenerate()?;
        log::info!(target: LOG_TARGET, "{summary}");
        Ok(())
    })
    .await;

    Ok(())
}
