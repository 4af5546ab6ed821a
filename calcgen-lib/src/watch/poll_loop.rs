use super::watcher::Watcher;
use crate::Result;
use camino::Utf8PathBuf;
use core::time::Duration;
use std::sync::Arc;
use tokio::time::MissedTickBehavior;

const LOG_TARGET: &str = "     watch";

/// What happened during one polling cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Nothing changed.
    Idle,

    /// At least one path changed and the regeneration succeeded.
    Regenerated { changed: Vec<Utf8PathBuf> },

    /// At least one path changed and the regeneration returned an error or panicked.
    Failed { changed: Vec<Utf8PathBuf> },
}

/// Poll the watcher once and regenerate if anything changed.
///
/// All paths that changed in the same cycle trigger a single regeneration. A failed
/// regeneration is logged and reported through the outcome; it never ends the watch.
pub async fn run_cycle<F>(watcher: &mut Watcher, regenerate: &Arc<F>) -> CycleOutcome
where
    F: Fn() -> Result<()> + Send + Sync + 'static,
{
    let changed = watcher.poll();
    if changed.is_empty() {
        return CycleOutcome::Idle;
    }

    for path in &changed {
        log::info!(target: LOG_TARGET, "Detected change in '{path}'");
    }

    let regenerate = Arc::clone(regenerate);
    match tokio::task::spawn_blocking(move || regenerate()).await {
        Ok(Ok(())) => CycleOutcome::Regenerated { changed },
        Ok(Err(e)) => {
            log::error!(target: LOG_TARGET, "Could not regenerate: {e:#}");
            CycleOutcome::Failed { changed }
        }
        Err(e) => {
            log::error!(target: LOG_TARGET, "Regeneration aborted: {e}");
            CycleOutcome::Failed { changed }
        }
    }
}

/// Poll the watcher every `period` and regenerate on change, until the process is terminated.
///
/// The watcher should already hold its baselines (see [`Watcher::baselined`]). Any change
/// recorded since then is picked up on the first tick.
#[expect(clippy::infinite_loop, reason = "watching ends when the process is interrupted")]
pub async fn watch_forever<F>(mut watcher: Watcher, period: Duration, regenerate: F)
where
    F: Fn() -> Result<()> + Send + Sync + 'static,
{
    let regenerate = Arc::new(regenerate);

    log::info!(
        target: LOG_TARGET,
        "Watching {} file(s) every {}ms, press Ctrl+C to stop",
        watcher.paths().len(),
        period.as_millis()
    );

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let _ = ticker.tick().await;
        let _ = run_cycle(&mut watcher, &regenerate).await;
    }
}
