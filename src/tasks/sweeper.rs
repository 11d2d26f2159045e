use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::core::state::AppState;
use crate::core::time::now_utc;
use crate::services;

/// The 1 Hz countdown sweep. Every second each in-progress session is ticked
/// against the wall clock; sessions whose deadline passed are force-submitted
/// and their real-mode results persisted. The clock itself stays in the
/// session, so a delayed sweep only delays the side effects, never the
/// grading cutoff.
pub(crate) async fn run(state: AppState, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }
        if *shutdown.borrow() {
            break;
        }

        sweep_once(&state).await;
    }

    tracing::info!("Session sweeper stopped");
}

pub(crate) async fn sweep_once(state: &AppState) {
    let retention = state.settings().exam().submitted_retention_seconds;
    let completed = state.sessions().tick_all(now_utc(), retention).await;

    for result in completed {
        if let Err(err) = services::results::record_real_result(state, result).await {
            tracing::error!(error = %err, "Failed to record auto-submitted exam result");
        }
    }
}
