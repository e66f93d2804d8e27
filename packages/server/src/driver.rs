//! Drives the debounce scheduler on the tokio runtime

use crate::AppState;
use std::time::Instant;
use tokio::task::JoinHandle;

/// Sleep until the session's pending commit is due and fire it.
///
/// Every handled event wakes the driver so a cancelled or rescheduled commit
/// is picked up before the old deadline passes.
pub fn spawn_scheduler_driver(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match state.next_deadline() {
                Some(due) => {
                    tokio::select! {
                        _ = tokio::time::sleep_until(tokio::time::Instant::from_std(due)) => {
                            if let Some(frame) = state.tick(Instant::now()) {
                                tracing::debug!(generation = frame.generation, "debounced commit fired");
                            }
                        }
                        _ = state.woken() => {}
                    }
                }
                None => state.woken().await,
            }
        }
    })
}
