//! Completion notification logger

use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};
use tracing::{info, warn};

use crate::state::AppState;

/// Log every timer completion until the state is dropped
pub fn spawn_completion_log(state: &AppState) -> JoinHandle<usize> {
    let mut completions = state.subscribe_completions();
    tokio::spawn(async move {
        let mut logged = 0;
        loop {
            match completions.recv().await {
                Ok(completion) => {
                    logged += 1;
                    info!(
                        "Timer \"{}\" completed! ({} at {})",
                        completion.name, completion.timer_id, completion.record.time
                    );
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Completion log fell behind, {} notifications skipped", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
        logged
    })
}
