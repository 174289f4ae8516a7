//! Once-per-period countdown clock

use std::time::Duration;
use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::state::{AppState, SharedState};

/// Handle to the running tick task. Dropping it cancels the task.
#[derive(Debug)]
pub struct TickDriver {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TickDriver {
    /// Start ticking every `period`; the first fire is one period from now
    pub fn spawn(state: SharedState, period: Duration) -> Self {
        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(tick_task(state, period, stop_rx));
        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Cancel the clock and wait until it has stopped dispatching
    pub async fn stop(mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!("Tick driver task failed: {}", e);
            }
        }
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Background task: on every fire, advance running timers and complete finished ones.
///
/// The interval restarts whenever the timer list changes, so each fire works on the latest list.
async fn tick_task(state: SharedState, period: Duration, mut stop_rx: oneshot::Receiver<()>) {
    info!("Starting tick driver with a {:?} period", period);

    let mut timers_rx = state.subscribe_timers();
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            _ = &mut stop_rx => break,

            changed = timers_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                timers_rx.borrow_and_update();
                interval.reset();
            }

            _ = interval.tick() => fire(&state),
        }
    }

    info!("Tick driver stopped");
}

fn fire(state: &AppState) {
    let completions = state.fire();
    if !completions.is_empty() {
        debug!("Clock fire completed {} timer(s)", completions.len());
    }
}
