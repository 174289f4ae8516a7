//! Write-behind persistence of the timer and history lists

use std::sync::Arc;
use serde::Serialize;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    state::AppState,
    storage::{save_json, KeyValueStore, HISTORY_KEY, TIMERS_KEY},
};

/// Two independent writer tasks, one per key.
///
/// Each writes the newest value of its list after every change. Failed writes
/// are logged and dropped; the in-memory state stays authoritative.
#[derive(Debug)]
pub struct PersistenceSync {
    handles: Vec<JoinHandle<()>>,
}

impl PersistenceSync {
    /// Start writing changes made after this call
    pub fn spawn(state: &AppState, kv: Arc<dyn KeyValueStore>) -> Self {
        info!("Starting persistence sync");
        let handles = vec![
            tokio::spawn(write_behind(state.subscribe_timers(), Arc::clone(&kv), TIMERS_KEY)),
            tokio::spawn(write_behind(state.subscribe_history(), kv, HISTORY_KEY)),
        ];
        Self { handles }
    }

    /// Stop both writers, then write the current lists one last time
    pub async fn shutdown(mut self, state: &AppState, kv: &dyn KeyValueStore) {
        for handle in &self.handles {
            handle.abort();
        }
        for handle in &mut self.handles {
            // Cancelled is the expected outcome
            let _ = handle.await;
        }
        persist_now(state, kv).await;
    }
}

impl Drop for PersistenceSync {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

/// Best-effort immediate save of both lists
pub async fn persist_now(state: &AppState, kv: &dyn KeyValueStore) {
    let snapshot = state.snapshot();
    if let Err(e) = save_json(kv, TIMERS_KEY, &snapshot.timers).await {
        warn!("Final save of timers failed: {}", e);
    }
    if let Err(e) = save_json(kv, HISTORY_KEY, &snapshot.history).await {
        warn!("Final save of history failed: {}", e);
    }
}

async fn write_behind<T>(mut rx: watch::Receiver<Vec<T>>, kv: Arc<dyn KeyValueStore>, key: &'static str)
where
    T: Serialize + Clone + Send + Sync + 'static,
{
    // Whatever is current at start has just been loaded
    rx.borrow_and_update();

    while rx.changed().await.is_ok() {
        let items = rx.borrow_and_update().clone();
        match save_json(kv.as_ref(), key, &items).await {
            Ok(()) => debug!("Saved {} entries to '{}'", items.len(), key),
            Err(e) => warn!("Saving '{}' failed, change dropped: {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    use crate::{
        state::{Action, CompletionRecord, Timer, TimerForm},
        storage::{hydrate, load_json, MemoryStore},
    };

    async fn settle() {
        sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn changes_are_written_behind() {
        let kv = Arc::new(MemoryStore::new());
        let state = AppState::new();
        let sync = PersistenceSync::spawn(&state, kv.clone());

        let timer = state.submit(TimerForm::new("Study", "25", "Work")).unwrap();
        settle().await;

        let saved: Vec<Timer> = load_json(kv.as_ref(), TIMERS_KEY).await.unwrap().unwrap();
        assert_eq!(saved, vec![timer.clone()]);
        assert_eq!(kv.raw(HISTORY_KEY), None);

        state.dispatch(Action::ToggleRunning(timer.id.clone()));
        state.dispatch(Action::CompleteTimer(timer.id));
        settle().await;
        let history: Vec<CompletionRecord> =
            load_json(kv.as_ref(), HISTORY_KEY).await.unwrap().unwrap();
        assert_eq!(history.len(), 1);

        drop(sync);
    }

    #[tokio::test(start_paused = true)]
    async fn hydrated_values_are_not_written_back() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(TIMERS_KEY, "[]".into()).await.unwrap();

        let state = AppState::new();
        hydrate(&state, kv.as_ref()).await;
        let _sync = PersistenceSync::spawn(&state, kv.clone());
        settle().await;

        assert_eq!(kv.raw(HISTORY_KEY), None);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_writes_are_dropped_and_later_ones_succeed() {
        let kv = Arc::new(MemoryStore::new());
        let state = AppState::new();
        let _sync = PersistenceSync::spawn(&state, kv.clone());

        kv.set_failing(true);
        state.submit(TimerForm::new("Lost", "5", "Work")).unwrap();
        settle().await;
        assert_eq!(kv.raw(TIMERS_KEY), None);
        assert_eq!(state.timers().len(), 1);

        kv.set_failing(false);
        state.submit(TimerForm::new("Kept", "5", "Work")).unwrap();
        settle().await;
        let saved: Vec<Timer> = load_json(kv.as_ref(), TIMERS_KEY).await.unwrap().unwrap();
        assert_eq!(saved.len(), 2);
    }

    #[tokio::test]
    async fn shutdown_flushes_current_state() {
        let kv = Arc::new(MemoryStore::new());
        let state = AppState::new();
        state.submit(TimerForm::new("Study", "25", "Work")).unwrap();

        let sync = PersistenceSync::spawn(&state, kv.clone());
        sync.shutdown(&state, kv.as_ref()).await;

        let saved: Vec<Timer> = load_json(kv.as_ref(), TIMERS_KEY).await.unwrap().unwrap();
        assert_eq!(saved.len(), 1);
        assert!(kv.raw(HISTORY_KEY).is_some());
    }
}
