//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use super::{Action, CompletionRecord, Completion, FormErrors, Timer, TimerForm, TimerStore};

/// Snapshot of the store handed out to readers
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub timers: Vec<Timer>,
    pub history: Vec<CompletionRecord>,
    pub form: TimerForm,
    pub notification: Option<String>,
    pub collapsed: Vec<(String, bool)>,
}

/// Shared application state: one store, serialized access, change notifications
#[derive(Debug)]
pub struct AppState {
    store: Mutex<TimerStore>,
    /// Server metadata
    pub start_time: Instant,
    /// Last action tracking
    last_action: Mutex<Option<(&'static str, DateTime<Utc>)>>,
    /// Latest timer list, published after every change
    timers_tx: watch::Sender<Vec<Timer>>,
    /// Latest history list, published after every change
    history_tx: watch::Sender<Vec<CompletionRecord>>,
    /// Completion events for notification consumers
    completion_tx: broadcast::Sender<Completion>,
}

impl AppState {
    /// Create an AppState around an empty store
    pub fn new() -> Self {
        Self::with_store(TimerStore::new())
    }

    pub fn with_store(store: TimerStore) -> Self {
        let (timers_tx, _) = watch::channel(store.timers().to_vec());
        let (history_tx, _) = watch::channel(store.history().to_vec());
        let (completion_tx, _) = broadcast::channel(100);

        Self {
            store: Mutex::new(store),
            start_time: Instant::now(),
            last_action: Mutex::new(None),
            timers_tx,
            history_tx,
            completion_tx,
        }
    }

    fn lock_store(&self) -> MutexGuard<'_, TimerStore> {
        self.store.lock().unwrap_or_else(|poisoned| {
            warn!("Timer store lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Run an update against the store and publish whatever it changed.
    ///
    /// The store lock is held for the whole update, so updates never interleave.
    pub fn update_store<F, R>(&self, action: &'static str, updater: F) -> R
    where
        F: FnOnce(&mut TimerStore) -> R,
    {
        let mut store = self.lock_store();
        let timers_before = store.timers().to_vec();
        let history_before = store.history().to_vec();

        let result = updater(&mut *store);

        let timers = (store.timers() != timers_before.as_slice()).then(|| store.timers().to_vec());
        let history =
            (store.history() != history_before.as_slice()).then(|| store.history().to_vec());
        drop(store); // Release the lock early

        if let Ok(mut last) = self.last_action.lock() {
            *last = Some((action, Utc::now()));
        }

        // Notify watchers of the lists that actually changed
        if let Some(timers) = timers {
            self.timers_tx.send_replace(timers);
        }
        if let Some(history) = history {
            self.history_tx.send_replace(history);
        }

        result
    }

    /// Apply one operation
    pub fn dispatch(&self, action: Action) -> Option<Completion> {
        let completion = self.update_store(action.name(), |store| store.apply(action));
        if let Some(completion) = &completion {
            // No subscribers is fine
            let _ = self.completion_tx.send(completion.clone());
        }
        completion
    }

    /// Submit the form draft: add the timer, or flag the attempt and report field errors
    pub fn submit_form(&self) -> Result<Timer, FormErrors> {
        self.update_store("submit-form", submit_draft)
    }

    /// Replace the whole form draft and submit it as one operation
    pub fn submit(&self, form: TimerForm) -> Result<Timer, FormErrors> {
        self.update_store("submit-form", |store| {
            store.apply(Action::SetFormName(form.name));
            store.apply(Action::SetFormDuration(form.duration));
            store.apply(Action::SetFormCategory(form.category));
            submit_draft(store)
        })
    }

    /// One clock fire over the whole timer list, under a single lock
    pub fn fire(&self) -> Vec<Completion> {
        let completions = self.update_store("tick", TimerStore::fire);
        for completion in &completions {
            // No subscribers is fine
            let _ = self.completion_tx.send(completion.clone());
        }
        completions
    }

    pub fn timers(&self) -> Vec<Timer> {
        self.lock_store().timers().to_vec()
    }

    pub fn history(&self) -> Vec<CompletionRecord> {
        self.lock_store().history().to_vec()
    }

    pub fn notification(&self) -> Option<String> {
        self.lock_store().notification().map(str::to_string)
    }

    /// Read everything at once under a single lock
    pub fn snapshot(&self) -> StoreSnapshot {
        let store = self.lock_store();
        let collapsed = store
            .grouped()
            .into_iter()
            .map(|group| {
                let flag = store.is_collapsed(&group.category);
                (group.category, flag)
            })
            .collect();

        StoreSnapshot {
            timers: store.timers().to_vec(),
            history: store.history().to_vec(),
            form: store.form().clone(),
            notification: store.notification().map(str::to_string),
            collapsed,
        }
    }

    /// Watch the timer list
    pub fn subscribe_timers(&self) -> watch::Receiver<Vec<Timer>> {
        self.timers_tx.subscribe()
    }

    /// Watch the history list
    pub fn subscribe_history(&self) -> watch::Receiver<Vec<CompletionRecord>> {
        self.history_tx.subscribe()
    }

    pub fn subscribe_completions(&self) -> broadcast::Receiver<Completion> {
        self.completion_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock().ok().and_then(|a| *a) {
            Some((name, at)) => (Some(name.to_string()), Some(at)),
            None => (None, None),
        }
    }
}

fn submit_draft(store: &mut TimerStore) -> Result<Timer, FormErrors> {
    let validated = store.form().validate();
    match validated {
        Ok(new_timer) => Ok(store.add_timer(new_timer.name, new_timer.category, new_timer.duration)),
        Err(errors) => {
            info!("Refusing timer submission: {:?}", errors);
            store.apply(Action::SetAttemptedSubmit(true));
            Err(errors)
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle used by tasks and handlers
pub type SharedState = Arc<AppState>;
