//! Durable key-value storage
//!
//! The store is an opaque async get/set of whole string values. Timers and
//! history live under two independent keys as JSON arrays.

pub mod file_store;
pub mod memory_store;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};

use crate::{
    error::{Result, StorageError},
    state::{Action, AppState, CompletionRecord, Timer},
};

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

pub const TIMERS_KEY: &str = "timers";
pub const HISTORY_KEY: &str = "history";

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a value
    async fn set(&self, key: &str, value: String) -> Result<()>;
}

/// Read and decode a JSON value
pub async fn load_json<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>> {
    match kv.get(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Json { key: key.to_string(), source }),
        None => Ok(None),
    }
}

/// Encode and write a JSON value
pub async fn save_json<T: Serialize + ?Sized>(
    kv: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)
        .map_err(|source| StorageError::Json { key: key.to_string(), source })?;
    kv.set(key, raw).await
}

/// Read a list, treating a missing value or any failure as empty
async fn load_list<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> Vec<T> {
    match load_json::<Vec<T>>(kv, key).await {
        Ok(Some(items)) => items,
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Failed to load '{}', starting empty: {}", key, e);
            Vec::new()
        }
    }
}

/// Load both lists into the store. Never fails; bad or missing data yields empty lists.
pub async fn hydrate(state: &AppState, kv: &dyn KeyValueStore) {
    let timers: Vec<Timer> = load_list(kv, TIMERS_KEY).await;
    let history: Vec<CompletionRecord> = load_list(kv, HISTORY_KEY).await;
    info!("Hydrated {} timers and {} history records", timers.len(), history.len());

    state.dispatch(Action::LoadTimers(timers));
    state.dispatch(Action::LoadHistory(history));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hydrate_loads_both_keys() {
        let kv = MemoryStore::new();
        let timer = Timer::new("5".into(), "Study".into(), "Work".into(), 25);
        save_json(&kv, TIMERS_KEY, &vec![timer.clone()]).await.unwrap();
        kv.set(HISTORY_KEY, r#"[{"id":"6","name":"Study","time":"1/1/2026, 9:00:00 AM"}]"#.into())
            .await
            .unwrap();

        let state = AppState::new();
        hydrate(&state, &kv).await;

        assert_eq!(state.timers(), vec![timer]);
        assert_eq!(state.history()[0].name, "Study");
    }

    #[tokio::test]
    async fn hydrate_falls_back_to_empty_lists() {
        let kv = MemoryStore::new();
        kv.set(TIMERS_KEY, "{not json".into()).await.unwrap();

        let state = AppState::new();
        hydrate(&state, &kv).await;
        assert!(state.timers().is_empty());
        assert!(state.history().is_empty());
    }

    #[tokio::test]
    async fn hydrate_survives_read_failures() {
        let kv = MemoryStore::failing();
        let state = AppState::new();
        hydrate(&state, &kv).await;
        assert!(state.timers().is_empty());
    }
}
