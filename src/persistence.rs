use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use codee::string::JsonSerdeCodec;
use codee::{Decoder, Encoder};
use leptos::logging::log;
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen_futures::JsFuture;

use crate::config::Variant;
use crate::types::{HistoryEntry, PersistedFormSnapshot};
use crate::utils;

// --- Storage keys ---
pub const FORM_DATA_KEY: &str = "lyra_form_data";
pub const LATEST_RESULT_KEY: &str = "lyra_latest_result";
pub const HISTORY_KEY: &str = "lyra_optimization_history";

/// String key-value storage the controller persists into.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Origin-scoped `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| anyhow!("[STORAGE] No window available"))?
            .local_storage()
            .map_err(|e| anyhow!("[STORAGE] localStorage access denied: {:?}", e))?
            .ok_or_else(|| anyhow!("[STORAGE] localStorage not available"))
    }

    pub fn is_available() -> bool {
        Self::storage().is_ok()
    }
}

impl KeyValueStore for LocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| anyhow!("[STORAGE] Get '{}': {:?}", key, e))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| anyhow!("[STORAGE] Set '{}': {:?}", key, e))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| anyhow!("[STORAGE] Remove '{}': {:?}", key, e))
    }
}

/// `chrome.storage.local`, scoped to the extension installation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionStore;

impl KeyValueStore for ExtensionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = JsFuture::from(utils::extension_storage_get(key))
            .await
            .map_err(|e| anyhow!("[STORAGE] Extension get '{}': {:?}", key, e))?;
        Ok(value.as_string())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        JsFuture::from(utils::extension_storage_set(key, value))
            .await
            .map_err(|e| anyhow!("[STORAGE] Extension set '{}': {:?}", key, e))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        JsFuture::from(utils::extension_storage_remove(key))
            .await
            .map_err(|e| anyhow!("[STORAGE] Extension remove '{}': {:?}", key, e))?;
        Ok(())
    }
}

/// In-memory map. Used when no durable storage is reachable.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum BrowserStore {
    Local(LocalStore),
    Extension(ExtensionStore),
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn detect(variant: Variant) -> Self {
        match variant {
            Variant::Extension => BrowserStore::Extension(ExtensionStore),
            Variant::Web if LocalStore::is_available() => BrowserStore::Local(LocalStore),
            Variant::Web => {
                log!("[WARN] [STORAGE] localStorage unavailable, keeping form data in memory.");
                BrowserStore::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for BrowserStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            BrowserStore::Local(store) => store.get(key).await,
            BrowserStore::Extension(store) => store.get(key).await,
            BrowserStore::Memory(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        match self {
            BrowserStore::Local(store) => store.set(key, value).await,
            BrowserStore::Extension(store) => store.set(key, value).await,
            BrowserStore::Memory(store) => store.set(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match self {
            BrowserStore::Local(store) => store.remove(key).await,
            BrowserStore::Extension(store) => store.remove(key).await,
            BrowserStore::Memory(store) => store.remove(key).await,
        }
    }
}

// --- Typed access ---

pub async fn read_json<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore,
{
    match store.get(key).await? {
        Some(raw) => {
            let value = <JsonSerdeCodec as Decoder<T>>::decode(&raw)
                .map_err(|e| anyhow!("[STORAGE] Failed to deserialize '{}': {}", key, e))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

pub async fn write_json<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize,
    S: KeyValueStore,
{
    let encoded = <JsonSerdeCodec as Encoder<T>>::encode(value)
        .map_err(|e| anyhow!("[STORAGE] Failed to serialize '{}': {}", key, e))?;
    store.set(key, &encoded).await
}

/// Loads the form snapshot. With `max_age`, snapshots that are too old or carry no
/// timestamp are treated as absent.
pub async fn load_snapshot<S: KeyValueStore>(
    store: &S,
    max_age: Option<Duration>,
    now_ms: i64,
) -> Result<Option<PersistedFormSnapshot>> {
    let Some(snapshot) = read_json::<PersistedFormSnapshot, _>(store, FORM_DATA_KEY).await? else {
        return Ok(None);
    };

    if let Some(max_age) = max_age {
        let max_age_ms = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
        let is_recent = snapshot
            .timestamp
            .is_some_and(|saved_at| now_ms.saturating_sub(saved_at) < max_age_ms);
        if !is_recent {
            log!(
                "[DEBUG] [STORAGE] Ignoring stale form snapshot (saved at {:?}).",
                snapshot.timestamp
            );
            return Ok(None);
        }
    }

    Ok(Some(snapshot))
}

pub async fn save_snapshot<S: KeyValueStore>(
    store: &S,
    snapshot: &PersistedFormSnapshot,
) -> Result<()> {
    write_json(store, FORM_DATA_KEY, snapshot).await
}

pub async fn clear_snapshot<S: KeyValueStore>(store: &S) -> Result<()> {
    store.remove(FORM_DATA_KEY).await
}

/// Stores `entry` as the latest result and prepends it to the history, keeping `limit` entries.
pub async fn record_result<S: KeyValueStore>(
    store: &S,
    entry: &HistoryEntry,
    limit: usize,
) -> Result<()> {
    write_json(store, LATEST_RESULT_KEY, entry).await?;

    let mut history = match load_history(store).await {
        Ok(history) => history,
        Err(e) => {
            log!("[ERROR] [STORAGE] Failed to load optimization history, starting over: {:#}", e);
            Vec::new()
        }
    };
    history.insert(0, entry.clone());
    history.truncate(limit);

    write_json(store, HISTORY_KEY, &history).await?;
    log!("[DEBUG] [STORAGE] History now holds {} entries.", history.len());
    Ok(())
}

/// Persisted history, newest first.
pub async fn load_history<S: KeyValueStore>(store: &S) -> Result<Vec<HistoryEntry>> {
    Ok(read_json::<Vec<HistoryEntry>, _>(store, HISTORY_KEY)
        .await?
        .unwrap_or_default())
}
