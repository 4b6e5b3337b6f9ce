//! localStorage によるキーバリューストア

use boardcheck_common::{KeyValueStore, MemoryStore, StorageError};

/// ブラウザのストア（localStorage が使えなければメモリ）
pub enum BrowserStore {
    Local(web_sys::Storage),
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn open() -> Self {
        match web_sys::window().map(|window| window.local_storage()) {
            Some(Ok(Some(storage))) => BrowserStore::Local(storage),
            _ => {
                tracing::warn!("localStorage is unavailable, history will not survive reload");
                BrowserStore::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            BrowserStore::Local(storage) => storage
                .get_item(key)
                .map_err(|err| StorageError::Unavailable(format!("{:?}", err))),
            BrowserStore::Memory(store) => store.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            // 書き込み失敗はほぼ容量超過（QuotaExceededError）
            BrowserStore::Local(storage) => storage
                .set_item(key, value)
                .map_err(|_| StorageError::QuotaExceeded),
            BrowserStore::Memory(store) => store.set_item(key, value),
        }
    }
}
