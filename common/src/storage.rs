//! ローカル永続化アダプタ
//!
//! キーバリューストア（ブラウザのlocalStorage、ネイティブのJSONファイル）に
//! JSONで読み書きする。読み込み失敗は既定値、書き込み失敗はログのみ。

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// 言語設定のキー
pub const LANGUAGE_KEY: &str = "language";
/// 解析履歴のキー
pub const HISTORY_KEY: &str = "analysis_history";

/// 文字列のキーバリューストア
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// JSONを読み込む
///
/// キーがない・JSONが壊れている・ストアのエラーのいずれでも `default` を返す
pub fn read<T, S>(store: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default,
        Err(err) => {
            tracing::warn!(key, error = %err, "Failed to read from storage");
            return default;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(key, error = %err, "Stored value is not valid JSON, using default");
            default
        }
    }
}

/// JSONで書き込む
///
/// 失敗してもエラーにはしない（メモリ上の状態が正）。保存できたかを返す。
pub fn write<T, S>(store: &S, key: &str, value: &T) -> bool
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(err) => {
            tracing::warn!(key, error = %err, "Failed to serialize value for storage");
            return false;
        }
    };

    match store.set_item(key, &json) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(key, error = %err, "Failed to write to storage");
            false
        }
    }
}

/// メモリ上のストア
///
/// localStorageが使えない環境の代替とテストに使う
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 書き込みを常に QuotaExceeded で失敗させる
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::QuotaExceeded);
        }
        self.insert_raw(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::types::{BoundingBox, DetectionPrediction, HistoryEntry};
    use chrono::{TimeZone, Utc};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }
    }

    fn entry(id: &str) -> HistoryEntry {
        HistoryEntry {
            id: id.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap(),
            source_filename: format!("{}.jpg", id),
            defects_found: true,
            defect_count: 1,
            original_image_reference: format!("blob:{}", id),
            result_image_reference: Some("/r.jpg".to_string()),
            predictions: vec![DetectionPrediction {
                defect_type: "short_circuit".to_string(),
                confidence: 0.875,
                bbox: BoundingBox::from_f64([1.5, 2.0, 3.0, 4.0]).expect("bbox"),
            }],
        }
    }

    #[test]
    fn test_read_missing_key_returns_default() {
        let store = MemoryStore::new();
        assert_eq!(read(&store, LANGUAGE_KEY, Language::En), Language::En);
    }

    #[test]
    fn test_read_malformed_json_returns_default() {
        let store = MemoryStore::new();
        store.insert_raw(HISTORY_KEY, "{ invalid json }");
        let history: Vec<HistoryEntry> = read(&store, HISTORY_KEY, Vec::new());
        assert!(history.is_empty());
    }

    #[test]
    fn test_read_storage_error_returns_default() {
        assert_eq!(read(&BrokenStore, LANGUAGE_KEY, Language::Ar), Language::Ar);
    }

    #[test]
    fn test_write_storage_error_is_swallowed() {
        assert!(!write(&BrokenStore, LANGUAGE_KEY, &Language::Ar));

        let store = MemoryStore::new();
        store.set_fail_writes(true);
        assert!(!write(&store, LANGUAGE_KEY, &Language::Ar));
        assert_eq!(store.raw(LANGUAGE_KEY), None);
    }

    #[test]
    fn test_history_round_trip() {
        let store = MemoryStore::new();
        let history = vec![entry("2"), entry("1")];

        assert!(write(&store, HISTORY_KEY, &history));
        let loaded: Vec<HistoryEntry> = read(&store, HISTORY_KEY, Vec::new());

        assert_eq!(loaded, history);
    }

    #[test]
    fn test_language_stored_as_json_string() {
        let store = MemoryStore::new();
        write(&store, LANGUAGE_KEY, &Language::Ar);
        assert_eq!(store.raw(LANGUAGE_KEY).as_deref(), Some("\"ar\""));
    }
}
