//! ファイルストアのテスト
//!
//! localStorage と同じキー・値で保存・復元できることを検証

use boardcheck::FileStore;
use boardcheck_common::storage::{self, HISTORY_KEY, LANGUAGE_KEY};
use boardcheck_common::{HistoryEntry, KeyValueStore, Language};
use tempfile::tempdir;

/// 存在しないファイルは空として扱う
#[test]
fn test_missing_file_is_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path().join("store.json"));

    assert_eq!(store.get_item(LANGUAGE_KEY).expect("読み込み失敗"), None);
    assert_eq!(storage::read(&store, LANGUAGE_KEY, Language::En), Language::En);
}

/// 保存と再読み込み（親ディレクトリも作成）
#[test]
fn test_save_and_reload() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("store.json");

    let store = FileStore::new(&path);
    assert!(storage::write(&store, LANGUAGE_KEY, &Language::Ar));
    assert!(storage::write(&store, HISTORY_KEY, &Vec::<HistoryEntry>::new()));

    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get_item(LANGUAGE_KEY).expect("読み込み失敗").as_deref(), Some("\"ar\""));
    assert_eq!(reopened.get_item(HISTORY_KEY).expect("読み込み失敗").as_deref(), Some("[]"));
}

/// 壊れたファイルは読み込み時は既定値、書き込み時は退避してから作り直す
#[test]
fn test_corrupt_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ not json").expect("書き込み失敗");

    let store = FileStore::new(&path);
    assert!(store.get_item(LANGUAGE_KEY).is_err());
    assert_eq!(storage::read(&store, LANGUAGE_KEY, Language::En), Language::En);

    assert!(storage::write(&store, LANGUAGE_KEY, &Language::Ar));
    assert_eq!(storage::read(&store, LANGUAGE_KEY, Language::En), Language::Ar);

    // 元の内容は消さずに残す
    let backup = std::fs::read_to_string(store.backup_path()).expect("退避ファイルがない");
    assert_eq!(backup, "{ not json");
}

/// 書き込みは置き換えで行い、一時ファイルを残さない
#[test]
fn test_write_replaces_file_without_leftovers() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("store.json");

    let store = FileStore::new(&path);
    assert!(storage::write(&store, LANGUAGE_KEY, &Language::Ar));
    assert!(storage::write(&store, HISTORY_KEY, &Vec::<HistoryEntry>::new()));

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .expect("一覧取得失敗")
        .map(|entry| entry.expect("エントリ取得失敗").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["store.json".to_string()]);

    // 既存のキーは別キーの書き込みで失われない
    assert_eq!(store.get_item(LANGUAGE_KEY).expect("読み込み失敗").as_deref(), Some("\"ar\""));
}

/// 値が不正なJSONなら既定値
#[test]
fn test_malformed_history_value() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path().join("store.json"));
    store.set_item(HISTORY_KEY, "{ invalid json }").expect("書き込み失敗");

    let history: Vec<HistoryEntry> = storage::read(&store, HISTORY_KEY, Vec::new());
    assert!(history.is_empty());
}
