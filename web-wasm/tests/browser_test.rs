//! ブラウザ上でのテスト（wasm-pack test --headless --firefox）

use boardcheck_common::storage::{self, HISTORY_KEY, LANGUAGE_KEY};
use boardcheck_common::{
    ApiClient, ClientConfig, HistoryEntry, KeyValueStore, Language, TransportError,
};
use boardcheck_web::api::{classify_rejection, FetchBackend};
use wasm_bindgen::JsValue;
use boardcheck_web::storage::BrowserStore;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_browser_store_round_trip() {
    let store = BrowserStore::open();
    assert!(storage::write(&store, LANGUAGE_KEY, &Language::Ar));
    assert_eq!(store.get_item(LANGUAGE_KEY).unwrap().as_deref(), Some("\"ar\""));
    assert_eq!(storage::read(&store, LANGUAGE_KEY, Language::En), Language::Ar);
}

#[wasm_bindgen_test]
fn test_browser_store_malformed_history() {
    let store = BrowserStore::open();
    store.set_item(HISTORY_KEY, "not json").unwrap();
    let history: Vec<HistoryEntry> = storage::read(&store, HISTORY_KEY, Vec::new());
    assert!(history.is_empty());
}

#[wasm_bindgen_test]
async fn test_unreachable_server_reports_offline() {
    // 予約済みポートで接続を拒否させる
    let mut config = ClientConfig::with_base_url("http://127.0.0.1:9");
    config.health_retries = 0;
    config.health_timeout_secs = 2;
    let api = ApiClient::new(FetchBackend, config);

    assert!(!api.check_health().await);
}

#[wasm_bindgen_test]
fn test_fetch_rejection_classification() {
    let network: JsValue = js_sys::TypeError::new("Failed to fetch").into();
    assert!(matches!(classify_rejection(&network, false), TransportError::Connection(_)));
    assert_eq!(classify_rejection(&network, true), TransportError::Timeout);

    // text() や dyn_into の失敗は接続失敗ではない
    let other = JsValue::from_str("body stream already read");
    assert_eq!(
        classify_rejection(&other, false),
        TransportError::Other("body stream already read".to_string())
    );
}
