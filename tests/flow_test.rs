//! 解析フローの結合テスト
//!
//! 状態機械・APIクライアント・ファイルストアを組み合わせて検証

use boardcheck::FileStore;
use boardcheck_common::{
    ApiClient, AppContext, ClientConfig, DetectionRequest, HttpBackend, HttpRequest, HttpResponse,
    HistoryFilter, Language, QualityGrade, Screen, TransportError,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;
use tempfile::tempdir;

const TWO_DEFECTS: &str = r#"{
    "defects": {
        "defects_found": true,
        "predictions": [
            {"defect_type": "missing_hole", "confidence": 0.95, "bbox": [10, 10, 40, 40]},
            {"defect_type": "short_circuit", "confidence": 0.85, "bbox": [50, 60, 80, 90]}
        ]
    },
    "result_image_url": "/static/results/abc.jpg"
}"#;

/// 用意した応答を順に返すバックエンド
struct StubBackend {
    responses: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl StubBackend {
    fn new(responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl HttpBackend for StubBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(TransportError::Connection("no more responses".to_string())))
    }

    async fn sleep(&self, _duration: Duration) {}
}

fn api(responses: Vec<Result<HttpResponse, TransportError>>) -> ApiClient<StubBackend> {
    ApiClient::new(StubBackend::new(responses), ClientConfig::with_base_url("http://pcb.local"))
}

fn jpeg(size: usize) -> DetectionRequest {
    DetectionRequest::new("board.jpg", "image/jpeg", vec![0xFF; size])
}

/// 解析成功 → 保存 → 再起動後も履歴が残る
#[tokio::test]
async fn test_detect_save_and_reload() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("store.json");
    let api = api(vec![Ok(HttpResponse::new(200, TWO_DEFECTS))]);

    let mut ctx = AppContext::load(FileStore::new(&path));
    let screen = ctx.submit(&api, jpeg(1024), "/tmp/board.jpg").await;
    assert_eq!(screen, Screen::Results);
    assert_eq!(ctx.summary().expect("集計がない").grade, QualityGrade::B);

    let id = ctx.save_to_history().expect("保存失敗").id.clone();

    let reloaded = AppContext::load(FileStore::new(&path));
    assert_eq!(reloaded.history().len(), 1);
    let entry = &reloaded.history()[0];
    assert_eq!(entry.id, id);
    assert_eq!(entry.source_filename, "board.jpg");
    assert_eq!(entry.original_image_reference, "/tmp/board.jpg");
    assert_eq!(entry.defect_count, 2);
    assert_eq!(
        api.resolve_image_url(entry.result_image_reference.as_deref().unwrap_or_default()),
        "http://pcb.local/static/results/abc.jpg"
    );
}

/// 大きすぎる画像は送信せずにエラー
#[tokio::test]
async fn test_too_large_image_is_not_sent() {
    let dir = tempdir().expect("Failed to create temp dir");
    let api = api(vec![Ok(HttpResponse::new(200, TWO_DEFECTS))]);
    let mut ctx = AppContext::load(FileStore::new(dir.path().join("store.json")));

    let screen = ctx.submit(&api, jpeg(15 * 1024 * 1024), "/tmp/big.jpg").await;

    assert_eq!(screen, Screen::Upload);
    assert_eq!(
        ctx.error_message(),
        Some("Image file is too large. Please use an image under 10MB.")
    );
    assert!(api.backend().requests.borrow().is_empty());
}

/// 503 → 再試行で成功
#[tokio::test]
async fn test_retry_after_server_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let api = api(vec![
        Ok(HttpResponse::new(503, "")),
        Ok(HttpResponse::new(200, TWO_DEFECTS)),
    ]);
    let mut ctx = AppContext::load(FileStore::new(dir.path().join("store.json")));

    assert_eq!(ctx.submit(&api, jpeg(64), "/tmp/board.jpg").await, Screen::Upload);
    assert_eq!(ctx.error_message(), Some("Server error. Please try again later."));

    assert_eq!(ctx.retry_with(&api).await, Screen::Results);
    assert_eq!(api.backend().requests.borrow().len(), 2);
}

/// 言語設定・履歴操作がファイルに反映される
#[tokio::test]
async fn test_language_and_history_management() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("store.json");
    let clean = r#"{"defects": {"defects_found": false, "predictions": []}}"#;
    let api = api(vec![
        Ok(HttpResponse::new(200, TWO_DEFECTS)),
        Ok(HttpResponse::new(200, clean)),
    ]);

    let mut ctx = AppContext::load(FileStore::new(&path));
    ctx.set_language(Language::Ar);

    ctx.submit(&api, jpeg(64), "/tmp/a.jpg").await;
    ctx.save_to_history();
    ctx.new_analysis();
    ctx.submit(&api, jpeg(64), "/tmp/b.jpg").await;
    let clean_id = ctx.save_to_history().expect("保存失敗").id.clone();

    let mut reloaded = AppContext::load(FileStore::new(&path));
    assert_eq!(reloaded.language(), Language::Ar);
    assert_eq!(reloaded.filtered_history(HistoryFilter::Clean).len(), 1);
    assert_eq!(reloaded.filtered_history(HistoryFilter::WithDefects).len(), 1);

    assert!(reloaded.delete_history_entry(&clean_id));
    assert!(reloaded.clear_history(true));
    assert!(AppContext::load(FileStore::new(&path)).history().is_empty());
}
