//! 実サーバーに対する結合テスト（BOARDCHECK_API_URL 設定時のみ）

use boardcheck::ReqwestBackend;
use boardcheck_common::{ApiClient, ClientConfig, DetectionRequest};

fn live_base_url() -> Option<String> {
    match std::env::var("BOARDCHECK_API_URL") {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("BOARDCHECK_API_URL not set; skipping live test");
            None
        }
    }
}

#[tokio::test]
async fn live_health_check() {
    let Some(base_url) = live_base_url() else { return };
    let api = ApiClient::new(ReqwestBackend::new(), ClientConfig::with_base_url(base_url));

    assert!(api.check_health().await, "server did not report healthy");
}

#[tokio::test]
async fn live_detect_rejects_non_image() {
    let Some(base_url) = live_base_url() else { return };
    let api = ApiClient::new(ReqwestBackend::new(), ClientConfig::with_base_url(base_url));

    // 宣言タイプは正しいが中身は画像でない → サーバーが 400 を返す想定
    let request = DetectionRequest::new("not-an-image.jpg", "image/jpeg", b"plain text".to_vec());
    let result = api.detect_defects(&request).await;

    assert!(result.is_err(), "server accepted a non-image payload");
}
