//! クライアント設定とエンドポイント

use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://5.135.79.195";

/// 画像サイズ上限（10MiB）
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub mod endpoints {
    pub const HEALTH: &str = "/health";
    pub const DETECT: &str = "/detect";
    pub const HISTORY: &str = "/history";
    pub const STATISTICS: &str = "/statistics";

    pub fn detection(id: u64) -> String {
        format!("/detection/{}", id)
    }
}

/// APIクライアントの設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub health_timeout_secs: u64,
    pub detect_timeout_secs: u64,
    pub query_timeout_secs: u64,
    pub health_retries: u32,
    pub health_retry_delay_ms: u64,
    pub health_poll_secs: u64,
    pub max_image_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            health_timeout_secs: 10,
            detect_timeout_secs: 120,  // 推論はヘルスチェックより遅い
            query_timeout_secs: 30,
            health_retries: 3,
            health_retry_delay_ms: 2000,
            health_poll_secs: 30,
            max_image_bytes: MAX_IMAGE_BYTES,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }

    pub fn detect_timeout(&self) -> Duration {
        Duration::from_secs(self.detect_timeout_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn health_poll_interval(&self) -> Duration {
        Duration::from_secs(self.health_poll_secs)
    }

    pub fn health_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.health_retries, Duration::from_millis(self.health_retry_delay_ms))
    }

    /// ベースURLとパスを連結（スラッシュは1つだけ）
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn resolve_image_url(&self, reference: &str) -> String {
        resolve_image_url(&self.base_url, reference)
    }
}

/// 結果画像の参照をURLに解決
///
/// - 空文字 → 空文字
/// - http で始まる → そのまま
/// - それ以外 → ベースURLからの相対パス
pub fn resolve_image_url(base_url: &str, reference: &str) -> String {
    if reference.is_empty() {
        return String::new();
    }
    if reference.starts_with("http") {
        return reference.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        reference.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.health_timeout(), Duration::from_secs(10));
        assert_eq!(config.detect_timeout(), Duration::from_secs(120));
        assert_eq!(config.query_timeout(), Duration::from_secs(30));
        assert_eq!(config.health_poll_interval(), Duration::from_secs(30));
        assert_eq!(config.max_image_bytes, 10_485_760);

        let policy = config.health_retry_policy();
        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[test]
    fn test_config_deserialize_partial() {
        let json = r#"{"base_url": "http://localhost:5000"}"#;
        let config: ClientConfig = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.detect_timeout_secs, 120);
    }

    #[test]
    fn test_endpoint_join() {
        let config = ClientConfig::with_base_url("http://localhost:5000/");
        assert_eq!(config.endpoint(endpoints::HEALTH), "http://localhost:5000/health");
        assert_eq!(config.endpoint(&endpoints::detection(7)), "http://localhost:5000/detection/7");
    }

    #[test]
    fn test_resolve_image_url() {
        let base = "http://5.135.79.195";
        assert_eq!(resolve_image_url(base, ""), "");
        assert_eq!(
            resolve_image_url(base, "https://cdn.example.com/r.jpg"),
            "https://cdn.example.com/r.jpg"
        );
        assert_eq!(resolve_image_url(base, "/static/r.jpg"), "http://5.135.79.195/static/r.jpg");
        assert_eq!(resolve_image_url(base, "static/r.jpg"), "http://5.135.79.195/static/r.jpg");
    }
}
