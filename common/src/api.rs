//! 欠陥検出サービスへのアクセス
//!
//! - check_health: GET /health（10秒、最大3回再試行、失敗はfalse）
//! - detect_defects: POST /detect（multipart、120秒、再試行なし）
//! - get_history / get_statistics / get_detection_details: 任意のサーバー側機能（30秒）
//!
//! HTTPステータスと通信エラーを ApiError に分類する。

use crate::config::{endpoints, ClientConfig};
use crate::error::{ApiError, InvalidInput};
use crate::http::{HttpBackend, HttpRequest, HttpResponse, TransportError};
use crate::retry::retry_with_delay;
use crate::types::{DetectResponse, DetectionRequest, DetectionResult, MediaType};
use serde_json::Value;

const IMAGE_FIELD: &str = "image";

/// APIクライアント
#[derive(Debug, Clone)]
pub struct ApiClient<B> {
    backend: B,
    config: ClientConfig,
}

impl<B: HttpBackend> ApiClient<B> {
    pub fn new(backend: B, config: ClientConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn resolve_image_url(&self, reference: &str) -> String {
        self.config.resolve_image_url(reference)
    }

    /// サーバーの稼働確認
    ///
    /// エラーは返さない。全試行が失敗したら false。
    pub async fn check_health(&self) -> bool {
        let request = HttpRequest::get(
            self.config.endpoint(endpoints::HEALTH),
            self.config.health_timeout(),
        );
        let policy = self.config.health_retry_policy();

        let outcome = retry_with_delay(
            &policy,
            |_| self.backend.send(request.clone()),
            |result: &Result<HttpResponse, TransportError>| {
                matches!(result, Ok(response) if response.is_success())
            },
            |delay| self.backend.sleep(delay),
        )
        .await;

        if !outcome.succeeded {
            match &outcome.value {
                Ok(response) => tracing::warn!(
                    attempts = outcome.attempts,
                    status = response.status,
                    "Health check failed"
                ),
                Err(err) => tracing::warn!(
                    attempts = outcome.attempts,
                    error = %err,
                    "Health check failed"
                ),
            }
        }
        outcome.succeeded
    }

    /// 欠陥検出
    ///
    /// 検証に失敗した場合は通信しない。1回だけ送信する（再試行は呼び出し側の責任）。
    pub async fn detect_defects(&self, image: &DetectionRequest) -> Result<DetectionResult, ApiError> {
        let media_type = validate_image(image, self.config.max_image_bytes)?;

        let request = HttpRequest::post_file(
            self.config.endpoint(endpoints::DETECT),
            self.config.detect_timeout(),
            IMAGE_FIELD,
            &image.file_name,
            media_type.mime(),
            image.bytes.clone(),
        );

        tracing::info!(file = %image.file_name, size = image.size(), "Submitting image for detection");

        let response = self
            .backend
            .send(request)
            .await
            .map_err(classify_transport_error)?;

        let result = classify_detect_response(&response)?;
        tracing::info!(
            defects_found = result.defects_found,
            predictions = result.predictions.len(),
            result_image = result.result_image_reference.as_deref().unwrap_or(""),
            "Detection completed"
        );
        Ok(result)
    }

    /// サーバー側の検出履歴（生のJSON）
    pub async fn get_history(&self, page: u32, per_page: u32) -> Result<Value, ApiError> {
        let url = format!(
            "{}?page={}&per_page={}",
            self.config.endpoint(endpoints::HISTORY),
            page,
            per_page
        );
        self.get_json(url, false).await
    }

    /// サーバー側の統計（生のJSON）
    pub async fn get_statistics(&self) -> Result<Value, ApiError> {
        self.get_json(self.config.endpoint(endpoints::STATISTICS), false).await
    }

    /// 検出1件の詳細（生のJSON）。404は NotFound
    pub async fn get_detection_details(&self, id: u64) -> Result<Value, ApiError> {
        self.get_json(self.config.endpoint(&endpoints::detection(id)), true).await
    }

    async fn get_json(&self, url: String, not_found_is_distinct: bool) -> Result<Value, ApiError> {
        let request = HttpRequest::get(url, self.config.query_timeout());
        let response = self
            .backend
            .send(request)
            .await
            .map_err(classify_transport_error)?;

        if response.status == 404 && not_found_is_distinct {
            return Err(ApiError::NotFound);
        }
        if !response.is_success() {
            return Err(ApiError::RequestFailed(response.status));
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }
}

/// 送信前の画像検証
pub fn validate_image(image: &DetectionRequest, max_bytes: usize) -> Result<MediaType, InvalidInput> {
    if image.bytes.is_empty() {
        return Err(InvalidInput::Empty);
    }
    if image.size() > max_bytes {
        return Err(InvalidInput::TooLarge { size: image.size(), limit: max_bytes });
    }
    image
        .media_type()
        .ok_or_else(|| InvalidInput::UnsupportedType(image.content_type.clone()))
}

/// /detect の応答をステータスで分類
pub fn classify_detect_response(response: &HttpResponse) -> Result<DetectionResult, ApiError> {
    match response.status {
        200 => parse_detect_body(&response.body),
        400 => Err(InvalidInput::Rejected(
            extract_server_message(&response.body)
                .unwrap_or_else(|| "Invalid image format. Please use JPG, PNG, or BMP.".to_string()),
        )
        .into()),
        413 => Err(ApiError::PayloadTooLarge),
        500 | 502 | 503 => Err(ApiError::ServerUnavailable(response.status)),
        504 => Err(ApiError::GatewayTimeout),
        status => Err(ApiError::unexpected_status(status, extract_server_message(&response.body))),
    }
}

fn parse_detect_body(body: &str) -> Result<DetectionResult, ApiError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ApiError::MalformedResponse(e.to_string()))?;
    if !value.is_object() {
        return Err(ApiError::MalformedResponse("response is not a JSON object".to_string()));
    }
    let response: DetectResponse =
        serde_json::from_value(value).map_err(|e| ApiError::MalformedResponse(e.to_string()))?;
    Ok(response.into())
}

/// エラーボディから error または message を取り出す
pub fn extract_server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let map = value.as_object()?;
    ["error", "message"]
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|v| is_present(v))
        .map(|v| match v.as_str() {
            Some(s) => s.to_string(),
            None => v.to_string(),
        })
}

/// null・空文字・false・0 は未指定扱い
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn classify_transport_error(err: TransportError) -> ApiError {
    match err {
        TransportError::Timeout => ApiError::Timeout,
        TransportError::Connection(message) => ApiError::ConnectionFailed(message),
        TransportError::Other(message) => ApiError::Unknown(message),
    }
}
