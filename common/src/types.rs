//! 検出結果・履歴の型定義
//!
//! - DetectionRequest: 送信する画像
//! - DetectResponse: /detect のレスポンス（ワイヤ形式）
//! - DetectionResult: クライアント内部で扱う検出結果
//! - HistoryEntry: 保存済みの解析（localStorageにJSON配列として保存）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// 受け付ける画像形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Jpeg,
    Png,
    Bmp,
}

impl MediaType {
    /// 宣言されたMIMEタイプから判定（image/jpg は jpeg の別名）
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(MediaType::Jpeg),
            "image/png" => Some(MediaType::Png),
            "image/bmp" => Some(MediaType::Bmp),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(MediaType::Jpeg),
            "png" => Some(MediaType::Png),
            "bmp" => Some(MediaType::Bmp),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Bmp => "image/bmp",
        }
    }
}

/// 解析に送る画像
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRequest {
    pub file_name: String,
    /// 宣言されたMIMEタイプ（ブラウザの File.type など）
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DetectionRequest {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn media_type(&self) -> Option<MediaType> {
        MediaType::from_mime(&self.content_type)
    }
}

/// 検出された欠陥1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionPrediction {
    pub defect_type: String,
    pub confidence: f64,
    pub bbox: BoundingBox,
}

/// (x, y, w, h) または (x1, y1, x2, y2)
///
/// クライアントは解釈せず、サーバーの数値表記（整数/小数）のまま保存する
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundingBox(pub [Number; 4]);

impl BoundingBox {
    /// NaN・無限大は JSON にできないので None
    pub fn from_f64(values: [f64; 4]) -> Option<Self> {
        let [a, b, c, d] = values.map(Number::from_f64);
        Some(Self([a?, b?, c?, d?]))
    }
}

impl From<[i64; 4]> for BoundingBox {
    fn from(values: [i64; 4]) -> Self {
        Self(values.map(Number::from))
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = &self.0;
        write!(f, "[{}, {}, {}, {}]", a, b, c, d)
    }
}

/// /detect レスポンスの defects 部分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectsPayload {
    pub defects_found: bool,
    #[serde(default)]
    pub predictions: Vec<DetectionPrediction>,
}

/// /detect レスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectResponse {
    pub defects: DefectsPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_image_url: Option<String>,
}

/// 検出結果
///
/// defects_found はサーバーの値をそのまま使う（predictions の件数からは導出しない）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub defects_found: bool,
    pub predictions: Vec<DetectionPrediction>,
    pub result_image_reference: Option<String>,
}

impl From<DetectResponse> for DetectionResult {
    fn from(response: DetectResponse) -> Self {
        Self {
            defects_found: response.defects.defects_found,
            predictions: response.defects.predictions,
            result_image_reference: response.result_image_url,
        }
    }
}

/// 保存済みの解析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "filename")]
    pub source_filename: String,
    pub defects_found: bool,
    pub defect_count: usize,
    /// クライアント側の参照（blob URL やファイルパス）
    #[serde(rename = "original_image")]
    pub original_image_reference: String,
    #[serde(rename = "result_image", default, skip_serializing_if = "Option::is_none")]
    pub result_image_reference: Option<String>,
    #[serde(default)]
    pub predictions: Vec<DetectionPrediction>,
}

impl HistoryEntry {
    pub fn from_result(
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        source_filename: impl Into<String>,
        original_image_reference: impl Into<String>,
        result: &DetectionResult,
    ) -> Self {
        Self {
            id: id.into(),
            created_at,
            source_filename: source_filename.into(),
            defects_found: result.defects_found,
            defect_count: result.predictions.len(),
            original_image_reference: original_image_reference.into(),
            result_image_reference: result.result_image_reference.clone(),
            predictions: result.predictions.clone(),
        }
    }

    /// 保存内容から検出結果を復元（ネットワーク不要）
    pub fn to_result(&self) -> DetectionResult {
        DetectionResult {
            defects_found: self.defects_found,
            predictions: self.predictions.clone(),
            result_image_reference: self.result_image_reference.clone(),
        }
    }
}
