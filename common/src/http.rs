//! HTTPバックエンド抽象
//!
//! ブラウザ（fetch）とネイティブ（reqwest）で実装を差し替える。
//! タイムアウトは各リクエストに付与し、バックエンド側で中断する。

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// リクエストボディ
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// ファイル1つだけのmultipart/form-data
    Multipart {
        field: String,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub timeout: Duration,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            timeout,
            body: RequestBody::Empty,
        }
    }

    pub fn post_file(
        url: impl Into<String>,
        timeout: Duration,
        field: &str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            timeout,
            body: RequestBody::Multipart {
                field: field.to_string(),
                file_name: file_name.to_string(),
                content_type: content_type.to_string(),
                bytes,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTPレベルに到達しなかった失敗
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// タイムアウトによる中断
    #[error("request timed out")]
    Timeout,

    /// DNS・接続拒否・オフラインなど
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("{0}")]
    Other(String),
}

/// HTTPバックエンド
///
/// 返すFutureにSend境界を課さない（WASMのfetchはSendでない）
#[allow(async_fn_in_trait)]
pub trait HttpBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// 再試行間の待機
    async fn sleep(&self, duration: Duration);
}
