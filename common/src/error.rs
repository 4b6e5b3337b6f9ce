//! エラー型定義
//!
//! - ApiError: APIアクセス層が返す失敗の分類
//! - InvalidInput: 送信前のローカル検証、またはサーバーの400応答
//! - StorageError: キーバリューストアの失敗（永続化アダプタの外には出ない）
//! - CatalogError: 翻訳テーブルの検証エラー

use crate::i18n::{translate, Language};
use thiserror::Error;

/// 入力画像が不正な理由
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInput {
    #[error("Image file is empty")]
    Empty,

    #[error("Image file is too large ({size} bytes). Please use an image under 10MB.")]
    TooLarge { size: usize, limit: usize },

    #[error("Invalid image format ({0}). Please use JPG, PNG, or BMP.")]
    UnsupportedType(String),

    /// サーバーが400で拒否した（サーバー側メッセージまたは汎用メッセージ）
    #[error("{0}")]
    Rejected(String),
}

/// APIアクセス層のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    #[error("Image file is too large for server. Please reduce size.")]
    PayloadTooLarge,

    #[error("Server error ({0}). Please try again later.")]
    ServerUnavailable(u16),

    #[error("Server gateway timeout. Please try again.")]
    GatewayTimeout,

    #[error("{message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("Server returned invalid data format: {0}")]
    MalformedResponse(String),

    #[error("Request timed out. The server might be under heavy load.")]
    Timeout,

    #[error("Failed to connect to server: {0}")]
    ConnectionFailed(String),

    #[error("An unexpected error occurred: {0}")]
    Unknown(String),

    #[error("Request failed (Status: {0})")]
    RequestFailed(u16),

    #[error("Detection not found.")]
    NotFound,
}

impl ApiError {
    /// サーバーメッセージがあればそれを、なければ汎用メッセージを持つ UnexpectedStatus
    pub fn unexpected_status(status: u16, server_message: Option<String>) -> Self {
        let message = server_message.unwrap_or_else(|| format!("Unexpected error ({})", status));
        ApiError::UnexpectedStatus { status, message }
    }

    /// 表示用メッセージの翻訳キー
    ///
    /// すべての種別が空でないメッセージに対応する
    pub fn message_key(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(InvalidInput::Empty) => "errors.invalidFile",
            ApiError::InvalidInput(InvalidInput::TooLarge { .. }) => "errors.fileTooLarge",
            ApiError::InvalidInput(InvalidInput::UnsupportedType(_)) => "errors.invalidImageFormat",
            ApiError::InvalidInput(InvalidInput::Rejected(_)) => "errors.invalidImageFormat",
            ApiError::PayloadTooLarge => "errors.fileTooLarge",
            ApiError::ServerUnavailable(_) => "errors.serverErrorRetry",
            ApiError::GatewayTimeout | ApiError::Timeout => "errors.requestTimedOut",
            ApiError::ConnectionFailed(_) => "errors.networkConnectionFailed",
            ApiError::NotFound => "errors.imageNotFound",
            ApiError::RequestFailed(_) => "errors.serverError",
            ApiError::UnexpectedStatus { .. }
            | ApiError::MalformedResponse(_)
            | ApiError::Unknown(_) => "errors.unexpectedError",
        }
    }

    /// 指定言語でのユーザー向けメッセージ
    pub fn localized_message(&self, language: Language) -> &'static str {
        translate(self.message_key(), language)
    }
}

/// キーバリューストアのエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// 翻訳テーブルの検証エラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("duplicate translation key: {0}")]
    DuplicateKey(String),

    #[error("missing {language} translation for key: {key}")]
    MissingTranslation { key: String, language: &'static str },

    #[error("malformed translation key: {0:?}")]
    MalformedKey(String),
}
