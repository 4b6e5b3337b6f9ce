use boardcheck_common::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardCheckError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read image: {0}")]
    ImageLoad(String),

    /// 解析失敗（表示用に翻訳済みのメッセージ）
    #[error("{0}")]
    Detection(String),

    #[error("History entry not found: {0}")]
    HistoryEntryNotFound(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BoardCheckError>;
