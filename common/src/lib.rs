//! BoardCheck Common Library
//!
//! CLIとWeb(WASM)で共有される型・APIクライアント・状態機械

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod i18n;
pub mod retry;
pub mod storage;
pub mod summary;
pub mod types;

#[cfg(test)]
mod testing;

pub use api::{classify_detect_response, extract_server_message, validate_image, ApiClient};
pub use app::{AppContext, HealthStatus, HistoryFilter, Notice, ResultOrigin, Screen, Session};
pub use config::{resolve_image_url, ClientConfig, DEFAULT_BASE_URL, MAX_IMAGE_BYTES};
pub use error::{ApiError, CatalogError, InvalidInput, StorageError};
pub use http::{HttpBackend, HttpRequest, HttpResponse, Method, RequestBody, TransportError};
pub use i18n::{translate, validate_catalog, Language, Translator};
pub use retry::{retry_with_delay, RetryOutcome, RetryPolicy};
pub use storage::{KeyValueStore, MemoryStore, HISTORY_KEY, LANGUAGE_KEY};
pub use summary::{defect_label, format_confidence, QualityGrade, ResultSummary};
pub use types::{BoundingBox, DetectionPrediction, DetectionRequest, DetectionResult, HistoryEntry, MediaType};
