//! BoardCheck ネイティブクライアント
//!
//! 共通ライブラリの状態機械を reqwest バックエンドとJSONファイルストアで動かす

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod image_input;
pub mod report;
pub mod store;

pub use backend::ReqwestBackend;
pub use store::FileStore;
