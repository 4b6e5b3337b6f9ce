//! ブラウザ用HTTPバックエンド

mod fetch;

pub use fetch::{classify_rejection, FetchBackend};
