//! テスト用のスクリプト化HTTPバックエンド

use crate::http::{HttpBackend, HttpRequest, HttpResponse, TransportError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

/// 用意した応答を順に返し、リクエストと待機を記録する
pub(crate) struct ScriptedBackend {
    responses: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    fallback: Result<HttpResponse, TransportError>,
    pub requests: RefCell<Vec<HttpRequest>>,
    pub sleeps: RefCell<Vec<Duration>>,
}

impl ScriptedBackend {
    /// 常に同じ応答を返す
    pub fn always(response: Result<HttpResponse, TransportError>) -> Self {
        Self {
            responses: RefCell::new(VecDeque::new()),
            fallback: response,
            requests: RefCell::new(Vec::new()),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    /// 順番に応答し、尽きたら最後の応答を繰り返す
    pub fn sequence(responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
        let fallback = responses
            .last()
            .cloned()
            .unwrap_or(Err(TransportError::Other("no scripted response".to_string())));
        Self {
            responses: RefCell::new(responses.into()),
            ..Self::always(fallback)
        }
    }

    pub fn json(status: u16, body: &str) -> Self {
        Self::always(Ok(HttpResponse::new(status, body)))
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl HttpBackend for ScriptedBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        let next = self.responses.borrow_mut().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}
