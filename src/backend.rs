//! reqwest による HttpBackend 実装

use boardcheck_common::{HttpBackend, HttpRequest, HttpResponse, Method, RequestBody, TransportError};
use reqwest::multipart::{Form, Part};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HttpBackend for ReqwestBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        }
        .timeout(request.timeout);

        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Multipart { field, file_name, content_type, bytes } => {
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(&content_type)
                    .map_err(classify)?;
                builder.multipart(Form::new().part(field, part))
            }
        };

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;
        tracing::debug!(url = %request.url, status, "Request completed");

        Ok(HttpResponse::new(status, body))
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
