//! fetch API による HttpBackend 実装
//!
//! タイムアウトは AbortController で打ち切る。
//! multipart の Content-Type はブラウザに任せる（boundary 付きで自動設定）。

use boardcheck_common::{HttpBackend, HttpRequest, HttpResponse, RequestBody, TransportError};
use gloo::timers::callback::Timeout;
use gloo::timers::future::TimeoutFuture;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Blob, BlobPropertyBag, FormData, Request, RequestInit, RequestMode, Response};

/// window.fetch を使うバックエンド
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchBackend;

impl HttpBackend for FetchBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let window = web_sys::window()
            .ok_or_else(|| TransportError::Other("window is not available".to_string()))?;

        let controller = AbortController::new().map_err(js_error)?;
        let signal = controller.signal();

        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());
        opts.set_mode(RequestMode::Cors);
        opts.set_signal(Some(&signal));
        if let Some(form) = build_form(&request.body)? {
            opts.set_body(&form);
        }

        let fetch_request = Request::new_with_str_and_init(&request.url, &opts).map_err(js_error)?;

        // タイムアウトで中断（レスポンス取得後にdropされ解除）
        let timeout_ms = request.timeout.as_millis().min(u32::MAX as u128) as u32;
        let abort_timer = Timeout::new(timeout_ms, move || controller.abort());

        let result = async {
            let value = JsFuture::from(window.fetch_with_request(&fetch_request)).await?;
            let response: Response = value.dyn_into()?;
            let text = JsFuture::from(response.text()?).await?;
            Ok::<_, JsValue>((response.status(), text.as_string().unwrap_or_default()))
        }
        .await;
        drop(abort_timer);

        match result {
            Ok((status, body)) => {
                tracing::debug!(url = %request.url, status, "fetch completed");
                Ok(HttpResponse::new(status, body))
            }
            Err(err) => Err(classify_rejection(&err, signal.aborted())),
        }
    }

    async fn sleep(&self, duration: Duration) {
        TimeoutFuture::new(duration.as_millis().min(u32::MAX as u128) as u32).await;
    }
}

fn build_form(body: &RequestBody) -> Result<Option<FormData>, TransportError> {
    let RequestBody::Multipart { field, file_name, content_type, bytes } = body else {
        return Ok(None);
    };

    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes.as_slice()));
    let props = BlobPropertyBag::new();
    props.set_type(content_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &props).map_err(js_error)?;

    let form = FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename(field, &blob, file_name)
        .map_err(js_error)?;
    Ok(Some(form))
}

/// fetch 系の失敗を分類する
///
/// 中断はタイムアウト、fetch が投げる TypeError は接続失敗、それ以外は Other
pub fn classify_rejection(err: &JsValue, aborted: bool) -> TransportError {
    if aborted {
        TransportError::Timeout
    } else if err.is_instance_of::<js_sys::TypeError>() {
        TransportError::Connection(describe(err))
    } else {
        TransportError::Other(describe(err))
    }
}

fn js_error(err: JsValue) -> TransportError {
    TransportError::Other(describe(&err))
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}
