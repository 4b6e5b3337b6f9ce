//! アップロードエリアコンポーネント

use boardcheck_common::DetectionRequest;
use gloo::file::futures::read_as_bytes;
use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::{DragEvent, File};
use crate::app::AppHandle;

/// 同梱のデモ画像
const DEMO_IMAGE_PATH: &str = "/demo/pcb-sample.jpg";
const DEMO_IMAGE_NAME: &str = "pcb-sample.jpg";

#[component]
pub fn UploadArea(app: AppHandle) -> impl IntoView {
    let (is_dragover, set_is_dragover) = signal(false);
    let (local_error, set_local_error) = signal(None::<&'static str>);
    let input_ref = NodeRef::<Input>::new();

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);

        // 1枚目のみ扱う
        if let Some(file) = ev.data_transfer().and_then(|dt| dt.files()).and_then(|files| files.get(0)) {
            set_local_error.set(None);
            read_file(app, file);
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_click = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let on_change = move |ev: leptos::ev::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            set_local_error.set(None);
            read_file(app, file);
        }
        // 同じファイルを再選択できるように
        input.set_value("");
    };

    let on_demo = move |_| {
        set_local_error.set(None);
        spawn_local(async move {
            match fetch_demo_image().await {
                Ok(request) => app.submit(request, DEMO_IMAGE_PATH.to_string()),
                Err(err) => {
                    tracing::warn!(error = %err, "Demo image could not be loaded");
                    set_local_error.set(Some("upload.demoImageNotAvailable"));
                }
            }
        });
    };

    view! {
        <div class="upload-section">
            <div
                class=move || {
                    let mut classes = vec!["upload-area"];
                    if is_dragover.get() {
                        classes.push("dragover");
                    }
                    classes.join(" ")
                }
                on:drop=on_drop
                on:dragover=on_dragover
                on:dragleave=on_dragleave
                on:click=on_click
            >
                <div class="upload-icon">"🔍"</div>
                <h3>{move || app.t("upload.title")}</h3>
                <p>{move || app.t("upload.dropzone")}</p>
                <p class="text-muted">{move || app.t("upload.formats")}</p>
            </div>

            <input
                type="file"
                accept="image/jpeg,image/png,image/bmp"
                style="display: none"
                node_ref=input_ref
                on:change=on_change
            />

            <div class="upload-buttons">
                <button class="btn btn-primary" on:click=on_click>
                    {move || app.t("upload.uploadFromDevice")}
                </button>
                <button class="btn btn-secondary" on:click=on_demo>
                    {move || app.t("upload.demo")}
                </button>
            </div>

            <Show when=move || local_error.get().is_some()>
                <p class="upload-error">
                    {move || app.t("upload.error")}" "
                    {move || local_error.get().map(|key| app.t(key)).unwrap_or_default()}
                </p>
            </Show>
        </div>
    }
}

/// ファイルを読み込んで解析に回す
///
/// 読み込めなかった場合は空の画像として送り、検証エラーとして表示させる
fn read_file(app: AppHandle, file: File) {
    let preview = web_sys::Url::create_object_url_with_blob(&file).unwrap_or_default();
    let file = gloo::file::File::from(file);

    spawn_local(async move {
        let bytes = read_as_bytes(&file).await.unwrap_or_else(|err| {
            tracing::warn!(file = %file.name(), error = %err, "Failed to read selected file");
            Vec::new()
        });
        app.submit(DetectionRequest::new(file.name(), file.raw_mime_type(), bytes), preview);
    });
}

async fn fetch_demo_image() -> Result<DetectionRequest, gloo::net::Error> {
    let response = gloo::net::http::Request::get(DEMO_IMAGE_PATH).send().await?;
    if !response.ok() {
        return Err(gloo::net::Error::GlooError(format!(
            "demo image request failed with status {}",
            response.status()
        )));
    }
    let bytes = response.binary().await?;
    Ok(DetectionRequest::new(DEMO_IMAGE_NAME, "image/jpeg", bytes))
}
