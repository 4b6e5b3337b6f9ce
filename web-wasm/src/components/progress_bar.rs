//! 解析中インジケーター

use leptos::prelude::*;
use crate::app::AppHandle;

#[component]
pub fn AnalyzingIndicator(app: AppHandle) -> impl IntoView {
    let file_name = move || {
        app.ctx.with(|c| {
            c.session()
                .current_file
                .as_ref()
                .map(|f| f.file_name.clone())
                .unwrap_or_default()
        })
    };

    view! {
        <div class="progress-container">
            <div class="progress-bar indeterminate">
                <div class="progress-fill" />
            </div>
            <p class="progress-text">{move || app.t("upload.analyzing")}</p>
            <p class="text-muted">{file_name}</p>
        </div>
    }
}
