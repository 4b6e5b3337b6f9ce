//! ヘッダーコンポーネント

use leptos::prelude::*;
use crate::app::AppHandle;

#[component]
pub fn Header(app: AppHandle) -> impl IntoView {
    let history_count = move || app.ctx.with(|c| c.history().len());
    let health_class = move || format!("health-badge {:?}", app.health.get()).to_lowercase();

    view! {
        <header class="header">
            <h1>"BoardCheck AI"</h1>
            <div class="header-actions">
                <span class=health_class>
                    {move || app.t(app.health.get().label_key())}
                </span>
                <button
                    class="btn btn-small btn-tertiary"
                    on:click=move |_| app.ctx.update(|c| c.view_history())
                >
                    {history_count}" "{move || app.t("header.analyses")}
                </button>
                <button
                    class="btn btn-small btn-secondary"
                    on:click=move |_| app.set_language(app.language.get_untracked().toggled())
                >
                    {move || app.t("header.switchLanguage")}
                </button>
            </div>
        </header>
    }
}
