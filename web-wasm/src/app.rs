//! メインアプリケーションコンポーネント

use boardcheck_common::{
    translate, ApiClient, AppContext, ClientConfig, DetectionRequest, HealthStatus, Language, Screen,
};
use gloo::timers::callback::Interval;
use gloo::timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::FetchBackend;
use crate::components::{
    header::Header,
    history_grid::HistoryGrid,
    progress_bar::AnalyzingIndicator,
    results_view::ResultsView,
    upload_area::UploadArea,
};
use crate::storage::BrowserStore;

/// 通知の表示時間
const NOTICE_MS: u32 = 3_000;

pub type Client = ApiClient<FetchBackend>;

/// ビルド時の BOARDCHECK_API_URL があればそれを使う
pub fn client_config() -> ClientConfig {
    match option_env!("BOARDCHECK_API_URL") {
        Some(url) if !url.is_empty() => ClientConfig::with_base_url(url),
        _ => ClientConfig::default(),
    }
}

/// コンポーネント間で共有するハンドル
#[derive(Clone, Copy)]
pub struct AppHandle {
    pub ctx: RwSignal<AppContext<BrowserStore>, LocalStorage>,
    pub health: RwSignal<HealthStatus>,
    pub language: Memo<Language>,
    current_screen: Memo<Screen>,
    api: StoredValue<Client>,
}

impl AppHandle {
    fn new(ctx: AppContext<BrowserStore>, api: Client) -> Self {
        let ctx = RwSignal::new_local(ctx);
        Self {
            ctx,
            health: RwSignal::new(HealthStatus::Checking),
            language: Memo::new(move |_| ctx.with(|c| c.language())),
            current_screen: Memo::new(move |_| ctx.with(|c| c.screen())),
            api: StoredValue::new(api),
        }
    }

    /// 現在の言語で翻訳（リアクティブ）
    pub fn t(self, key: &'static str) -> &'static str {
        translate(key, self.language.get())
    }

    pub fn screen(self) -> Screen {
        self.current_screen.get()
    }

    pub fn resolve_image_url(self, reference: &str) -> String {
        self.api.with_value(|api| api.resolve_image_url(reference))
    }

    pub fn set_language(self, language: Language) {
        self.ctx.update(|c| c.set_language(language));
    }

    /// 画像を選択して解析を開始
    pub fn submit(self, file: DetectionRequest, preview_reference: String) {
        if let Some(request) = self.ctx.try_update(|c| c.select_file(file, preview_reference)).flatten() {
            self.spawn_detection(request);
        }
    }

    pub fn retry(self) {
        if let Some(request) = self.ctx.try_update(|c| c.retry()).flatten() {
            self.spawn_detection(request);
        }
    }

    fn spawn_detection(self, request: DetectionRequest) {
        let api = self.api.get_value();
        tracing::info!(file = %request.file_name, size = request.size(), "Starting analysis");
        spawn_local(async move {
            let outcome = api.detect_defects(&request).await;
            self.ctx.update(|c| match outcome {
                Ok(result) => c.detection_succeeded(result),
                Err(err) => c.detection_failed(err),
            });
        });
    }

    pub fn save_to_history(self) {
        let saved = self
            .ctx
            .try_update(|c| c.save_to_history().is_some().then(|| c.notice_seq()))
            .flatten();
        if let Some(seq) = saved {
            spawn_local(async move {
                TimeoutFuture::new(NOTICE_MS).await;
                self.ctx.update(|c| {
                    c.dismiss_notice(seq);
                });
            });
        }
    }

    pub fn refresh_health(self) {
        let api = self.api.get_value();
        spawn_local(async move {
            let healthy = api.check_health().await;
            self.health.set(healthy.into());
        });
    }
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let config = client_config();
    let poll_ms = config.health_poll_interval().as_millis() as u32;
    let app = AppHandle::new(AppContext::load(BrowserStore::open()), ApiClient::new(FetchBackend, config));

    // サーバー状態の定期確認
    app.refresh_health();
    Interval::new(poll_ms, move || app.refresh_health()).forget();

    // 言語に合わせて文書の向きを切り替え
    Effect::new(move |_| {
        let language = app.language.get();
        if let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        {
            let _ = root.set_attribute("lang", language.code());
            let _ = root.set_attribute("dir", language.dir());
        }
    });

    let error_message = move || app.ctx.with(|c| c.error_message());
    let notice = move || app.ctx.with(|c| c.session().notice.map(|n| n.message_key()));
    let history_count = move || app.ctx.with(|c| c.history().len());

    view! {
        <div class=move || format!("container {}", app.language.get().dir())>
            <Header app=app />

            <Show when=move || matches!(app.screen(), Screen::Results | Screen::History)>
                <nav class="breadcrumb">
                    <button class="btn btn-tertiary btn-small" on:click=move |_| app.ctx.update(|c| c.back())>
                        {move || if app.language.get().is_rtl() { "→ " } else { "← " }}
                        {move || app.t("actions.back")}
                    </button>
                </nav>
            </Show>

            <main>
                {move || match app.screen() {
                    Screen::Upload => view! {
                        <Hero app=app />
                        <UploadArea app=app />

                        <Show when=move || error_message().is_some()>
                            <div class="error-banner">
                                <p>{move || error_message().unwrap_or_default()}</p>
                                <button class="btn btn-small btn-secondary" on:click=move |_| app.retry()>
                                    {move || app.t("actions.retry")}
                                </button>
                            </div>
                        </Show>

                        <Show when=move || { history_count() > 0 }>
                            <div class="history-preview">
                                <button class="btn btn-secondary" on:click=move |_| app.ctx.update(|c| c.view_history())>
                                    {move || app.t("actions.viewHistory")}
                                    <span class="badge">{history_count}</span>
                                </button>
                            </div>
                        </Show>
                    }.into_any(),
                    Screen::Analyzing => view! {
                        <Hero app=app />
                        <AnalyzingIndicator app=app />
                    }.into_any(),
                    Screen::Results => view! {
                        <ResultsView app=app />
                        <div class="action-buttons">
                            <button class="btn btn-primary" on:click=move |_| app.ctx.update(|c| c.new_analysis())>
                                {move || app.t("actions.newAnalysis")}
                            </button>
                            <button class="btn btn-secondary" on:click=move |_| app.ctx.update(|c| c.view_history())>
                                {move || app.t("actions.viewHistory")}
                            </button>
                        </div>
                    }.into_any(),
                    Screen::History => view! {
                        <HistoryGrid app=app />
                        <div class="action-buttons">
                            <button class="btn btn-primary" on:click=move |_| app.ctx.update(|c| c.new_analysis())>
                                {move || app.t("actions.newAnalysis")}
                            </button>
                        </div>
                    }.into_any(),
                }}
            </main>

            <Show when=move || notice().is_some()>
                <div class="toast toast-success">
                    {move || notice().map(|key| app.t(key)).unwrap_or_default()}
                </div>
            </Show>

            <footer class="footer">
                <p class="text-muted">{move || app.t("footer.copyright")}</p>
            </footer>
        </div>
    }
}

#[component]
fn Hero(app: AppHandle) -> impl IntoView {
    view! {
        <section class="hero">
            <h2>{move || app.t("hero.title")}</h2>
            <p class="text-muted">{move || app.t("hero.subtitle")}</p>
        </section>
    }
}
