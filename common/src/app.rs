//! アプリケーション状態機械
//!
//! 画面（Upload → Analyzing → Results → History）とセッション状態、
//! 永続化された履歴・言語設定を1つのコンテキストで保持する。
//! 遷移はすべて同期的なメソッドで、ネットワーク呼び出しは呼び出し側が行い、
//! 結果を `detection_succeeded` / `detection_failed` で渡す。

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::http::HttpBackend;
use crate::i18n::{translate, Language};
use crate::storage::{self, KeyValueStore, HISTORY_KEY, LANGUAGE_KEY};
use crate::summary::ResultSummary;
use crate::types::{DetectionRequest, DetectionResult, HistoryEntry};
use chrono::{DateTime, Utc};

/// 表示中の画面
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Upload,
    Analyzing,
    Results,
    History,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Upload => "upload",
            Screen::Analyzing => "analyzing",
            Screen::Results => "results",
            Screen::History => "history",
        }
    }
}

/// 表示中の結果の出どころ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultOrigin {
    Analysis,
    History(String),
}

/// 一時的な通知
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    AnalysisSaved,
}

impl Notice {
    pub fn message_key(&self) -> &'static str {
        match self {
            Notice::AnalysisSaved => "success.analysisSaved",
        }
    }
}

/// サーバー状態の表示
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HealthStatus {
    #[default]
    Checking,
    Online,
    Offline,
}

impl HealthStatus {
    pub fn label_key(&self) -> &'static str {
        match self {
            HealthStatus::Checking => "header.checking",
            HealthStatus::Online => "header.serverOnline",
            HealthStatus::Offline => "header.serverOffline",
        }
    }
}

impl From<bool> for HealthStatus {
    fn from(healthy: bool) -> Self {
        if healthy { HealthStatus::Online } else { HealthStatus::Offline }
    }
}

/// 履歴一覧の絞り込み
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryFilter {
    #[default]
    All,
    WithDefects,
    Clean,
}

impl HistoryFilter {
    pub const ALL: [HistoryFilter; 3] = [HistoryFilter::All, HistoryFilter::WithDefects, HistoryFilter::Clean];

    pub fn matches(&self, entry: &HistoryEntry) -> bool {
        match self {
            HistoryFilter::All => true,
            HistoryFilter::WithDefects => entry.defects_found,
            HistoryFilter::Clean => !entry.defects_found,
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            HistoryFilter::All => "history.filters.all",
            HistoryFilter::WithDefects => "history.filters.defects",
            HistoryFilter::Clean => "history.filters.clean",
        }
    }
}

impl std::str::FromStr for HistoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(HistoryFilter::All),
            "defects" | "with-defects" => Ok(HistoryFilter::WithDefects),
            "clean" => Ok(HistoryFilter::Clean),
            _ => Err(format!("Unknown filter: {}. Use all, defects, or clean", s)),
        }
    }
}

/// セッション状態（永続化しない）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub screen: Screen,
    pub current_file: Option<DetectionRequest>,
    pub current_result: Option<DetectionResult>,
    pub result_origin: Option<ResultOrigin>,
    /// 元画像の参照（blob URL やファイルパス）
    pub preview_reference: Option<String>,
    pub error: Option<ApiError>,
    pub notice: Option<Notice>,
}

/// アプリケーションコンテキスト
pub struct AppContext<S> {
    session: Session,
    history: Vec<HistoryEntry>,
    language: Language,
    store: S,
    /// 通知ごとに増える番号（古いタイマーによる消去を防ぐ）
    notice_seq: u64,
}

impl<S: KeyValueStore> AppContext<S> {
    /// ストアから履歴と言語設定を読み込んで初期化
    pub fn load(store: S) -> Self {
        let history: Vec<HistoryEntry> = storage::read(&store, HISTORY_KEY, Vec::new());
        let language = storage::read(&store, LANGUAGE_KEY, Language::default());
        tracing::debug!(entries = history.len(), language = language.code(), "Loaded client state");

        Self {
            session: Session::default(),
            history,
            language,
            store,
            notice_seq: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.session.screen
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// 保存済み履歴（新しい順）
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn filtered_history(&self, filter: HistoryFilter) -> Vec<&HistoryEntry> {
        self.history.iter().filter(|entry| filter.matches(entry)).collect()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        translate(key, self.language)
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        storage::write(&self.store, LANGUAGE_KEY, &language);
    }

    /// 現在のエラーの表示文字列
    pub fn error_message(&self) -> Option<&'static str> {
        self.error_message_in(self.language)
    }

    /// 保存済みの設定と異なる言語で表示する場合
    pub fn error_message_in(&self, language: Language) -> Option<&'static str> {
        self.session
            .error
            .as_ref()
            .map(|err| err.localized_message(language))
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.session.notice.take()
    }

    /// 現在の通知の番号
    pub fn notice_seq(&self) -> u64 {
        self.notice_seq
    }

    /// 番号が一致する通知だけを消す
    pub fn dismiss_notice(&mut self, seq: u64) -> bool {
        if seq != self.notice_seq || self.session.notice.is_none() {
            return false;
        }
        self.session.notice = None;
        true
    }

    pub fn summary(&self) -> Option<ResultSummary> {
        self.session
            .current_result
            .as_ref()
            .map(|result| ResultSummary::from_predictions(&result.predictions))
    }

    /// Upload → Analyzing
    ///
    /// 解析中は受け付けない（None）。受け付けた場合は送信すべき画像を返す。
    pub fn select_file(
        &mut self,
        file: DetectionRequest,
        preview_reference: impl Into<String>,
    ) -> Option<DetectionRequest> {
        if self.session.screen == Screen::Analyzing {
            tracing::warn!(file = %file.file_name, "Ignoring file selection while analyzing");
            return None;
        }

        self.session.current_file = Some(file.clone());
        self.session.preview_reference = Some(preview_reference.into());
        self.session.current_result = None;
        self.session.result_origin = None;
        self.session.error = None;
        self.session.screen = Screen::Analyzing;
        Some(file)
    }

    /// Analyzing → Results
    pub fn detection_succeeded(&mut self, result: DetectionResult) {
        if self.session.screen != Screen::Analyzing {
            tracing::debug!(screen = self.session.screen.as_str(), "Discarding stale detection result");
            return;
        }
        self.session.current_result = Some(result);
        self.session.result_origin = Some(ResultOrigin::Analysis);
        self.session.screen = Screen::Results;
    }

    /// Analyzing → Upload（ファイルは再試行用に保持）
    pub fn detection_failed(&mut self, error: ApiError) {
        if self.session.screen != Screen::Analyzing {
            tracing::debug!(screen = self.session.screen.as_str(), "Discarding stale detection error");
            return;
        }
        tracing::warn!(error = %error, "Detection failed");
        self.session.error = Some(error);
        self.session.screen = Screen::Upload;
    }

    /// Upload → Analyzing（保持中のファイルを再送）
    pub fn retry(&mut self) -> Option<DetectionRequest> {
        if self.session.screen != Screen::Upload {
            return None;
        }
        let file = self.session.current_file.clone()?;
        let preview = self.session.preview_reference.clone().unwrap_or_default();
        self.select_file(file, preview)
    }

    /// 現在の解析を履歴の先頭に保存
    pub fn save_to_history(&mut self) -> Option<&HistoryEntry> {
        self.save_to_history_with(uuid::Uuid::new_v4().to_string(), Utc::now())
    }

    pub fn save_to_history_with(
        &mut self,
        id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Option<&HistoryEntry> {
        if self.session.screen != Screen::Results
            || self.session.result_origin != Some(ResultOrigin::Analysis)
        {
            return None;
        }
        let file = self.session.current_file.as_ref()?;
        let result = self.session.current_result.as_ref()?;

        let entry = HistoryEntry::from_result(
            id,
            created_at,
            file.file_name.clone(),
            self.session.preview_reference.clone().unwrap_or_default(),
            result,
        );
        tracing::info!(id = %entry.id, file = %entry.source_filename, "Saving analysis to history");

        self.history.insert(0, entry);
        self.persist_history();
        self.session.notice = Some(Notice::AnalysisSaved);
        self.notice_seq += 1;
        self.history.first()
    }

    /// Results → Upload（セッションをリセット）
    pub fn new_analysis(&mut self) {
        if self.session.screen == Screen::Analyzing {
            return;
        }
        self.session = Session::default();
    }

    /// Results/History → Upload（セッションは保持）
    pub fn back(&mut self) {
        if matches!(self.session.screen, Screen::Results | Screen::History) {
            self.session.screen = Screen::Upload;
        }
    }

    /// {Upload, Results, History} → History
    pub fn view_history(&mut self) {
        if self.session.screen != Screen::Analyzing {
            self.session.screen = Screen::History;
        }
    }

    /// History → Results（保存内容から結果を復元）
    pub fn select_history_entry(&mut self, id: &str) -> bool {
        if self.session.screen != Screen::History {
            return false;
        }
        let Some(entry) = self.history.iter().find(|entry| entry.id == id) else {
            return false;
        };

        self.session.current_result = Some(entry.to_result());
        self.session.preview_reference = Some(entry.original_image_reference.clone());
        self.session.result_origin = Some(ResultOrigin::History(entry.id.clone()));
        self.session.screen = Screen::Results;
        true
    }

    /// 履歴を1件削除
    pub fn delete_history_entry(&mut self, id: &str) -> bool {
        let before = self.history.len();
        self.history.retain(|entry| entry.id != id);
        if self.history.len() == before {
            return false;
        }
        self.persist_history();
        true
    }

    /// 履歴を全削除（確認済みの場合のみ）
    pub fn clear_history(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        self.history.clear();
        self.persist_history();
        true
    }

    fn persist_history(&self) {
        storage::write(&self.store, HISTORY_KEY, &self.history);
    }

    /// 画像を選択して解析まで実行する
    pub async fn submit<B: HttpBackend>(
        &mut self,
        api: &ApiClient<B>,
        file: DetectionRequest,
        preview_reference: impl Into<String>,
    ) -> Screen {
        match self.select_file(file, preview_reference) {
            Some(request) => self.run_detection(api, &request).await,
            None => self.screen(),
        }
    }

    /// 保持中のファイルで再解析する
    pub async fn retry_with<B: HttpBackend>(&mut self, api: &ApiClient<B>) -> Screen {
        match self.retry() {
            Some(request) => self.run_detection(api, &request).await,
            None => self.screen(),
        }
    }

    async fn run_detection<B: HttpBackend>(
        &mut self,
        api: &ApiClient<B>,
        request: &DetectionRequest,
    ) -> Screen {
        match api.detect_defects(request).await {
            Ok(result) => self.detection_succeeded(result),
            Err(err) => self.detection_failed(err),
        }
        self.screen()
    }
}
