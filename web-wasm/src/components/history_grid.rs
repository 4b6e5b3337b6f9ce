//! 解析履歴コンポーネント

use boardcheck_common::{HistoryEntry, HistoryFilter};
use leptos::prelude::*;
use crate::app::AppHandle;

#[component]
pub fn HistoryGrid(app: AppHandle) -> impl IntoView {
    let (filter, set_filter) = signal(HistoryFilter::All);
    let entries = move || {
        let filter = filter.get();
        app.ctx.with(|c| c.filtered_history(filter).into_iter().cloned().collect::<Vec<_>>())
    };
    let is_empty = move || app.ctx.with(|c| c.history().is_empty());

    let on_view = move |id: String| {
        app.ctx.update(|c| {
            c.select_history_entry(&id);
        });
    };
    let on_delete = move |id: String| {
        app.ctx.update(|c| {
            c.delete_history_entry(&id);
        });
    };
    let on_clear = move |_| {
        let confirmed = gloo::dialogs::confirm(app.t("confirmations.clearHistory"));
        app.ctx.update(|c| {
            c.clear_history(confirmed);
        });
    };

    view! {
        <section class="history">
            <div class="history-header">
                <h2>{move || app.t("history.title")}</h2>
                <Show when=move || !is_empty()>
                    <button class="btn btn-small btn-tertiary" on:click=on_clear>
                        {move || app.t("history.clearAll")}
                    </button>
                </Show>
            </div>

            <div class="history-filters">
                {HistoryFilter::ALL.into_iter().map(|f| view! {
                    <button
                        class="btn btn-small"
                        class:active=move || filter.get() == f
                        on:click=move |_| set_filter.set(f)
                    >
                        {move || app.t(f.label_key())}
                    </button>
                }).collect_view()}
            </div>

            <Show
                when=move || !is_empty()
                fallback=move || view! { <p class="text-muted">{move || app.t("history.empty")}</p> }
            >
                <Show
                    when=move || !entries().is_empty()
                    fallback=move || view! { <p class="text-muted">{move || app.t("history.noResultsForFilter")}</p> }
                >
                    <div class="history-grid">
                        <For
                            each=entries
                            key=|entry| entry.id.clone()
                            children=move |entry| view! {
                                <HistoryCard app=app entry=entry on_view=on_view on_delete=on_delete />
                            }
                        />
                    </div>
                </Show>
            </Show>
        </section>
    }
}

#[component]
fn HistoryCard<FV, FD>(
    app: AppHandle,
    entry: HistoryEntry,
    on_view: FV,
    on_delete: FD,
) -> impl IntoView
where
    FV: Fn(String) + 'static + Clone + Send,
    FD: Fn(String) + 'static + Clone + Send,
{
    let (status_class, status_key) = if entry.defects_found {
        ("photo-status defects", "history.defectsFound")
    } else {
        ("photo-status clean", "history.noDefects")
    };
    let created_at = entry.created_at.format("%Y-%m-%d %H:%M").to_string();

    view! {
        <div class="history-card">
            <img src=entry.original_image_reference.clone() alt=entry.source_filename.clone() />
            <div class="history-info">
                <h4>{entry.source_filename.clone()}</h4>
                <p class="text-muted">{created_at}</p>
                <div class="history-meta">
                    <span class=status_class>{move || app.t(status_key)}</span>
                    <span>{entry.defect_count}" "{move || app.t("history.defects")}</span>
                </div>
                <div class="history-actions">
                    <button
                        class="btn btn-small btn-secondary"
                        on:click={
                            let on_view = on_view.clone();
                            let id = entry.id.clone();
                            move |_| on_view(id.clone())
                        }
                    >
                        {move || app.t("history.view")}
                    </button>
                    <button
                        class="btn btn-small btn-tertiary"
                        on:click={
                            let on_delete = on_delete.clone();
                            let id = entry.id.clone();
                            move |_| on_delete(id.clone())
                        }
                    >
                        {move || app.t("history.delete")}
                    </button>
                </div>
            </div>
        </div>
    }
}
