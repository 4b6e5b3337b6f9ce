//! 解析結果コンポーネント

use boardcheck_common::{defect_label, format_confidence, DetectionResult, ResultOrigin, ResultSummary};
use leptos::prelude::*;
use crate::app::AppHandle;

#[component]
pub fn ResultsView(app: AppHandle) -> impl IntoView {
    let result = move || app.ctx.with(|c| c.session().current_result.clone());
    let summary = move || app.ctx.with(|c| c.summary());
    let original = move || app.ctx.with(|c| c.session().preview_reference.clone().unwrap_or_default());
    let can_save = move || {
        app.ctx.with(|c| c.session().result_origin == Some(ResultOrigin::Analysis))
    };
    let (image_failed, set_image_failed) = signal(false);
    let (show_original, set_show_original) = signal(false);

    let analyzed_url = move || {
        result()
            .and_then(|r| r.result_image_reference)
            .map(|reference| app.resolve_image_url(&reference))
    };

    view! {
        <section class="results">
            <h2>{move || app.t("results.title")}</h2>

            {move || result().map(|r| view! { <StatusBanner app=app result=r /> })}

            <div class="image-compare">
                <figure>
                    <figcaption>{move || app.t("results.original")}</figcaption>
                    <img src=original alt="original" />
                </figure>
                <figure>
                    <figcaption>{move || app.t("results.analyzed")}</figcaption>
                    {move || match (analyzed_url(), image_failed.get(), show_original.get()) {
                        (Some(url), false, false) => view! {
                            <img src=url alt="analyzed" on:error=move |_| set_image_failed.set(true) />
                        }.into_any(),
                        (_, _, true) | (None, _, _) => view! { <img src=original alt="original" /> }.into_any(),
                        (Some(_), true, false) => view! {
                            <div class="image-error">
                                <p>{move || app.t("results.imageLoadFailed")}</p>
                                <button class="btn btn-small btn-tertiary" on:click=move |_| set_show_original.set(true)>
                                    {move || app.t("results.viewOriginalInstead")}
                                </button>
                            </div>
                        }.into_any(),
                    }}
                </figure>
            </div>

            {move || summary().map(|s| view! { <SummaryPanel app=app summary=s /> })}

            {move || result().filter(|r| !r.predictions.is_empty()).map(|r| {
                let rows = r.predictions.into_iter().enumerate().map(|(i, p)| {
                    let defect_type = p.defect_type.clone();
                    let label = move || defect_label(&defect_type, app.language.get());
                    view! {
                        <tr>
                            <td>{i + 1}</td>
                            <td>{label}</td>
                            <td>{format_confidence(p.confidence)}</td>
                            <td class="text-muted">
                                {p.bbox.to_string()}
                            </td>
                        </tr>
                    }
                }).collect_view();
                view! {
                    <table class="predictions">
                        <thead>
                            <tr>
                                <th>"#"</th>
                                <th>{move || app.t("results.defectTypes")}</th>
                                <th>{move || app.t("results.confidence")}</th>
                                <th>"bbox"</th>
                            </tr>
                        </thead>
                        <tbody>{rows}</tbody>
                    </table>
                }
            })}

            <Show when=can_save>
                <button class="btn btn-primary" on:click=move |_| app.save_to_history()>
                    {move || app.t("results.saveToHistory")}
                </button>
            </Show>
        </section>
    }
}

#[component]
fn StatusBanner(app: AppHandle, result: DetectionResult) -> impl IntoView {
    let (class, key) = if result.defects_found {
        ("status-banner defects", "results.defectsFound")
    } else {
        ("status-banner clean", "results.noDefects")
    };
    let count = result.predictions.len();

    view! {
        <div class=class>
            <h3>{move || app.t(key)}</h3>
            <p>{count}" "{move || app.t("results.defectsDetected")}</p>
        </div>
    }
}

#[component]
fn SummaryPanel(app: AppHandle, summary: ResultSummary) -> impl IntoView {
    let grade = summary.grade;
    let by_type = summary.by_type.clone();

    view! {
        <div class="summary-panel">
            <div class=format!("grade grade-{}", grade.tone())>
                <span class="grade-label">{move || app.t("results.qualityGrade")}</span>
                <span class="grade-value">{grade.as_str()}</span>
            </div>
            <div class="confidence">
                <span>{move || app.t("results.confidence")}</span>
                <span>{format_confidence(summary.average_confidence)}</span>
            </div>
            <ul class="defect-types">
                {by_type.into_iter().map(|(defect_type, count)| {
                    let unit = if count == 1 { "results.instance" } else { "results.instances" };
                    view! {
                        <li>
                            <span>{move || defect_label(&defect_type, app.language.get())}</span>
                            <span class="badge">{count}" "{move || app.t(unit)}</span>
                        </li>
                    }
                }).collect_view()}
            </ul>
        </div>
    }
}
