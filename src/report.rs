//! 端末向けの結果表示

use boardcheck_common::{
    defect_label, format_confidence, DetectionResult, HistoryEntry, ResultSummary, Translator,
};
use chrono::Local;

/// 解析結果の表示用テキスト
///
/// `result_image_url` は解決済みのURL（なければ表示しない）
pub fn format_result(
    result: &DetectionResult,
    result_image_url: Option<&str>,
    translator: Translator,
) -> String {
    let t = |key: &'static str| -> &'static str { translator.t(key) };
    let summary = ResultSummary::from_predictions(&result.predictions);
    let mut lines = Vec::new();

    let status = if result.defects_found { t("results.defectsFound") } else { t("results.noDefects") };
    lines.push(format!("== {} ==", t("results.title")));
    lines.push(format!("{} ({} {})", status, summary.total, t("results.defectsDetected")));
    lines.push(format!("{}: {}", t("results.qualityGrade"), summary.grade));

    if summary.total > 0 {
        lines.push(format!(
            "{}: {}",
            t("results.confidence"),
            format_confidence(summary.average_confidence)
        ));
        lines.push(format!("{}:", t("results.defectTypes")));
        for (defect_type, count) in &summary.by_type {
            let unit = if *count == 1 { t("results.instance") } else { t("results.instances") };
            lines.push(format!(
                "  - {}: {} {}",
                defect_label(defect_type, translator.language),
                count,
                unit
            ));
        }
        for (i, p) in result.predictions.iter().enumerate() {
            lines.push(format!(
                "  #{} {} {} {}",
                i + 1,
                defect_label(&p.defect_type, translator.language),
                format_confidence(p.confidence),
                p.bbox
            ));
        }
    }

    if let Some(url) = result_image_url.filter(|url| !url.is_empty()) {
        lines.push(format!("{}: {}", t("results.analyzed"), url));
    }

    lines.join("\n")
}

/// 履歴1行分
pub fn format_history_line(entry: &HistoryEntry, translator: Translator) -> String {
    let status = if entry.defects_found {
        translator.t("history.defectsFound")
    } else {
        translator.t("history.noDefects")
    };
    format!(
        "{}  {}  {}  {} ({} {})",
        entry.id,
        entry.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        entry.source_filename,
        status,
        entry.defect_count,
        translator.t("history.defects")
    )
}
