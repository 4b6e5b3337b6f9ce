//! 検出結果の集計（件数・種類別件数・平均信頼度・品質グレード）

use crate::i18n::{translate, Language};
use crate::types::DetectionPrediction;
use serde::{Deserialize, Serialize};

/// 既知の欠陥種別
pub const KNOWN_DEFECT_TYPES: &[&str] = &[
    "missing_hole",
    "mouse_bite",
    "open_circuit",
    "short_circuit",
    "spur",
    "spurious_copper",
];

/// 欠陥種別の表示名（未知の種別はタグをそのまま表示）
pub fn defect_label(defect_type: &str, language: Language) -> String {
    if KNOWN_DEFECT_TYPES.contains(&defect_type) {
        translate(&format!("defectTypes.{}", defect_type), language).to_string()
    } else {
        defect_type.to_string()
    }
}

/// 品質グレード（欠陥数のみで決まる）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityGrade {
    A,
    B,
    C,
    D,
}

impl QualityGrade {
    /// 0 → A, 1-2 → B, 3-5 → C, 6以上 → D
    pub fn from_defect_count(count: usize) -> Self {
        match count {
            0 => QualityGrade::A,
            1..=2 => QualityGrade::B,
            3..=5 => QualityGrade::C,
            _ => QualityGrade::D,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityGrade::A => "A",
            QualityGrade::B => "B",
            QualityGrade::C => "C",
            QualityGrade::D => "D",
        }
    }

    /// CSSクラス用
    pub fn tone(&self) -> &'static str {
        match self {
            QualityGrade::A => "good",
            QualityGrade::B => "fair",
            QualityGrade::C => "poor",
            QualityGrade::D => "bad",
        }
    }
}

impl std::fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 検出結果の集計
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub total: usize,
    /// 種別ごとの件数（初出順）
    pub by_type: Vec<(String, usize)>,
    pub average_confidence: f64,
    pub grade: QualityGrade,
}

impl ResultSummary {
    pub fn from_predictions(predictions: &[DetectionPrediction]) -> Self {
        let mut by_type: Vec<(String, usize)> = Vec::new();
        for prediction in predictions {
            match by_type.iter_mut().find(|(t, _)| *t == prediction.defect_type) {
                Some((_, count)) => *count += 1,
                None => by_type.push((prediction.defect_type.clone(), 1)),
            }
        }

        let total = predictions.len();
        let average_confidence = if total == 0 {
            0.0
        } else {
            predictions.iter().map(|p| p.confidence).sum::<f64>() / total as f64
        };

        Self {
            total,
            by_type,
            average_confidence,
            grade: QualityGrade::from_defect_count(total),
        }
    }

    pub fn count_of(&self, defect_type: &str) -> usize {
        self.by_type
            .iter()
            .find(|(t, _)| t == defect_type)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// 信頼度をパーセント表記に
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}
