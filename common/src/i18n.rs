//! 翻訳（英語/アラビア語）
//!
//! ドット区切りのキーと言語から表示文字列を引く。
//! テーブルは (キー, 英語, アラビア語) のフラットな一覧で、
//! 起動時に `validate_catalog` で重複・欠落を検査する。

use crate::error::CatalogError;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 表示言語
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ar];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "en" => Some(Language::En),
            "ar" => Some(Language::Ar),
            _ => None,
        }
    }

    /// 右から左に書く言語か
    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Ar)
    }

    pub fn dir(&self) -> &'static str {
        if self.is_rtl() { "rtl" } else { "ltr" }
    }

    /// 言語切替ボタン用
    pub fn toggled(&self) -> Self {
        match self {
            Language::En => Language::Ar,
            Language::Ar => Language::En,
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s).ok_or_else(|| format!("Unknown language: {}. Use en or ar", s))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

type Entry = (&'static str, &'static str, &'static str);

const ENTRIES: &[Entry] = &[
    // Header
    ("header.serverOnline", "Server Online", "الخادم متصل"),
    ("header.serverOffline", "Server Offline", "الخادم غير متصل"),
    ("header.checking", "Checking...", "جاري الفحص..."),
    ("header.analyses", "analyses", "تحليلات"),
    ("header.switchLanguage", "العربية", "English"),
    // Hero
    ("hero.title", "PCB Defect Detection", "كشف عيوب اللوحات المطبوعة"),
    ("hero.subtitle", "AI-powered quality control for your PCBs", "مراقبة جودة مدعومة بالذكاء الاصطناعي للوحاتك المطبوعة"),
    // Upload
    ("upload.title", "Upload PCB Image", "رفع صورة اللوحة المطبوعة"),
    ("upload.dropzone", "Drag and drop an image here, or click to select", "اسحب وأفلت صورة هنا، أو انقر للاختيار"),
    ("upload.formats", "Supports JPG, PNG, BMP up to 10MB", "يدعم JPG، PNG، BMP حتى 10MB"),
    ("upload.uploadFromDevice", "Upload from Device", "رفع من الجهاز"),
    ("upload.demo", "Use Demo Image", "استخدام صورة تجريبية"),
    ("upload.analyzing", "Analyzing...", "جاري التحليل..."),
    ("upload.error", "Error:", "خطأ:"),
    ("upload.fileTooLarge", "File too large. Maximum 10MB allowed", "الملف كبير جداً. الحد الأقصى 10MB"),
    ("upload.fileTypeNotSupported", "File type not supported. Use JPG, PNG, or BMP", "نوع الملف غير مدعوم. استخدم JPG، PNG، أو BMP"),
    ("upload.demoImageNotAvailable", "Demo image not available", "لم يتم العثور على الصورة التجريبية"),
    // Results
    ("results.title", "Analysis Results", "نتائج التحليل"),
    ("results.noDefects", "No Defects Found", "لم يتم العثور على عيوب"),
    ("results.defectsFound", "Defects Detected", "تم العثور على عيوب"),
    ("results.defectTypes", "Defect Types", "أنواع العيوب"),
    ("results.confidence", "Confidence", "الثقة"),
    ("results.saveToHistory", "Save to History", "حفظ في السجل"),
    ("results.original", "Original", "الأصلية"),
    ("results.analyzed", "Analyzed", "المحللة"),
    ("results.qualityGrade", "Quality Grade", "تصنيف الجودة"),
    ("results.defectsDetected", "defects detected", "عيوب تم اكتشافها"),
    ("results.instance", "instance", "حالة"),
    ("results.instances", "instances", "حالات"),
    ("results.imageLoadFailed", "Failed to load analyzed image", "فشل في تحميل الصورة المحللة"),
    ("results.viewOriginalInstead", "View original instead", "عرض الصورة الأصلية بدلاً من ذلك"),
    // History
    ("history.title", "Analysis History", "سجل التحليل"),
    ("history.empty", "No saved analyses", "لا يوجد تحليلات محفوظة"),
    ("history.clearAll", "Clear All", "مسح الكل"),
    ("history.view", "View", "عرض"),
    ("history.delete", "Delete", "حذف"),
    ("history.defectsFound", "Defects Found", "عيوب موجودة"),
    ("history.noDefects", "No Defects", "لا توجد عيوب"),
    ("history.defects", "defects", "عيوب"),
    ("history.noResultsForFilter", "No results for this filter", "لا توجد نتائج لهذا المرشح"),
    ("history.filters.all", "All", "الكل"),
    ("history.filters.defects", "With Defects", "مع عيوب"),
    ("history.filters.clean", "Clean", "نظيفة"),
    // Actions
    ("actions.retry", "Retry", "إعادة المحاولة"),
    ("actions.newAnalysis", "New Analysis", "تحليل جديد"),
    ("actions.viewHistory", "View History", "عرض السجل"),
    ("actions.back", "Back", "رجوع"),
    ("actions.cancel", "Cancel", "إلغاء"),
    ("actions.confirm", "Confirm", "تأكيد"),
    ("actions.save", "Save", "حفظ"),
    ("actions.close", "Close", "إغلاق"),
    // Errors
    ("errors.analysisError", "An error occurred during analysis", "حدث خطأ أثناء التحليل"),
    ("errors.networkError", "Network error. Check your connection", "خطأ في الشبكة. تحقق من اتصالك"),
    ("errors.serverError", "Server error. Please try again", "خطأ في الخادم. حاول مرة أخرى"),
    ("errors.invalidFile", "Invalid file", "ملف غير صالح"),
    ("errors.networkConnectionFailed", "Network connection failed. Please check your internet connection.", "فشل الاتصال بالشبكة. تحقق من اتصال الإنترنت."),
    ("errors.requestTimedOut", "Request timed out. The server may be starting up, please try again.", "انتهت مهلة الطلب. قد يكون الخادم قيد التشغيل، حاول مرة أخرى."),
    ("errors.serverErrorRetry", "Server error. Please try again later.", "خطأ في الخادم. حاول مرة أخرى لاحقاً."),
    ("errors.fileTooLarge", "Image file is too large. Please use an image under 10MB.", "الملف كبير جداً. استخدم صورة أقل من 10MB."),
    ("errors.invalidImageFormat", "Invalid image format. Please use JPG, PNG, or BMP.", "تنسيق الصورة غير صالح. استخدم JPG أو PNG أو BMP."),
    ("errors.imageNotFound", "Image not found.", "الصورة غير موجودة."),
    ("errors.unexpectedError", "An unexpected error occurred. Please try again.", "حدث خطأ غير متوقع. حاول مرة أخرى."),
    // Success / confirmations
    ("success.analysisSaved", "Analysis saved", "تم حفظ التحليل"),
    ("confirmations.clearHistory", "Are you sure you want to clear all history?", "هل تريد مسح جميع السجلات؟"),
    // Defect types
    ("defectTypes.missing_hole", "Missing Hole", "ثقب مفقود"),
    ("defectTypes.mouse_bite", "Mouse Bite", "عضة الفأر"),
    ("defectTypes.open_circuit", "Open Circuit", "دائرة مفتوحة"),
    ("defectTypes.short_circuit", "Short Circuit", "دائرة قصيرة"),
    ("defectTypes.spur", "Spur", "نتوء"),
    ("defectTypes.spurious_copper", "Spurious Copper", "نحاس زائد"),
    // Footer
    ("footer.copyright", "© 2024 BoardCheck AI - AI-powered PCB defect detection", "© 2024 BoardCheck AI - مدعوم بالذكاء الاصطناعي لفحص اللوحات المطبوعة"),
];

/// (キー, 言語) → 文字列 のフラットな対応表
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<&'static str, [&'static str; 2]>,
}

impl Catalog {
    /// 一覧を検査して対応表を作る
    pub fn from_entries(entries: &[Entry]) -> Result<Self, CatalogError> {
        let mut map = HashMap::with_capacity(entries.len());

        for &(key, en, ar) in entries {
            if key.is_empty() || key.split('.').any(|segment| segment.is_empty()) {
                return Err(CatalogError::MalformedKey(key.to_string()));
            }
            for (language, text) in [(Language::En, en), (Language::Ar, ar)] {
                if text.trim().is_empty() {
                    return Err(CatalogError::MissingTranslation {
                        key: key.to_string(),
                        language: language.code(),
                    });
                }
            }
            if map.insert(key, [en, ar]).is_some() {
                return Err(CatalogError::DuplicateKey(key.to_string()));
            }
        }

        Ok(Self { entries: map })
    }

    pub fn get(&self, key: &str, language: Language) -> Option<&'static str> {
        self.entries.get(key).map(|pair| match language {
            Language::En => pair[0],
            Language::Ar => pair[1],
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

lazy_static! {
    static ref CATALOG_RESULT: Result<Catalog, CatalogError> = Catalog::from_entries(ENTRIES);
    static ref EMPTY_CATALOG: Catalog = Catalog::default();
}

/// 組み込み翻訳テーブルを検査する（起動時に呼ぶ）
pub fn validate_catalog() -> Result<(), CatalogError> {
    CATALOG_RESULT.as_ref().map(|_| ()).map_err(Clone::clone)
}

fn catalog() -> &'static Catalog {
    match CATALOG_RESULT.as_ref() {
        Ok(catalog) => catalog,
        Err(_) => &EMPTY_CATALOG,
    }
}

/// 翻訳を引く
///
/// キーが存在しない場合は警告を出してキー自体を返す
pub fn translate(key: &str, language: Language) -> &str {
    match catalog().get(key, language) {
        Some(text) => text,
        None => {
            tracing::warn!(key, language = language.code(), "Translation key not found");
            key
        }
    }
}

/// 言語を固定した翻訳関数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Translator {
    pub language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        translate(key, self.language)
    }
}
