//! 解析対象画像の読み込み

use crate::error::{BoardCheckError, Result};
use boardcheck_common::DetectionRequest;
use image::ImageFormat;
use std::path::Path;

/// 形式が判定できないときの宣言タイプ（検証で不正形式として扱われる）
const UNKNOWN_MIME: &str = "application/octet-stream";

/// 画像ファイルを読み込み、宣言タイプを付けて返す
///
/// タイプは拡張子から、拡張子で判定できなければ内容から判定する
pub fn load_image(path: &Path) -> Result<DetectionRequest> {
    if !path.is_file() {
        return Err(BoardCheckError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| BoardCheckError::ImageLoad(format!("{}: {}", path.display(), e)))?;
    let content_type = detect_content_type(path, &bytes);
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    tracing::debug!(file = %file_name, content_type, size = bytes.len(), "Loaded image");
    Ok(DetectionRequest::new(file_name, content_type, bytes))
}

pub fn detect_content_type(path: &Path, bytes: &[u8]) -> &'static str {
    ImageFormat::from_path(path)
        .ok()
        .or_else(|| image::guess_format(bytes).ok())
        .map(mime_for)
        .unwrap_or(UNKNOWN_MIME)
}

fn mime_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Png => "image/png",
        ImageFormat::Bmp => "image/bmp",
        // 対象外の形式もそのまま宣言し、検証で弾く
        other => other.to_mime_type(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardcheck_common::MediaType;
    use tempfile::tempdir;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(detect_content_type(Path::new("a.JPG"), &[]), "image/jpeg");
        assert_eq!(detect_content_type(Path::new("a.jpeg"), &[]), "image/jpeg");
        assert_eq!(detect_content_type(Path::new("b.png"), &[]), "image/png");
        assert_eq!(detect_content_type(Path::new("c.bmp"), &[]), "image/bmp");
    }

    #[test]
    fn test_content_type_from_bytes_without_extension() {
        assert_eq!(detect_content_type(Path::new("board"), PNG_HEADER), "image/png");
        assert_eq!(detect_content_type(Path::new("notes"), b"hello"), UNKNOWN_MIME);
    }

    #[test]
    fn test_unsupported_format_is_not_accepted() {
        let mime = detect_content_type(Path::new("anim.gif"), &[]);
        assert_eq!(MediaType::from_mime(mime), None);
    }

    #[test]
    fn test_load_image() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("board.png");
        std::fs::write(&path, PNG_HEADER).expect("書き込み失敗");

        let request = load_image(&path).expect("読み込み失敗");
        assert_eq!(request.file_name, "board.png");
        assert_eq!(request.content_type, "image/png");
        assert_eq!(request.size(), PNG_HEADER.len());
    }

    #[test]
    fn test_load_missing_image() {
        let err = load_image(Path::new("/nonexistent/board.jpg")).unwrap_err();
        assert!(matches!(err, BoardCheckError::FileNotFound(_)));
    }
}
