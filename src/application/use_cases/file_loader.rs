use base64::Engine as _;
use validator::Validate;

use crate::domain::error::{AppError, Result};
use crate::domain::upload::{LoadedFile, UploadedFile};

pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Shown when an upload cannot be read or is rejected.
pub const FILE_READ_FAILED_MESSAGE: &str = "파일을 읽지 못했습니다. 다른 파일을 선택해 주세요.";

/// Turns an upload into a preview and a base64 payload for the model.
#[derive(Debug, Default)]
pub struct FileLoader;

impl FileLoader {
    pub fn new() -> Self {
        Self
    }

    pub async fn load(&self, file: UploadedFile) -> Result<LoadedFile> {
        file.validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let mime_type = resolve_mime_type(&file.mime_type, &file.content);
        let UploadedFile {
            file_name, content, ..
        } = file;
        let size_bytes = content.len();

        let preview_mime = mime_type.clone();
        let joined = tokio::task::spawn_blocking(move || {
            let payload = base64::engine::general_purpose::STANDARD.encode(&content);
            let preview = preview_mime
                .starts_with("image/")
                .then(|| format!("data:{};base64,{}", preview_mime, payload));
            (payload, preview)
        })
        .await;

        let (base64_payload, preview) =
            joined.map_err(|e| AppError::Internal(format!("Encoding task failed: {}", e)))?;

        Ok(LoadedFile {
            file_name,
            mime_type,
            size_bytes,
            preview,
            base64_payload,
        })
    }
}

/// The declared type wins unless it is missing or generic; then the content
/// is sniffed.
pub fn resolve_mime_type(declared: &str, content: &[u8]) -> String {
    let declared = declared
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if !declared.is_empty() && declared != FALLBACK_MIME_TYPE {
        return declared;
    }

    sniff_mime_type(content)
        .unwrap_or(FALLBACK_MIME_TYPE)
        .to_string()
}

fn sniff_mime_type(content: &[u8]) -> Option<&'static str> {
    if content.starts_with(b"%PDF-") {
        return Some("application/pdf");
    }
    image::guess_format(content)
        .ok()
        .map(|format| format.to_mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn upload(name: &str, mime: &str, content: &[u8]) -> UploadedFile {
        UploadedFile::new(name.to_string(), mime.to_string(), content.to_vec())
    }

    #[tokio::test]
    async fn test_image_gets_preview_and_payload() {
        let loaded = FileLoader::new()
            .load(upload("scan.png", "image/png", PNG_HEADER))
            .await
            .unwrap();

        let expected = base64::engine::general_purpose::STANDARD.encode(PNG_HEADER);
        assert_eq!(loaded.base64_payload, expected);
        assert!(!loaded.base64_payload.starts_with("data:"));
        assert_eq!(
            loaded.preview.as_deref(),
            Some(format!("data:image/png;base64,{}", expected).as_str())
        );
        assert_eq!(loaded.size_bytes, PNG_HEADER.len());
    }

    #[tokio::test]
    async fn test_pdf_has_no_preview() {
        let loaded = FileLoader::new()
            .load(upload("warrant.pdf", "application/pdf", b"%PDF-1.7\n..."))
            .await
            .unwrap();
        assert!(loaded.preview.is_none());
        assert_eq!(loaded.mime_type, "application/pdf");
        assert!(!loaded.base64_payload.is_empty());
    }

    #[tokio::test]
    async fn test_empty_file_is_rejected() {
        let err = FileLoader::new()
            .load(upload("empty.png", "image/png", b""))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_declared_mime_type_wins() {
        assert_eq!(resolve_mime_type("image/webp", b"%PDF-"), "image/webp");
        assert_eq!(
            resolve_mime_type("Image/JPEG; charset=binary", b""),
            "image/jpeg"
        );
    }

    #[test]
    fn test_generic_mime_type_is_sniffed() {
        assert_eq!(resolve_mime_type("", b"%PDF-1.4"), "application/pdf");
        assert_eq!(
            resolve_mime_type("application/octet-stream", PNG_HEADER),
            "image/png"
        );
        assert_eq!(resolve_mime_type("", b"plain text"), FALLBACK_MIME_TYPE);
    }
}
