use serde::Serialize;
use validator::Validate;

/// File as received from the browser.
#[derive(Debug, Clone, Validate)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    #[validate(length(min = 1, message = "uploaded file is empty"))]
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: String, mime_type: String, content: Vec<u8>) -> Self {
        Self {
            file_name,
            mime_type,
            content,
        }
    }
}

/// Output of the file loader: what the view shows and what the model receives.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: usize,
    /// `data:` URL, only for `image/*` uploads
    pub preview: Option<String>,
    /// Bare base64 of the whole file, no `data:` prefix
    #[serde(skip_serializing)]
    pub base64_payload: String,
}
