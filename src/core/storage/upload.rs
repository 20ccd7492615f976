use rand::Rng;
use std::path::Path;

use crate::constants::{PLAYER_CODE_MAX, PLAYER_CODE_MIN};
use crate::state::MediaKind;
use super::{StorageError, StorageResult};

/// File picked for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub bytes: Vec<u8>,
    pub name: String,
    /// Declared MIME type, if the picker provided one.
    pub mime_type: Option<String>,
}

impl UploadRequest {
    pub fn new(bytes: Vec<u8>, name: impl Into<String>, mime_type: Option<String>) -> Self {
        Self {
            bytes,
            name: name.into(),
            mime_type,
        }
    }

    /// Display name, or `upload-<millis>` when the file had none.
    pub fn display_name(&self) -> String {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            format!("upload-{}", chrono::Utc::now().timestamp_millis())
        } else {
            trimmed.to_string()
        }
    }
}

/// Resolve the MIME type from the declaration or the file name; only images
/// and videos are accepted.
pub fn resolve_media_type(declared: Option<&str>, file_name: &str) -> StorageResult<String> {
    let mime = declared
        .map(str::trim)
        .filter(|mime| !mime.is_empty())
        .map(str::to_ascii_lowercase)
        .or_else(|| mime_guess::from_path(file_name).first().map(|mime| mime.essence_str().to_string()))
        .ok_or_else(|| StorageError::UnsupportedMedia(format!("unknown type for {file_name}")))?;

    match MediaKind::from_mime(&mime) {
        MediaKind::Image | MediaKind::Video => Ok(mime),
        MediaKind::Other => Err(StorageError::UnsupportedMedia(mime)),
    }
}

/// `<unix millis><0..999>`
pub fn generate_upload_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random_range(0..1000);
    format!("{millis}{suffix}")
}

/// Stored object name: the id plus the original extension.
pub fn stored_file_name(id: &str, original_name: &str) -> String {
    match Path::new(original_name).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{id}.{ext}"),
        _ => id.to_string(),
    }
}

/// Six-digit numeric player code.
pub fn generate_player_code() -> String {
    rand::rng().random_range(PLAYER_CODE_MIN..=PLAYER_CODE_MAX).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_declaration_or_name() {
        assert_eq!(resolve_media_type(Some("video/mp4"), "x.bin").unwrap(), "video/mp4");
        assert_eq!(resolve_media_type(None, "photo.PNG").unwrap(), "image/png");
        assert_eq!(resolve_media_type(Some("  "), "clip.webm").unwrap(), "video/webm");
    }

    #[test]
    fn test_media_type_rejects_other_kinds() {
        assert!(matches!(
            resolve_media_type(Some("application/pdf"), "doc.pdf"),
            Err(StorageError::UnsupportedMedia(_))
        ));
        assert!(matches!(
            resolve_media_type(None, "notes.txt"),
            Err(StorageError::UnsupportedMedia(_))
        ));
        assert!(resolve_media_type(None, "no_extension").is_err());
    }

    #[test]
    fn test_stored_file_name_keeps_extension() {
        assert_eq!(stored_file_name("1700000000000123", "clip.mp4"), "1700000000000123.mp4");
        assert_eq!(stored_file_name("42", "README"), "42");
    }

    #[test]
    fn test_generated_codes_and_ids() {
        for _ in 0..50 {
            let code = generate_player_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
        let id = generate_upload_id();
        assert!(id.len() >= 14);
        assert!(id.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_display_name_fallback() {
        let request = UploadRequest::new(vec![1], "   ", None);
        assert!(request.display_name().starts_with("upload-"));
    }
}
