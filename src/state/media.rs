//! Media files and players as returned by the storage layer.

use serde::{Deserialize, Deserializer, Serialize};

/// Broad media category derived from the MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("image/") {
            MediaKind::Image
        } else if mime.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }
}

/// An uploaded file. Read-only to the editor; elements reference it by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", alias = "mimeType", default)]
    pub mime_type: String,
    #[serde(default)]
    pub url: String,
}

impl MediaFile {
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_mime(&self.mime_type)
    }

    pub fn is_video(&self) -> bool {
        self.kind() == MediaKind::Video
    }

    pub fn is_image(&self) -> bool {
        self.kind() == MediaKind::Image
    }
}

/// A registered display device with its assigned playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(deserialize_with = "string_or_number")]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "string_list")]
    pub files: Vec<String>,
}

impl Player {
    /// New player with the conventional display name.
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            name: format!("Player {code}"),
            code,
            files: Vec::new(),
        }
    }

    /// Playlist after toggling `file_id`: removed when assigned, appended otherwise.
    pub fn toggled_files(&self, file_id: &str) -> Vec<String> {
        if self.files.iter().any(|id| id == file_id) {
            self.files.iter().filter(|id| *id != file_id).cloned().collect()
        } else {
            let mut files = self.files.clone();
            files.push(file_id.to_string());
            files
        }
    }

    pub fn has_file(&self, file_id: &str) -> bool {
        self.files.iter().any(|id| id == file_id)
    }
}

fn value_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) => Some(text),
        serde_json::Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Ids and player codes may come back as integers from typed columns.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    value_to_string(value).ok_or_else(|| serde::de::Error::custom("expected a string or number"))
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(value
        .unwrap_or_default()
        .into_iter()
        .filter_map(value_to_string)
        .collect())
}
