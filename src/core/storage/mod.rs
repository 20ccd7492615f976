//! Storage of media files, players and canvases.
//!
//! [`SignageStore`] is the contract the editor talks to. The application runs
//! a [`FallbackStore`]: the remote store when configured, the local JSON store
//! whenever the remote one is unreachable.

mod config;
mod fallback;
mod local;
mod upload;

pub use config::StorageConfig;
pub use fallback::FallbackStore;
pub use local::LocalStore;
pub use upload::{generate_player_code, generate_upload_id, resolve_media_type, stored_file_name, UploadRequest};

use async_trait::async_trait;

use crate::state::{CanvasRecord, CanvasSummary, MediaFile, Player};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StorageError::NotFound { entity, id: id.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }

    /// Whether a failed remote call should be retried against local storage.
    pub fn should_fall_back(&self) -> bool {
        match self {
            StorageError::Unavailable(_) | StorageError::Request(_) | StorageError::Json(_) => true,
            StorageError::Rejected { status, .. } => *status >= 500,
            StorageError::NotFound { .. }
            | StorageError::UnsupportedMedia(_)
            | StorageError::Validation(_)
            | StorageError::Conflict(_)
            | StorageError::Io(_) => false,
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait SignageStore: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn list_files(&self) -> StorageResult<Vec<MediaFile>>;

    /// Players, newest first.
    async fn list_players(&self) -> StorageResult<Vec<Player>>;

    /// Register a player under a fresh six-digit code.
    async fn create_player(&self) -> StorageResult<Player>;

    /// Replace a player's playlist. Unknown codes are `NotFound`.
    async fn set_player_files(&self, code: &str, files: Vec<String>) -> StorageResult<Player>;

    async fn get_canvas(&self, id: &str) -> StorageResult<CanvasRecord>;

    async fn list_canvases(&self) -> StorageResult<Vec<CanvasSummary>>;

    /// Insert or replace a canvas; its timeline is replaced as a whole.
    async fn upsert_canvas(&self, record: &CanvasRecord) -> StorageResult<String>;

    /// Delete a canvas and its timeline.
    async fn delete_canvas(&self, id: &str) -> StorageResult<()>;

    async fn upload_file(&self, request: UploadRequest) -> StorageResult<MediaFile>;
}
