use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::core::paths::ensure_dir;
use crate::state::{CanvasRecord, CanvasSummary, MediaFile, Player};
use super::{
    generate_player_code, generate_upload_id, resolve_media_type, stored_file_name, SignageStore, StorageError,
    StorageResult, UploadRequest,
};

const FILES_TABLE: &str = "files.json";
const PLAYERS_TABLE: &str = "players.json";
const CANVASES_TABLE: &str = "canvases.json";

/// JSON-file storage under a data directory.
///
/// Each table is one pretty-printed JSON array. Writes are serialized by an
/// async mutex so concurrent read-modify-write cycles cannot interleave.
pub struct LocalStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    async fn read_table<T: DeserializeOwned>(&self, table: &str) -> StorageResult<Vec<T>> {
        let path = self.root.join(table);
        match tokio::fs::read_to_string(&path).await {
            Ok(json) if json.trim().is_empty() => Ok(Vec::new()),
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_table<T: Serialize>(&self, table: &str, rows: &[T]) -> StorageResult<()> {
        ensure_dir(&self.root).await?;
        let json = serde_json::to_string_pretty(rows)?;
        tokio::fs::write(self.root.join(table), json).await?;
        Ok(())
    }
}

#[async_trait]
impl SignageStore for LocalStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn list_files(&self) -> StorageResult<Vec<MediaFile>> {
        self.read_table(FILES_TABLE).await
    }

    async fn list_players(&self) -> StorageResult<Vec<Player>> {
        self.read_table(PLAYERS_TABLE).await
    }

    async fn create_player(&self) -> StorageResult<Player> {
        let _guard = self.lock.lock().await;
        let mut players: Vec<Player> = self.read_table(PLAYERS_TABLE).await?;
        let mut code = generate_player_code();
        while players.iter().any(|player| player.code == code) {
            code = generate_player_code();
        }
        let player = Player::new(code);
        players.insert(0, player.clone());
        self.write_table(PLAYERS_TABLE, &players).await?;
        tracing::info!(code = %player.code, "Player created locally");
        Ok(player)
    }

    async fn set_player_files(&self, code: &str, files: Vec<String>) -> StorageResult<Player> {
        let _guard = self.lock.lock().await;
        let mut players: Vec<Player> = self.read_table(PLAYERS_TABLE).await?;
        let player = players
            .iter_mut()
            .find(|player| player.code == code)
            .ok_or_else(|| StorageError::not_found("player", code))?;
        player.files = files;
        let updated = player.clone();
        self.write_table(PLAYERS_TABLE, &players).await?;
        Ok(updated)
    }

    async fn get_canvas(&self, id: &str) -> StorageResult<CanvasRecord> {
        let canvases: Vec<CanvasRecord> = self.read_table(CANVASES_TABLE).await?;
        canvases
            .into_iter()
            .find(|canvas| canvas.id == id)
            .ok_or_else(|| StorageError::not_found("canvas", id))
    }

    async fn list_canvases(&self) -> StorageResult<Vec<CanvasSummary>> {
        let canvases: Vec<CanvasRecord> = self.read_table(CANVASES_TABLE).await?;
        Ok(canvases
            .into_iter()
            .map(|canvas| CanvasSummary {
                id: canvas.id,
                name: canvas.name,
            })
            .collect())
    }

    async fn upsert_canvas(&self, record: &CanvasRecord) -> StorageResult<String> {
        if record.id.trim().is_empty() || record.name.trim().is_empty() {
            return Err(StorageError::Validation("id and name required".into()));
        }
        let _guard = self.lock.lock().await;
        let mut canvases: Vec<CanvasRecord> = self.read_table(CANVASES_TABLE).await?;
        match canvases.iter_mut().find(|canvas| canvas.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => canvases.push(record.clone()),
        }
        self.write_table(CANVASES_TABLE, &canvases).await?;
        Ok(record.id.clone())
    }

    async fn delete_canvas(&self, id: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        let mut canvases: Vec<CanvasRecord> = self.read_table(CANVASES_TABLE).await?;
        canvases.retain(|canvas| canvas.id != id);
        self.write_table(CANVASES_TABLE, &canvases).await
    }

    async fn upload_file(&self, request: UploadRequest) -> StorageResult<MediaFile> {
        let name = request.display_name();
        let mime_type = resolve_media_type(request.mime_type.as_deref(), &name)?;

        let uploads = self.uploads_dir();
        ensure_dir(&uploads).await?;
        let id = generate_upload_id();
        let destination = uploads.join(stored_file_name(&id, &name));
        tokio::fs::write(&destination, &request.bytes).await?;

        let file = MediaFile {
            id,
            name,
            mime_type,
            url: destination.to_string_lossy().to_string(),
        };

        let _guard = self.lock.lock().await;
        let mut files: Vec<MediaFile> = self.read_table(FILES_TABLE).await?;
        files.insert(0, file.clone());
        self.write_table(FILES_TABLE, &files).await?;
        tracing::info!(id = %file.id, name = %file.name, "File stored locally");
        Ok(file)
    }
}
