use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

use crate::providers::supabase::SupabaseStore;
use crate::state::{CanvasRecord, CanvasSummary, MediaFile, Player};
use super::{LocalStore, SignageStore, StorageConfig, StorageError, StorageResult, UploadRequest};

/// Remote store first, local store when the remote one cannot serve a call.
pub struct FallbackStore {
    remote: Option<Arc<dyn SignageStore>>,
    local: Arc<dyn SignageStore>,
}

impl FallbackStore {
    pub fn new(remote: Option<Arc<dyn SignageStore>>, local: Arc<dyn SignageStore>) -> Self {
        Self { remote, local }
    }

    /// Build from configuration: remote only when URL and key are both set.
    pub fn from_config(config: &StorageConfig) -> Self {
        let remote = match (&config.supabase_url, &config.supabase_key) {
            (Some(url), Some(key)) => match SupabaseStore::new(url, key) {
                Ok(store) => Some(Arc::new(store) as Arc<dyn SignageStore>),
                Err(err) => {
                    tracing::warn!(error = %err, "Remote storage disabled");
                    None
                }
            },
            _ => None,
        };
        if remote.is_none() {
            tracing::info!(data_dir = %config.data_dir.display(), "Using local storage only");
        }
        Self::new(remote, Arc::new(LocalStore::new(config.data_dir.clone())))
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    async fn run<'a, T, F, Fut>(&'a self, operation: &'static str, call: F) -> StorageResult<T>
    where
        F: Fn(&'a dyn SignageStore) -> Fut,
        Fut: Future<Output = StorageResult<T>> + 'a,
    {
        self.run_with(operation, StorageError::should_fall_back, call).await
    }

    async fn run_with<'a, T, F, Fut, P>(&'a self, operation: &'static str, falls_back: P, call: F) -> StorageResult<T>
    where
        F: Fn(&'a dyn SignageStore) -> Fut,
        Fut: Future<Output = StorageResult<T>> + 'a,
        P: Fn(&StorageError) -> bool,
    {
        if let Some(remote) = self.remote.as_deref() {
            match call(remote).await {
                Ok(value) => return Ok(value),
                Err(err) if falls_back(&err) => {
                    tracing::warn!(operation, error = %err, "Remote storage failed; using local storage");
                }
                Err(err) => return Err(err),
            }
        }
        call(self.local.as_ref()).await
    }
}

#[async_trait]
impl SignageStore for FallbackStore {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn list_files(&self) -> StorageResult<Vec<MediaFile>> {
        self.run("list_files", |store| store.list_files()).await
    }

    async fn list_players(&self) -> StorageResult<Vec<Player>> {
        self.run("list_players", |store| store.list_players()).await
    }

    /// Any remote failure falls back, including rejected inserts.
    async fn create_player(&self) -> StorageResult<Player> {
        self.run_with("create_player", |_| true, |store| store.create_player()).await
    }

    async fn set_player_files(&self, code: &str, files: Vec<String>) -> StorageResult<Player> {
        self.run("set_player_files", |store| store.set_player_files(code, files.clone()))
            .await
    }

    /// A canvas missing locally after a remote failure is not reported as
    /// missing: the remote error is returned so the caller cannot mistake an
    /// outage for an empty canvas.
    async fn get_canvas(&self, id: &str) -> StorageResult<CanvasRecord> {
        let Some(remote) = self.remote.as_deref() else {
            return self.local.get_canvas(id).await;
        };
        let remote_err = match remote.get_canvas(id).await {
            Ok(record) => return Ok(record),
            Err(err) if err.should_fall_back() => err,
            Err(err) => return Err(err),
        };
        tracing::warn!(operation = "get_canvas", error = %remote_err, "Remote storage failed; using local storage");
        match self.local.get_canvas(id).await {
            Err(err) if err.is_not_found() => {
                tracing::warn!(canvas_id = %id, "Canvas not stored locally; reporting remote failure");
                Err(remote_err)
            }
            result => result,
        }
    }

    async fn list_canvases(&self) -> StorageResult<Vec<CanvasSummary>> {
        self.run("list_canvases", |store| store.list_canvases()).await
    }

    async fn upsert_canvas(&self, record: &CanvasRecord) -> StorageResult<String> {
        self.run("upsert_canvas", |store| store.upsert_canvas(record)).await
    }

    async fn delete_canvas(&self, id: &str) -> StorageResult<()> {
        self.run("delete_canvas", |store| store.delete_canvas(id)).await
    }

    async fn upload_file(&self, request: UploadRequest) -> StorageResult<MediaFile> {
        // Reject before any I/O, remote or local.
        resolve_type_early(&request)?;
        self.run("upload_file", |store| store.upload_file(request.clone())).await
    }
}

fn resolve_type_early(request: &UploadRequest) -> StorageResult<()> {
    super::resolve_media_type(request.mime_type.as_deref(), &request.display_name()).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Remote double that fails every call with a fixed error.
    struct FailingRemote {
        calls: AtomicUsize,
        error: fn() -> StorageError,
    }

    impl FailingRemote {
        fn new(error: fn() -> StorageError) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                error,
            }
        }

        fn fail<T>(&self) -> StorageResult<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err((self.error)())
        }
    }

    #[async_trait]
    impl SignageStore for FailingRemote {
        fn name(&self) -> &'static str {
            "failing"
        }
        async fn list_files(&self) -> StorageResult<Vec<MediaFile>> {
            self.fail()
        }
        async fn list_players(&self) -> StorageResult<Vec<Player>> {
            self.fail()
        }
        async fn create_player(&self) -> StorageResult<Player> {
            self.fail()
        }
        async fn set_player_files(&self, _code: &str, _files: Vec<String>) -> StorageResult<Player> {
            self.fail()
        }
        async fn get_canvas(&self, _id: &str) -> StorageResult<CanvasRecord> {
            self.fail()
        }
        async fn list_canvases(&self) -> StorageResult<Vec<CanvasSummary>> {
            self.fail()
        }
        async fn upsert_canvas(&self, _record: &CanvasRecord) -> StorageResult<String> {
            self.fail()
        }
        async fn delete_canvas(&self, _id: &str) -> StorageResult<()> {
            self.fail()
        }
        async fn upload_file(&self, _request: UploadRequest) -> StorageResult<MediaFile> {
            self.fail()
        }
    }

    fn store_with(remote: Arc<FailingRemote>, dir: &tempfile::TempDir) -> FallbackStore {
        FallbackStore::new(Some(remote as Arc<dyn SignageStore>), Arc::new(LocalStore::new(dir.path())))
    }

    #[tokio::test]
    async fn test_unreachable_remote_falls_back_to_local() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(FailingRemote::new(|| StorageError::Unavailable("offline".into())));
        let store = store_with(remote.clone(), &dir);

        let player = store.create_player().await.unwrap();
        let players = store.list_players().await.unwrap();
        assert_eq!(players[0].code, player.code);
        assert_eq!(remote.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_client_errors_are_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(FailingRemote::new(|| StorageError::Rejected {
            status: 400,
            message: "bad".into(),
        }));
        let store = store_with(remote, &dir);
        assert!(matches!(
            store.list_canvases().await,
            Err(StorageError::Rejected { status: 400, .. })
        ));
        // Player creation still falls back.
        assert!(store.create_player().await.is_ok());
    }

    #[tokio::test]
    async fn test_not_found_does_not_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(FailingRemote::new(|| StorageError::not_found("player", "1")));
        let store = store_with(remote, &dir);
        assert!(store.set_player_files("1", vec![]).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_remote_failure_is_not_reported_as_missing_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(FailingRemote::new(|| StorageError::Rejected {
            status: 502,
            message: "bad gateway".into(),
        }));
        let store = store_with(remote, &dir);

        let err = store.get_canvas("c1").await.unwrap_err();
        assert!(!err.is_not_found());
        assert!(matches!(err, StorageError::Rejected { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_remote_failure_serves_local_copy() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(FailingRemote::new(|| StorageError::Unavailable("offline".into())));
        let local = LocalStore::new(dir.path());
        let doc = crate::state::CanvasDocument::new("Kept");
        local.upsert_canvas(&doc.to_record()).await.unwrap();
        let store = store_with(remote, &dir);

        assert_eq!(store.get_canvas(&doc.id).await.unwrap().name, "Kept");
    }

    #[tokio::test]
    async fn test_local_only_missing_canvas_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FallbackStore::new(None, Arc::new(LocalStore::new(dir.path())));
        assert!(store.get_canvas("nope").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_unsupported_upload_rejected_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(FailingRemote::new(|| StorageError::Unavailable("offline".into())));
        let store = store_with(remote.clone(), &dir);
        let result = store.upload_file(UploadRequest::new(vec![0], "notes.txt", None)).await;
        assert!(matches!(result, Err(StorageError::UnsupportedMedia(_))));
        assert_eq!(remote.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_local_only_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FallbackStore::new(None, Arc::new(LocalStore::new(dir.path())));
        assert!(!store.has_remote());
        assert!(store.list_files().await.unwrap().is_empty());
    }
}
