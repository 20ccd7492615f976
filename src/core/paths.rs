use std::path::{Path, PathBuf};

fn app_root() -> PathBuf {
    let base = std::env::var("LOCALAPPDATA")
        .or_else(|_| std::env::var("APPDATA"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir());
    base.join("SignageStudio")
}

/// Default root for local tables and uploads.
pub fn app_data_root() -> PathBuf {
    app_root().join("data")
}

/// Create `path` and its parents if missing.
pub async fn ensure_dir(path: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_root_layout() {
        let root = app_data_root();
        assert!(root.ends_with(Path::new("SignageStudio").join("data")));
    }

    #[tokio::test]
    async fn test_ensure_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }
}
