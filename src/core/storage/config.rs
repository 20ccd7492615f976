use std::path::PathBuf;

use crate::core::paths::app_data_root;

/// Storage configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    /// Remote project URL; remote storage is off without it.
    pub supabase_url: Option<String>,
    /// Service-role key, or the anonymous key when no service key is set.
    pub supabase_key: Option<String>,
    /// Root of the local JSON tables and uploads.
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                     | Default                          |
    /// |-----------------------------|----------------------------------|
    /// | `SUPABASE_URL`              | unset (local storage only)       |
    /// | `SUPABASE_SERVICE_ROLE_KEY` | falls back to `SUPABASE_ANON_KEY`|
    /// | `SIGNAGE_DATA_DIR`          | per-user `SignageStudio/data`    |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|value| value.trim().to_string()).filter(|v| !v.is_empty());
        let supabase_url = non_empty("SUPABASE_URL").map(|url| url.trim_end_matches('/').to_string());
        let supabase_key = non_empty("SUPABASE_SERVICE_ROLE_KEY").or_else(|| non_empty("SUPABASE_ANON_KEY"));
        let data_dir = non_empty("SIGNAGE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(app_data_root);
        Self {
            supabase_url,
            supabase_key,
            data_dir,
        }
    }

    /// Both URL and key are present.
    pub fn has_remote(&self) -> bool {
        self.supabase_url.is_some() && self.supabase_key.is_some()
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }
}
