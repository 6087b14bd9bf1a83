//! JSON file storage implementation.
//!
//! Stores each couple's progress and history as JSON files under
//! `couples/<id>/` and keeps a small per-couple meta marker
//! (version + updated_at) under `meta/`.

use std::path::{Path, PathBuf};
use evermore_core::{ActivityCompletionEvent, CoupleId, ProgressState};
use super::{Storage, StorageError, Result};
use tokio::fs;
use tracing::{debug, warn};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage, creating the directory layout if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("couples")).await?;
        fs::create_dir_all(root.join("meta")).await?;

        Ok(Self { root })
    }

    fn couple_dir(&self, couple: &CoupleId) -> Result<PathBuf> {
        if !couple.is_storage_safe() {
            return Err(StorageError::InvalidKey(couple.to_string()));
        }
        Ok(self.root.join("couples").join(couple.as_str()))
    }

    fn progress_path(&self, couple: &CoupleId) -> Result<PathBuf> {
        Ok(self.couple_dir(couple)?.join("progress.json"))
    }

    fn history_path(&self, couple: &CoupleId) -> Result<PathBuf> {
        Ok(self.couple_dir(couple)?.join("history.json"))
    }

    fn meta_path(&self, couple: &CoupleId) -> Result<PathBuf> {
        self.couple_dir(couple)?;
        Ok(self.root.join("meta").join(format!("{}.meta.json", couple)))
    }

    /// Read and increment the couple's progress version, return new version.
    async fn bump_version(&self, couple: &CoupleId) -> Result<u64> {
        let path = self.meta_path(couple)?;
        let mut version = 0u64;
        match fs::read_to_string(&path).await {
            Ok(s) => match serde_json::from_str::<serde_json::Value>(&s) {
                Ok(json) => match json.get("version").and_then(|v| v.as_u64()) {
                    Some(v) => version = v,
                    None => warn!("No version in {}, restarting at 1", path.display()),
                },
                Err(e) => warn!("Unreadable meta {}, restarting at 1: {}", path.display(), e),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Cannot read meta {}, restarting at 1: {}", path.display(), e),
        }
        version += 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(&path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }

    /// Current progress version of a couple (0 if never saved).
    pub async fn version(&self, couple: &CoupleId) -> Result<u64> {
        let meta: Option<serde_json::Value> = read_json(&self.meta_path(couple)?).await?;
        Ok(meta
            .and_then(|m| m.get("version").and_then(|v| v.as_u64()))
            .unwrap_or(0))
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_progress(&mut self, couple: &CoupleId, state: &ProgressState) -> Result<()> {
        let dir = self.couple_dir(couple)?;
        fs::create_dir_all(&dir).await?;

        write_json(&self.progress_path(couple)?, state).await?;
        let version = self.bump_version(couple).await?;
        debug!("Saved progress for {} (version {})", couple, version);
        Ok(())
    }

    async fn load_progress(&self, couple: &CoupleId) -> Result<Option<ProgressState>> {
        read_json(&self.progress_path(couple)?).await
    }

    async fn append_event(&mut self, couple: &CoupleId, event: &ActivityCompletionEvent) -> Result<()> {
        let dir = self.couple_dir(couple)?;
        fs::create_dir_all(&dir).await?;

        let path = self.history_path(couple)?;
        let mut history: Vec<ActivityCompletionEvent> =
            read_json(&path).await?.unwrap_or_default();
        history.push(event.clone());
        write_json(&path, &history).await?;
        debug!("Appended {} to history of {} ({} entries)", event.kind, couple, history.len());
        Ok(())
    }

    async fn list_events(&self, couple: &CoupleId) -> Result<Vec<ActivityCompletionEvent>> {
        Ok(read_json(&self.history_path(couple)?).await?.unwrap_or_default())
    }

    async fn list_couples(&self) -> Result<Vec<CoupleId>> {
        let mut couples = Vec::new();
        let mut rd = fs::read_dir(self.root.join("couples")).await?;
        while let Some(entry) = rd.next_entry().await? {
            if !entry.path().join("progress.json").exists() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                couples.push(CoupleId::new(name));
            }
        }
        couples.sort();
        Ok(couples)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write via a sibling temp file and rename.
async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json.as_bytes()).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
