//! In-memory storage backend.

use std::collections::HashMap;
use evermore_core::{ActivityCompletionEvent, CoupleId, ProgressState};
use super::{Storage, StorageError, Result};

/// Storage kept entirely in memory.
///
/// Can be switched offline, in which case every call fails with
/// [`StorageError::Unavailable`].
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    progress: HashMap<CoupleId, ProgressState>,
    history: HashMap<CoupleId, Vec<ActivityCompletionEvent>>,
    offline: bool,
    saves: usize,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a couple's history.
    pub fn with_history(mut self, couple: CoupleId, events: Vec<ActivityCompletionEvent>) -> Self {
        self.history.insert(couple, events);
        self
    }

    /// Toggle offline mode.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Number of successful progress saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline {
            Err(StorageError::Unavailable("memory storage is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn save_progress(&mut self, couple: &CoupleId, state: &ProgressState) -> Result<()> {
        self.ensure_online()?;
        self.progress.insert(couple.clone(), state.clone());
        self.saves += 1;
        Ok(())
    }

    async fn load_progress(&self, couple: &CoupleId) -> Result<Option<ProgressState>> {
        self.ensure_online()?;
        Ok(self.progress.get(couple).cloned())
    }

    async fn append_event(&mut self, couple: &CoupleId, event: &ActivityCompletionEvent) -> Result<()> {
        self.ensure_online()?;
        self.history.entry(couple.clone()).or_default().push(event.clone());
        Ok(())
    }

    async fn list_events(&self, couple: &CoupleId) -> Result<Vec<ActivityCompletionEvent>> {
        self.ensure_online()?;
        Ok(self.history.get(couple).cloned().unwrap_or_default())
    }

    async fn list_couples(&self) -> Result<Vec<CoupleId>> {
        self.ensure_online()?;
        let mut couples: Vec<CoupleId> = self.progress.keys().cloned().collect();
        couples.sort();
        Ok(couples)
    }
}
