//! Storage trait abstraction.

use async_trait::async_trait;
use evermore_core::{ActivityCompletionEvent, CoupleId, ProgressState};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Couple id cannot be used as a storage key
    #[error("Invalid couple id: {0:?}")]
    InvalidKey(String),

    /// Backend cannot be reached
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for evermore_core::Error {
    fn from(e: StorageError) -> Self {
        evermore_core::Error::TransportUnavailable(e.to_string())
    }
}

/// Storage abstraction for couple progress and activity history.
///
/// Progress is a single value per couple, overwritten on every save. History
/// is append-only and returned in append order.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Progress operations ===

    /// Save a couple's progress (create or overwrite).
    async fn save_progress(&mut self, couple: &CoupleId, state: &ProgressState) -> Result<()>;

    /// Load a couple's progress.
    async fn load_progress(&self, couple: &CoupleId) -> Result<Option<ProgressState>>;

    // === History operations ===

    /// Append a completion event to the couple's history.
    async fn append_event(&mut self, couple: &CoupleId, event: &ActivityCompletionEvent) -> Result<()>;

    /// List the couple's history in append order.
    async fn list_events(&self, couple: &CoupleId) -> Result<Vec<ActivityCompletionEvent>>;

    // === Couples ===

    /// List couples with stored progress.
    async fn list_couples(&self) -> Result<Vec<CoupleId>>;
}
