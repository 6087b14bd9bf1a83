//! Activity completion controller - the single write path into progress.

use crate::engine::ProgressEngine;
use chrono::{FixedOffset, Offset, Utc};
use evermore_core::{
    ActivityCompletionEvent, ActivityKind, CoupleId, Error, ProgressState, Result, Time,
};
use evermore_storage::Storage;
use tracing::{debug, info, warn};

/// Loads, updates and persists a couple's progress.
///
/// `complete` is a plain read-modify-write with no locking: callers are
/// expected to drive one couple from a single task.
pub struct ActivityCompletionController<S: Storage> {
    storage: S,
    engine: ProgressEngine,
    offset: FixedOffset,
}

impl<S: Storage> ActivityCompletionController<S> {
    /// Create a controller using UTC as the couple's calendar.
    pub fn new(storage: S, engine: ProgressEngine) -> Self {
        Self {
            storage,
            engine,
            offset: Utc.fix(),
        }
    }

    /// Set the couple's local calendar offset.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// The engine in use.
    pub fn engine(&self) -> &ProgressEngine {
        &self.engine
    }

    /// Borrow the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give the storage back.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Current progress; a couple with nothing stored starts from zero.
    pub async fn load(&self, couple: &CoupleId) -> Result<ProgressState> {
        let state = self.storage.load_progress(couple).await?;
        debug!("Loaded progress for {} (stored: {})", couple, state.is_some());
        Ok(state.unwrap_or_default())
    }

    /// Complete `kind` for `couple` now.
    pub async fn complete(&mut self, couple: &CoupleId, kind: ActivityKind) -> Result<ProgressState> {
        let now = Utc::now().with_timezone(&self.offset);
        self.complete_at(couple, kind, now).await
    }

    /// Complete `kind` for `couple` at a given time.
    ///
    /// Rejects with [`Error::AlreadyCompleted`] if the activity is already
    /// marked complete, leaving stored state untouched. On success the new
    /// state is persisted and a completion event appended to the history.
    /// If the append fails the previous state is written back, so the
    /// call can be retried.
    pub async fn complete_at(
        &mut self,
        couple: &CoupleId,
        kind: ActivityKind,
        at: Time,
    ) -> Result<ProgressState> {
        let current = self.load(couple).await?;
        if current.is_completed(kind) {
            warn!("Rejected repeat completion of {} for {}", kind, couple);
            return Err(Error::AlreadyCompleted(kind));
        }

        let mut next = self.engine.apply_completion(&current, kind)?;
        next.last_activity_on = Some(at.with_timezone(&self.offset).date_naive());
        next.updated_at = Some(at);

        let title = self.engine.catalog().lookup(kind)?.title.clone();
        let event = ActivityCompletionEvent::at(kind, title, at);

        self.storage.save_progress(couple, &next).await?;
        if let Err(e) = self.storage.append_event(couple, &event).await {
            warn!("History append failed for {}, restoring progress: {}", couple, e);
            self.storage.save_progress(couple, &current).await?;
            return Err(e.into());
        }

        info!(
            "Completed {} for {}: streak {}, growth {:.1}",
            kind, couple, next.streak_days, next.tree_growth
        );
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use evermore_core::ActivityCatalog;
    use evermore_storage::{MemoryStorage, Result as StorageResult, StorageError};

    fn controller() -> ActivityCompletionController<MemoryStorage> {
        ActivityCompletionController::new(
            MemoryStorage::new(),
            ProgressEngine::new(ActivityCatalog::standard()),
        )
    }

    fn couple() -> CoupleId {
        CoupleId::new("demo-couple-123")
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> Time {
        FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_first_load_is_zeroed() {
        let state = controller().load(&couple()).await.unwrap();
        assert_eq!(state, ProgressState::new());
    }

    #[tokio::test]
    async fn test_complete_persists_and_logs() {
        let mut controller = controller();
        let state = controller
            .complete_at(&couple(), ActivityKind::DailyRitual, at(2024, 2, 1, 8))
            .await
            .unwrap();

        assert_eq!(state.streak_days, 1);
        assert_eq!(state.last_activity_on, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(controller.load(&couple()).await.unwrap(), state);

        let events = controller.storage().list_events(&couple()).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ActivityKind::DailyRitual);
        assert_eq!(events[0].title, "2-Minute Gratitude Hug");
        assert_eq!(events[0].completed_at, "2024-02-01T08:00:00+00:00");
    }

    #[tokio::test]
    async fn test_repeat_completion_rejected_without_changes() {
        let mut controller = controller();
        let first = controller
            .complete_at(&couple(), ActivityKind::WeeklyGesture, at(2024, 2, 1, 20))
            .await
            .unwrap();

        let err = controller
            .complete_at(&couple(), ActivityKind::WeeklyGesture, at(2024, 2, 2, 20))
            .await
            .unwrap_err();
        assert_eq!(err, Error::AlreadyCompleted(ActivityKind::WeeklyGesture));

        assert_eq!(controller.load(&couple()).await.unwrap(), first);
        assert_eq!(controller.storage().save_count(), 1);
        assert_eq!(controller.storage().list_events(&couple()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_couples_are_independent() {
        let mut controller = controller();
        let other = CoupleId::new("other-couple");
        controller
            .complete_at(&couple(), ActivityKind::DailyRitual, at(2024, 2, 1, 8))
            .await
            .unwrap();
        let state = controller
            .complete_at(&other, ActivityKind::DailyRitual, at(2024, 2, 1, 9))
            .await
            .unwrap();
        assert_eq!(state.streak_days, 1);
    }

    #[tokio::test]
    async fn test_offline_store_is_transport_error() {
        let mut storage = MemoryStorage::new();
        storage.set_offline(true);
        let mut controller = ActivityCompletionController::new(storage, ProgressEngine::default());

        let err = controller
            .complete(&couple(), ActivityKind::DailyRitual)
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    /// Memory store whose history can be switched off on its own.
    struct FlakyHistory {
        inner: MemoryStorage,
        history_down: bool,
    }

    #[async_trait::async_trait]
    impl Storage for FlakyHistory {
        async fn save_progress(&mut self, couple: &CoupleId, state: &ProgressState) -> StorageResult<()> {
            self.inner.save_progress(couple, state).await
        }

        async fn load_progress(&self, couple: &CoupleId) -> StorageResult<Option<ProgressState>> {
            self.inner.load_progress(couple).await
        }

        async fn append_event(&mut self, couple: &CoupleId, event: &ActivityCompletionEvent) -> StorageResult<()> {
            if self.history_down {
                return Err(StorageError::Unavailable("history down".to_string()));
            }
            self.inner.append_event(couple, event).await
        }

        async fn list_events(&self, couple: &CoupleId) -> StorageResult<Vec<ActivityCompletionEvent>> {
            self.inner.list_events(couple).await
        }

        async fn list_couples(&self) -> StorageResult<Vec<CoupleId>> {
            self.inner.list_couples().await
        }
    }

    #[tokio::test]
    async fn test_failed_append_restores_progress() {
        let storage = FlakyHistory {
            inner: MemoryStorage::new(),
            history_down: true,
        };
        let mut controller = ActivityCompletionController::new(storage, ProgressEngine::default());

        let err = controller
            .complete_at(&couple(), ActivityKind::DailyRitual, at(2024, 2, 1, 8))
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(controller.load(&couple()).await.unwrap(), ProgressState::new());
        assert!(controller.storage().list_events(&couple()).await.unwrap().is_empty());

        let mut storage = controller.into_storage();
        storage.history_down = false;
        let mut controller = ActivityCompletionController::new(storage, ProgressEngine::default());
        let state = controller
            .complete_at(&couple(), ActivityKind::DailyRitual, at(2024, 2, 1, 9))
            .await
            .unwrap();
        assert_eq!(state.streak_days, 1);
        assert_eq!(controller.storage().list_events(&couple()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_local_offset_sets_activity_date() {
        let plus_nine = FixedOffset::east_opt(9 * 3600).unwrap();
        let mut controller = controller().with_offset(plus_nine);
        // 20:00 UTC is already the next day in UTC+9.
        let state = controller
            .complete_at(&couple(), ActivityKind::DailyRitual, at(2024, 2, 1, 20))
            .await
            .unwrap();
        assert_eq!(state.last_activity_on, NaiveDate::from_ymd_opt(2024, 2, 2));
    }
}
