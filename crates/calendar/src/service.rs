//! Calendar service - summaries over a couple's stored history.

use crate::aggregator::{CalendarAggregator, DaySummary, MonthSummary};
use crate::period::CalendarMonth;
use evermore_core::{ActivityCompletionEvent, CoupleId, Result};
use evermore_storage::Storage;
use serde::Serialize;
use tracing::warn;

/// A calendar view that may be degraded.
///
/// `Unavailable` means the history could not be read, which is different
/// from a loaded view with no activities.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CalendarView<T> {
    /// History was read and summarized
    Loaded(T),
    /// History source could not be reached
    Unavailable {
        /// Why the history could not be read
        reason: String,
    },
}

impl<T> CalendarView<T> {
    /// Whether data was loaded.
    pub fn is_loaded(&self) -> bool {
        matches!(self, CalendarView::Loaded(_))
    }

    /// The loaded summary, if any.
    pub fn loaded(&self) -> Option<&T> {
        match self {
            CalendarView::Loaded(summary) => Some(summary),
            CalendarView::Unavailable { .. } => None,
        }
    }
}

/// Reads history from storage and aggregates it.
pub struct CalendarService<S: Storage> {
    storage: S,
    aggregator: CalendarAggregator,
}

impl<S: Storage> CalendarService<S> {
    /// Create a service.
    pub fn new(storage: S, aggregator: CalendarAggregator) -> Self {
        Self { storage, aggregator }
    }

    /// Month view for a couple. Invalid periods fail; unreadable history
    /// degrades to [`CalendarView::Unavailable`].
    pub async fn month_view(
        &self,
        couple: &CoupleId,
        year: i32,
        month: u32,
    ) -> Result<CalendarView<MonthSummary>> {
        CalendarMonth::new(year, month)?;
        match self.history(couple).await {
            Ok(events) => Ok(CalendarView::Loaded(
                self.aggregator.build_month_summary(&events, year, month)?,
            )),
            Err(reason) => Ok(CalendarView::Unavailable { reason }),
        }
    }

    /// Day view for a couple.
    pub async fn day_view(
        &self,
        couple: &CoupleId,
        year: i32,
        month: u32,
        day: u32,
    ) -> Result<CalendarView<DaySummary>> {
        CalendarMonth::new(year, month)?.day(day)?;
        match self.history(couple).await {
            Ok(events) => Ok(CalendarView::Loaded(
                self.aggregator.build_day_summary(&events, year, month, day)?,
            )),
            Err(reason) => Ok(CalendarView::Unavailable { reason }),
        }
    }

    async fn history(&self, couple: &CoupleId) -> std::result::Result<Vec<ActivityCompletionEvent>, String> {
        self.storage.list_events(couple).await.map_err(|e| {
            warn!("History for {} unavailable: {}", couple, e);
            e.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evermore_core::{ActivityKind, Error};
    use evermore_storage::MemoryStorage;

    fn couple() -> CoupleId {
        CoupleId::new("demo-couple-123")
    }

    fn seeded() -> MemoryStorage {
        MemoryStorage::new().with_history(
            couple(),
            vec![
                ActivityCompletionEvent::new(ActivityKind::DailyRitual, "Hug", "2024-02-01T08:00"),
                ActivityCompletionEvent::new(ActivityKind::WeeklyGesture, "Cook", "2024-02-01T20:00"),
            ],
        )
    }

    #[tokio::test]
    async fn test_loaded_month() {
        let service = CalendarService::new(seeded(), CalendarAggregator::utc());
        let view = service.month_view(&couple(), 2024, 2).await.unwrap();
        assert_eq!(view.loaded().unwrap().total_count, 2);
    }

    #[tokio::test]
    async fn test_empty_history_is_loaded_not_unavailable() {
        let service = CalendarService::new(MemoryStorage::new(), CalendarAggregator::utc());
        let view = service.month_view(&couple(), 2024, 2).await.unwrap();
        assert!(view.is_loaded());
        assert!(view.loaded().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_offline_history_degrades() {
        let mut storage = seeded();
        storage.set_offline(true);
        let service = CalendarService::new(storage, CalendarAggregator::utc());

        let month = service.month_view(&couple(), 2024, 2).await.unwrap();
        assert!(matches!(month, CalendarView::Unavailable { .. }));
        let day = service.day_view(&couple(), 2024, 2, 1).await.unwrap();
        assert!(!day.is_loaded());
    }

    #[tokio::test]
    async fn test_invalid_period_still_fails_when_offline() {
        let mut storage = seeded();
        storage.set_offline(true);
        let service = CalendarService::new(storage, CalendarAggregator::utc());

        assert!(matches!(
            service.month_view(&couple(), 2024, 13).await,
            Err(Error::InvalidPeriod(_))
        ));
        assert!(matches!(
            service.day_view(&couple(), 2023, 2, 29).await,
            Err(Error::InvalidPeriod(_))
        ));
    }

    #[tokio::test]
    async fn test_day_view() {
        let service = CalendarService::new(seeded(), CalendarAggregator::utc());
        let view = service.day_view(&couple(), 2024, 2, 1).await.unwrap();
        let day = view.loaded().unwrap();
        assert_eq!(day.count, 2);
        assert_eq!(day.intensity(), 2);
    }
}
