//! Calendar aggregation - month and day summaries of completion history.

use crate::period::CalendarMonth;
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use evermore_core::{date_key, ActivityCompletionEvent, ActivityKind, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Highest heatmap tier.
pub const MAX_INTENSITY: u8 = 3;

/// Heatmap tier for a number of events: `min(count, 3)`.
pub fn intensity_for_count(count: usize) -> u8 {
    count.min(MAX_INTENSITY as usize) as u8
}

/// Heatmap tier of a day.
pub fn heatmap_intensity(day: &DaySummary) -> u8 {
    intensity_for_count(day.count)
}

/// Completions within one month, bucketed by local calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    /// Year
    pub year: i32,

    /// Month (1-12)
    pub month: u32,

    /// Events in the month, in input order
    pub events: Vec<ActivityCompletionEvent>,

    /// Events keyed by `YYYY-MM-DD`
    pub density_by_date: BTreeMap<String, Vec<ActivityCompletionEvent>>,

    /// Number of events in the month
    pub total_count: usize,

    /// Events dropped because their timestamp could not be read
    pub skipped: usize,

    /// Length of the month in days
    pub days_in_month: u32,
}

impl MonthSummary {
    /// Events recorded on `date`.
    pub fn events_on(&self, date: NaiveDate) -> &[ActivityCompletionEvent] {
        self.density_by_date
            .get(&date_key(date))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Day summary for `date`, read from the density map.
    pub fn day(&self, date: NaiveDate) -> DaySummary {
        DaySummary::new(date, self.events_on(date).to_vec())
    }

    /// Heatmap tier for `date`.
    pub fn intensity_on(&self, date: NaiveDate) -> u8 {
        intensity_for_count(self.events_on(date).len())
    }

    /// Distinct kinds completed on `date`, in first-seen order.
    pub fn kinds_on(&self, date: NaiveDate) -> Vec<ActivityKind> {
        let mut kinds = Vec::new();
        for event in self.events_on(date) {
            if !kinds.contains(&event.kind) {
                kinds.push(event.kind);
            }
        }
        kinds
    }

    /// Completions per kind over the month.
    pub fn count_by_kind(&self) -> BTreeMap<ActivityKind, usize> {
        let mut counts = BTreeMap::new();
        for event in &self.events {
            *counts.entry(event.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Number of distinct dates with at least one completion.
    pub fn active_days(&self) -> usize {
        self.density_by_date.len()
    }

    /// Share of the month's days that were active, rounded to a whole percent.
    pub fn consistency_percent(&self) -> u32 {
        if self.days_in_month == 0 {
            return 0;
        }
        (self.active_days() as f64 / self.days_in_month as f64 * 100.0).round() as u32
    }

    /// Whether nothing was completed this month.
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

/// Completions on a single date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    /// The date
    pub date: NaiveDate,

    /// Events on the date, in input order
    pub events: Vec<ActivityCompletionEvent>,

    /// Number of events
    pub count: usize,
}

impl DaySummary {
    fn new(date: NaiveDate, events: Vec<ActivityCompletionEvent>) -> Self {
        Self {
            date,
            count: events.len(),
            events,
        }
    }

    /// `YYYY-MM-DD` key of the date.
    pub fn date_key(&self) -> String {
        date_key(self.date)
    }

    /// Heatmap tier.
    pub fn intensity(&self) -> u8 {
        heatmap_intensity(self)
    }
}

/// Builds calendar summaries from a completion log.
///
/// Stateless apart from the couple's calendar offset; safe to share across
/// threads and call concurrently on the same event snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarAggregator {
    offset: FixedOffset,
}

impl CalendarAggregator {
    /// Aggregator for a couple whose local calendar is `offset` from UTC.
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Aggregator on the UTC calendar.
    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// The calendar offset.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Summarize `year`/`month`.
    ///
    /// Events with unreadable timestamps are dropped and counted in
    /// [`MonthSummary::skipped`]; they never abort the aggregation.
    pub fn build_month_summary(
        &self,
        events: &[ActivityCompletionEvent],
        year: i32,
        month: u32,
    ) -> Result<MonthSummary> {
        let period = CalendarMonth::new(year, month)?;
        let (dated, skipped) = self.dated(events);

        let mut month_events = Vec::new();
        let mut density_by_date: BTreeMap<String, Vec<ActivityCompletionEvent>> = BTreeMap::new();
        for (date, event) in dated.into_iter().filter(|(date, _)| period.contains(*date)) {
            density_by_date
                .entry(date_key(date))
                .or_default()
                .push(event.clone());
            month_events.push(event.clone());
        }

        debug!(
            "Built summary for {}: {} events over {} days ({} skipped)",
            period,
            month_events.len(),
            density_by_date.len(),
            skipped
        );
        Ok(MonthSummary {
            year,
            month,
            total_count: month_events.len(),
            events: month_events,
            density_by_date,
            skipped,
            days_in_month: period.days_in_month(),
        })
    }

    /// Summarize a single date.
    pub fn build_day_summary(
        &self,
        events: &[ActivityCompletionEvent],
        year: i32,
        month: u32,
        day: u32,
    ) -> Result<DaySummary> {
        let target = CalendarMonth::new(year, month)?.day(day)?;
        let (dated, _) = self.dated(events);
        let day_events = dated
            .into_iter()
            .filter(|(date, _)| *date == target)
            .map(|(_, event)| event.clone())
            .collect();
        Ok(DaySummary::new(target, day_events))
    }

    /// Pair each readable event with its local date; count the rest.
    fn dated<'a>(
        &self,
        events: &'a [ActivityCompletionEvent],
    ) -> (Vec<(NaiveDate, &'a ActivityCompletionEvent)>, usize) {
        let mut dated = Vec::with_capacity(events.len());
        let mut skipped = 0;
        for event in events {
            match event.local_date(self.offset) {
                Ok(date) => dated.push((date, event)),
                Err(e) => {
                    warn!("Dropping {} completion: {}", event.kind, e);
                    skipped += 1;
                }
            }
        }
        (dated, skipped)
    }
}

impl Default for CalendarAggregator {
    fn default() -> Self {
        Self::utc()
    }
}
