//! Calendar aggregation for Evermore.
//!
//! Month and day summaries of completion history, heatmap tiers and the
//! six-week month grid used for calendar layout.

#![warn(missing_docs)]

pub mod period;
pub mod aggregator;
pub mod grid;
pub mod service;

pub use period::CalendarMonth;
pub use aggregator::{
    CalendarAggregator, MonthSummary, DaySummary, heatmap_intensity, intensity_for_count,
    MAX_INTENSITY,
};
pub use grid::{month_grid, weeks, GridDay, GRID_DAYS};
pub use service::{CalendarService, CalendarView};
