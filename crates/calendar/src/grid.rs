//! Month grid layout: six Sunday-first weeks covering a month.

use crate::period::CalendarMonth;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use evermore_core::{Error, Result};
use serde::Serialize;

/// Cells in a month grid (six weeks of seven days).
pub const GRID_DAYS: usize = 42;

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridDay {
    /// The date shown in the cell
    pub date: NaiveDate,
    /// Whether the date belongs to the requested month
    pub in_month: bool,
    /// Whether the date is today
    pub is_today: bool,
}

/// Build the 42-day grid for `year`/`month`, starting on the Sunday on or
/// before the 1st.
pub fn month_grid(year: i32, month: u32, today: NaiveDate) -> Result<Vec<GridDay>> {
    let period = CalendarMonth::new(year, month)?;
    let first = period.first_day()?;
    let lead = u64::from(first.weekday().num_days_from_sunday());
    let start = first
        .checked_sub_days(Days::new(lead))
        .ok_or_else(|| Error::InvalidPeriod(format!("{} grid starts out of range", period)))?;

    let grid: Vec<GridDay> = start
        .iter_days()
        .take(GRID_DAYS)
        .map(|date| GridDay {
            date,
            in_month: period.contains(date),
            is_today: date == today,
        })
        .collect();

    if grid.len() != GRID_DAYS {
        return Err(Error::InvalidPeriod(format!("{} grid ends out of range", period)));
    }
    debug_assert_eq!(grid[0].date.weekday(), Weekday::Sun);
    Ok(grid)
}

/// Split a grid into weeks.
pub fn weeks(grid: &[GridDay]) -> impl Iterator<Item = &[GridDay]> {
    grid.chunks(7)
}
