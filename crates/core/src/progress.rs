//! Progress state - the per-couple dashboard model.

use crate::activity::{ActivityKind, ActivityStatus, MetricDimension};
use crate::Time;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upper bound for every metric and for tree growth.
pub const MAX_LEVEL: f64 = 100.0;

/// Lower bound for every metric and for tree growth.
pub const MIN_LEVEL: f64 = 0.0;

/// Cumulative relationship metrics, each within `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    /// Communication level
    pub communication: f64,
    /// Intimacy level
    pub intimacy: f64,
    /// Trust level
    pub trust: f64,
}

impl Metrics {
    /// Level along one dimension.
    pub fn get(&self, dimension: MetricDimension) -> f64 {
        match dimension {
            MetricDimension::Communication => self.communication,
            MetricDimension::Intimacy => self.intimacy,
            MetricDimension::Trust => self.trust,
        }
    }

    /// Mutable level along one dimension.
    pub fn get_mut(&mut self, dimension: MetricDimension) -> &mut f64 {
        match dimension {
            MetricDimension::Communication => &mut self.communication,
            MetricDimension::Intimacy => &mut self.intimacy,
            MetricDimension::Trust => &mut self.trust,
        }
    }
}

/// Progress of one couple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Relationship metrics
    pub metrics: Metrics,

    /// Tree growth percentage
    pub tree_growth: f64,

    /// Daily ritual streak
    pub streak_days: u32,

    /// Completion flags for the current period
    #[serde(default)]
    pub activity_status: BTreeMap<ActivityKind, ActivityStatus>,

    /// Local date of the most recent completion
    #[serde(default)]
    pub last_activity_on: Option<NaiveDate>,

    /// When the state was last written
    #[serde(default)]
    pub updated_at: Option<Time>,
}

impl ProgressState {
    /// Fresh state: zero metrics, no growth, no streak, nothing completed.
    pub fn new() -> Self {
        Self {
            metrics: Metrics::default(),
            tree_growth: 0.0,
            streak_days: 0,
            activity_status: ActivityKind::ALL
                .into_iter()
                .map(|kind| (kind, ActivityStatus::default()))
                .collect(),
            last_activity_on: None,
            updated_at: None,
        }
    }

    /// Completion flag for a kind; absent entries read as not completed.
    pub fn status(&self, kind: ActivityKind) -> ActivityStatus {
        self.activity_status.get(&kind).copied().unwrap_or_default()
    }

    /// Whether `kind` is already completed for the current period.
    pub fn is_completed(&self, kind: ActivityKind) -> bool {
        self.status(kind).completed
    }

    /// Whether every level lies within `[0, 100]`.
    pub fn within_bounds(&self) -> bool {
        let in_range = |v: f64| (MIN_LEVEL..=MAX_LEVEL).contains(&v);
        MetricDimension::ALL
            .iter()
            .all(|d| in_range(self.metrics.get(*d)))
            && in_range(self.tree_growth)
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_zeroed() {
        let state = ProgressState::new();
        assert_eq!(state.metrics, Metrics::default());
        assert_eq!(state.tree_growth, 0.0);
        assert_eq!(state.streak_days, 0);
        for kind in ActivityKind::ALL {
            assert!(!state.is_completed(kind));
        }
        assert!(state.within_bounds());
    }

    #[test]
    fn test_missing_status_reads_as_incomplete() {
        let json = r#"{"metrics":{"communication":1.0,"intimacy":2.0,"trust":3.0},"tree_growth":4.0,"streak_days":2}"#;
        let state: ProgressState = serde_json::from_str(json).unwrap();
        assert!(!state.is_completed(ActivityKind::WeeklyGesture));
        assert_eq!(state.streak_days, 2);
        assert!(state.last_activity_on.is_none());
    }

    #[test]
    fn test_within_bounds_detects_overflow() {
        let mut state = ProgressState::new();
        state.metrics.trust = 100.5;
        assert!(!state.within_bounds());
    }
}
