//! Progress engine - turns one completion into the next state.

use evermore_core::{
    ActivityCatalog, ActivityKind, ActivityStatus, MetricDimension, ProgressState, Result,
    MAX_LEVEL, MIN_LEVEL,
};

/// Applies catalog weights to progress state.
///
/// The engine is pure: it never touches storage and returns a new state
/// instead of mutating the input. Every level it produces is clamped to
/// `[0, 100]`.
#[derive(Debug, Clone, Default)]
pub struct ProgressEngine {
    catalog: ActivityCatalog,
}

impl ProgressEngine {
    /// Create an engine over a catalog.
    pub fn new(catalog: ActivityCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog in use.
    pub fn catalog(&self) -> &ActivityCatalog {
        &self.catalog
    }

    /// Apply one completion of `kind` to `state`.
    ///
    /// Applying the same kind twice applies its delta twice; guarding against
    /// repeats is the caller's job.
    pub fn apply_completion(&self, state: &ProgressState, kind: ActivityKind) -> Result<ProgressState> {
        let definition = self.catalog.lookup(kind)?;
        let mut next = state.clone();

        for dimension in MetricDimension::ALL {
            let level = next.metrics.get_mut(dimension);
            *level = clamp_level(*level + definition.metric_delta.get(dimension));
        }
        next.tree_growth = clamp_level(next.tree_growth + definition.growth_delta);

        if kind == ActivityKind::DailyRitual {
            next.streak_days = next.streak_days.saturating_add(1);
        }

        next.activity_status
            .insert(kind, ActivityStatus { completed: true });

        tracing::debug!(
            "Applied {}: growth {:.1} -> {:.1}, streak {}",
            kind, state.tree_growth, next.tree_growth, next.streak_days
        );
        Ok(next)
    }
}

/// Clamp a level into `[0, 100]`; NaN (e.g. from a corrupted store) reads as 0.
fn clamp_level(value: f64) -> f64 {
    if value.is_nan() {
        MIN_LEVEL
    } else {
        value.clamp(MIN_LEVEL, MAX_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evermore_core::{Metrics, MetricDelta, ActivityDefinition, Cadence};

    fn engine() -> ProgressEngine {
        ProgressEngine::new(ActivityCatalog::standard())
    }

    #[test]
    fn test_daily_ritual_from_zero() {
        let next = engine()
            .apply_completion(&ProgressState::new(), ActivityKind::DailyRitual)
            .unwrap();

        assert_eq!(next.metrics, Metrics { communication: 0.5, intimacy: 0.3, trust: 0.2 });
        assert_eq!(next.tree_growth, 3.0);
        assert_eq!(next.streak_days, 1);
        assert!(next.is_completed(ActivityKind::DailyRitual));
        assert!(!next.is_completed(ActivityKind::WeeklyGesture));
    }

    #[test]
    fn test_input_state_untouched() {
        let state = ProgressState::new();
        let _ = engine().apply_completion(&state, ActivityKind::MonthlyBigGesture).unwrap();
        assert_eq!(state, ProgressState::new());
    }

    #[test]
    fn test_streak_only_moves_for_daily_ritual() {
        let engine = engine();
        let mut state = ProgressState::new();
        state.streak_days = 5;

        let weekly = engine.apply_completion(&state, ActivityKind::WeeklyGesture).unwrap();
        assert_eq!(weekly.streak_days, 5);
        let monthly = engine.apply_completion(&state, ActivityKind::MonthlyBigGesture).unwrap();
        assert_eq!(monthly.streak_days, 5);
        let daily = engine.apply_completion(&state, ActivityKind::DailyRitual).unwrap();
        assert_eq!(daily.streak_days, 6);
    }

    #[test]
    fn test_levels_clamp_at_upper_bound() {
        let engine = engine();
        for kind in ActivityKind::ALL {
            let mut state = ProgressState::new();
            state.metrics = Metrics { communication: 100.0, intimacy: 99.9, trust: 98.0 };
            state.tree_growth = 95.0;

            let next = engine.apply_completion(&state, kind).unwrap();
            assert!(next.within_bounds(), "{} escaped bounds", kind);
            assert_eq!(next.metrics.communication, 100.0);
            assert_eq!(next.tree_growth, 100.0);
        }
    }

    #[test]
    fn test_out_of_range_input_is_pulled_back() {
        let mut state = ProgressState::new();
        state.metrics.intimacy = -20.0;
        state.metrics.trust = f64::NAN;
        state.tree_growth = 250.0;

        let next = engine().apply_completion(&state, ActivityKind::WeeklyGesture).unwrap();
        assert!(next.within_bounds());
        assert_eq!(next.metrics.intimacy, 0.0);
        assert_eq!(next.metrics.trust, 0.0);
        assert_eq!(next.tree_growth, 100.0);
    }

    #[test]
    fn test_repeat_application_double_applies() {
        let engine = engine();
        let once = engine.apply_completion(&ProgressState::new(), ActivityKind::WeeklyGesture).unwrap();
        let twice = engine.apply_completion(&once, ActivityKind::WeeklyGesture).unwrap();
        assert_eq!(twice.tree_growth, 16.0);
        assert_eq!(twice.metrics.intimacy, 3.0);
    }

    #[test]
    fn test_custom_catalog_weights() {
        let mut defs = evermore_core::standard_definitions();
        defs[2] = ActivityDefinition {
            kind: ActivityKind::MonthlyBigGesture,
            title: "Weekend Away".to_string(),
            description: "Two nights somewhere new".to_string(),
            cadence: Cadence::Monthly,
            metric_delta: MetricDelta::new(10.0, 10.0, 10.0),
            growth_delta: 40.0,
        };
        let engine = ProgressEngine::new(ActivityCatalog::from_definitions(defs).unwrap());

        let next = engine.apply_completion(&ProgressState::new(), ActivityKind::MonthlyBigGesture).unwrap();
        assert_eq!(next.tree_growth, 40.0);
        assert_eq!(next.metrics.trust, 10.0);
    }
}
