//! Activity catalog - the fixed table of what each activity is worth.

use crate::activity::{ActivityDefinition, ActivityKind, Cadence, MetricDelta, MetricDimension};
use crate::config::CatalogConfig;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Registry of activity definitions, one per [`ActivityKind`].
///
/// A catalog can only be built complete: every kind has exactly one entry
/// with finite, non-negative deltas and the cadence of its kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityCatalog {
    entries: BTreeMap<ActivityKind, ActivityDefinition>,
}

impl ActivityCatalog {
    /// The built-in table.
    pub fn standard() -> Self {
        let entries = standard_definitions()
            .into_iter()
            .map(|def| (def.kind, def))
            .collect();
        Self { entries }
    }

    /// Build a catalog from explicit definitions, validating coverage.
    pub fn from_definitions(definitions: Vec<ActivityDefinition>) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for def in definitions {
            validate_definition(&def)?;
            let kind = def.kind;
            if entries.insert(kind, def).is_some() {
                return Err(Error::Configuration(format!(
                    "duplicate catalog entry for {}",
                    kind
                )));
            }
        }

        let catalog = Self { entries };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Build a catalog from configuration.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        Self::from_definitions(config.activities.clone())
    }

    /// Check that every kind has an entry.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = ActivityKind::ALL
            .iter()
            .filter(|kind| !self.entries.contains_key(kind))
            .map(|kind| kind.as_str())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Configuration(format!(
                "catalog has no entry for: {}",
                missing.join(", ")
            )))
        }
    }

    /// Definition of `kind`.
    pub fn lookup(&self, kind: ActivityKind) -> Result<&ActivityDefinition> {
        tracing::debug!("Catalog lookup: {}", kind);
        self.entries
            .get(&kind)
            .ok_or_else(|| Error::UnknownActivityKind(kind.to_string()))
    }

    /// All definitions in catalog order.
    pub fn definitions(&self) -> impl Iterator<Item = &ActivityDefinition> {
        self.entries.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ActivityCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn validate_definition(def: &ActivityDefinition) -> Result<()> {
    if def.cadence != def.kind.cadence() {
        return Err(Error::Configuration(format!(
            "{} must have {:?} cadence, got {:?}",
            def.kind,
            def.kind.cadence(),
            def.cadence
        )));
    }

    let valid = |v: f64| v.is_finite() && v >= 0.0;
    for dimension in MetricDimension::ALL {
        let delta = def.metric_delta.get(dimension);
        if !valid(delta) {
            return Err(Error::Configuration(format!(
                "{} has invalid {:?} delta {}",
                def.kind, dimension, delta
            )));
        }
    }
    if !valid(def.growth_delta) {
        return Err(Error::Configuration(format!(
            "{} has invalid growth delta {}",
            def.kind, def.growth_delta
        )));
    }
    Ok(())
}

/// Built-in activity definitions.
pub fn standard_definitions() -> Vec<ActivityDefinition> {
    vec![
        ActivityDefinition {
            kind: ActivityKind::DailyRitual,
            title: "2-Minute Gratitude Hug".to_string(),
            description: "Share a warm, mindful hug while expressing one thing you're grateful for about each other".to_string(),
            cadence: Cadence::Daily,
            metric_delta: MetricDelta::new(0.5, 0.3, 0.2),
            growth_delta: 3.0,
        },
        ActivityDefinition {
            kind: ActivityKind::WeeklyGesture,
            title: "Cook Together".to_string(),
            description: "Prepare a meal together, trying a new recipe or recreating a favorite dish".to_string(),
            cadence: Cadence::Weekly,
            metric_delta: MetricDelta::new(1.0, 1.5, 1.0),
            growth_delta: 8.0,
        },
        ActivityDefinition {
            kind: ActivityKind::MonthlyBigGesture,
            title: "Plan Weekend Adventure".to_string(),
            description: "Design and plan a special weekend activity that you both will enjoy".to_string(),
            cadence: Cadence::Monthly,
            metric_delta: MetricDelta::new(2.0, 3.0, 2.5),
            growth_delta: 15.0,
        },
    ]
}
