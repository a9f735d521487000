//! Exercise catalog lookups used by the guardrails.
//!
//! The guardrails only need three questions answered per exercise id: is it
//! PCOS-safe, how much impact does it carry, and what is it. Any source that
//! answers them implements [`ExerciseCatalog`]. A built-in catalog covers the
//! fallback exercises the guardrails insert plus common strength movements.

use crate::{CatalogExercise, ImpactLevel};
use once_cell::sync::Lazy;
use std::cell::RefCell;
use std::collections::HashMap;

/// Zone-2 entry inserted by the PCOS guardrail
pub const ZONE2_EXERCISE_ID: &str = "zone2_incline_walk";

/// Replacement when the high-impact filter empties a block
pub const LOW_IMPACT_FALLBACK_ID: &str = "glute_bridge";

/// Entry of the recovery block appended by the PCOS guardrail
pub const RECOVERY_EXERCISE_ID: &str = "box_breathing";

/// Read-only exercise metadata keyed by stable exercise ids
pub trait ExerciseCatalog {
    fn lookup(&self, exercise_id: &str) -> Option<CatalogExercise>;

    /// Unknown exercises are not flagged
    fn is_pcos_safe(&self, exercise_id: &str) -> bool {
        self.lookup(exercise_id).map_or(true, |e| e.pcos_safe)
    }

    /// Unknown exercises count as moderate impact
    fn impact_level(&self, exercise_id: &str) -> ImpactLevel {
        self.lookup(exercise_id)
            .map_or(ImpactLevel::Moderate, |e| e.impact)
    }
}

/// HashMap-backed catalog
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalog {
    pub exercises: HashMap<String, CatalogExercise>,
}

impl ExerciseCatalog for InMemoryCatalog {
    fn lookup(&self, exercise_id: &str) -> Option<CatalogExercise> {
        self.exercises.get(exercise_id).cloned()
    }
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<InMemoryCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn default_catalog() -> &'static InMemoryCatalog {
    &DEFAULT_CATALOG
}

fn exercise(
    id: &str,
    name: &str,
    equipment: &str,
    movement: &str,
    impact: ImpactLevel,
    pcos_safe: bool,
) -> CatalogExercise {
    CatalogExercise {
        id: id.into(),
        name: name.into(),
        equipment: equipment.into(),
        movement: movement.into(),
        impact,
        pcos_safe,
    }
}

/// Builds the default catalog
///
/// Prefer [`default_catalog`] which returns a cached reference.
pub fn build_default_catalog() -> InMemoryCatalog {
    use ImpactLevel::*;

    let entries = vec![
        // Strength
        exercise("back_squat", "Back Squat", "barbell", "squat", Moderate, true),
        exercise("goblet_squat", "Goblet Squat", "dumbbell", "squat", Low, true),
        exercise("deadlift", "Deadlift", "barbell", "hinge", Moderate, true),
        exercise("romanian_deadlift", "Romanian Deadlift", "barbell", "hinge", Low, true),
        exercise("hip_thrust", "Barbell Hip Thrust", "barbell", "hinge", Low, true),
        exercise("bench_press", "Bench Press", "barbell", "push", Low, true),
        exercise("overhead_press", "Overhead Press", "barbell", "push", Low, true),
        exercise("lat_pulldown", "Lat Pulldown", "cable", "pull", Low, true),
        // Accessory
        exercise(LOW_IMPACT_FALLBACK_ID, "Glute Bridge", "bodyweight", "hinge", Low, true),
        exercise("db_row", "Dumbbell Row", "dumbbell", "pull", Low, true),
        exercise("face_pull", "Face Pull", "cable", "pull", Low, true),
        exercise("walking_lunge", "Walking Lunge", "dumbbell", "lunge", Moderate, true),
        exercise("plank", "Plank", "bodyweight", "core", Low, true),
        exercise("box_jump", "Box Jump", "box", "jump", High, true),
        exercise("jump_squat", "Jump Squat", "bodyweight", "jump", High, true),
        // Conditioning
        exercise(ZONE2_EXERCISE_ID, "Zone 2 Incline Walk", "treadmill", "gait", Low, true),
        exercise("bike_zone2", "Zone 2 Bike", "bike", "cycle", Low, true),
        exercise("rower_zone2", "Zone 2 Row", "rower", "row", Low, true),
        exercise("burpee", "Burpee", "bodyweight", "full_body", High, false),
        exercise("sprint_intervals", "Sprint Intervals", "track", "sprint", High, false),
        exercise("jump_rope", "Jump Rope", "rope", "jump", High, false),
        // Recovery
        exercise(RECOVERY_EXERCISE_ID, "Box Breathing", "none", "breathing", Low, true),
    ];

    InMemoryCatalog {
        exercises: entries.into_iter().map(|e| (e.id.clone(), e)).collect(),
    }
}

impl InMemoryCatalog {
    /// Default catalog with extra entries layered on top (later entries win)
    pub fn with_custom(custom: &[CatalogExercise]) -> Self {
        let mut catalog = default_catalog().clone();
        for entry in custom {
            catalog.exercises.insert(entry.id.clone(), entry.clone());
        }
        catalog
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, entry) in &self.exercises {
            if id.is_empty() || entry.id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            }
            if id != &entry.id {
                errors.push(format!(
                    "Exercise key '{}' doesn't match exercise.id '{}'",
                    id, entry.id
                ));
            }
            if entry.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", id));
            }
        }

        // Guardrail fallbacks must themselves pass the guardrails
        for id in [ZONE2_EXERCISE_ID, LOW_IMPACT_FALLBACK_ID, RECOVERY_EXERCISE_ID] {
            match self.exercises.get(id) {
                None => errors.push(format!("Fallback exercise '{}' missing", id)),
                Some(entry) => {
                    if !entry.pcos_safe {
                        errors.push(format!("Fallback exercise '{}' is not PCOS-safe", id));
                    }
                    if entry.impact == ImpactLevel::High {
                        errors.push(format!("Fallback exercise '{}' is high impact", id));
                    }
                }
            }
        }

        errors
    }
}

/// Per-invocation memo over another catalog
pub struct MemoizedCatalog<'a, C: ExerciseCatalog + ?Sized> {
    inner: &'a C,
    cache: RefCell<HashMap<String, Option<CatalogExercise>>>,
}

impl<'a, C: ExerciseCatalog + ?Sized> MemoizedCatalog<'a, C> {
    pub fn new(inner: &'a C) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Distinct ids looked up so far
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<C: ExerciseCatalog + ?Sized> ExerciseCatalog for MemoizedCatalog<'_, C> {
    fn lookup(&self, exercise_id: &str) -> Option<CatalogExercise> {
        if let Some(hit) = self.cache.borrow().get(exercise_id) {
            return hit.clone();
        }
        let found = self.inner.lookup(exercise_id);
        self.cache
            .borrow_mut()
            .insert(exercise_id.to_string(), found.clone());
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_default_catalog_validates() {
        let errors = default_catalog().validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_lookups() {
        let catalog = default_catalog();
        assert!(!catalog.is_pcos_safe("burpee"));
        assert!(catalog.is_pcos_safe("bike_zone2"));
        assert_eq!(catalog.impact_level("box_jump"), ImpactLevel::High);
        assert_eq!(catalog.impact_level("hip_thrust"), ImpactLevel::Low);
        assert_eq!(catalog.lookup("deadlift").unwrap().movement, "hinge");
    }

    #[test]
    fn test_unknown_exercise_defaults() {
        let catalog = default_catalog();
        assert!(catalog.lookup("mystery_move").is_none());
        assert!(catalog.is_pcos_safe("mystery_move"));
        assert_eq!(catalog.impact_level("mystery_move"), ImpactLevel::Moderate);
    }

    #[test]
    fn test_custom_entries_override() {
        let custom = vec![CatalogExercise {
            id: "burpee".into(),
            name: "Step-back Burpee".into(),
            equipment: "bodyweight".into(),
            movement: "full_body".into(),
            impact: ImpactLevel::Low,
            pcos_safe: true,
        }];
        let catalog = InMemoryCatalog::with_custom(&custom);
        assert!(catalog.is_pcos_safe("burpee"));
        // The shared default is untouched
        assert!(!default_catalog().is_pcos_safe("burpee"));
    }

    #[test]
    fn test_validate_flags_missing_fallback() {
        let mut catalog = build_default_catalog();
        catalog.exercises.remove(ZONE2_EXERCISE_ID);
        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains(ZONE2_EXERCISE_ID)));
    }

    struct CountingCatalog {
        calls: Cell<usize>,
    }

    impl ExerciseCatalog for CountingCatalog {
        fn lookup(&self, _exercise_id: &str) -> Option<CatalogExercise> {
            self.calls.set(self.calls.get() + 1);
            None
        }
    }

    #[test]
    fn test_memoized_catalog_hits_inner_once_per_id() {
        let inner = CountingCatalog { calls: Cell::new(0) };
        let memo = MemoizedCatalog::new(&inner);

        for _ in 0..3 {
            assert!(memo.is_pcos_safe("a"));
            assert_eq!(memo.impact_level("b"), ImpactLevel::Moderate);
        }
        assert_eq!(inner.calls.get(), 2);
        assert_eq!(memo.cached_len(), 2);
    }
}
