//! Week-by-week load and conditioning targets projected from logged history.
//!
//! Logs are the source of truth: a logged week always reports its actual
//! load, and projection only runs forward from the latest logged week.
//! Unlogged future weeks grow 2.5% per week, deload weeks drop to 82%.

use crate::config::ProgressionConfig;
use crate::deload::deload_weeks;
use crate::{BlockType, LoggedSet, ProgressionTarget, Template, WeekIndex, WeeklyLogSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const LOGGED_WEEK_NOTES: &str =
    "Logged week: targets reflect what you actually lifted";
pub const DELOAD_WEEK_NOTES: &str =
    "Deload week: cut load and sets, keep Zone-2 work easy";
pub const PROGRESSION_WEEK_NOTES: &str =
    "Progression week: add a little load or a rep to main lifts";

/// Measured totals for one logged week
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WeekActuals {
    pub load_kg: f64,
    pub zone2_minutes: f64,
}

/// Weekly conditioning floor derived from the template
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConditioningFloor {
    pub weekly_minutes: u32,
    pub min_sessions: u32,
}

/// Sum of weight x reps over sets where both are numeric
pub fn load_kg(sets: &[LoggedSet]) -> f64 {
    sets.iter()
        .filter_map(|set| match (set.weight_kg, set.reps) {
            (Some(weight), Some(reps)) => Some(weight * reps),
            _ => None,
        })
        .sum()
}

/// Totals per logged week; several summaries for one week are added up
pub fn aggregate_logs(logs: &[WeeklyLogSummary]) -> BTreeMap<WeekIndex, WeekActuals> {
    let mut weeks: BTreeMap<WeekIndex, WeekActuals> = BTreeMap::new();
    for log in logs {
        let skipped = log
            .sets
            .iter()
            .filter(|s| s.weight_kg.is_none() || s.reps.is_none())
            .count();
        if skipped > 0 {
            tracing::debug!(
                "{}: skipping {} sets without numeric weight and reps",
                log.week_index,
                skipped
            );
        }

        let actuals = weeks.entry(log.week_index).or_default();
        actuals.load_kg += load_kg(&log.sets);
        actuals.zone2_minutes += log.zone2_minutes.unwrap_or(0.0);
    }
    weeks
}

/// Planned conditioning minutes, floored by the configured weekly minimums
pub fn conditioning_floor(template: &Template, config: &ProgressionConfig) -> ConditioningFloor {
    let mut planned_minutes = 0;
    let mut days_with_conditioning = 0;
    for day in &template.pattern {
        let minutes: u32 = day
            .blocks
            .iter()
            .filter(|b| b.block_type == BlockType::Conditioning)
            .map(|b| b.duration_minutes)
            .sum();
        planned_minutes += minutes;
        if day.has_block(BlockType::Conditioning) {
            days_with_conditioning += 1;
        }
    }

    let min_sessions = days_with_conditioning.max(config.min_conditioning_sessions);
    let weekly_minutes = planned_minutes
        .max(config.min_weekly_zone2_minutes)
        .max(min_sessions * config.minutes_per_conditioning_session);

    ConditioningFloor {
        weekly_minutes,
        min_sessions,
    }
}

/// Targets for every week `0..total_weeks`
pub fn project_targets(
    template: &Template,
    logs: &[WeeklyLogSummary],
    total_weeks: u32,
    config: &ProgressionConfig,
) -> Vec<ProgressionTarget> {
    let actuals = aggregate_logs(logs);
    let deloads = deload_weeks(total_weeks);
    let floor = conditioning_floor(template, config);

    let last_logged = actuals.keys().next_back().copied();
    let mut rolling_load = match last_logged {
        Some(week) => actuals[&week].load_kg,
        None => config.seed_load_kg,
    };

    let targets: Vec<ProgressionTarget> = (0..total_weeks)
        .map(|week| {
            let week_index = WeekIndex(week);
            let is_deload = deloads.contains(&week_index);
            let logged = actuals.get(&week_index);

            if let Some(actual) = logged {
                rolling_load = actual.load_kg;
            } else if last_logged.map_or(true, |last| week_index > last) {
                rolling_load *= if is_deload {
                    config.deload_factor
                } else {
                    config.weekly_growth
                };
            }

            let focus_notes = if logged.is_some() {
                LOGGED_WEEK_NOTES
            } else if is_deload {
                DELOAD_WEEK_NOTES
            } else {
                PROGRESSION_WEEK_NOTES
            };

            ProgressionTarget {
                week_index,
                total_load_kg: rolling_load.max(config.min_load_kg).round(),
                zone2_minutes: floor.weekly_minutes,
                focus_notes: focus_notes.to_string(),
                is_deload,
            }
        })
        .collect();

    tracing::debug!(
        "Projected {} weeks from {} logged weeks (latest {:?})",
        targets.len(),
        actuals.len(),
        last_logged
    );

    targets
}
