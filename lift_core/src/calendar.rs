//! Calendar expansion: weekly template → dated workout instances.
//!
//! Each week of the program gets one instance per training day. Day templates
//! rotate over the session slots, so an A/B pattern fills a four-day week as
//! A, B, A, B. Deload weeks get a lighter copy of the day's blocks.

use crate::deload::deload_weeks;
use crate::{
    Block, BlockType, Calendar, CalendarDay, CalendarWeek, Error, Result, Template, WeekIndex,
    WorkoutInstance,
};
use chrono::{Datelike, Days, NaiveDate};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Realized session estimates are capped at this many minutes
pub const MAX_SESSION_MINUTES: u32 = 90;

/// Heuristic time cost of one working set
pub const MINUTES_PER_SET: u32 = 3;

const DELOAD_CONDITIONING_FACTOR: f64 = 0.8;

pub const REDUCED_VOLUME_CUE: &str = "Deload week: reduced volume";
pub const REDUCED_INTENSITY_CUE: &str = "Deload week: reduced intensity";

/// Scheduling inputs for one expansion
#[derive(Clone, Debug)]
pub struct ExpansionParams {
    pub plan_id: Uuid,
    pub user_id: String,
    pub start_date: Option<NaiveDate>,
    pub weeks: u32,
    pub days_per_week: u32,
    pub preferred_days: Vec<String>,
}

/// Inputs for assembling a calendar from instances
#[derive(Clone, Debug)]
pub struct CalendarParams {
    pub plan_id: Uuid,
    pub start_date: Option<NaiveDate>,
    pub weeks: u32,
}

// ============================================================================
// Weekdays
// ============================================================================

/// Parse a weekday token into its index (0 = Sunday .. 6 = Saturday)
pub fn parse_weekday(token: &str) -> Option<u32> {
    let index = match token.trim().to_lowercase().as_str() {
        "sun" | "sunday" => 0,
        "mon" | "monday" => 1,
        "tue" | "tues" | "tuesday" => 2,
        "wed" | "wednesday" => 3,
        "thu" | "thur" | "thurs" | "thursday" => 4,
        "fri" | "friday" => 5,
        "sat" | "saturday" => 6,
        _ => return None,
    };
    Some(index)
}

/// Weekday index of a date (0 = Sunday)
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Built-in training days for a given weekly frequency
fn default_training_days(days_per_week: u32) -> Vec<u32> {
    match days_per_week {
        0 => vec![],
        1 | 2 | 3 => vec![1, 3, 5][..days_per_week as usize].to_vec(),
        4 => vec![1, 3, 5, 6],
        5 => vec![1, 2, 3, 5, 6],
        6 => vec![1, 2, 3, 4, 5, 6],
        _ => (0..7).collect(),
    }
}

/// Sorted weekday indices the program trains on
///
/// Preferred days win when they name at least `days_per_week` distinct valid
/// weekdays; extras beyond that are dropped from the end of the week. Anything
/// else falls back to the built-in pattern.
pub fn training_day_indices(days_per_week: u32, preferred_days: &[String]) -> Vec<u32> {
    if preferred_days.is_empty() {
        return default_training_days(days_per_week);
    }

    let mut parsed = BTreeSet::new();
    for token in preferred_days {
        match parse_weekday(token) {
            Some(index) => {
                parsed.insert(index);
            }
            None => tracing::warn!("Ignoring unrecognised weekday {:?}", token),
        }
    }

    let wanted = days_per_week.min(7) as usize;
    if parsed.len() < wanted {
        tracing::warn!(
            "Only {} valid preferred days for {} sessions per week, using default pattern",
            parsed.len(),
            days_per_week
        );
        return default_training_days(days_per_week);
    }
    if parsed.len() > wanted {
        tracing::warn!(
            "{} preferred days for {} sessions per week, keeping the first {}",
            parsed.len(),
            days_per_week,
            wanted
        );
    }

    parsed.into_iter().take(wanted).collect()
}

/// Days between the start date and each training slot in the first week
pub(crate) fn slot_offsets(training_days: &[u32], start_date: NaiveDate) -> Vec<u32> {
    let start_dow = weekday_index(start_date);
    training_days
        .iter()
        .map(|&dow| (dow + 7 - start_dow) % 7)
        .collect()
}

pub(crate) fn session_date(start_date: NaiveDate, week: WeekIndex, offset: u32) -> Option<NaiveDate> {
    let days = u64::from(week.0) * 7 + u64::from(offset);
    start_date.checked_add_days(Days::new(days))
}

/// Stable instance id derived from plan id and session position
pub(crate) fn instance_id(plan_id: &Uuid, day_index: u32) -> Uuid {
    Uuid::new_v5(plan_id, &day_index.to_be_bytes())
}

// ============================================================================
// Payload transforms
// ============================================================================

/// Rewrite the first "N min" in a rep string, scaled by `factor`
fn scale_minutes(reps: &str, factor: f64) -> Option<String> {
    let bytes = reps.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
            i += 1;
        }
        let rest = reps[i..].trim_start().to_lowercase();
        if !rest.starts_with("min") {
            continue;
        }
        let minutes: f64 = reps[start..i].parse().ok()?;
        let scaled = ((minutes * factor).round() as u64).max(1);
        return Some(format!("{}{}{}", &reps[..start], scaled, &reps[i..]));
    }
    None
}

/// Lighten a copied day payload for a deload week
pub fn apply_deload(blocks: &mut [Block]) {
    for block in blocks.iter_mut() {
        match block.block_type {
            BlockType::Strength | BlockType::Accessory => {
                for exercise in &mut block.exercises {
                    exercise.sets = exercise.sets.saturating_sub(1).max(1);
                    exercise.cues.push(REDUCED_VOLUME_CUE.to_string());
                }
            }
            BlockType::Conditioning => {
                for exercise in &mut block.exercises {
                    if let Some(reps) = scale_minutes(&exercise.reps, DELOAD_CONDITIONING_FACTOR) {
                        exercise.reps = reps;
                    }
                    exercise.cues.push(REDUCED_INTENSITY_CUE.to_string());
                }
            }
            BlockType::Warmup | BlockType::Recovery => {}
        }
    }
}

/// Session estimate from the 3-minutes-per-set heuristic
pub fn estimate_duration_minutes(blocks: &[Block]) -> u32 {
    let minutes: u32 = blocks.iter().map(|b| b.total_sets() * MINUTES_PER_SET).sum();
    minutes.min(MAX_SESSION_MINUTES)
}

// ============================================================================
// Expansion
// ============================================================================

/// Expand a template into one instance per training session of the program
///
/// Returns exactly `weeks * days_per_week` instances (days per week capped at
/// seven) with contiguous `day_index` values.
pub fn generate_instances(
    template: &Template,
    params: &ExpansionParams,
) -> Result<Vec<WorkoutInstance>> {
    let training_days = training_day_indices(params.days_per_week, &params.preferred_days);
    let sessions_per_week = training_days.len() as u32;

    if params.weeks == 0 || sessions_per_week == 0 {
        return Ok(Vec::new());
    }
    if template.pattern.is_empty() {
        return Err(Error::EmptyPattern);
    }

    let offsets = params
        .start_date
        .map(|start| slot_offsets(&training_days, start));
    let deloads = deload_weeks(params.weeks);

    let mut instances = Vec::with_capacity((params.weeks * sessions_per_week) as usize);
    for week in 0..params.weeks {
        let week_index = WeekIndex(week);
        let is_deload = deloads.contains(&week_index);

        for session_index in 0..sessions_per_week {
            let day_index = week * sessions_per_week + session_index;

            let session_date = match (params.start_date, &offsets) {
                (Some(start), Some(offsets)) => {
                    let offset = offsets[session_index as usize];
                    Some(session_date(start, week_index, offset).ok_or_else(|| {
                        Error::InvalidStartDate(format!("{} + week {}", start, week))
                    })?)
                }
                _ => None,
            };

            let day = template
                .day_for_session(session_index as usize)
                .ok_or(Error::EmptyPattern)?;
            let mut payload = day.blocks.clone();
            if is_deload {
                apply_deload(&mut payload);
            }

            instances.push(WorkoutInstance {
                id: instance_id(&params.plan_id, day_index),
                plan_id: params.plan_id,
                user_id: params.user_id.clone(),
                week_index,
                day_index,
                session_date,
                is_deload,
                duration_minutes: estimate_duration_minutes(&payload),
                payload,
            });
        }
    }

    tracing::debug!(
        "Expanded {} weeks x {} sessions into {} instances (deload weeks: {:?})",
        params.weeks,
        sessions_per_week,
        instances.len(),
        deloads
    );

    Ok(instances)
}

/// Group instances into calendar weeks
pub fn build_calendar(
    template: &Template,
    instances: &[WorkoutInstance],
    params: &CalendarParams,
) -> Calendar {
    let weeks = (0..params.weeks)
        .map(|week| {
            let week_index = WeekIndex(week);
            let mut in_week: Vec<&WorkoutInstance> = instances
                .iter()
                .filter(|i| i.week_index == week_index)
                .collect();
            in_week.sort_by_key(|i| i.day_index);

            let days = in_week
                .iter()
                .enumerate()
                .map(|(position, instance)| CalendarDay {
                    day_index: instance.day_index,
                    iso_date: instance.session_date,
                    workout_id: instance.id,
                    is_deload: instance.is_deload,
                    focus: template
                        .day_for_session(position)
                        .map(|d| d.focus.clone())
                        .unwrap_or_default(),
                })
                .collect();

            CalendarWeek {
                week_index,
                start_date: params
                    .start_date
                    .and_then(|start| session_date(start, week_index, 0)),
                days,
            }
        })
        .collect();

    Calendar {
        plan_id: params.plan_id,
        weeks,
    }
}
