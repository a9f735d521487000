//! Schedule rebuilding for plans whose start date is set or changed.
//!
//! Only session dates and the calendar are recomputed. Payloads, deload flags
//! and ids of the existing instances are carried over untouched.

use crate::calendar::{
    build_calendar, session_date, slot_offsets, training_day_indices, CalendarParams,
};
use crate::{Calendar, Error, Plan, Result, WorkoutInstance};
use chrono::{DateTime, NaiveDate};

/// Re-dated instances plus the calendar assembled from them
#[derive(Clone, Debug, PartialEq)]
pub struct PlanSchedule {
    pub start_date: NaiveDate,
    pub instances: Vec<WorkoutInstance>,
    pub calendar: Calendar,
}

/// Parse an ISO calendar date, also accepting a full RFC 3339 timestamp
pub fn parse_start_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| Error::InvalidStartDate(raw.to_string()))
}

/// Compute fresh session dates for existing instances
///
/// Fails closed: on error nothing is returned and the caller's instances are
/// left as they were.
pub fn build_plan_schedule(
    plan: &Plan,
    instances: &[WorkoutInstance],
    start_date: &str,
) -> Result<PlanSchedule> {
    let start = parse_start_date(start_date)?;
    let template = plan.template.as_ref().ok_or(Error::MissingTemplate)?;

    let training_days = training_day_indices(plan.days_per_week, &plan.preferred_days);
    let sessions_per_week = training_days.len() as u32;
    if sessions_per_week == 0 && !instances.is_empty() {
        return Err(Error::Other(format!(
            "Plan {} has no training days to schedule",
            plan.id
        )));
    }
    let offsets = slot_offsets(&training_days, start);

    let rescheduled = instances
        .iter()
        .map(|instance| {
            let session_index = (instance.day_index % sessions_per_week) as usize;
            let date = session_date(start, instance.week_index, offsets[session_index])
                .ok_or_else(|| Error::InvalidStartDate(start_date.to_string()))?;
            Ok(WorkoutInstance {
                session_date: Some(date),
                ..instance.clone()
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let calendar = build_calendar(
        template,
        &rescheduled,
        &CalendarParams {
            plan_id: plan.id,
            start_date: Some(start),
            weeks: plan.duration_weeks,
        },
    );

    tracing::info!(
        "Rescheduled {} instances of plan {} from {}",
        rescheduled.len(),
        plan.id,
        start
    );

    Ok(PlanSchedule {
        start_date: start,
        instances: rescheduled,
        calendar,
    })
}
