//! Flat CSV views of a calendar and of progression targets.

use crate::{Calendar, ProgressionTarget, Result};
use std::path::Path;

/// A row in the calendar CSV
#[derive(Debug, serde::Serialize)]
struct CalendarRow {
    week_index: u32,
    day_index: u32,
    iso_date: Option<String>,
    workout_id: String,
    is_deload: bool,
    focus: String,
}

/// A row in the targets CSV
#[derive(Debug, serde::Serialize)]
struct TargetRow {
    week_index: u32,
    total_load_kg: f64,
    zone2_minutes: u32,
    is_deload: bool,
    focus_notes: String,
}

impl From<&ProgressionTarget> for TargetRow {
    fn from(target: &ProgressionTarget) -> Self {
        TargetRow {
            week_index: target.week_index.0,
            total_load_kg: target.total_load_kg,
            zone2_minutes: target.zone2_minutes,
            is_deload: target.is_deload,
            focus_notes: target.focus_notes.clone(),
        }
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write one row per scheduled session; returns the row count
pub fn write_calendar_csv(calendar: &Calendar, path: &Path) -> Result<usize> {
    create_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;

    let mut rows = 0;
    for week in &calendar.weeks {
        for day in &week.days {
            writer.serialize(CalendarRow {
                week_index: week.week_index.0,
                day_index: day.day_index,
                iso_date: day.iso_date.map(|d| d.to_string()),
                workout_id: day.workout_id.to_string(),
                is_deload: day.is_deload,
                focus: day.focus.clone(),
            })?;
            rows += 1;
        }
    }
    writer.flush()?;

    tracing::info!("Wrote {} calendar rows to {:?}", rows, path);
    Ok(rows)
}

/// Write one row per projected week; returns the row count
pub fn write_targets_csv(targets: &[ProgressionTarget], path: &Path) -> Result<usize> {
    create_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for target in targets {
        writer.serialize(TargetRow::from(target))?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} target rows to {:?}", targets.len(), path);
    Ok(targets.len())
}
