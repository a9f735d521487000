//! Core domain types for the liftplan engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Week numbering (0-based calendar weeks vs 1-based periodization weeks)
//! - The weekly template (days, blocks, exercise entries)
//! - Plans, workout instances and the derived calendar
//! - Periodization blocks and frameworks
//! - Logged training history and progression targets
//! - The user profile and guardrail constraints

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Week Numbering
// ============================================================================

/// 0-based week position used by instances, calendars and projections
#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(transparent)]
pub struct WeekIndex(pub u32);

/// 1-based week number used by periodization blocks
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct WeekNumber(pub u32);

impl WeekIndex {
    pub fn to_week_number(self) -> WeekNumber {
        WeekNumber(self.0 + 1)
    }
}

impl WeekNumber {
    /// Returns None for week number 0, which has no calendar week
    pub fn to_week_index(self) -> Option<WeekIndex> {
        self.0.checked_sub(1).map(WeekIndex)
    }
}

impl fmt::Display for WeekIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week index {}", self.0)
    }
}

impl fmt::Display for WeekNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week {}", self.0)
    }
}

// ============================================================================
// Template Types
// ============================================================================

/// Kind of workout block
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Warmup,
    Strength,
    Accessory,
    Conditioning,
    Recovery,
}

impl BlockType {
    /// Strength and accessory blocks carry load-bearing sets
    pub fn is_resistance(self) -> bool {
        matches!(self, BlockType::Strength | BlockType::Accessory)
    }
}

/// A single exercise prescription inside a block
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    pub id: String,
    pub name: String,
    pub equipment: String,
    pub sets: u32,
    /// Free-form, e.g. "8-12" or "15 min"
    pub reps: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A labeled segment of a workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub title: String,
    pub duration_minutes: u32,
    pub exercises: Vec<ExerciseEntry>,
}

impl Block {
    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.sets).sum()
    }
}

/// One training day of the weekly blueprint
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayTemplate {
    pub focus: String,
    pub blocks: Vec<Block>,
}

impl DayTemplate {
    /// Sum of block durations
    pub fn total_minutes(&self) -> u32 {
        self.blocks.iter().map(|b| b.duration_minutes).sum()
    }

    pub fn has_block(&self, block_type: BlockType) -> bool {
        self.blocks.iter().any(|b| b.block_type == block_type)
    }
}

/// The reusable weekly blueprint (microcycle pattern)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub days_per_week: u32,
    pub pattern: Vec<DayTemplate>,
}

impl Template {
    /// Day template for a session slot, rotating over short patterns
    pub fn day_for_session(&self, session_index: usize) -> Option<&DayTemplate> {
        if self.pattern.is_empty() {
            return None;
        }
        self.pattern.get(session_index % self.pattern.len())
    }
}

// ============================================================================
// Plan, Instance and Calendar Types
// ============================================================================

/// Lifecycle status of a plan
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    #[default]
    Draft,
    Active,
    Completed,
    Archived,
}

/// Aggregate root for one generated program
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: Uuid,
    pub user_id: String,
    pub duration_weeks: u32,
    pub days_per_week: u32,
    pub preferred_days: Vec<String>,
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: PlanStatus,
    pub template: Option<Template>,
    #[serde(default)]
    pub calendar: Option<Calendar>,
}

/// One concrete, dated training session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutInstance {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub user_id: String,
    pub week_index: WeekIndex,
    /// Global session position, monotonic across the whole plan
    pub day_index: u32,
    pub session_date: Option<NaiveDate>,
    pub is_deload: bool,
    pub duration_minutes: u32,
    pub payload: Vec<Block>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub day_index: u32,
    pub iso_date: Option<NaiveDate>,
    pub workout_id: Uuid,
    pub is_deload: bool,
    pub focus: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarWeek {
    pub week_index: WeekIndex,
    pub start_date: Option<NaiveDate>,
    pub days: Vec<CalendarDay>,
}

/// Read-optimized projection of a plan's instances
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    pub plan_id: Uuid,
    pub weeks: Vec<CalendarWeek>,
}

// ============================================================================
// Periodization Types
// ============================================================================

/// Periodization phase of a training block
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Accumulation,
    Intensification,
    Deload,
    Realization,
}

/// Qualitative volume / intensity level
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TargetLevel {
    Low,
    Moderate,
    High,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepRange {
    pub min: u32,
    pub max: u32,
}

impl RepRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalBias {
    Strength,
    #[default]
    Balanced,
    Hypertrophy,
    FatLoss,
}

/// A labeled run of weeks with phase-specific targets
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodizationBlock {
    pub block_number: u32,
    pub block_type: Phase,
    pub start_week: WeekNumber,
    /// Inclusive
    pub end_week: WeekNumber,
    pub volume_target: TargetLevel,
    pub intensity_target: TargetLevel,
    pub strength_reps: RepRange,
    pub accessory_reps: RepRange,
    pub strength_rpe: f32,
    pub accessory_rpe: f32,
    pub notes: String,
}

impl PeriodizationBlock {
    pub fn length_weeks(&self) -> u32 {
        self.end_week.0.saturating_sub(self.start_week.0) + 1
    }

    pub fn contains(&self, week: WeekNumber) -> bool {
        self.start_week <= week && week <= self.end_week
    }
}

/// Ordered, gap-free sequence of blocks covering weeks 1..=total_weeks
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodizationFramework {
    pub total_weeks: u32,
    pub experience_level: ExperienceLevel,
    pub goal_bias: GoalBias,
    pub blocks: Vec<PeriodizationBlock>,
}

// ============================================================================
// Logged History and Progression Targets
// ============================================================================

/// One logged working set; non-numeric values deserialize to None
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoggedSet {
    #[serde(default, deserialize_with = "lenient_number")]
    pub weight_kg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub reps: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rpe: Option<f64>,
}

/// Everything logged for one week
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyLogSummary {
    pub week_index: WeekIndex,
    #[serde(default)]
    pub sets: Vec<LoggedSet>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub zone2_minutes: Option<f64>,
}

/// Projected targets for one week
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionTarget {
    pub week_index: WeekIndex,
    pub total_load_kg: f64,
    pub zone2_minutes: u32,
    pub focus_notes: String,
    pub is_deload: bool,
}

/// Accept numbers or numeric strings; anything else becomes None
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|v| v.is_finite()))
}

// ============================================================================
// Profile and Constraints
// ============================================================================

/// Profile/constraints record supplied by the user-profile store
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub has_pcos: bool,
    #[serde(default)]
    pub no_high_impact: bool,
    pub sessions_per_week: u32,
    pub minutes_per_session: u32,
    pub total_weeks: u32,
    #[serde(default)]
    pub preferred_days: Vec<String>,
    #[serde(default)]
    pub goal_bias: GoalBias,
}

/// Flags consumed by the guardrail post-processor and safety audit
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GuardrailConstraints {
    pub has_pcos: bool,
    pub no_high_impact: bool,
    pub target_minutes_per_session: u32,
    pub days_per_week: u32,
}

impl From<&Profile> for GuardrailConstraints {
    fn from(profile: &Profile) -> Self {
        Self {
            has_pcos: profile.has_pcos,
            no_high_impact: profile.no_high_impact,
            target_minutes_per_session: profile.minutes_per_session,
            days_per_week: profile.sessions_per_week,
        }
    }
}

// ============================================================================
// Catalog Types
// ============================================================================

/// Impact classification of an exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Moderate,
    High,
}

/// Catalog metadata for one exercise id
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CatalogExercise {
    pub id: String,
    pub name: String,
    pub equipment: String,
    pub movement: String,
    pub impact: ImpactLevel,
    pub pcos_safe: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_numbering_conversions() {
        assert_eq!(WeekIndex(0).to_week_number(), WeekNumber(1));
        assert_eq!(WeekNumber(7).to_week_index(), Some(WeekIndex(6)));
        assert_eq!(WeekNumber(0).to_week_index(), None);
    }

    #[test]
    fn test_template_rotation() {
        let day = |focus: &str| DayTemplate {
            focus: focus.into(),
            blocks: vec![],
        };
        let template = Template {
            days_per_week: 4,
            pattern: vec![day("A"), day("B")],
        };
        assert_eq!(template.day_for_session(0).unwrap().focus, "A");
        assert_eq!(template.day_for_session(3).unwrap().focus, "B");

        let empty = Template {
            days_per_week: 3,
            pattern: vec![],
        };
        assert!(empty.day_for_session(0).is_none());
    }

    #[test]
    fn test_logged_set_tolerates_non_numeric_values() {
        let json = r#"[
            {"weightKg": 100, "reps": 5},
            {"weightKg": "82.5", "reps": "8", "rpe": 8},
            {"weightKg": "heavy", "reps": null},
            {"reps": 10}
        ]"#;
        let sets: Vec<LoggedSet> = serde_json::from_str(json).unwrap();

        assert_eq!(sets[0].weight_kg, Some(100.0));
        assert_eq!(sets[1].weight_kg, Some(82.5));
        assert_eq!(sets[1].reps, Some(8.0));
        assert_eq!(sets[2].weight_kg, None);
        assert_eq!(sets[2].reps, None);
        assert_eq!(sets[3].weight_kg, None);
    }

    #[test]
    fn test_weekly_log_summary_defaults() {
        assert_eq!(WeekIndex::default(), WeekIndex(0));
        let empty = WeeklyLogSummary::default();
        assert_eq!(empty.week_index, WeekIndex(0));
        assert!(empty.sets.is_empty());
        assert_eq!(empty.zone2_minutes, None);

        let summary: WeeklyLogSummary = serde_json::from_str(r#"{"weekIndex": 3}"#).unwrap();
        assert_eq!(
            summary,
            WeeklyLogSummary {
                week_index: WeekIndex(3),
                ..WeeklyLogSummary::default()
            }
        );
    }

    #[test]
    fn test_block_wire_format_uses_type_key() {
        let json = r#"{
            "type": "conditioning",
            "title": "Zone 2",
            "durationMinutes": 15,
            "exercises": [
                {"id": "bike_z2", "name": "Bike", "equipment": "bike", "sets": 1, "reps": "15 min"}
            ]
        }"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.block_type, BlockType::Conditioning);
        assert!(block.exercises[0].cues.is_empty());

        let back = serde_json::to_value(&block).unwrap();
        assert_eq!(back["type"], "conditioning");
        assert!(back["exercises"][0].get("cues").is_none());
    }

    #[test]
    fn test_constraints_from_profile() {
        let profile = Profile {
            experience_level: ExperienceLevel::Beginner,
            has_pcos: true,
            no_high_impact: false,
            sessions_per_week: 4,
            minutes_per_session: 50,
            total_weeks: 10,
            preferred_days: vec![],
            goal_bias: GoalBias::FatLoss,
        };
        let constraints = GuardrailConstraints::from(&profile);
        assert!(constraints.has_pcos);
        assert_eq!(constraints.target_minutes_per_session, 50);
        assert_eq!(constraints.days_per_week, 4);
    }
}
