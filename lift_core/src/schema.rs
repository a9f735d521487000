//! Template shape validation.
//!
//! Drafts arrive from an external generator and must match the template
//! shape before any guardrail touches them. All problems are collected so the
//! generator can be given a complete report.

use crate::{Error, Result, Template};
use std::ops::RangeInclusive;

pub const DAYS_PER_WEEK: RangeInclusive<u32> = 3..=6;
pub const DAYS_IN_PATTERN: RangeInclusive<usize> = 3..=6;
pub const BLOCKS_PER_DAY: RangeInclusive<usize> = 1..=5;
pub const EXERCISES_PER_BLOCK: RangeInclusive<usize> = 1..=6;
pub const SETS_PER_EXERCISE: RangeInclusive<u32> = 1..=6;

fn bound_issue<T: std::fmt::Display + PartialOrd>(
    path: &str,
    what: &str,
    range: &RangeInclusive<T>,
    found: T,
) -> Option<String> {
    if range.contains(&found) {
        None
    } else {
        Some(format!(
            "{}: expected {}-{} {}, found {}",
            path,
            range.start(),
            range.end(),
            what,
            found
        ))
    }
}

/// Every shape problem in the template, each prefixed with its path
pub fn schema_issues(template: &Template) -> Vec<String> {
    let mut issues = Vec::new();

    issues.extend(bound_issue(
        "daysPerWeek",
        "days",
        &DAYS_PER_WEEK,
        template.days_per_week,
    ));
    issues.extend(bound_issue(
        "pattern",
        "day templates",
        &DAYS_IN_PATTERN,
        template.pattern.len(),
    ));

    for (d, day) in template.pattern.iter().enumerate() {
        let day_path = format!("pattern[{}]", d);
        if day.focus.trim().is_empty() {
            issues.push(format!("{}.focus: must not be empty", day_path));
        }
        issues.extend(bound_issue(
            &format!("{}.blocks", day_path),
            "blocks",
            &BLOCKS_PER_DAY,
            day.blocks.len(),
        ));

        for (b, block) in day.blocks.iter().enumerate() {
            let block_path = format!("{}.blocks[{}]", day_path, b);
            if block.title.trim().is_empty() {
                issues.push(format!("{}.title: must not be empty", block_path));
            }
            if block.duration_minutes == 0 {
                issues.push(format!("{}.durationMinutes: must be positive", block_path));
            }
            issues.extend(bound_issue(
                &format!("{}.exercises", block_path),
                "exercises",
                &EXERCISES_PER_BLOCK,
                block.exercises.len(),
            ));

            for (e, exercise) in block.exercises.iter().enumerate() {
                let exercise_path = format!("{}.exercises[{}]", block_path, e);
                if exercise.id.trim().is_empty() {
                    issues.push(format!("{}.id: must not be empty", exercise_path));
                }
                if exercise.name.trim().is_empty() {
                    issues.push(format!("{}.name: must not be empty", exercise_path));
                }
                issues.extend(bound_issue(
                    &format!("{}.sets", exercise_path),
                    "sets",
                    &SETS_PER_EXERCISE,
                    exercise.sets,
                ));
            }
        }
    }

    issues
}

/// Fail with [`Error::Schema`] if the template is malformed
pub fn validate_template(template: &Template) -> Result<()> {
    let issues = schema_issues(template);
    if issues.is_empty() {
        Ok(())
    } else {
        tracing::warn!("Template draft rejected with {} schema issues", issues.len());
        Err(Error::Schema(issues))
    }
}

/// Deserialize and validate a generator draft
pub fn parse_template_draft(json: &str) -> Result<Template> {
    let template: Template =
        serde_json::from_str(json).map_err(|e| Error::Schema(vec![format!("$: {}", e)]))?;
    validate_template(&template)?;
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "daysPerWeek": 3,
        "pattern": [
            {"focus": "Lower", "blocks": [
                {"type": "strength", "title": "Squat", "durationMinutes": 20,
                 "exercises": [{"id": "back_squat", "name": "Back Squat", "equipment": "barbell", "sets": 4, "reps": "5"}]}
            ]},
            {"focus": "Upper", "blocks": [
                {"type": "strength", "title": "Press", "durationMinutes": 20,
                 "exercises": [{"id": "bench_press", "name": "Bench Press", "equipment": "barbell", "sets": 4, "reps": "6-8"}]}
            ]},
            {"focus": "Full", "blocks": [
                {"type": "conditioning", "title": "Zone 2", "durationMinutes": 20,
                 "exercises": [{"id": "bike_zone2", "name": "Zone 2 Bike", "equipment": "bike", "sets": 1, "reps": "20 min"}]}
            ]}
        ]
    }"#;

    #[test]
    fn test_valid_draft_parses() {
        let template = parse_template_draft(VALID).unwrap();
        assert_eq!(template.pattern.len(), 3);
    }

    #[test]
    fn test_malformed_json_is_schema_error() {
        let result = parse_template_draft(r#"{"daysPerWeek": 3}"#);
        assert!(matches!(result, Err(Error::Schema(_))));

        let result = parse_template_draft(&VALID.replace("\"strength\"", "\"cardio\""));
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_cardinality_issues_are_reported_with_paths() {
        let mut template = parse_template_draft(VALID).unwrap();
        template.pattern[1].blocks[0].exercises.clear();
        template.pattern[0].blocks[0].exercises[0].sets = 7;
        template.pattern.truncate(2);
        template.pattern.push(template.pattern[0].clone());
        template.pattern[2].blocks.clear();

        let issues = schema_issues(&template);
        assert!(issues
            .iter()
            .any(|i| i.starts_with("pattern[1].blocks[0].exercises:")));
        assert!(issues.iter().any(|i| i.starts_with("pattern[2].blocks:")));
        assert!(issues
            .iter()
            .any(|i| i.starts_with("pattern[0].blocks[0].exercises[0].sets:")));
    }

    #[test]
    fn test_day_count_bounds() {
        let mut template = parse_template_draft(VALID).unwrap();
        template.days_per_week = 7;
        let extra = template.pattern[0].clone();
        for _ in 0..4 {
            template.pattern.push(extra.clone());
        }

        match validate_template(&template) {
            Err(Error::Schema(issues)) => {
                assert!(issues.iter().any(|i| i.starts_with("daysPerWeek:")));
                assert!(issues.iter().any(|i| i.starts_with("pattern:")));
            }
            other => panic!("Expected schema error, got {:?}", other),
        }
    }
}
