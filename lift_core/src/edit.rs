//! Exercise edits on a plan's template.
//!
//! An edit changes the day template and the week-0 sessions that rotate onto
//! it. Later weeks keep their payloads; they were expanded from the template as
//! it was when the plan was generated.

use crate::calendar::estimate_duration_minutes;
use crate::schema::{EXERCISES_PER_BLOCK, SETS_PER_EXERCISE};
use crate::{Block, Error, ExerciseEntry, Result, Template, WeekIndex, WorkoutInstance};

fn block_path(day_template_index: usize, block_index: usize) -> String {
    format!("pattern[{}].blocks[{}]", day_template_index, block_index)
}

fn target_block(
    template: &mut Template,
    day_template_index: usize,
    block_index: usize,
) -> Result<&mut Block> {
    let day = template
        .pattern
        .get_mut(day_template_index)
        .ok_or_else(|| {
            Error::Schema(vec![format!(
                "pattern[{}]: no such day template",
                day_template_index
            )])
        })?;
    day.blocks.get_mut(block_index).ok_or_else(|| {
        Error::Schema(vec![format!(
            "{}: no such block",
            block_path(day_template_index, block_index)
        )])
    })
}

fn exercise_count_issue(day_template_index: usize, block_index: usize, found: usize) -> Error {
    Error::Schema(vec![format!(
        "{}.exercises: expected {}-{} exercises, found {}",
        block_path(day_template_index, block_index),
        EXERCISES_PER_BLOCK.start(),
        EXERCISES_PER_BLOCK.end(),
        found
    )])
}

/// Apply `edit` to the matching block of each week-0 session on this day template
fn propagate<F>(
    instances: &mut [WorkoutInstance],
    pattern_len: usize,
    day_template_index: usize,
    block_index: usize,
    mut edit: F,
) -> usize
where
    F: FnMut(&mut Block),
{
    let mut touched = 0;
    for instance in instances
        .iter_mut()
        .filter(|i| i.week_index == WeekIndex(0))
        .filter(|i| i.day_index as usize % pattern_len == day_template_index)
    {
        if let Some(block) = instance.payload.get_mut(block_index) {
            edit(block);
            instance.duration_minutes = estimate_duration_minutes(&instance.payload);
            touched += 1;
        }
    }
    touched
}

/// Append an exercise to a block; returns the number of sessions updated
pub fn add_exercise(
    template: &mut Template,
    instances: &mut [WorkoutInstance],
    day_template_index: usize,
    block_index: usize,
    entry: ExerciseEntry,
) -> Result<usize> {
    let mut issues = Vec::new();
    if entry.id.trim().is_empty() {
        issues.push("exercise.id: must not be empty".to_string());
    }
    if !SETS_PER_EXERCISE.contains(&entry.sets) {
        issues.push(format!(
            "exercise.sets: expected {}-{} sets, found {}",
            SETS_PER_EXERCISE.start(),
            SETS_PER_EXERCISE.end(),
            entry.sets
        ));
    }
    if !issues.is_empty() {
        return Err(Error::Schema(issues));
    }

    let pattern_len = template.pattern.len();
    let block = target_block(template, day_template_index, block_index)?;
    let count = block.exercises.len() + 1;
    if !EXERCISES_PER_BLOCK.contains(&count) {
        return Err(exercise_count_issue(day_template_index, block_index, count));
    }
    block.exercises.push(entry.clone());

    let touched = propagate(
        instances,
        pattern_len,
        day_template_index,
        block_index,
        |block| block.exercises.push(entry.clone()),
    );
    tracing::debug!(
        "Added {} to {}, {} week-0 sessions updated",
        entry.id,
        block_path(day_template_index, block_index),
        touched
    );
    Ok(touched)
}

/// Remove the first exercise with `exercise_id` from a block
pub fn remove_exercise(
    template: &mut Template,
    instances: &mut [WorkoutInstance],
    day_template_index: usize,
    block_index: usize,
    exercise_id: &str,
) -> Result<usize> {
    let pattern_len = template.pattern.len();
    let block = target_block(template, day_template_index, block_index)?;
    let position = block
        .exercises
        .iter()
        .position(|e| e.id == exercise_id)
        .ok_or_else(|| {
            Error::Schema(vec![format!(
                "{}.exercises: no exercise with id {:?}",
                block_path(day_template_index, block_index),
                exercise_id
            )])
        })?;
    let remaining = block.exercises.len() - 1;
    if !EXERCISES_PER_BLOCK.contains(&remaining) {
        return Err(exercise_count_issue(
            day_template_index,
            block_index,
            remaining,
        ));
    }
    block.exercises.remove(position);

    let touched = propagate(
        instances,
        pattern_len,
        day_template_index,
        block_index,
        |block| {
            if let Some(index) = block.exercises.iter().position(|e| e.id == exercise_id) {
                block.exercises.remove(index);
            }
        },
    );
    tracing::debug!(
        "Removed {} from {}, {} week-0 sessions updated",
        exercise_id,
        block_path(day_template_index, block_index),
        touched
    );
    Ok(touched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{generate_instances, ExpansionParams};
    use crate::{BlockType, DayTemplate};
    use uuid::Uuid;

    fn entry(id: &str, sets: u32) -> ExerciseEntry {
        ExerciseEntry {
            id: id.into(),
            name: id.into(),
            equipment: "dumbbell".into(),
            sets,
            reps: "10".into(),
            tempo: None,
            cues: vec![],
            notes: None,
        }
    }

    fn template() -> Template {
        let day = |focus: &str| DayTemplate {
            focus: focus.into(),
            blocks: vec![Block {
                block_type: BlockType::Accessory,
                title: "Accessory".into(),
                duration_minutes: 15,
                exercises: vec![entry("db_row", 3), entry("face_pull", 2)],
            }],
        };
        Template {
            days_per_week: 4,
            pattern: vec![day("A"), day("B"), day("C")],
        }
    }

    fn expand(template: &Template) -> Vec<WorkoutInstance> {
        generate_instances(
            template,
            &ExpansionParams {
                plan_id: Uuid::nil(),
                user_id: "user-1".into(),
                start_date: None,
                weeks: 2,
                days_per_week: 4,
                preferred_days: vec![],
            },
        )
        .unwrap()
    }

    #[test]
    fn test_add_propagates_to_week_zero_only() {
        let mut template = template();
        let mut instances = expand(&template);

        // Week 0 sessions 0..4 rotate A, B, C, A
        let touched =
            add_exercise(&mut template, &mut instances, 0, 0, entry("plank", 2)).unwrap();
        assert_eq!(touched, 2);
        assert_eq!(template.pattern[0].blocks[0].exercises.len(), 3);

        assert_eq!(instances[0].payload[0].exercises.len(), 3);
        assert_eq!(instances[3].payload[0].exercises.len(), 3);
        assert_eq!(instances[0].duration_minutes, 21);
        assert_eq!(instances[1].payload[0].exercises.len(), 2);
        // Week 1 is untouched
        assert!(instances[4..].iter().all(|i| i.payload[0].exercises.len() == 2));
    }

    #[test]
    fn test_remove_exercise() {
        let mut template = template();
        let mut instances = expand(&template);

        let touched =
            remove_exercise(&mut template, &mut instances, 1, 0, "db_row").unwrap();
        assert_eq!(touched, 1);
        assert_eq!(template.pattern[1].blocks[0].exercises[0].id, "face_pull");
        assert_eq!(instances[1].payload[0].exercises.len(), 1);
        assert_eq!(instances[1].duration_minutes, 6);
    }

    #[test]
    fn test_block_bounds_are_enforced() {
        let mut template = template();
        let mut instances = expand(&template);

        for id in ["a", "b", "c", "d"] {
            add_exercise(&mut template, &mut instances, 2, 0, entry(id, 1)).unwrap();
        }
        let full = add_exercise(&mut template, &mut instances, 2, 0, entry("e", 1));
        assert!(matches!(full, Err(Error::Schema(_))));
        assert_eq!(template.pattern[2].blocks[0].exercises.len(), 6);

        remove_exercise(&mut template, &mut instances, 0, 0, "db_row").unwrap();
        let last = remove_exercise(&mut template, &mut instances, 0, 0, "face_pull");
        assert!(matches!(last, Err(Error::Schema(_))));
        assert_eq!(template.pattern[0].blocks[0].exercises.len(), 1);
    }

    #[test]
    fn test_invalid_targets() {
        let mut template = template();
        let mut instances = expand(&template);

        assert!(matches!(
            add_exercise(&mut template, &mut instances, 5, 0, entry("plank", 2)),
            Err(Error::Schema(_))
        ));
        assert!(matches!(
            add_exercise(&mut template, &mut instances, 0, 0, entry("plank", 9)),
            Err(Error::Schema(_))
        ));
        assert!(matches!(
            remove_exercise(&mut template, &mut instances, 0, 3, "db_row"),
            Err(Error::Schema(_))
        ));
        assert!(matches!(
            remove_exercise(&mut template, &mut instances, 0, 0, "missing"),
            Err(Error::Schema(_))
        ));
        assert_eq!(template, self::template());
    }
}
