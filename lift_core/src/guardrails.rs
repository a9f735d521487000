//! Guardrail post-processing of generated templates.
//!
//! Pipeline, in order:
//! 1. Schema validation (the only stage that can fail)
//! 2. PCOS guardrail: minimum conditioning, PCOS-safe conditioning, recovery blocks
//! 3. High-impact filter for strength and accessory work
//! 4. Time-budget trimming of accessory blocks
//!
//! Soft problems are fixed in place and reported as warnings. [`validate_safety`]
//! re-checks the same rules without mutating, as a gate before persistence.

use crate::catalog::{
    ExerciseCatalog, MemoizedCatalog, LOW_IMPACT_FALLBACK_ID, RECOVERY_EXERCISE_ID,
    ZONE2_EXERCISE_ID,
};
use crate::config::GuardrailConfig;
use crate::schema::{validate_template, BLOCKS_PER_DAY, DAYS_PER_WEEK, EXERCISES_PER_BLOCK};
use crate::{
    Block, BlockType, DayTemplate, ExerciseEntry, GuardrailConstraints, ImpactLevel, Result,
    Template,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Adjusted template plus the notices explaining every adjustment
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GuardrailOutcome {
    pub template: Template,
    pub warnings: Vec<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    InsufficientConditioning,
    UnsafeConditioningExercise,
    MissingRecoveryBlock,
    HighImpactExercise,
    OverTimeBudget,
}

/// One rule broken by a template
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SafetyViolation {
    pub kind: ViolationKind,
    /// 0-based day template index, None for program-wide rules
    pub day: Option<usize>,
    pub message: String,
}

impl fmt::Display for SafetyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

fn day_label(index: usize, day: &DayTemplate) -> String {
    format!("Day {} ({})", index + 1, day.focus)
}

// ============================================================================
// Fallback content
// ============================================================================

fn zone2_entry<C: ExerciseCatalog + ?Sized>(catalog: &C, minutes: u32) -> ExerciseEntry {
    let known = catalog.lookup(ZONE2_EXERCISE_ID);
    ExerciseEntry {
        id: ZONE2_EXERCISE_ID.into(),
        name: known
            .as_ref()
            .map_or_else(|| "Zone 2 Incline Walk".to_string(), |e| e.name.clone()),
        equipment: known.map_or_else(|| "treadmill".to_string(), |e| e.equipment),
        sets: 1,
        reps: format!("{} min", minutes),
        tempo: None,
        cues: vec![],
        notes: Some("Conversational pace, able to speak in full sentences".into()),
    }
}

fn zone2_block<C: ExerciseCatalog + ?Sized>(catalog: &C, minutes: u32) -> Block {
    Block {
        block_type: BlockType::Conditioning,
        title: "Zone-2 cardio".into(),
        duration_minutes: minutes,
        exercises: vec![zone2_entry(catalog, minutes)],
    }
}

fn recovery_block(minutes: u32) -> Block {
    Block {
        block_type: BlockType::Recovery,
        title: "Recovery & stress management".into(),
        duration_minutes: minutes,
        exercises: vec![ExerciseEntry {
            id: RECOVERY_EXERCISE_ID.into(),
            name: "Box Breathing".into(),
            equipment: "none".into(),
            sets: 1,
            reps: format!("{} min", minutes),
            tempo: None,
            cues: vec![],
            notes: Some(
                "Down-regulate after training and protect tonight's sleep window; \
                 stress management supports hormonal balance"
                    .into(),
            ),
        }],
    }
}

fn low_impact_fallback() -> ExerciseEntry {
    ExerciseEntry {
        id: LOW_IMPACT_FALLBACK_ID.into(),
        name: "Glute Bridge".into(),
        equipment: "bodyweight".into(),
        sets: 3,
        reps: "12-15".into(),
        tempo: Some("2-1-2".into()),
        cues: vec![],
        notes: Some("Low-impact substitute".into()),
    }
}

// ============================================================================
// Stages
// ============================================================================

fn conditioning_block_count(template: &Template) -> usize {
    template
        .pattern
        .iter()
        .flat_map(|d| &d.blocks)
        .filter(|b| b.block_type == BlockType::Conditioning)
        .count()
}

/// Insert before a trailing recovery block so sessions still end with recovery
fn insert_before_recovery(day: &mut DayTemplate, block: Block) {
    match day
        .blocks
        .iter()
        .rposition(|b| b.block_type == BlockType::Recovery)
    {
        Some(position) => day.blocks.insert(position, block),
        None => day.blocks.push(block),
    }
}

fn is_full(day: &DayTemplate) -> bool {
    day.blocks.len() >= *BLOCKS_PER_DAY.end()
}

/// Frees one block slot on a full day. Tried in order: merge two blocks of
/// the same type that fit in one, drop a warm-up, drop the later of two
/// same-type blocks. Conditioning blocks are left alone when `keep_conditioning`.
/// Returns a note for the warning and the type of the block that went away.
fn make_room(day: &mut DayTemplate, keep_conditioning: bool) -> Option<(String, BlockType)> {
    let movable = |t: BlockType| !(keep_conditioning && t == BlockType::Conditioning);
    let blocks = &day.blocks;

    let mergeable = (0..blocks.len()).find_map(|i| {
        (i + 1..blocks.len())
            .find(|&j| {
                blocks[i].block_type == blocks[j].block_type
                    && movable(blocks[j].block_type)
                    && blocks[i].exercises.len() + blocks[j].exercises.len()
                        <= *EXERCISES_PER_BLOCK.end()
            })
            .map(|j| (i, j))
    });
    if let Some((i, j)) = mergeable {
        let later = day.blocks.remove(j);
        let earlier = &mut day.blocks[i];
        earlier.duration_minutes += later.duration_minutes;
        earlier.exercises.extend(later.exercises);
        return Some((
            format!("merged {} into {}", later.title, earlier.title),
            later.block_type,
        ));
    }

    if let Some(position) = blocks.iter().position(|b| b.block_type == BlockType::Warmup) {
        let dropped = day.blocks.remove(position);
        return Some((format!("dropped {}", dropped.title), dropped.block_type));
    }

    let duplicate = (1..blocks.len()).rev().find(|&j| {
        movable(blocks[j].block_type)
            && blocks[..j]
                .iter()
                .any(|b| b.block_type == blocks[j].block_type)
    })?;
    let dropped = day.blocks.remove(duplicate);
    Some((format!("dropped {}", dropped.title), dropped.block_type))
}

fn enforce_pcos<C: ExerciseCatalog + ?Sized>(
    template: &mut Template,
    catalog: &C,
    config: &GuardrailConfig,
    warnings: &mut Vec<String>,
) {
    let mut count = conditioning_block_count(template);
    // Days with a free slot first, full days only when those run out
    for full_pass in [false, true] {
        for (d, day) in template.pattern.iter_mut().enumerate() {
            if count >= config.min_conditioning_blocks {
                break;
            }
            if day.has_block(BlockType::Conditioning) || is_full(day) != full_pass {
                continue;
            }
            let label = day_label(d, day);
            if full_pass {
                match make_room(day, true) {
                    Some((note, _)) => {
                        warnings.push(format!("{}: {} to make room for Zone-2 work", label, note))
                    }
                    None => continue,
                }
            }
            insert_before_recovery(day, zone2_block(catalog, config.zone2_block_minutes));
            count += 1;
            warnings.push(format!(
                "{}: added a {}-minute Zone-2 conditioning block (PCOS guardrail)",
                label, config.zone2_block_minutes
            ));
        }
    }

    for (d, day) in template.pattern.iter_mut().enumerate() {
        let label = day_label(d, day);
        for block in day
            .blocks
            .iter_mut()
            .filter(|b| b.block_type == BlockType::Conditioning)
        {
            let (kept, removed): (Vec<_>, Vec<_>) = block
                .exercises
                .drain(..)
                .partition(|e| catalog.is_pcos_safe(&e.id));
            block.exercises = kept;
            for exercise in removed {
                warnings.push(format!(
                    "{}: removed {} from {} (not PCOS-safe)",
                    label, exercise.name, block.title
                ));
            }
            if block.exercises.is_empty() {
                block
                    .exercises
                    .push(zone2_entry(catalog, block.duration_minutes.max(1)));
            }
        }

        if day.has_block(BlockType::Recovery) {
            continue;
        }
        if is_full(day) {
            let keep_conditioning = count <= config.min_conditioning_blocks;
            match make_room(day, keep_conditioning) {
                Some((note, removed)) => {
                    if removed == BlockType::Conditioning {
                        count -= 1;
                    }
                    warnings.push(format!(
                        "{}: {} to make room for a recovery block",
                        label, note
                    ));
                }
                None => {
                    tracing::warn!("{}: no room for a recovery block", label);
                    warnings.push(format!(
                        "{}: no room for a recovery block within {} blocks",
                        label,
                        BLOCKS_PER_DAY.end()
                    ));
                    continue;
                }
            }
        }
        tracing::debug!("{}: appending recovery block", label);
        day.blocks.push(recovery_block(config.recovery_block_minutes));
    }
}

fn filter_high_impact<C: ExerciseCatalog + ?Sized>(
    template: &mut Template,
    catalog: &C,
    warnings: &mut Vec<String>,
) {
    for (d, day) in template.pattern.iter_mut().enumerate() {
        let label = day_label(d, day);
        for block in day
            .blocks
            .iter_mut()
            .filter(|b| b.block_type.is_resistance())
        {
            let (kept, removed): (Vec<_>, Vec<_>) = block
                .exercises
                .drain(..)
                .partition(|e| catalog.impact_level(&e.id) != ImpactLevel::High);
            block.exercises = kept;
            for exercise in removed {
                warnings.push(format!(
                    "{}: removed high-impact {} from {}",
                    label, exercise.name, block.title
                ));
            }
            if block.exercises.is_empty() {
                block.exercises.push(low_impact_fallback());
            }
        }
    }
}

/// Trim one day's accessory work; returns overage left uncovered
///
/// Duration cuts come first, in steps of at most `trim_step_minutes`, until
/// the overage is gone or every accessory block sits at its floor. Only then
/// are sets removed, each credited as `minutes_per_trimmed_set`.
fn trim_day(day: &mut DayTemplate, overage: u32, config: &GuardrailConfig) -> u32 {
    let mut remaining = overage;

    while remaining > 0 {
        let mut progressed = false;
        for block in day
            .blocks
            .iter_mut()
            .filter(|b| b.block_type == BlockType::Accessory)
        {
            if remaining == 0 {
                break;
            }
            let cut = config
                .trim_step_minutes
                .min(remaining)
                .min(block.duration_minutes.saturating_sub(config.accessory_floor_minutes));
            if cut > 0 {
                block.duration_minutes -= cut;
                remaining -= cut;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    while remaining > 0 {
        let mut progressed = false;
        for exercise in day
            .blocks
            .iter_mut()
            .filter(|b| b.block_type == BlockType::Accessory)
            .flat_map(|b| b.exercises.iter_mut())
        {
            if remaining == 0 {
                break;
            }
            if exercise.sets > config.accessory_floor_sets {
                exercise.sets -= 1;
                remaining = remaining.saturating_sub(config.minutes_per_trimmed_set);
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    remaining
}

fn enforce_time_budget(
    template: &mut Template,
    target_minutes: u32,
    config: &GuardrailConfig,
    warnings: &mut Vec<String>,
) {
    for (d, day) in template.pattern.iter_mut().enumerate() {
        let total = day.total_minutes();
        if total <= target_minutes {
            continue;
        }
        let overage = total - target_minutes;
        let uncovered = trim_day(day, overage, config);

        tracing::debug!(
            "Day {}: {} min over budget, {} min left after trimming",
            d + 1,
            overage,
            uncovered
        );

        let mut warning = format!(
            "{}: planned {} min exceeded the {}-minute budget by {} min; trimmed accessory work",
            day_label(d, day),
            total,
            target_minutes,
            overage
        );
        if uncovered > 0 {
            warning.push_str(" (accessory work is already at its minimum)");
        }
        warnings.push(warning);
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Validate a generator draft and adjust it to the user's constraints
pub fn apply_guardrails<C: ExerciseCatalog + ?Sized>(
    draft: Template,
    constraints: &GuardrailConstraints,
    catalog: &C,
    config: &GuardrailConfig,
) -> Result<GuardrailOutcome> {
    validate_template(&draft)?;

    let catalog = MemoizedCatalog::new(catalog);
    let mut template = draft;
    let mut warnings = Vec::new();

    if template.days_per_week != constraints.days_per_week {
        if DAYS_PER_WEEK.contains(&constraints.days_per_week) {
            warnings.push(format!(
                "Template was drafted for {} days per week; scheduling {} as requested",
                template.days_per_week, constraints.days_per_week
            ));
            template.days_per_week = constraints.days_per_week;
        } else {
            tracing::warn!(
                "Ignoring out-of-range days_per_week constraint {}",
                constraints.days_per_week
            );
        }
    }

    if constraints.has_pcos {
        enforce_pcos(&mut template, &catalog, config, &mut warnings);
    }
    if constraints.no_high_impact {
        filter_high_impact(&mut template, &catalog, &mut warnings);
    }
    enforce_time_budget(
        &mut template,
        constraints.target_minutes_per_session,
        config,
        &mut warnings,
    );

    tracing::info!(
        "Guardrails applied to {}-day template with {} warnings",
        template.pattern.len(),
        warnings.len()
    );

    Ok(GuardrailOutcome { template, warnings })
}

/// Re-check the guardrail rules without changing anything
pub fn validate_safety<C: ExerciseCatalog + ?Sized>(
    template: &Template,
    constraints: &GuardrailConstraints,
    catalog: &C,
    config: &GuardrailConfig,
) -> Vec<SafetyViolation> {
    let catalog = MemoizedCatalog::new(catalog);
    let mut violations = Vec::new();

    if constraints.has_pcos {
        let count = conditioning_block_count(template);
        if count < config.min_conditioning_blocks {
            violations.push(SafetyViolation {
                kind: ViolationKind::InsufficientConditioning,
                day: None,
                message: format!(
                    "Only {} conditioning blocks in the week, at least {} required",
                    count, config.min_conditioning_blocks
                ),
            });
        }

        for (d, day) in template.pattern.iter().enumerate() {
            for block in day
                .blocks
                .iter()
                .filter(|b| b.block_type == BlockType::Conditioning)
            {
                for exercise in block
                    .exercises
                    .iter()
                    .filter(|e| !catalog.is_pcos_safe(&e.id))
                {
                    violations.push(SafetyViolation {
                        kind: ViolationKind::UnsafeConditioningExercise,
                        day: Some(d),
                        message: format!(
                            "{}: {} in {} is not PCOS-safe",
                            day_label(d, day),
                            exercise.name,
                            block.title
                        ),
                    });
                }
            }
            if !day.has_block(BlockType::Recovery) {
                violations.push(SafetyViolation {
                    kind: ViolationKind::MissingRecoveryBlock,
                    day: Some(d),
                    message: format!("{}: no recovery block", day_label(d, day)),
                });
            }
        }
    }

    if constraints.no_high_impact {
        for (d, day) in template.pattern.iter().enumerate() {
            for block in day.blocks.iter().filter(|b| b.block_type.is_resistance()) {
                for exercise in block
                    .exercises
                    .iter()
                    .filter(|e| catalog.impact_level(&e.id) == ImpactLevel::High)
                {
                    violations.push(SafetyViolation {
                        kind: ViolationKind::HighImpactExercise,
                        day: Some(d),
                        message: format!(
                            "{}: {} in {} is high impact",
                            day_label(d, day),
                            exercise.name,
                            block.title
                        ),
                    });
                }
            }
        }
    }

    let limit = constraints.target_minutes_per_session + config.trim_step_minutes;
    for (d, day) in template.pattern.iter().enumerate() {
        let total = day.total_minutes();
        let trimmable = day.blocks.iter().any(|b| {
            b.block_type == BlockType::Accessory
                && b.duration_minutes > config.accessory_floor_minutes
        });
        if total > limit && trimmable {
            violations.push(SafetyViolation {
                kind: ViolationKind::OverTimeBudget,
                day: Some(d),
                message: format!(
                    "{}: {} min exceeds the {}-minute budget",
                    day_label(d, day),
                    total,
                    constraints.target_minutes_per_session
                ),
            });
        }
    }

    violations
}
