//! Periodization framework generation.
//!
//! Beginners run linear accumulation with a deload every fourth week.
//! Intermediates run block periodization: accumulation, intensification and a
//! deload week per cycle, with three-week cycles for programs under twelve
//! weeks and four-week cycles otherwise.
//!
//! Block week ranges are 1-based and inclusive.

use crate::{
    ExperienceLevel, GoalBias, Phase, PeriodizationBlock, PeriodizationFramework, RepRange,
    TargetLevel, WeekNumber,
};

const BEGINNER_DELOAD_EVERY: u32 = 4;
const LONG_PROGRAM_WEEKS: u32 = 12;

/// Targets shared by every block of one phase
struct PhaseTargets {
    volume: TargetLevel,
    intensity: TargetLevel,
    strength_reps: RepRange,
    accessory_reps: RepRange,
    strength_rpe: f32,
    accessory_rpe: f32,
}

fn beginner_targets(phase: Phase, bias: GoalBias) -> PhaseTargets {
    match phase {
        Phase::Deload => PhaseTargets {
            volume: TargetLevel::Low,
            intensity: TargetLevel::Low,
            strength_reps: RepRange::new(8, 10),
            accessory_reps: RepRange::new(10, 12),
            strength_rpe: 6.0,
            accessory_rpe: 6.0,
        },
        _ => PhaseTargets {
            volume: TargetLevel::High,
            intensity: TargetLevel::Moderate,
            strength_reps: if bias == GoalBias::Hypertrophy {
                RepRange::new(10, 12)
            } else {
                RepRange::new(8, 12)
            },
            accessory_reps: RepRange::new(12, 15),
            strength_rpe: 7.0,
            accessory_rpe: 7.0,
        },
    }
}

fn intermediate_targets(phase: Phase, bias: GoalBias) -> PhaseTargets {
    let hypertrophy = bias == GoalBias::Hypertrophy;
    match phase {
        Phase::Accumulation => PhaseTargets {
            volume: TargetLevel::High,
            intensity: TargetLevel::Moderate,
            strength_reps: if hypertrophy {
                RepRange::new(10, 12)
            } else {
                RepRange::new(6, 10)
            },
            accessory_reps: RepRange::new(10, 15),
            strength_rpe: 7.5,
            accessory_rpe: 7.5,
        },
        Phase::Intensification => PhaseTargets {
            volume: TargetLevel::Moderate,
            intensity: TargetLevel::High,
            strength_reps: if hypertrophy {
                RepRange::new(8, 10)
            } else {
                RepRange::new(4, 8)
            },
            accessory_reps: RepRange::new(8, 12),
            strength_rpe: 8.5,
            accessory_rpe: 8.0,
        },
        Phase::Deload => PhaseTargets {
            volume: TargetLevel::Low,
            intensity: TargetLevel::Low,
            strength_reps: RepRange::new(6, 8),
            accessory_reps: RepRange::new(10, 12),
            strength_rpe: 6.5,
            accessory_rpe: 6.5,
        },
        Phase::Realization => PhaseTargets {
            volume: TargetLevel::Low,
            intensity: TargetLevel::High,
            strength_reps: if hypertrophy {
                RepRange::new(6, 8)
            } else {
                RepRange::new(2, 5)
            },
            accessory_reps: RepRange::new(8, 10),
            strength_rpe: 9.0,
            accessory_rpe: 7.5,
        },
    }
}

fn phase_notes(phase: Phase, bias: GoalBias) -> String {
    let base = match phase {
        Phase::Accumulation => "Build work capacity; add reps before load",
        Phase::Intensification => "Heavier main lifts, trim accessory volume",
        Phase::Deload => "Recover: fewer sets, leave reps in reserve",
        Phase::Realization => "Express strength with low-volume heavy singles and doubles",
    };
    match bias {
        GoalBias::FatLoss if phase != Phase::Deload => {
            format!("{}; keep rest periods short and protect conditioning work", base)
        }
        GoalBias::Strength if phase == Phase::Intensification => {
            format!("{}; prioritise bar speed on top sets", base)
        }
        _ => base.to_string(),
    }
}

/// Accumulates blocks with sequential numbering
struct FrameworkBuilder {
    level: ExperienceLevel,
    bias: GoalBias,
    blocks: Vec<PeriodizationBlock>,
}

impl FrameworkBuilder {
    fn new(level: ExperienceLevel, bias: GoalBias) -> Self {
        Self {
            level,
            bias,
            blocks: Vec::new(),
        }
    }

    fn push(&mut self, phase: Phase, start: u32, end: u32) {
        let targets = match self.level {
            ExperienceLevel::Beginner => beginner_targets(phase, self.bias),
            ExperienceLevel::Intermediate => intermediate_targets(phase, self.bias),
        };
        self.blocks.push(PeriodizationBlock {
            block_number: self.blocks.len() as u32 + 1,
            block_type: phase,
            start_week: WeekNumber(start),
            end_week: WeekNumber(end),
            volume_target: targets.volume,
            intensity_target: targets.intensity,
            strength_reps: targets.strength_reps,
            accessory_reps: targets.accessory_reps,
            strength_rpe: targets.strength_rpe,
            accessory_rpe: targets.accessory_rpe,
            notes: phase_notes(phase, self.bias),
        });
    }
}

fn beginner_blocks(builder: &mut FrameworkBuilder, total_weeks: u32) {
    let mut week = 1;
    while week <= total_weeks {
        let next_deload = week.div_ceil(BEGINNER_DELOAD_EVERY) * BEGINNER_DELOAD_EVERY;
        if next_deload > total_weeks {
            builder.push(Phase::Accumulation, week, total_weeks);
            break;
        }
        if next_deload > week {
            builder.push(Phase::Accumulation, week, next_deload - 1);
        }
        builder.push(Phase::Deload, next_deload, next_deload);
        week = next_deload + 1;
    }
}

fn intermediate_blocks(builder: &mut FrameworkBuilder, total_weeks: u32) {
    let cycle = if total_weeks < LONG_PROGRAM_WEEKS { 3 } else { 4 };
    let accumulation = cycle / 2;
    let intensification = cycle - accumulation - 1;

    let mut week = 1;
    while total_weeks + 1 - week >= cycle {
        let intens_start = week + accumulation;
        let deload = intens_start + intensification;
        builder.push(Phase::Accumulation, week, intens_start - 1);
        builder.push(Phase::Intensification, intens_start, deload - 1);
        builder.push(Phase::Deload, deload, deload);
        week = deload + 1;
    }

    let remaining = total_weeks + 1 - week;
    if remaining >= 2 {
        builder.push(Phase::Accumulation, week, total_weeks - 1);
        builder.push(Phase::Deload, total_weeks, total_weeks);
    } else if remaining == 1 {
        builder.push(Phase::Accumulation, week, total_weeks);
    }
}

/// Generate a gap-free framework covering weeks 1..=total_weeks
pub fn generate_framework(
    total_weeks: u32,
    level: ExperienceLevel,
    bias: GoalBias,
) -> PeriodizationFramework {
    let mut builder = FrameworkBuilder::new(level, bias);
    match level {
        ExperienceLevel::Beginner => beginner_blocks(&mut builder, total_weeks),
        ExperienceLevel::Intermediate => intermediate_blocks(&mut builder, total_weeks),
    }

    tracing::debug!(
        "Generated {:?} framework for {} weeks: {} blocks",
        level,
        total_weeks,
        builder.blocks.len()
    );

    PeriodizationFramework {
        total_weeks,
        experience_level: level,
        goal_bias: bias,
        blocks: builder.blocks,
    }
}

/// Block whose week range contains `week`
pub fn current_block(
    framework: &PeriodizationFramework,
    week: WeekNumber,
) -> Option<&PeriodizationBlock> {
    framework.blocks.iter().find(|b| b.contains(week))
}

/// Fraction of the block completed by the end of `week`, clamped to [0, 1]
pub fn block_progress(block: &PeriodizationBlock, week: WeekNumber) -> f64 {
    let elapsed = f64::from(week.0) - f64::from(block.start_week.0) + 1.0;
    (elapsed / f64::from(block.length_weeks())).clamp(0.0, 1.0)
}

impl PeriodizationFramework {
    /// Structural problems: gaps, overlaps, misordering, bad coverage
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.total_weeks == 0 {
            if !self.blocks.is_empty() {
                errors.push("Zero-week framework has blocks".to_string());
            }
            return errors;
        }

        match self.blocks.first() {
            Some(first) if first.start_week != WeekNumber(1) => {
                errors.push(format!("First block starts at {}", first.start_week));
            }
            None => errors.push("Framework has no blocks".to_string()),
            _ => {}
        }
        if let Some(last) = self.blocks.last() {
            if last.end_week != WeekNumber(self.total_weeks) {
                errors.push(format!(
                    "Last block ends at {}, expected week {}",
                    last.end_week, self.total_weeks
                ));
            }
        }

        for (i, block) in self.blocks.iter().enumerate() {
            if block.block_number != i as u32 + 1 {
                errors.push(format!(
                    "Block at position {} is numbered {}",
                    i, block.block_number
                ));
            }
            if block.end_week < block.start_week {
                errors.push(format!("Block {} ends before it starts", block.block_number));
            }
        }
        for pair in self.blocks.windows(2) {
            if pair[1].start_week.0 != pair[0].end_week.0 + 1 {
                errors.push(format!(
                    "Block {} ({} - {}) is not followed directly by block {} starting {}",
                    pair[0].block_number,
                    pair[0].start_week,
                    pair[0].end_week,
                    pair[1].block_number,
                    pair[1].start_week
                ));
            }
        }

        errors
    }
}
