#![allow(dead_code)]

use lift_core::*;

pub fn entry(id: &str, sets: u32, reps: &str) -> ExerciseEntry {
    ExerciseEntry {
        id: id.into(),
        name: id.replace('_', " "),
        equipment: "gym".into(),
        sets,
        reps: reps.into(),
        tempo: None,
        cues: vec![],
        notes: None,
    }
}

pub fn block(block_type: BlockType, minutes: u32, exercises: Vec<ExerciseEntry>) -> Block {
    Block {
        block_type,
        title: format!("{:?}", block_type),
        duration_minutes: minutes,
        exercises,
    }
}

/// Three-day draft with high-impact and PCOS-unsafe work, 80 minutes per day
pub fn full_body_draft() -> Template {
    Template {
        days_per_week: 3,
        pattern: vec![
            DayTemplate {
                focus: "Lower".into(),
                blocks: vec![
                    block(BlockType::Warmup, 10, vec![entry("bike_zone2", 1, "5 min")]),
                    block(BlockType::Strength, 30, vec![entry("back_squat", 5, "5")]),
                    block(
                        BlockType::Accessory,
                        25,
                        vec![
                            entry("box_jump", 3, "5"),
                            entry("walking_lunge", 4, "10"),
                            entry("plank", 3, "45 s"),
                        ],
                    ),
                    block(BlockType::Conditioning, 15, vec![entry("burpee", 3, "12 min")]),
                ],
            },
            DayTemplate {
                focus: "Upper".into(),
                blocks: vec![
                    block(BlockType::Strength, 30, vec![entry("bench_press", 5, "5")]),
                    block(
                        BlockType::Accessory,
                        30,
                        vec![entry("db_row", 4, "10"), entry("face_pull", 4, "15")],
                    ),
                    block(BlockType::Accessory, 20, vec![entry("jump_squat", 3, "8")]),
                ],
            },
            DayTemplate {
                focus: "Hinge".into(),
                blocks: vec![
                    block(BlockType::Strength, 35, vec![entry("deadlift", 4, "3")]),
                    block(BlockType::Accessory, 25, vec![entry("hip_thrust", 4, "10")]),
                    block(
                        BlockType::Conditioning,
                        20,
                        vec![entry("sprint_intervals", 6, "30 s"), entry("rower_zone2", 1, "15 min")],
                    ),
                ],
            },
        ],
    }
}

/// Three days at the five-block limit, none with recovery work
pub fn full_day_draft() -> Template {
    Template {
        days_per_week: 3,
        pattern: vec![
            DayTemplate {
                focus: "Lower".into(),
                blocks: vec![
                    block(BlockType::Warmup, 8, vec![entry("bike_zone2", 1, "8 min")]),
                    block(BlockType::Strength, 25, vec![entry("back_squat", 5, "5")]),
                    block(BlockType::Strength, 20, vec![entry("deadlift", 3, "3")]),
                    block(
                        BlockType::Accessory,
                        20,
                        vec![entry("box_jump", 3, "5"), entry("walking_lunge", 3, "10")],
                    ),
                    block(BlockType::Accessory, 10, vec![entry("plank", 3, "45 s")]),
                ],
            },
            DayTemplate {
                focus: "Upper".into(),
                blocks: vec![
                    block(BlockType::Warmup, 5, vec![entry("face_pull", 2, "20")]),
                    block(BlockType::Strength, 25, vec![entry("bench_press", 5, "5")]),
                    block(
                        BlockType::Accessory,
                        20,
                        vec![entry("db_row", 4, "10"), entry("face_pull", 3, "15")],
                    ),
                    block(BlockType::Accessory, 15, vec![entry("jump_squat", 3, "8")]),
                    block(BlockType::Conditioning, 12, vec![entry("burpee", 4, "10 min")]),
                ],
            },
            DayTemplate {
                focus: "Hinge".into(),
                blocks: vec![
                    block(BlockType::Strength, 30, vec![entry("deadlift", 4, "3")]),
                    block(BlockType::Strength, 20, vec![entry("hip_thrust", 4, "8")]),
                    block(BlockType::Accessory, 15, vec![entry("walking_lunge", 3, "12")]),
                    block(BlockType::Accessory, 15, vec![entry("db_row", 3, "12")]),
                    block(BlockType::Accessory, 10, vec![entry("plank", 3, "60 s")]),
                ],
            },
        ],
    }
}

pub fn profile(has_pcos: bool, no_high_impact: bool, minutes: u32) -> Profile {
    Profile {
        experience_level: ExperienceLevel::Intermediate,
        has_pcos,
        no_high_impact,
        sessions_per_week: 4,
        minutes_per_session: minutes,
        total_weeks: 10,
        preferred_days: vec![],
        goal_bias: GoalBias::Balanced,
    }
}

pub fn request(profile: &Profile, start: Option<&str>) -> PlanRequest {
    PlanRequest {
        plan_id: uuid::Uuid::from_u128(0x5eed),
        start_date: start.map(|s| lift_core::schedule::parse_start_date(s).unwrap()),
        ..PlanRequest::from_profile("user-1", profile)
    }
}
