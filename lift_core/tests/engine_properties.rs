//! Invariants that must hold across the whole input space, not just one plan.

mod common;

use common::*;
use lift_core::calendar::{build_calendar, CalendarParams, ExpansionParams};
use lift_core::config::{GuardrailConfig, ProgressionConfig};
use lift_core::*;
use std::collections::BTreeSet;
use std::thread;
use uuid::Uuid;

fn expansion(weeks: u32, days_per_week: u32, start: Option<&str>) -> ExpansionParams {
    ExpansionParams {
        plan_id: Uuid::from_u128(42),
        user_id: "user-1".into(),
        start_date: start.map(|s| lift_core::schedule::parse_start_date(s).unwrap()),
        weeks,
        days_per_week,
        preferred_days: vec![],
    }
}

fn plan_for(template: &Template, weeks: u32) -> Plan {
    Plan {
        id: Uuid::from_u128(42),
        user_id: "user-1".into(),
        duration_weeks: weeks,
        days_per_week: template.days_per_week,
        preferred_days: vec![],
        start_date: None,
        status: PlanStatus::Draft,
        template: Some(template.clone()),
        calendar: None,
    }
}

#[test]
fn test_deload_coverage() {
    for total in 0..3 {
        assert!(deload_weeks(total).is_empty(), "{} weeks", total);
    }
    for total in 3..10 {
        assert_eq!(deload_weeks(total), BTreeSet::from([WeekIndex(2)]), "{} weeks", total);
    }
    for total in 10..=52 {
        assert_eq!(
            deload_weeks(total),
            BTreeSet::from([WeekIndex(2), WeekIndex(6)]),
            "{} weeks",
            total
        );
    }
}

#[test]
fn test_instance_count_invariant() {
    let template = full_body_draft();
    for weeks in 0..=16 {
        for days_per_week in 1..=7 {
            let instances = generate_instances(&template, &expansion(weeks, days_per_week, None))
                .unwrap();
            assert_eq!(instances.len() as u32, weeks * days_per_week);
            let indices: Vec<u32> = instances.iter().map(|i| i.day_index).collect();
            assert_eq!(indices, (0..weeks * days_per_week).collect::<Vec<_>>());
        }
    }
}

#[test]
fn test_instance_ids_are_unique() {
    let instances =
        generate_instances(&full_body_draft(), &expansion(12, 5, Some("2025-01-06"))).unwrap();
    let ids: BTreeSet<_> = instances.iter().map(|i| i.id).collect();
    assert_eq!(ids.len(), instances.len());
}

#[test]
fn test_rescheduling_is_idempotent() {
    let template = full_body_draft();
    for start in ["2025-01-05", "2025-01-06", "2025-01-09", "2024-02-29"] {
        let instances =
            generate_instances(&template, &expansion(10, 3, Some("2025-06-01"))).unwrap();
        let plan = plan_for(&template, 10);

        let first = build_plan_schedule(&plan, &instances, start).unwrap();
        let second = build_plan_schedule(&plan, &instances, start).unwrap();
        assert_eq!(first, second);

        // Rescheduling the already rescheduled set lands on the same dates
        let again = build_plan_schedule(&plan, &first.instances, start).unwrap();
        assert_eq!(first.instances, again.instances);
    }
}

#[test]
fn test_rebuilder_matches_expander() {
    let template = full_body_draft();
    for start in ["2025-01-05", "2025-01-08", "2025-01-11"] {
        let dated = generate_instances(&template, &expansion(8, 3, Some(start))).unwrap();
        let undated = generate_instances(&template, &expansion(8, 3, None)).unwrap();
        let schedule = build_plan_schedule(&plan_for(&template, 8), &undated, start).unwrap();
        assert_eq!(schedule.instances, dated, "start {}", start);
    }
}

#[test]
fn test_framework_completeness() {
    for level in [ExperienceLevel::Beginner, ExperienceLevel::Intermediate] {
        for bias in [GoalBias::Strength, GoalBias::Balanced, GoalBias::Hypertrophy, GoalBias::FatLoss] {
            for total in 6..=16 {
                let framework = generate_framework(total, level, bias);
                assert!(
                    framework.validate().is_empty(),
                    "{:?} {:?} {} weeks: {:?}",
                    level,
                    bias,
                    total,
                    framework.validate()
                );
                assert_eq!(framework.blocks[0].start_week, WeekNumber(1));
                assert_eq!(
                    framework.blocks.last().unwrap().end_week,
                    WeekNumber(total)
                );
                for pair in framework.blocks.windows(2) {
                    assert_eq!(pair[1].start_week.0, pair[0].end_week.0 + 1);
                }
            }
        }
    }
}

#[test]
fn test_guardrail_closure() {
    let config = GuardrailConfig::default();
    let drafts = vec![full_body_draft(), {
        let mut draft = full_body_draft();
        for day in &mut draft.pattern {
            day.blocks.retain(|b| b.block_type != BlockType::Conditioning);
        }
        draft
    }, full_day_draft()];

    for draft in drafts {
        for has_pcos in [false, true] {
            for no_high_impact in [false, true] {
                for minutes in [20, 30, 45, 60, 75, 90] {
                    let constraints =
                        GuardrailConstraints::from(&profile(has_pcos, no_high_impact, minutes));
                    let outcome =
                        apply_guardrails(draft.clone(), &constraints, default_catalog(), &config)
                            .unwrap();
                    assert!(
                        lift_core::schema::schema_issues(&outcome.template).is_empty(),
                        "pcos={} impact={} minutes={}: {:?}",
                        has_pcos,
                        no_high_impact,
                        minutes,
                        lift_core::schema::schema_issues(&outcome.template)
                    );
                    let violations =
                        validate_safety(&outcome.template, &constraints, default_catalog(), &config);
                    assert!(
                        violations.is_empty(),
                        "pcos={} impact={} minutes={}: {:?}",
                        has_pcos,
                        no_high_impact,
                        minutes,
                        violations
                    );
                }
            }
        }
    }
}

#[test]
fn test_time_budget_convergence() {
    let config = GuardrailConfig::default();
    for minutes in [20, 40, 55, 60, 70] {
        let constraints = GuardrailConstraints::from(&profile(false, false, minutes));
        let outcome =
            apply_guardrails(full_body_draft(), &constraints, default_catalog(), &config).unwrap();

        for day in &outcome.template.pattern {
            let at_floor = day
                .blocks
                .iter()
                .filter(|b| b.block_type == BlockType::Accessory)
                .all(|b| b.duration_minutes <= config.accessory_floor_minutes);
            assert!(
                day.total_minutes() <= minutes + config.trim_step_minutes || at_floor,
                "{}: {} min against {}",
                day.focus,
                day.total_minutes(),
                minutes
            );
        }
    }
}

#[test]
fn test_concurrent_invocations_are_identical() {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(|| {
                let generated = generate_plan(
                    &request(&profile(true, true, 60), Some("2025-01-06")),
                    full_body_draft(),
                    default_catalog(),
                    &GuardrailConfig::default(),
                )
                .unwrap();
                let calendar = build_calendar(
                    generated.plan.template.as_ref().unwrap(),
                    &generated.instances,
                    &CalendarParams {
                        plan_id: generated.plan.id,
                        start_date: generated.plan.start_date,
                        weeks: generated.plan.duration_weeks,
                    },
                );
                let framework =
                    generate_framework(12, ExperienceLevel::Intermediate, GoalBias::Strength);
                let targets = project_targets(
                    generated.plan.template.as_ref().unwrap(),
                    &[],
                    12,
                    &ProgressionConfig::default(),
                );
                serde_json::to_string(&(generated, calendar, framework, targets)).unwrap()
            })
        })
        .collect();

    let outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(outputs.windows(2).all(|pair| pair[0] == pair[1]));
}
