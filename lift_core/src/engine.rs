//! Plan generation orchestration.
//!
//! A generator draft goes through:
//! 1. Guardrail post-processing (schema, PCOS, impact, time budget)
//! 2. Safety audit of the adjusted template; any violation blocks the plan
//! 3. Calendar expansion into workout instances
//! 4. Calendar assembly
//!
//! Rescheduling an existing plan only touches dates and the calendar.

use crate::calendar::{build_calendar, generate_instances, CalendarParams, ExpansionParams};
use crate::catalog::ExerciseCatalog;
use crate::config::GuardrailConfig;
use crate::guardrails::{apply_guardrails, validate_safety};
use crate::schedule::build_plan_schedule;
use crate::{
    Error, GuardrailConstraints, Plan, PlanStatus, Profile, Result, Template, WorkoutInstance,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything needed to turn a draft into a scheduled plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub plan_id: Uuid,
    pub user_id: String,
    pub total_weeks: u32,
    #[serde(default)]
    pub preferred_days: Vec<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    pub constraints: GuardrailConstraints,
}

impl PlanRequest {
    /// Request for a fresh plan (new random id) from a user's profile
    pub fn from_profile(user_id: impl Into<String>, profile: &Profile) -> Self {
        Self {
            plan_id: Uuid::new_v4(),
            user_id: user_id.into(),
            total_weeks: profile.total_weeks,
            preferred_days: profile.preferred_days.clone(),
            start_date: None,
            constraints: GuardrailConstraints::from(profile),
        }
    }
}

/// A persisted-ready plan with its expanded sessions
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlan {
    pub plan: Plan,
    pub instances: Vec<WorkoutInstance>,
    /// Guardrail notices to show the user
    pub warnings: Vec<String>,
}

/// Guard, audit, expand and calendar a generator draft
pub fn generate_plan<C: ExerciseCatalog + ?Sized>(
    request: &PlanRequest,
    draft: Template,
    catalog: &C,
    config: &GuardrailConfig,
) -> Result<GeneratedPlan> {
    let outcome = apply_guardrails(draft, &request.constraints, catalog, config)?;

    let violations = validate_safety(&outcome.template, &request.constraints, catalog, config);
    if !violations.is_empty() {
        tracing::warn!(
            "Plan {} blocked by {} safety violations",
            request.plan_id,
            violations.len()
        );
        return Err(Error::UnsafeTemplate(
            violations.iter().map(|v| v.to_string()).collect(),
        ));
    }

    let template = outcome.template;
    let instances = generate_instances(
        &template,
        &ExpansionParams {
            plan_id: request.plan_id,
            user_id: request.user_id.clone(),
            start_date: request.start_date,
            weeks: request.total_weeks,
            days_per_week: template.days_per_week,
            preferred_days: request.preferred_days.clone(),
        },
    )?;
    let calendar = build_calendar(
        &template,
        &instances,
        &CalendarParams {
            plan_id: request.plan_id,
            start_date: request.start_date,
            weeks: request.total_weeks,
        },
    );

    let plan = Plan {
        id: request.plan_id,
        user_id: request.user_id.clone(),
        duration_weeks: request.total_weeks,
        days_per_week: template.days_per_week,
        preferred_days: request.preferred_days.clone(),
        start_date: request.start_date,
        status: PlanStatus::Draft,
        template: Some(template),
        calendar: Some(calendar),
    };

    tracing::info!(
        "Generated plan {}: {} weeks, {} instances, {} warnings",
        plan.id,
        plan.duration_weeks,
        instances.len(),
        outcome.warnings.len()
    );

    Ok(GeneratedPlan {
        plan,
        instances,
        warnings: outcome.warnings,
    })
}

/// Move a generated plan to a new start date
///
/// On error the plan and its instances are left exactly as they were.
pub fn reschedule_plan(generated: &mut GeneratedPlan, start_date: &str) -> Result<()> {
    let schedule = build_plan_schedule(&generated.plan, &generated.instances, start_date)?;

    generated.plan.start_date = Some(schedule.start_date);
    generated.plan.calendar = Some(schedule.calendar);
    generated.instances = schedule.instances;
    Ok(())
}
