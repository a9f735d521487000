#![forbid(unsafe_code)]

//! Plan scheduling and periodization engine for strength-training programs.
//!
//! This crate provides:
//! - Domain types (templates, plans, workout instances, calendars)
//! - Guardrail post-processing and safety audit of generated templates
//! - Calendar expansion, deload scheduling and rescheduling
//! - Periodization frameworks
//! - Progression targets from logged history
//! - Config, logging and CSV export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod catalog;
pub mod schema;
pub mod deload;
pub mod calendar;
pub mod schedule;
pub mod periodization;
pub mod guardrails;
pub mod progression;
pub mod engine;
pub mod edit;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use catalog::{default_catalog, ExerciseCatalog, InMemoryCatalog};
pub use deload::deload_weeks;
pub use calendar::generate_instances;
pub use schedule::build_plan_schedule;
pub use periodization::generate_framework;
pub use guardrails::{apply_guardrails, validate_safety, GuardrailOutcome, SafetyViolation};
pub use progression::project_targets;
pub use engine::{generate_plan, reschedule_plan, GeneratedPlan, PlanRequest};
