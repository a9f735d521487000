use clap::{Parser, Subcommand};
use lift_core::periodization::current_block;
use lift_core::schema::parse_template_draft;
use lift_core::schedule::parse_start_date;
use lift_core::*;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "liftplan")]
#[command(about = "Strength plan scheduling and periodization engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply guardrails to a generator draft and print the adjusted template
    Guard {
        /// Template draft (JSON)
        #[arg(long)]
        template: PathBuf,

        /// User profile (JSON)
        #[arg(long)]
        profile: PathBuf,
    },

    /// Check a template against the guardrail rules without changing it
    Audit {
        /// Template (JSON)
        #[arg(long)]
        template: PathBuf,

        /// User profile (JSON)
        #[arg(long)]
        profile: PathBuf,
    },

    /// Guard, audit and expand a draft into a scheduled plan
    Generate {
        /// Template draft (JSON)
        #[arg(long)]
        template: PathBuf,

        /// User profile (JSON)
        #[arg(long)]
        profile: PathBuf,

        /// Owner of the plan
        #[arg(long, default_value = "local")]
        user: String,

        /// First day of the program (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Where to write the generated plan (JSON)
        #[arg(long)]
        out: PathBuf,

        /// Also write the calendar as CSV into the export directory
        #[arg(long)]
        export: bool,
    },

    /// Move a generated plan to a new start date
    Reschedule {
        /// Generated plan (JSON), rewritten in place unless --out is given
        #[arg(long)]
        plan: PathBuf,

        /// New start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the periodization framework for a program length
    Framework {
        #[arg(long)]
        weeks: u32,

        /// beginner or intermediate
        #[arg(long, default_value = "intermediate")]
        level: String,

        /// strength, balanced, hypertrophy or fat_loss
        #[arg(long, default_value = "balanced")]
        bias: String,

        /// Only print the block containing this week (1-based)
        #[arg(long)]
        week: Option<u32>,
    },

    /// Project weekly load and conditioning targets for a plan
    Project {
        /// Generated plan (JSON)
        #[arg(long)]
        plan: PathBuf,

        /// Logged weekly summaries (JSON array)
        #[arg(long)]
        logs: Option<PathBuf>,

        /// Also write the targets as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    lift_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    tracing::debug!("Export directory: {:?}", config.data.export_dir);

    let result = match cli.command {
        Commands::Guard { template, profile } => cmd_guard(&template, &profile, &config),
        Commands::Audit { template, profile } => cmd_audit(&template, &profile, &config),
        Commands::Generate {
            template,
            profile,
            user,
            start,
            out,
            export,
        } => cmd_generate(&template, &profile, user, start, &out, export, &config),
        Commands::Reschedule { plan, start, out } => {
            cmd_reschedule(&plan, &start, out.as_deref())
        }
        Commands::Framework {
            weeks,
            level,
            bias,
            week,
        } => cmd_framework(weeks, &level, &bias, week),
        Commands::Project { plan, logs, csv } => {
            cmd_project(&plan, logs.as_deref(), csv.as_deref(), &config)
        }
    };

    if let Err(e) = &result {
        if e.requires_regeneration() {
            eprintln!("Regeneration required: the input cannot be scheduled as given");
        }
    }
    result
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_catalog(config: &Config) -> Result<InMemoryCatalog> {
    let catalog = InMemoryCatalog::with_custom(&config.catalog.custom);
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Config("Invalid exercise catalog".into()));
    }
    Ok(catalog)
}

fn load_draft(path: &Path) -> Result<Template> {
    parse_template_draft(&std::fs::read_to_string(path)?)
}

fn cmd_guard(template: &Path, profile: &Path, config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    let profile: Profile = read_json(profile)?;
    let draft = load_draft(template)?;

    let outcome = apply_guardrails(
        draft,
        &GuardrailConstraints::from(&profile),
        &catalog,
        &config.guardrails,
    )?;
    print_json(&outcome)
}

fn cmd_audit(template: &Path, profile: &Path, config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    let profile: Profile = read_json(profile)?;
    let template = load_draft(template)?;

    let violations = validate_safety(
        &template,
        &GuardrailConstraints::from(&profile),
        &catalog,
        &config.guardrails,
    );
    print_json(&violations)?;

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::UnsafeTemplate(
            violations.iter().map(|v| v.to_string()).collect(),
        ))
    }
}

fn cmd_generate(
    template: &Path,
    profile: &Path,
    user: String,
    start: Option<String>,
    out: &Path,
    export: bool,
    config: &Config,
) -> Result<()> {
    let catalog = load_catalog(config)?;
    let profile: Profile = read_json(profile)?;
    let draft = load_draft(template)?;

    let mut request = PlanRequest::from_profile(user, &profile);
    request.start_date = start.as_deref().map(parse_start_date).transpose()?;

    let generated = generate_plan(&request, draft, &catalog, &config.guardrails)?;

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out, serde_json::to_string_pretty(&generated)?)?;

    println!("Plan {} written to {}", generated.plan.id, out.display());
    println!(
        "  {} weeks, {} sessions per week, {} sessions",
        generated.plan.duration_weeks,
        generated.plan.days_per_week,
        generated.instances.len()
    );
    for warning in &generated.warnings {
        println!("  ! {}", warning);
    }

    if export {
        if let Some(calendar) = &generated.plan.calendar {
            let path = config
                .data
                .export_dir
                .join(format!("calendar-{}.csv", generated.plan.id));
            lift_core::export::write_calendar_csv(calendar, &path)?;
            println!("Calendar exported to {}", path.display());
        }
    }

    Ok(())
}

fn cmd_reschedule(plan: &Path, start: &str, out: Option<&Path>) -> Result<()> {
    let mut generated: GeneratedPlan = read_json(plan)?;
    reschedule_plan(&mut generated, start)?;

    let target = out.unwrap_or(plan);
    std::fs::write(target, serde_json::to_string_pretty(&generated)?)?;

    let first = generated
        .instances
        .first()
        .and_then(|i| i.session_date)
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".into());
    println!(
        "Rescheduled {} sessions, first session on {}",
        generated.instances.len(),
        first
    );
    Ok(())
}

fn parse_level(level: &str) -> Result<ExperienceLevel> {
    match level.to_lowercase().as_str() {
        "beginner" => Ok(ExperienceLevel::Beginner),
        "intermediate" => Ok(ExperienceLevel::Intermediate),
        _ => Err(Error::Other(format!("Unknown experience level: {}", level))),
    }
}

fn parse_bias(bias: &str) -> Result<GoalBias> {
    match bias.to_lowercase().replace('-', "_").as_str() {
        "strength" => Ok(GoalBias::Strength),
        "balanced" => Ok(GoalBias::Balanced),
        "hypertrophy" => Ok(GoalBias::Hypertrophy),
        "fat_loss" => Ok(GoalBias::FatLoss),
        _ => Err(Error::Other(format!("Unknown goal bias: {}", bias))),
    }
}

fn cmd_framework(weeks: u32, level: &str, bias: &str, week: Option<u32>) -> Result<()> {
    let framework = generate_framework(weeks, parse_level(level)?, parse_bias(bias)?);

    match week {
        Some(week) => {
            let block = current_block(&framework, WeekNumber(week)).ok_or_else(|| {
                Error::Other(format!("Week {} is outside the {}-week program", week, weeks))
            })?;
            print_json(block)
        }
        None => print_json(&framework),
    }
}

fn cmd_project(
    plan: &Path,
    logs: Option<&Path>,
    csv: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let generated: GeneratedPlan = read_json(plan)?;
    let template = generated
        .plan
        .template
        .as_ref()
        .ok_or(Error::MissingTemplate)?;
    let logs: Vec<WeeklyLogSummary> = match logs {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };

    let targets = project_targets(
        template,
        &logs,
        generated.plan.duration_weeks,
        &config.progression,
    );

    if let Some(path) = csv {
        lift_core::export::write_targets_csv(&targets, path)?;
    }
    print_json(&targets)
}
