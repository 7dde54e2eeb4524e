//! Night planner command line.
//!
//! # Usage
//!
//! ```bash
//! telsched -t tfrm.toml -i objects.txt --date "21/06/2024 12:00"
//! telsched -t north.toml -t south.toml -i objects.txt --json
//! ```
//!
//! # Environment Variables
//!
//! - `SCHEDULER_CONFIG`: directory searched for telescope configurations
//! - `RUST_LOG`: Log level when `--verbose` is not given (default: warn)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use interval_cp::{BranchAndBound, SolverParams};
use telsched::config::TelescopeConfig;
use telsched::models::{ModifiedJulianDate, TelescopeId, TimeIndex};
use telsched::parsing::{load_catalog, CatalogDefaults};
use telsched::pipeline::{plan_night, PlanOptions};
use telsched::scheduler::{ExclusivityScope, ScheduleReport};
use telsched::services::{AstroEphemeris, HorizonMode, WindowPolicy};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, disable_version_flag = true)]
struct Args {
    /// Telescope configuration file; repeat for several telescopes.
    #[arg(short = 't', long = "telescope", required = true)]
    telescopes: Vec<PathBuf>,

    /// File with the objects to schedule.
    #[arg(short = 'i', long = "import-objects")]
    objects: PathBuf,

    /// Date of the observation, UTC ("dd/mm/yyyy hh:mm" or "dd/mm/yyyy").
    #[arg(short = 'd', long)]
    date: Option<String>,

    /// Print all logs.
    #[arg(long)]
    verbose: bool,

    /// Observation length, minutes, for objects without one.
    #[arg(long, default_value_t = telsched::parsing::catalog::DEFAULT_DURATION)]
    duration: TimeIndex,

    /// Horizon length, minutes, with --fixed-horizon or when no night is found.
    #[arg(long, default_value_t = telsched::models::MAX_STEPS)]
    max_steps: TimeIndex,

    /// Plan from the given date instead of from astronomical dusk.
    #[arg(long)]
    fixed_horizon: bool,

    /// Consider every visible run of an object, not only the first.
    #[arg(long)]
    all_windows: bool,

    /// Schedule at most one observation in total.
    #[arg(long)]
    global_exclusivity: bool,

    /// Solver wall-clock limit in seconds (0 = none).
    #[arg(long, default_value_t = 30.0)]
    time_limit: f64,

    /// Solver node limit (0 = none).
    #[arg(long, default_value_t = 0)]
    node_limit: u64,

    /// Print the schedule as JSON.
    #[arg(long)]
    json: bool,

    /// Print version information.
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: Option<bool>,
}

fn parse_date(text: &str) -> anyhow::Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%d/%m/%Y %H:%M") {
        return Ok(dt.and_utc());
    }
    // A bare date plans the night that starts on it.
    let date = NaiveDate::parse_from_str(text, "%d/%m/%Y")
        .with_context(|| format!("invalid date '{text}', expected dd/mm/yyyy [hh:mm]"))?;
    let noon = date
        .and_hms_opt(12, 0, 0)
        .with_context(|| format!("no noon on '{text}'"))?;
    Ok(noon.and_utc())
}

fn plan_options(args: &Args) -> anyhow::Result<PlanOptions> {
    if args.max_steps <= 0 {
        bail!("--max-steps must be positive");
    }
    let time_limit = Duration::try_from_secs_f64(args.time_limit).with_context(|| {
        format!(
            "--time-limit {} is not a usable number of seconds",
            args.time_limit
        )
    })?;

    Ok(PlanOptions {
        horizon: if args.fixed_horizon {
            HorizonMode::Fixed
        } else {
            HorizonMode::Night
        },
        max_steps: args.max_steps,
        windows: if args.all_windows {
            WindowPolicy::AllRuns
        } else {
            WindowPolicy::FirstOnly
        },
        exclusivity: if args.global_exclusivity {
            ExclusivityScope::Global
        } else {
            ExclusivityScope::PerTarget
        },
        solver: SolverParams::default()
            .with_time_limit(time_limit)
            .with_max_nodes(args.node_limit),
    })
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else {
        env::var("RUST_LOG")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Level::WARN)
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut telescopes = Vec::with_capacity(args.telescopes.len());
    for (index, path) in args.telescopes.iter().enumerate() {
        let config = TelescopeConfig::load(path)
            .with_context(|| format!("Telescope config {}", path.display()))?;
        telescopes.push(config.to_telescope(TelescopeId::new(index as i64 + 1)));
    }

    if args.duration <= 0 {
        bail!("--duration must be positive");
    }
    let options = plan_options(&args)?;
    let defaults = CatalogDefaults {
        duration: args.duration,
        ..CatalogDefaults::default()
    };
    let targets = load_catalog(&args.objects, &defaults)
        .with_context(|| format!("Objects file {}", args.objects.display()))?;

    let reference = match &args.date {
        Some(text) => parse_date(text)?,
        None => Utc::now(),
    };
    let reference_mjd = ModifiedJulianDate::from_datetime(reference);
    tracing::info!(
        "Date to schedule: {} ({})",
        reference.format("%d/%m/%Y %H:%M UTC"),
        reference_mjd
    );

    let ephemeris = AstroEphemeris::new();
    let plan = plan_night(
        &telescopes,
        &targets,
        reference_mjd,
        &ephemeris,
        &BranchAndBound,
        &options,
    )?;

    let report = ScheduleReport::new(&plan.result, &plan.observations, &plan.horizon);
    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    if !plan.result.has_solution() {
        println!("No solution was found");
    }
    print!("{}", report.render_text());
    println!();
    println!("Statistics");
    println!("  Candidate windows:    {}", plan.accepted.len());
    println!("  Termination:          {}", plan.result.termination);
    println!("{}", plan.result.statistics);

    Ok(())
}
