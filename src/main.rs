use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};
use tracing::{debug, error};

use brainrs::baseline::BaselineGenerator;
use brainrs::boost::combined_boost;
use brainrs::chart::{ChartData, ChartShaper};
use brainrs::config::{AppConfig, SETTABLE_KEYS};
use brainrs::error::{BrainRsError, ExportError};
use brainrs::export::{self, ExportFormat};
use brainrs::logging::{init_logging, LogLevel};
use brainrs::models::{DailyTimeline, PhaseLabel, Schedule, WorkoutEvent};
use brainrs::phase::classify_phase;
use brainrs::session::{count_peak_moments, PEAK_LRI_THRESHOLD};
use brainrs::source::source_from_settings;
use brainrs::timefmt;

/// BrainRS - Cognitive Readiness Timeline CLI
///
/// Models how alert you are across the day from your wake/sleep schedule
/// and workouts, and shapes measured sessions into chart-ready data.
#[derive(Parser)]
#[command(name = "brainrs")]
#[command(author = "BrainRS Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Cognitive Readiness Timeline CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the 24h readiness baseline for a schedule
    Baseline {
        /// Wake time (6.5 or 06:30), defaults to the configured schedule
        #[arg(short, long, value_parser = timefmt::parse_hour)]
        wake: Option<f64>,

        /// Sleep time (22 or 22:00), defaults to the configured schedule
        #[arg(short, long, value_parser = timefmt::parse_hour)]
        sleep: Option<f64>,

        /// Workout start and optional duration, e.g. 07:15,32 (repeatable)
        #[arg(long = "workout", value_name = "HOUR[,MIN]")]
        workouts: Vec<WorkoutEvent>,

        /// Reject invalid schedules and workouts instead of computing anyway
        #[arg(long)]
        strict: bool,

        /// Output format (table, json)
        #[arg(short = 'f', long, default_value = "table")]
        format: String,
    },

    /// Show the circadian phase for a time of day
    Phase {
        /// Time of day (14.5 or 14:30)
        #[arg(short, long, value_parser = timefmt::parse_hour)]
        at: f64,

        /// Wake time, defaults to the configured schedule
        #[arg(short, long, value_parser = timefmt::parse_hour)]
        wake: Option<f64>,
    },

    /// Load the daily timeline and shape it for display or export
    Timeline {
        /// Recompute the baseline from the timeline's schedule and workouts
        #[arg(short, long)]
        recompute: bool,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format (json, csv, svg); guessed from the output extension
        #[arg(short = 'f', long)]
        format: Option<String>,
    },

    /// Show the session context of the configured data source
    Context,

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Set a configuration value (KEY=VALUE)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a configuration value
        #[arg(short, long)]
        get: Option<String>,

        /// Write a default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Tabled)]
struct BaselineRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Readiness")]
    readiness: String,
    #[tabled(rename = "Phase")]
    phase: String,
    #[tabled(rename = "Boost")]
    boost: String,
}

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Event")]
    event: String,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        match e.downcast_ref::<BrainRsError>() {
            Some(app_error) => {
                error!(severity = ?app_error.severity(), error = %app_error, "Command failed");
                eprintln!("{} {}", "Error:".red().bold(), app_error.user_message());
                if app_error.is_retryable() {
                    eprintln!("{}", "This may be temporary, try again.".dimmed());
                }
            }
            None => eprintln!("{} {:#}", "Error:".red().bold(), e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_config_path);
    let mut config = AppConfig::load_or_default_at(&config_path)?;

    let mut log_config = config.logging.clone();
    log_config.level = LogLevel::from_verbosity(log_config.level, cli.verbose);
    init_logging(&log_config)?;

    if cli.verbose > 0 {
        eprintln!("{}", format!("Log level: {}", log_config.level.to_filter()).dimmed());
    }

    match cli.command {
        Commands::Baseline {
            wake,
            sleep,
            workouts,
            strict,
            format,
        } => {
            let schedule = Schedule {
                wake_hour: wake.unwrap_or(config.schedule.wake_hour),
                sleep_hour: sleep.unwrap_or(config.schedule.sleep_hour),
            };
            show_baseline(&config, schedule, &workouts, strict, &format)?;
        }

        Commands::Phase { at, wake } => {
            let wake_hour = wake.unwrap_or(config.schedule.wake_hour);
            let phase = classify_phase(at, wake_hour);
            println!(
                "{} {}",
                timefmt::hour_to_clock_string(at).bold(),
                paint_phase(phase)
            );
            println!("  {}", phase.description());
            let since_wake = format!(
                "{:.2}h since wake at {}",
                at - wake_hour,
                timefmt::hour_to_clock_string(wake_hour)
            );
            println!("  {}", since_wake.dimmed());
        }

        Commands::Timeline {
            recompute,
            output,
            format,
        } => {
            let source = source_from_settings(&config.data);
            debug!(source = %source.name(), "Loading daily timeline");
            let mut timeline = source.daily_timeline()?;

            if recompute {
                let schedule = timeline.schedule_or(config.schedule);
                let workouts = timeline.workout_events();
                timeline = timeline.with_computed_baseline(schedule, &workouts);
            }

            let chart = ChartShaper::new(config.chart.clone()).shape_timeline(&timeline);

            match output {
                Some(path) => {
                    let format = match format {
                        Some(f) => f.parse::<ExportFormat>()?,
                        None => ExportFormat::from_path(&path).unwrap_or(ExportFormat::Json),
                    };
                    println!("{}", "Exporting timeline...".yellow().bold());
                    export::export_timeline(&timeline, &chart, &config.chart, format, &path)?;
                    println!("{} {}", "✓ Written to".yellow(), path.display());
                }
                None => show_timeline(&timeline, &chart),
            }
        }

        Commands::Context => {
            let source = source_from_settings(&config.data);
            let context = source.session_context()?;

            println!("{}", "Session context".cyan().bold());
            println!(
                "  Time:     {} - {} ({} min)",
                context.session_time.start,
                context.session_time.end,
                context.session_time.duration_minutes
            );
            println!("  Phase:    {}", paint_phase(context.context.circadian_phase));
            if let Some(workout) = &context.context.workout_type {
                println!("  Workout:  {}", workout);
            }
            if let Some(timing) = context.timing_context() {
                println!("  Timing:   {}", timing.green());
            }
            println!("  Boost:    {}", context.boost_tier().description());
            println!("  Peaks:    {}", context.performance.peak_moments);
            if let Some(flow) = context.performance.flow_minutes {
                println!("  Flow:     {} min", flow);
            }
        }

        Commands::Config {
            list,
            set,
            get,
            init,
        } => {
            if init {
                if config_path.exists() {
                    anyhow::bail!("Config file already exists: {}", config_path.display());
                }
                AppConfig::default().save_to_file(&config_path)?;
                println!("{} {}", "✓ Created".green(), config_path.display());
            } else if let Some(key_value) = set {
                let (key, value) = key_value
                    .split_once('=')
                    .with_context(|| format!("Expected KEY=VALUE, got {}", key_value))?;
                config.set_value(key.trim(), value.trim())?;
                config.save_to_file(&config_path)?;
                println!("{} {} = {}", "✓ Set".green(), key.trim(), value.trim());
            } else if let Some(key) = get {
                println!("{}", config.get_value(&key)?);
            } else if list {
                println!("{}", format!("Configuration ({})", config_path.display()).bold());
                for key in SETTABLE_KEYS {
                    println!("  {} = {}", key, config.get_value(key)?);
                }
            } else {
                println!("Nothing to do. Try --list, --get KEY or --set KEY=VALUE.");
            }
        }
    }

    Ok(())
}

fn show_baseline(
    config: &AppConfig,
    schedule: Schedule,
    workouts: &[WorkoutEvent],
    strict: bool,
    format: &str,
) -> Result<()> {
    if strict {
        schedule.validate().map_err(BrainRsError::from)?;
        for workout in workouts {
            workout.validate().map_err(BrainRsError::from)?;
        }
    }

    let series = BaselineGenerator::with_config(config.baseline.clone())
        .map_err(anyhow::Error::msg)?
        .generate(&schedule, workouts);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&series)?),
        "table" => {
            let shaper = ChartShaper::new(config.chart.clone());
            let rows: Vec<BaselineRow> = shaper
                .baseline_ticks(series.values())
                .into_iter()
                .map(|tick| BaselineRow {
                    time: tick.label,
                    readiness: format!("{:.1}", tick.value),
                    phase: classify_phase(tick.hour, schedule.wake_hour).as_str().to_string(),
                    boost: format!("x{:.2}", combined_boost(tick.hour, workouts)),
                })
                .collect();

            println!(
                "{}",
                format!(
                    "Readiness baseline (wake {}, sleep {})",
                    timefmt::hour_to_clock_string(schedule.wake_hour),
                    timefmt::hour_to_clock_string(schedule.sleep_hour)
                )
                .blue()
                .bold()
            );
            println!("{}", Table::new(rows).with(Style::rounded()));

            if let Some((hour, value)) = series.peak() {
                println!(
                    "Peak readiness {} at {}",
                    format!("{:.1}", value).green().bold(),
                    timefmt::hour_to_clock_string(hour)
                );
            }
        }
        other => return Err(ExportError::UnsupportedFormat(other.to_string()).into()),
    }

    Ok(())
}

fn show_timeline(timeline: &DailyTimeline, chart: &ChartData) {
    let title = match timeline.date {
        Some(date) => format!("Daily timeline {}", date),
        None => "Daily timeline".to_string(),
    };
    println!("{}", title.magenta().bold());

    let ticks = chart
        .baseline_ticks
        .iter()
        .map(|t| format!("{} {:.0}", t.label, t.value))
        .collect::<Vec<_>>()
        .join("  ");
    println!("  Baseline: {}", ticks);

    if let Some(peak) = timeline.measured_session.peak() {
        println!(
            "  Session:  {} - {}, peak {} at {}",
            timefmt::hour_to_clock_string(timeline.measured_session.start_hour),
            timefmt::hour_to_clock_string(timeline.measured_session.end_hour),
            format!("{:.0}", peak.lri).green().bold(),
            timefmt::hour_to_clock_string(peak.hour)
        );
    }

    let moments = count_peak_moments(&timeline.measured_session.lri_values, PEAK_LRI_THRESHOLD);
    println!(
        "  Moments:  {} samples above LRI {:.0}",
        moments, PEAK_LRI_THRESHOLD
    );

    for marker in &chart.peak_markers {
        println!(
            "  Peak:     {} LRI {:.0}",
            timefmt::hour_to_clock_string(marker.hour),
            marker.lri
        );
    }

    if !chart.event_markers.is_empty() {
        let rows: Vec<EventRow> = chart
            .event_markers
            .iter()
            .map(|m| EventRow {
                time: m.time_label.clone(),
                event: format!("{} {}", m.icon, m.label),
            })
            .collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
    }
}

fn paint_phase(phase: PhaseLabel) -> ColoredString {
    match phase {
        PhaseLabel::MorningPeak => phase.as_str().green().bold(),
        PhaseLabel::AfternoonDip => phase.as_str().yellow().bold(),
        PhaseLabel::EveningPeak => phase.as_str().cyan().bold(),
        PhaseLabel::Sleep => phase.as_str().blue().bold(),
    }
}
