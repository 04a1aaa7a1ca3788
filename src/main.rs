//! CLI entry point for the holiday-week passenger analysis.
//!
//! Provides subcommands for running the full analysis over a daily CSV and
//! for inspecting the holiday anchors and week windows a configuration
//! produces.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use holiday_weeks::analyzers::analyzer::analyze;
use holiday_weeks::analyzers::calendar_week::iso_week_of;
use holiday_weeks::config::Settings;
use holiday_weeks::holidays::WeekWindowResolver;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "holiday_weeks")]
#[command(about = "Holiday-aligned weekly passenger averages", long_about = None)]
struct Cli {
    /// JSON settings file (falls back to $HOLIDAY_CONFIG, then built-in holidays)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign daily records to holiday weeks and write averages and views
    Analyze {
        /// Daily CSV with `date` and `passengers`/`passenger_count` columns
        #[arg(short, long, default_value = "tsa_raw_data.csv")]
        input: PathBuf,

        /// Directory for the output tables
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,
    },
    /// List the week window of every holiday for a range of years
    Windows {
        #[arg(long)]
        from: i32,

        /// Last year (defaults to --from)
        #[arg(long)]
        to: Option<i32>,
    },
    /// List each holiday's anchor date in a year
    Holidays {
        #[arg(short, long)]
        year: i32,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/holiday_weeks.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("holiday_weeks.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.config)?;

    match cli.command {
        Commands::Analyze { input, output_dir } => {
            analyze(&input, &output_dir, &settings)
                .with_context(|| format!("analysis of '{}' failed", input.display()))?;
        }
        Commands::Windows { from, to } => {
            let to = to.unwrap_or(from);
            if to < from {
                anyhow::bail!("--to {to} is before --from {from}");
            }
            let resolver = WeekWindowResolver::new(&settings.calendar);
            let windows = resolver.windows_for_years(from..=to)?;

            for w in &windows {
                let iso = iso_week_of(w.start);
                info!(
                    holiday = %w.holiday,
                    year = w.year,
                    anchor = %w.anchor,
                    start = %w.start,
                    end = %w.end,
                    iso_year = iso.iso_year,
                    iso_week = iso.week,
                    "Window"
                );
            }
            info!(total = windows.len(), from, to, "Window list complete");
        }
        Commands::Holidays { year } => {
            let calendar = &settings.calendar;
            for (holiday, anchor) in calendar.anchors(year)? {
                info!(%holiday, %anchor, weekday = %anchor.format("%A"), "Holiday");
            }
            // Derived holidays are defined by their week alone.
            let resolver = WeekWindowResolver::new(calendar);
            for holiday in calendar.holidays().filter(|h| calendar.is_derived(*h)) {
                let window = resolver.window_for(holiday, year)?;
                info!(%holiday, start = %window.start, end = %window.end, "Derived holiday week");
            }
        }
    }

    Ok(())
}

/// Reads settings from `--config`, then `$HOLIDAY_CONFIG`, else the built-in holiday set.
fn load_settings(config: Option<PathBuf>) -> Result<Settings> {
    let path = config.or_else(|| std::env::var_os("HOLIDAY_CONFIG").map(PathBuf::from));
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Using settings file");
            Settings::load(&path)
                .with_context(|| format!("failed to load settings from '{}'", path.display()))
        }
        None => Ok(Settings::default()),
    }
}
