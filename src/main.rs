// Leave Planner
// Main entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};

use leave_planner::models::event::EventDraft;
use leave_planner::models::leave::LeaveKind;
use leave_planner::models::settings::TOTAL_LEAVES_KEY;
use leave_planner::services::config::{AppConfig, Backend};
use leave_planner::services::coordinator::{Coordinator, DaySummary};
use leave_planner::services::day_index::SpanPosition;
use leave_planner::services::store::{CalendarStore, HttpStore, SqliteStore};
use leave_planner::utils::date::{format_date, normalize_range, year_bounds, DateRange};

/// Yearly leave and activity planner
#[derive(Parser)]
#[command(name = "leave-planner", version = env!("CARGO_PKG_VERSION"), long_about = None)]
struct Cli {
    /// Use this config file instead of the platform default
    #[arg(global = true, long = "config")]
    config: Option<PathBuf>,

    /// Year to work on (defaults to the current year)
    #[arg(global = true, long = "year")]
    year: Option<i32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every day with events, activities or leave, and the leave balance
    Show,

    /// Toggle leave on a day (same kind again clears it)
    Leave {
        date: NaiveDate,
        #[arg(default_value = "full")]
        kind: LeaveKind,
    },

    /// Add an event, optionally spanning several days
    Event {
        date: NaiveDate,
        #[arg(long = "until")]
        until: Option<NaiveDate>,
        title: String,
    },

    /// Stamp an activity on a day or a range
    Place {
        activity_id: String,
        date: NaiveDate,
        #[arg(long = "until")]
        until: Option<NaiveDate>,
    },

    /// List activity definitions
    Activities,

    /// Set the yearly leave quota
    Quota { total: u32 },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(dispatch(cli, config))
}

async fn dispatch(cli: Cli, config: AppConfig) -> Result<()> {
    let year = cli.year.unwrap_or_else(|| Local::now().year());

    match config.backend {
        Backend::Sqlite => {
            let path = PathBuf::from(&config.database_path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let store = SqliteStore::open(&config.database_path)?;
            run(Coordinator::new(store), &config, year, cli.command).await
        }
        Backend::Http => {
            let store = HttpStore::new(config.require_api_base_url()?, config.api_token.clone())?;
            run(Coordinator::new(store), &config, year, cli.command).await
        }
    }
}

async fn run<S: CalendarStore>(
    coordinator: Coordinator<S>,
    config: &AppConfig,
    year: i32,
    command: Commands,
) -> Result<()> {
    coordinator.load_year(year).await?;

    let has_quota = coordinator.state().settings.get(TOTAL_LEAVES_KEY).is_some();
    if !has_quota {
        coordinator
            .set_total_leaves(config.default_total_leaves)
            .await?;
    }

    let result = execute(&coordinator, command).await;
    if let Err(e) = &result {
        log::error!("Command failed: {}", e);
    }
    result
}

async fn execute<S: CalendarStore>(coordinator: &Coordinator<S>, command: Commands) -> Result<()> {
    match command {
        Commands::Show => print_year(coordinator),
        Commands::Leave { date, kind } => {
            match coordinator.toggle_leave(date, kind).await? {
                Some(leave) => println!("{}: {} leave", format_date(date), leave.kind),
                None => println!("{}: leave cleared", format_date(date)),
            }
            print_balance(coordinator);
        }
        Commands::Event { date, until, title } => {
            let range = normalize_range(date, until.unwrap_or(date));
            let event = coordinator
                .add_event(EventDraft::new(title, date).with_range(range))
                .await?;
            println!("Created event #{} on {}", event.id, describe_range(range));
        }
        Commands::Place {
            activity_id,
            date,
            until,
        } => {
            let range = normalize_range(date, until.unwrap_or(date));
            let placement = coordinator.place_activity(&activity_id, range).await?;
            println!(
                "Placed {} (#{}) on {}",
                placement.activity_id,
                placement.id,
                describe_range(placement.range())
            );
        }
        Commands::Activities => {
            let state = coordinator.state();
            for activity in &state.activities {
                let hidden = if activity.is_hidden { " (hidden)" } else { "" };
                println!("{:<28} {} {}{}", activity.id, activity.color, activity.name, hidden);
            }
        }
        Commands::Quota { total } => {
            let total = coordinator.set_total_leaves(total).await?;
            println!("Leave quota set to {}", total);
            print_balance(coordinator);
        }
    }
    Ok(())
}

fn describe_range(range: DateRange) -> String {
    match range.end_date() {
        Some(end) => format!("{} .. {}", format_date(range.start), format_date(end)),
        None => format_date(range.start),
    }
}

fn print_balance<S: CalendarStore>(coordinator: &Coordinator<S>) {
    let total = coordinator.state().settings.total_leaves();
    println!(
        "Leave used {} / {}, remaining {}",
        coordinator.leave_count(),
        total,
        coordinator.leave_balance()
    );
}

fn print_year<S: CalendarStore>(coordinator: &Coordinator<S>) {
    let year = coordinator.state().year;
    println!("{}", year);

    if let Some((first, last)) = year_bounds(year) {
        let mut month = 0;
        for date in first.iter_days().take_while(|d| *d <= last) {
            let summary = coordinator.day_summary(date);
            if is_empty_day(&summary) {
                continue;
            }
            if date.month() != month {
                month = date.month();
                println!("\n{}", date.format("%B"));
            }
            println!("  {}", describe_day(&summary));
        }
    }

    println!();
    print_balance(coordinator);
}

fn is_empty_day(summary: &DaySummary) -> bool {
    summary.events.is_empty() && summary.activities.is_empty() && summary.leave.is_none()
}

fn describe_day(summary: &DaySummary) -> String {
    let mut parts = vec![format_date(summary.date)];

    if let Some(kind) = summary.leave {
        parts.push(format!("leave:{}", kind));
    }
    for view in &summary.activities {
        let marker = match view.span {
            SpanPosition::Single => "",
            SpanPosition::Start => " >",
            SpanPosition::Middle => " ~",
            SpanPosition::End => " <",
        };
        if view.placement.has_details() {
            let title = view.placement.title.as_deref().unwrap_or("...");
            parts.push(format!("[{}{}: {}]", view.activity.name, marker, title));
        } else {
            parts.push(format!("[{}{}]", view.activity.name, marker));
        }
    }
    for event in &summary.events {
        match &event.time {
            Some(time) => parts.push(format!("{} {}", time, event.title)),
            None => parts.push(event.title.clone()),
        }
    }

    parts.join("  ")
}
