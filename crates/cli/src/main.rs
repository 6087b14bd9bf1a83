//! Evermore CLI - relationship rituals, progress and history.

use anyhow::{Context, Result};
use chrono::{FixedOffset, Utc};
use clap::{Parser, Subcommand};
use evermore_calendar::{month_grid, weeks, CalendarAggregator, CalendarService, CalendarView, GridDay, MonthSummary};
use evermore_core::{ActivityKind, CoupleId, Error, EvermoreConfig, ProgressState};
use evermore_progress::{ActivityCompletionController, ProgressEngine};
use evermore_storage::{JsonStorage, Storage};
use tracing::info;
use tracing_subscriber::EnvFilter;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

#[derive(Parser)]
#[command(name = "evermore")]
#[command(about = "Nurturing love through action", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file
    #[arg(short, long, default_value = "evermore.json")]
    config: std::path::PathBuf,

    /// Couple id (overrides the configured one)
    #[arg(long)]
    couple: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a couple id and save it to the configuration
    Init,
    /// Show progress, growth, streak and activities
    Status,
    /// Mark an activity complete
    Complete {
        /// dailyRitual, weeklyGesture or monthlyBigGesture
        kind: String,
    },
    /// Summarize a month of history
    Calendar {
        /// Year
        year: i32,
        /// Month (1-12)
        month: u32,
    },
    /// List activities completed on a day
    Day {
        /// Year
        year: i32,
        /// Month (1-12)
        month: u32,
        /// Day of month
        day: u32,
    },
    /// Print a month as a six-week heatmap grid
    Grid {
        /// Year
        year: i32,
        /// Month (1-12)
        month: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = EvermoreConfig::load(&cli.config)?;
    let offset = config.local_offset()?;

    match cli.command {
        Commands::Init => init(&cli.config, &mut config)?,
        Commands::Status => {
            let couple = resolve_couple(cli.couple, &config)?;
            let controller = ActivityCompletionController::new(
                open_storage(&config).await?,
                ProgressEngine::new(config.activity_catalog()?),
            )
            .with_offset(offset);
            let state = controller.load(&couple).await?;
            print_status(&controller, &couple, &state);
        }
        Commands::Complete { kind } => {
            let couple = resolve_couple(cli.couple, &config)?;
            let kind: ActivityKind = kind.parse()?;
            let mut controller = ActivityCompletionController::new(
                open_storage(&config).await?,
                ProgressEngine::new(config.activity_catalog()?),
            )
            .with_offset(offset);
            match controller.complete(&couple, kind).await {
                Ok(state) => {
                    let title = &controller.engine().catalog().lookup(kind)?.title;
                    println!("Completed: {}", title);
                    print_status(&controller, &couple, &state);
                }
                Err(Error::AlreadyCompleted(kind)) => {
                    println!("{} is already completed.", kind.label());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Calendar { year, month } => {
            let couple = resolve_couple(cli.couple, &config)?;
            let service = CalendarService::new(open_storage(&config).await?, CalendarAggregator::new(offset));
            match service.month_view(&couple, year, month).await? {
                CalendarView::Loaded(summary) => {
                    println!(
                        "{} {} - {} activities completed",
                        month_name(month), year, summary.total_count
                    );
                    println!(
                        "  Active days: {} | Consistency: {}%",
                        summary.active_days(),
                        summary.consistency_percent()
                    );
                    for (key, events) in &summary.density_by_date {
                        let date = evermore_core::parse_date_key(key)?;
                        let kinds: Vec<&str> = summary
                            .kinds_on(date)
                            .iter()
                            .map(|k| k.label())
                            .collect();
                        println!(
                            "  {} | {} | intensity {} | {}",
                            key,
                            events.len(),
                            summary.intensity_on(date),
                            kinds.join(", ")
                        );
                    }
                    if summary.skipped > 0 {
                        println!("  ({} unreadable entries skipped)", summary.skipped);
                    }
                }
                CalendarView::Unavailable { reason } => {
                    println!("Couldn't load your journey: {}", reason);
                }
            }
        }
        Commands::Day { year, month, day } => {
            let couple = resolve_couple(cli.couple, &config)?;
            let service = CalendarService::new(open_storage(&config).await?, CalendarAggregator::new(offset));
            match service.day_view(&couple, year, month, day).await? {
                CalendarView::Loaded(summary) => {
                    println!("{} - {} activities", summary.date_key(), summary.count);
                    for event in &summary.events {
                        let time = event
                            .local_time(offset)
                            .map(|t| t.format("%H:%M").to_string())
                            .unwrap_or_else(|_| "--:--".to_string());
                        println!("  {} | {} | {}", time, event.kind.label(), event.title);
                    }
                }
                CalendarView::Unavailable { reason } => {
                    println!("Couldn't load this day: {}", reason);
                }
            }
        }
        Commands::Grid { year, month } => {
            let today = Utc::now().with_timezone(&offset).date_naive();
            let grid = month_grid(year, month, today)?;
            let couple = resolve_couple(cli.couple, &config)?;
            let service = CalendarService::new(open_storage(&config).await?, CalendarAggregator::new(offset));
            let view = service.month_view(&couple, year, month).await?;
            print_grid(year, month, &grid, &view, offset);
        }
    }

    Ok(())
}

fn resolve_couple(flag: Option<String>, config: &EvermoreConfig) -> Result<CoupleId> {
    flag.map(CoupleId::new)
        .or_else(|| config.couple_id.clone())
        .context("No couple id: run `evermore init` or pass --couple")
}

async fn open_storage(config: &EvermoreConfig) -> Result<JsonStorage> {
    JsonStorage::new(&config.storage_path)
        .await
        .with_context(|| format!("opening storage at {}", config.storage_path.display()))
}

fn init(path: &std::path::Path, config: &mut EvermoreConfig) -> Result<()> {
    if let Some(existing) = &config.couple_id {
        println!("Already initialized: {}", existing);
        return Ok(());
    }

    let couple = CoupleId::generate();
    config.couple_id = Some(couple.clone());
    std::fs::write(path, serde_json::to_string_pretty(config)?)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote configuration to {}", path.display());
    println!("Created couple: {}", couple);
    Ok(())
}

fn print_status<S: Storage>(
    controller: &ActivityCompletionController<S>,
    couple: &CoupleId,
    state: &ProgressState,
) {
    println!("Evermore - {}", couple);
    println!("  Day {} of your Connection Streak", state.streak_days);
    println!("  Tree growth:   {:>5.1}%", state.tree_growth);
    println!("  Communication: {:>5.1}%", state.metrics.communication);
    println!("  Intimacy:      {:>5.1}%", state.metrics.intimacy);
    println!("  Trust:         {:>5.1}%", state.metrics.trust);
    println!("Activities");
    for definition in controller.engine().catalog().definitions() {
        let mark = if state.is_completed(definition.kind) { "x" } else { " " };
        println!(
            "  [{}] {} - {}",
            mark,
            definition.kind.label(),
            definition.title
        );
    }
}

fn print_grid(
    year: i32,
    month: u32,
    grid: &[GridDay],
    view: &CalendarView<MonthSummary>,
    offset: FixedOffset,
) {
    println!("{} {} (UTC{})", month_name(month), year, offset);
    println!(" Sun  Mon  Tue  Wed  Thu  Fri  Sat");
    for week in weeks(grid) {
        let row: Vec<String> = week
            .iter()
            .map(|cell| {
                if !cell.in_month {
                    return "  . ".to_string();
                }
                let tier = view.loaded().map(|s| s.intensity_on(cell.date)).unwrap_or(0);
                let marker = if cell.is_today { '*' } else { ' ' };
                format!("{}{}{}", marker, cell.date.format("%d"), tier)
            })
            .collect();
        println!("{}", row.join(" "));
    }
    if let CalendarView::Unavailable { reason } = view {
        println!("History unavailable ({}); showing empty heatmap.", reason);
    }
}

fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("?")
}
