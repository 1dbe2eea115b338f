use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, TimeZone};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use time_reader::config::AppConfig;
use time_reader::models::{DurationResult, ParsedTime};
use time_reader::screen::{ScreenTextSource, StaticTextSource};
use time_reader::selection::TimeBoard;
use time_reader::TimeExtractor;

#[derive(Parser)]
#[command(name = "time-reader")]
#[command(about = "Extract times from screen text and compute durations")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./time-reader.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the screen text comes from.
#[derive(Args)]
struct InputArgs {
    /// Text to scan
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// File containing a screen text dump
    #[arg(long)]
    file: Option<PathBuf>,

    /// Base date for time-only notations (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the times found in a text dump (stdin if no --text/--file)
    Extract {
        #[command(flatten)]
        input: InputArgs,

        /// Print matches as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Duration between two times, e.g. `duration 9:30 下午2:30`
    Duration {
        start: String,
        end: String,

        /// Base date for time-only notations (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Print the multi-line breakdown
        #[arg(long)]
        detailed: bool,
    },

    /// Extract times, then total the durations of index pairs like `0-1 2-3`
    Pairs {
        #[command(flatten)]
        input: InputArgs,

        /// Index pairs START-END into the extracted list
        #[arg(required = true)]
        pairs: Vec<String>,

        /// Print the multi-line breakdown
        #[arg(long)]
        detailed: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;

    // Initialize tracing
    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting time-reader v{}", env!("CARGO_PKG_VERSION"));

    match config.extraction.fixed_offset()? {
        Some(offset) => {
            tracing::debug!("Resolving times at fixed offset {}", offset);
            run(cli.command, &config, TimeExtractor::with_timezone(offset))
        }
        None => run(cli.command, &config, TimeExtractor::local()),
    }
}

fn run<Tz: TimeZone>(
    command: Commands,
    config: &AppConfig,
    extractor: TimeExtractor<Tz>,
) -> Result<()> {
    match command {
        Commands::Extract { input, json } => {
            let base_date = resolve_base_date(input.date.as_deref(), config, &extractor)?;
            let text = read_input(&input)?;
            let found = extractor.extract(&text, base_date);

            if json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else if found.is_empty() {
                println!("No times found");
            } else {
                for (i, parsed) in found.iter().enumerate() {
                    print_parsed(i, parsed);
                }
            }
        }
        Commands::Duration {
            start,
            end,
            date,
            detailed,
        } => {
            let base_date = resolve_base_date(date.as_deref(), config, &extractor)?;
            let mut board = TimeBoard::new();
            board.add_manual(&extractor, &start, base_date)?;
            board.add_manual(&extractor, &end, base_date)?;

            let result = board.duration(0, 1)?;
            print_duration(&result, detailed || config.display.detailed);
        }
        Commands::Pairs {
            input,
            pairs,
            detailed,
        } => {
            let base_date = resolve_base_date(input.date.as_deref(), config, &extractor)?;
            let text = read_input(&input)?;
            let found = extractor.extract(&text, base_date);

            let mut board = TimeBoard::new();
            board.add_extracted(&found);
            for (i, tag) in board.tags().iter().enumerate() {
                println!("[{}] {}", i, tag.display_text);
            }

            let index_pairs = pairs
                .iter()
                .map(|p| parse_pair(p))
                .collect::<Result<Vec<_>>>()?;
            let summary = board.summarize(&index_pairs)?;

            println!();
            for ((start, end), group) in index_pairs.iter().zip(&summary.groups) {
                println!("{} -> {}: {}", start, end, group.short_text);
            }
            println!();
            println!("=== Total ===");
            print_duration(&summary.total, detailed || config.display.detailed);
        }
    }

    Ok(())
}

fn resolve_base_date<Tz: TimeZone>(
    arg: Option<&str>,
    config: &AppConfig,
    extractor: &TimeExtractor<Tz>,
) -> Result<NaiveDate> {
    if let Some(date) = arg {
        return NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid --date (expected YYYY-MM-DD): {}", date));
    }
    Ok(config
        .extraction
        .base_date()?
        .unwrap_or_else(|| extractor.today()))
}

fn read_input(input: &InputArgs) -> Result<String> {
    let source: Box<dyn ScreenTextSource> = match (&input.text, &input.file) {
        (Some(text), _) => Box::new(StaticTextSource::new(text.clone())),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            Box::new(StaticTextSource::new(text))
        }
        (None, None) => Box::new(StaticTextSource::from_reader(std::io::stdin().lock())?),
    };

    tracing::debug!("Reading text from {} source", source.name());
    Ok(source.read_screen_text()?)
}

/// Parse `START-END` into tag indices.
fn parse_pair(s: &str) -> Result<(usize, usize)> {
    let Some((start, end)) = s.split_once('-') else {
        bail!("Invalid pair {:?} (expected START-END, e.g. 0-1)", s);
    };
    let start = start
        .trim()
        .parse()
        .with_context(|| format!("Invalid start index in {:?}", s))?;
    let end = end
        .trim()
        .parse()
        .with_context(|| format!("Invalid end index in {:?}", s))?;
    Ok((start, end))
}

fn print_parsed(index: usize, parsed: &ParsedTime) {
    println!(
        "[{}] {:>3}..{:<3} {:<18} {}",
        index,
        parsed.source_range.start,
        parsed.source_range.end,
        parsed.display_text,
        parsed.notation
    );
}

fn print_duration(result: &DurationResult, detailed: bool) {
    if detailed {
        println!("{}", result.detailed_text);
    } else {
        println!("{}", result.short_text);
    }
}
