//! CLI entry point for the QB Rater tool.
//!
//! Provides subcommands for rating every qualifying quarterback in a season of
//! play-by-play data, showing a single quarterback, and browsing the rankings
//! interactively.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use qb_rater::error::RatingError;
use qb_rater::fetch::read_source;
use qb_rater::images::ImageIndex;
use qb_rater::output::{render_table, to_json, write_csv};
use qb_rater::view::{DatasetVersion, QbCard, RatingCache, SortOrder, find, search, sorted};
use qb_rater::{RatingConfig, RatingTable, build_table, load_plays};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "qb_rater")]
#[command(about = "Rate NFL quarterbacks from a season of play-by-play data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    Highest,
    Lowest,
}

impl From<Order> for SortOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Highest => SortOrder::Highest,
            Order::Lowest => SortOrder::Lowest,
        }
    }
}

#[derive(clap::Args)]
struct DatasetArgs {
    /// Path or URL of a play-by-play CSV (optionally gzip-compressed)
    #[arg(value_name = "FILE_OR_URL")]
    source: String,

    /// Minimum qualifying plays for a quarterback to be rated
    #[arg(long, default_value_t = qb_rater::config::MIN_PLAYS)]
    min_plays: usize,

    /// Fail instead of substituting neutral values on degenerate data
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Season label; inferred from the source name when omitted
    #[arg(long)]
    season: Option<u16>,
}

impl DatasetArgs {
    fn config(&self) -> RatingConfig {
        let config = RatingConfig::default().with_min_plays(self.min_plays);
        if self.strict { config.strict() } else { config }
    }

    fn season(&self) -> Option<u16> {
        self.season.or_else(|| infer_season(&self.source))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rate every qualifying quarterback and print the rankings
    Rate {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Sort by rating
        #[arg(short, long, value_enum, default_value_t = Order::Highest)]
        order: Order,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },
    /// Show the rating card for one quarterback
    Show {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Quarterback name as it appears in the data (e.g. "P.Mahomes")
        #[arg(short, long)]
        qb: String,

        /// CSV (qb_name,image_url) of quarterback images, path or URL
        #[arg(long)]
        images: Option<String>,
    },
    /// Browse the rankings interactively from stdin
    Browse {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// CSV (qb_name,image_url) of quarterback images, path or URL
        #[arg(long)]
        images: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/qb_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("qb_rater.log"));

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

    match cli.command {
        Commands::Rate {
            dataset,
            order,
            format,
            output,
        } => {
            let bytes = read_source(&dataset.source)?;
            let Some(table) = no_data_as_none(compute(&bytes, dataset.season(), &dataset.config()))?
            else {
                return Ok(());
            };
            let rows = sorted(&table, order.into());

            let rendered = match format {
                Format::Table => render_table(&rows),
                Format::Json => to_json(&table)?,
                Format::Csv => {
                    let mut buf = Vec::new();
                    write_csv(&mut buf, &rows)?;
                    String::from_utf8(buf)?
                }
            };

            match output {
                Some(path) => {
                    let mut file = File::create(&path)
                        .with_context(|| format!("Failed to create output file {path}"))?;
                    file.write_all(rendered.as_bytes())?;
                    info!(path, rated = table.len(), "Ratings written");
                }
                None => print!("{rendered}"),
            }
        }
        Commands::Show {
            dataset,
            qb,
            images,
        } => {
            let bytes = read_source(&dataset.source)?;
            let Some(table) = no_data_as_none(compute(&bytes, dataset.season(), &dataset.config()))?
            else {
                return Ok(());
            };
            let images = load_images(images.as_deref());
            print_card(&table, &qb, images.as_ref());
        }
        Commands::Browse { dataset, images } => {
            let images = load_images(images.as_deref());
            browse(&dataset, images.as_ref())?;
        }
    }

    Ok(())
}

/// Parses plays and runs the rating pipeline over one dataset.
#[tracing::instrument(skip(bytes, config), fields(bytes = bytes.len()))]
fn compute(bytes: &[u8], season: Option<u16>, config: &RatingConfig) -> Result<RatingTable> {
    let loaded = load_plays(bytes).context("Failed to load play-by-play data")?;
    info!(rows = loaded.rows_read, "Plays loaded");
    Ok(build_table(&loaded.plays, season, config)?)
}

/// Turns the "no qualifying data" condition into a user-facing message.
fn no_data_as_none(result: Result<RatingTable>) -> Result<Option<RatingTable>> {
    match result {
        Ok(table) => Ok(Some(table)),
        Err(e) if e.downcast_ref::<RatingError>() == Some(&RatingError::InsufficientData) => {
            println!("No qualifying data: no quarterback reached the minimum play count.");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Image decoration is optional; failures only produce a warning.
fn load_images(source: Option<&str>) -> Option<ImageIndex> {
    let source = source?;
    let loaded = read_source(source)
        .map_err(anyhow::Error::from)
        .and_then(|bytes| Ok(ImageIndex::load(bytes.as_slice())?));
    match loaded {
        Ok(index) => Some(index),
        Err(e) => {
            warn!(source, error = %e, "Failed to load quarterback images");
            None
        }
    }
}

fn print_card(table: &RatingTable, name: &str, images: Option<&ImageIndex>) {
    if let Some(rating) = find(table, name) {
        println!("{}", QbCard::new(rating, images));
        return;
    }

    let matches = search(table, name);
    if matches.is_empty() {
        println!("No rated quarterback matches '{name}'.");
    } else {
        println!("No exact match for '{name}'. Did you mean:");
        for r in matches {
            println!("  {}", r.name());
        }
    }
}

const BROWSE_HELP: &str = "commands: search <text> | show <name> | sort highest|lowest | list | reload | help | quit";

/// Line-oriented rankings browser. `reload` re-reads the source and only
/// re-rates when its contents changed.
fn browse(dataset: &DatasetArgs, images: Option<&ImageIndex>) -> Result<()> {
    let config = dataset.config();
    let season = dataset.season();
    let mut cache = RatingCache::new();
    let mut order = SortOrder::default();

    let mut bytes = read_source(&dataset.source)?;
    let mut version = DatasetVersion::new(&bytes, season, &config);

    let stdin = std::io::stdin();
    println!("{BROWSE_HELP}");
    print!("> ");
    std::io::stdout().flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        let (command, arg) = line
            .trim()
            .split_once(' ')
            .map(|(c, a)| (c, a.trim()))
            .unwrap_or((line.trim(), ""));

        if command == "reload" {
            bytes = read_source(&dataset.source)?;
            version = DatasetVersion::new(&bytes, season, &config);
        }

        let table = match cache.get_or_build(version, || compute(&bytes, season, &config)) {
            Ok(table) => table,
            Err(e) if e.downcast_ref::<RatingError>() == Some(&RatingError::InsufficientData) => {
                println!("No qualifying data: no quarterback reached the minimum play count.");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        match command {
            "" => {}
            "quit" | "exit" => break,
            "help" => println!("{BROWSE_HELP}"),
            "reload" => println!("{} quarterbacks rated", table.len()),
            "list" => print!("{}", render_table(&sorted(table, order))),
            "sort" => match arg.parse::<SortOrder>() {
                Ok(o) => {
                    order = o;
                    println!("Sorted by rating, {order} first");
                    print!("{}", render_table(&sorted(table, order)));
                }
                Err(e) => println!("{e}"),
            },
            "search" => {
                for r in search(table, arg) {
                    println!("{:>4}  {}", r.rank, r.name());
                }
            }
            "show" => print_card(table, arg, images),
            other => println!("unknown command '{other}'; {BROWSE_HELP}"),
        }

        print!("> ");
        std::io::stdout().flush()?;
    }

    Ok(())
}

/// Picks a season year out of a source name such as `play_by_play_2024.csv.gz`.
fn infer_season(source: &str) -> Option<u16> {
    let name = Path::new(source).file_name()?.to_str()?;
    name.as_bytes().windows(4).find_map(|w| {
        std::str::from_utf8(w)
            .ok()?
            .parse::<u16>()
            .ok()
            .filter(|y| (1999..=2100).contains(y))
    })
}
