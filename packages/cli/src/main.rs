#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the traffic map.
//!
//! Loads the datasets named in the TOML configuration, applies any filter
//! bounds given on the command line and prints the result as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use traffic_map_crosses::CrossSelector;
use traffic_map_source::config::{CONFIG_ENV_VAR, DatasetConfig};
use traffic_map_source::parsing::parse_day_first_date;
use traffic_map_store::{FilterChange, GeoFilterStore, ViewObserver};

#[derive(Parser)]
#[command(name = "traffic_map", about = "UK accident and cross-location explorer")]
struct Cli {
    /// Dataset configuration file (falls back to `TRAFFIC_MAP_CONFIG`, then
    /// `traffic_map.toml`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default date bounds and the maximum casualty count
    Boundaries,
    /// Print the filtered accidents
    Accidents {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print per-severity counts of the filtered accidents
    Severity {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print every hospital in the plot CRS
    Hospitals,
    /// Select crosses starting near a pitch position and fit their ends
    Crosses {
        /// Query x (defaults to the configured value, else 80)
        #[arg(long)]
        x: Option<f64>,
        /// Query y (defaults to the configured value, else 9)
        #[arg(long)]
        y: Option<f64>,
        /// Search radius in pitch units (defaults to the configured value, else 3)
        #[arg(long)]
        radius: Option<f64>,
    },
}

/// Filter bounds; anything omitted keeps the store's default.
#[derive(Args)]
struct FilterArgs {
    /// Exclusive start date (DD/MM/YYYY)
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,
    /// Exclusive end date (DD/MM/YYYY)
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,
    /// Inclusive minimum casualty count
    #[arg(long)]
    min_casualties: Option<u32>,
    /// Exclusive maximum casualty count
    #[arg(long)]
    max_casualties: Option<u32>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    parse_day_first_date(s).ok_or_else(|| format!("invalid date {s:?}, expected DD/MM/YYYY"))
}

struct LogObserver;

impl ViewObserver for LogObserver {
    fn view_changed(&self, version: u64, change: FilterChange, filtered: usize) {
        log::info!("{change:?} updated (v{version}): {filtered} accidents in view");
    }
}

fn load_store(
    config: &DatasetConfig,
    filter: Option<&FilterArgs>,
) -> Result<GeoFilterStore, Box<dyn std::error::Error>> {
    let mut store = GeoFilterStore::load(config)?;
    store.subscribe(Arc::new(LogObserver));

    let Some(filter) = filter else {
        return Ok(store);
    };

    if filter.from.is_some() || filter.to.is_some() {
        let (start, end) = store.date_range();
        store.set_date_bounds(
            filter.from.map_or(start, |d| d.and_time(NaiveTime::MIN)),
            filter.to.map_or(end, |d| d.and_time(NaiveTime::MIN)),
        );
    }
    if filter.min_casualties.is_some() || filter.max_casualties.is_some() {
        let (low, high) = store.casualty_range();
        store.set_casualty_range(
            filter.min_casualties.unwrap_or(low),
            filter.max_casualties.unwrap_or(high),
        );
    }

    Ok(store)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config_path = DatasetConfig::locate(cli.config.as_deref());
    log::debug!(
        "Using configuration {} ({CONFIG_ENV_VAR} overrides the default)",
        config_path.display()
    );
    let config = DatasetConfig::from_file(&config_path)?;

    let output = match cli.command {
        Commands::Boundaries => {
            let store = load_store(&config, None)?;
            let (start, end) = store.boundary_dates();
            serde_json::json!({
                "start": start.format("%d/%m/%Y").to_string(),
                "end": end.format("%d/%m/%Y").to_string(),
                "max_casualties": store.max_casualties(),
            })
        }
        Commands::Accidents { filter } => {
            let store = load_store(&config, Some(&filter))?;
            serde_json::to_value(store.accident_view())?
        }
        Commands::Severity { filter } => {
            let store = load_store(&config, Some(&filter))?;
            serde_json::to_value(store.severity_counts())?
        }
        Commands::Hospitals => {
            let store = load_store(&config, None)?;
            serde_json::to_value(store.hospital_view())?
        }
        Commands::Crosses { x, y, radius } => {
            let crosses = config
                .crosses
                .as_ref()
                .ok_or("configuration has no [crosses] section")?;
            let selector = CrossSelector::load(&crosses.path)?;
            let point = (
                x.unwrap_or(crosses.query_x),
                y.unwrap_or(crosses.query_y),
            );
            let selection = selector.select(point, radius.unwrap_or(crosses.radius));
            match &selection.regression {
                Some(regression) => {
                    log::info!("{} crosses selected, {}", selection.len(), regression.label());
                }
                None => log::info!("{} crosses selected near {point:?}, no fit", selection.len()),
            }
            serde_json::to_value(selection)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
