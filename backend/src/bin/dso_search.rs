//! DSO search command-line front-end.
//!
//! Runs one observability search and prints the darkness window diagnostic,
//! any per-object warnings and the selected objects as `;`-separated text.
//!
//! # Usage
//!
//! ```bash
//! # Defaults (or ./dso-finder.toml when present)
//! cargo run --bin dso-search
//!
//! # Explicit configuration file, plus the track of an arbitrary target
//! cargo run --bin dso-search -- my-site.toml --target "Vega" "18h36m56s" "+38d47m01s"
//!
//! # Full outcome as JSON for another front-end
//! cargo run --bin dso-search -- --json
//! ```
//!
//! # Environment Variables
//!
//! - `DSO_FINDER_CONFIG`: configuration file used when no path argument is given
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use dso_finder::config::SearchConfig;
use dso_finder::ephemeris::Almanac;
use dso_finder::services::astronomical_night::{resolve_utc_offset, zone_label};
use dso_finder::services::{export, run_search, trace_custom_target};
use dso_finder::SearchStatus;

/// Find deep-sky objects observable during tonight's astronomical darkness
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Search configuration file (TOML)
    #[arg(env = "DSO_FINDER_CONFIG")]
    config: Option<PathBuf>,

    /// Print the full search outcome as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Also trace an arbitrary target over the search grid
    #[arg(long, num_args = 3, value_names = ["NAME", "RA", "DEC"])]
    target: Option<Vec<String>>,
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<SearchConfig> {
    if let Some(path) = path {
        info!("Loading configuration from {}", path.display());
        return SearchConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.display()));
    }
    match SearchConfig::from_default_location() {
        Ok(config) => Ok(config),
        Err(e) => {
            info!("{e}; using built-in defaults");
            Ok(SearchConfig::default())
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config)?;
    let request = config.to_request(Utc::now())?;
    let offset = resolve_utc_offset(request.utc_offset_minutes);

    info!(
        "Searching from lat {:.4}, lon {:.4} ({})",
        request.location.latitude(),
        request.location.longitude(),
        zone_label(offset)
    );

    let almanac = Almanac::new();
    let outcome = run_search(&almanac, &request, &mut rand::thread_rng())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("{}", outcome.window.diagnostic);
    if let Some(moon) = outcome.moon_illumination {
        println!("Moon illumination: {:.0}%", moon * 100.0);
    }
    for warning in &outcome.warnings {
        warn!("{}: {}", warning.name, warning.message);
    }

    match outcome.status {
        SearchStatus::Found => {
            println!(
                "{} of {} observable objects:",
                outcome.records.len(),
                outcome.candidates
            );
            print!("{}", export::to_delimited(&outcome.records, offset)?);
        }
        SearchStatus::NoObjects => println!("No objects match the current filters."),
    }

    if let Some([name, ra, dec]) = args.target.as_deref() {
        let trace =
            trace_custom_target(&almanac, &request.location, &outcome.grid, name, ra, dec)?;
        println!(
            "{}: peak altitude {:.1}° at {} UTC",
            trace.name,
            trace.peak_altitude,
            trace.peak_time.to_datetime().format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}
