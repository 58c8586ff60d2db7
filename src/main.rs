//! Streamflow Comparison Chart
//!
//! Fetches daily discharge for a USGS sensor across the current year and
//! the nine prior years, aligns everything onto a common day-offset axis
//! around the anchor date, and renders a chart comparing the current year
//! against the historical range with notable years called out.
//!
//! Usage:
//!   cargo run --release                              # today, Trinity River defaults
//!   cargo run --release -- -d 2023-04-01 -s 11527000 # explicit anchor and sensor
//!
//! Environment:
//!   RUST_LOG - log filter for diagnostic output (e.g. RUST_LOG=info)

use clap::Parser;

use flowcast::config::{Cli, RunConfig};
use flowcast::ingest::NwisFetcher;
use flowcast::plot::PngPlotter;
use flowcast::run::run;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let config = match RunConfig::from_cli(cli, chrono::Local::now().date_naive()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    println!("🌊 Streamflow Comparison");
    println!("========================\n");
    println!(
        "Acquiring data for {} (sensor {}) with anchor date {}\n",
        config.river_name, config.sensor, config.anchor
    );

    let fetcher = NwisFetcher::new();
    let plotter = PngPlotter::new(config.output.clone());

    match run(&config, &fetcher, &plotter) {
        Ok(report) => {
            println!("✓ Fetched {} year(s)", report.years_fetched.len());
            for year in &report.years_dropped {
                println!("   ⚠ {} dropped (fetch failed)", year);
            }
            for year in &report.low_coverage_years {
                println!("   ⚠ {} below coverage threshold, excluded from statistics", year);
            }
            for (year, reason) in &report.notable_years {
                println!("   ★ {} — {}", year, reason);
            }
            println!("\n✓ Chart written to {}", report.output.display());
        }
        Err(e) => {
            eprintln!("\n❌ {}\n", e);
            std::process::exit(1);
        }
    }
}
