//! weather-etl CLI
//!
//! Scheduler-facing entry point: one `run` per invocation, plus database
//! setup and read-back helpers.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod run;

use std::{path::PathBuf, process::ExitCode};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use infrastructure::{AppConfig, connect, init_telemetry};

/// weather-etl CLI
#[derive(Parser)]
#[command(name = "weather-etl")]
#[command(author, version, about = "Daily weather ETL for Open-Meteo", long_about = None)]
struct Cli {
    /// Verbosity level (overrides the configured log filter)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML configuration file (default: ./config.toml if present)
    #[arg(short, long, global = true, env = "WEATHER_ETL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, aggregate and load daily temperatures
    ///
    /// Exit codes: 0 done, 2 configuration, 3 extracting, 4 aggregating,
    /// 5 loading.
    Run {
        /// First day to extract (default: today, local time)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Number of days to extract, starting at --date
        #[arg(long, default_value = "1")]
        days: u32,

        /// Skip cities whose extraction fails instead of aborting
        #[arg(long)]
        tolerate_partial: bool,
    },

    /// Create the weather_daily table
    SetupDb,

    /// Print stored daily temperatures for a city, oldest first
    History {
        /// City name as configured
        #[arg(long)]
        city: String,

        /// Number of most recent days to show
        #[arg(short, long, default_value = "30")]
        limit: u32,
    },

    /// List configured cities
    Cities,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Format an optional temperature for table output
fn format_temperature(temperature: Option<f64>) -> String {
    temperature.map_or_else(|| "-".to_string(), |t| format!("{t:.2}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let code = run::report_setup_failure(&format!("configuration: {e}"));
            return Ok(ExitCode::from(code));
        },
    };

    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.telemetry.log_filter = filter.to_string();
    }
    init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run {
            date,
            days,
            tolerate_partial,
        } => {
            let options = run::RunOptions {
                date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
                days,
                tolerate_partial,
            };
            return Ok(ExitCode::from(run::execute(config, options).await));
        },

        Commands::SetupDb => {
            let db = connect(&config.database).await?;
            db.migrate().await?;
            println!("✅ weather_daily ready ({})", db.backend());
            db.close().await;
        },

        Commands::History { city, limit } => {
            let db = connect(&config.database).await?;
            let rows = db.store().list_for_city(&city, limit).await?;
            db.close().await;

            if rows.is_empty() {
                println!("No data stored for {city}");
            } else {
                println!("📈 {city}");
                for row in rows {
                    println!("   {}  {}", row.date, format_temperature(row.temperature));
                }
            }
        },

        Commands::Cities => {
            let cities = config.city_descriptors()?;
            println!("🌍 Configured cities ({}):", cities.len());
            for city in cities {
                println!("   {:<20} {}", city.name(), city.location());
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_zero_keeps_configured_filter() {
        assert_eq!(log_filter_from_verbosity(0), None);
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(log_filter_from_verbosity(1), Some("info"));
        assert_eq!(log_filter_from_verbosity(2), Some("debug"));
        assert_eq!(log_filter_from_verbosity(3), Some("trace"));
        assert_eq!(log_filter_from_verbosity(10), Some("trace"));
    }

    #[test]
    fn temperature_formatting() {
        assert_eq!(format_temperature(Some(30.0)), "30.00");
        assert_eq!(format_temperature(Some(27.126)), "27.13");
        assert_eq!(format_temperature(None), "-");
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["weather-etl", "run"]).unwrap();
        match cli.command {
            Commands::Run {
                date,
                days,
                tolerate_partial,
            } => {
                assert!(date.is_none());
                assert_eq!(days, 1);
                assert!(!tolerate_partial);
            },
            _ => panic!("Expected Run command"),
        }
    }
}
