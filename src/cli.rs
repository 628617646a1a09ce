//! CLI argument parsing for apexline

use crate::session::LapSelection;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "apexline")]
#[command(version)]
#[command(about = "Lap telemetry alignment, stint degradation and driver comparison", long_about = None)]
pub struct Cli {
    /// Session JSON file produced by the timing data collaborator
    #[arg(value_name = "SESSION")]
    pub session: PathBuf,

    /// Analysis thresholds (TOML); built-in defaults when omitted
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lap-time distribution, stints and tyre degradation
    Race {
        /// Driver codes, comma separated (e.g. VER,HAM)
        #[arg(long = "drivers", value_delimiter = ',', required = true)]
        drivers: Vec<String>,
    },

    /// Align laps onto the reference lap's distance grid
    Telemetry {
        /// Driver codes whose fastest laps are aligned
        #[arg(long = "drivers", value_delimiter = ',')]
        drivers: Vec<String>,

        /// Specific lap as DRIVER:LAP, repeatable; overrides --drivers
        #[arg(long = "lap", value_name = "DRIVER:LAP", value_parser = parse_lap_selection)]
        laps: Vec<LapSelection>,

        #[command(flatten)]
        grid: GridArgs,
    },

    /// Compare two laps and explain where time is gained
    Compare {
        /// First driver, as DRIVER (fastest lap) or DRIVER:LAP
        first: CompareTarget,

        /// Second driver, as DRIVER (fastest lap) or DRIVER:LAP
        second: CompareTarget,

        #[command(flatten)]
        grid: GridArgs,
    },
}

/// Resampling overrides shared by the telemetry commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GridArgs {
    /// Number of grid points (default from config, 4000)
    #[arg(long = "resolution", value_name = "POINTS")]
    pub resolution: Option<usize>,

    /// Resample drivers on parallel worker threads
    #[arg(long = "parallel")]
    pub parallel: bool,
}

/// A driver's fastest lap, or one specific lap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareTarget {
    pub driver: String,
    pub lap: Option<u32>,
}

impl FromStr for CompareTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(':') {
            let selection = parse_lap_selection(s)?;
            return Ok(Self {
                driver: selection.driver,
                lap: Some(selection.lap),
            });
        }
        let driver = s.trim();
        if driver.is_empty() {
            return Err("driver code must not be empty".to_string());
        }
        Ok(Self {
            driver: driver.to_string(),
            lap: None,
        })
    }
}

/// Parse `DRIVER:LAP`, e.g. `HAM:12`
pub fn parse_lap_selection(s: &str) -> Result<LapSelection, String> {
    let (driver, lap) = s
        .split_once(':')
        .ok_or_else(|| format!("expected DRIVER:LAP, got '{}'", s))?;
    let driver = driver.trim();
    if driver.is_empty() {
        return Err(format!("missing driver code in '{}'", s));
    }
    let lap = lap
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid lap number in '{}': {}", s, e))?;

    Ok(LapSelection {
        driver: driver.to_string(),
        lap,
    })
}
