use anyhow::{Context, Result};
use apexline::cli::{Cli, Command, CompareTarget, GridArgs, OutputFormat};
use apexline::config::AnalysisConfig;
use apexline::records::SessionData;
use apexline::report;
use apexline::session::{self, LapSelection, TelemetryRequest};
use clap::Parser;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_session(path: &Path) -> Result<SessionData> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse session JSON from {}", path.display()))
}

fn apply_grid_args(config: &mut AnalysisConfig, grid: &GridArgs) {
    if grid.parallel {
        config.resample.parallel = true;
    }
}

/// Entry key and lap selection for one side of a comparison
///
/// Drivers given without a lap use their fastest timed lap.
fn resolve_target(session: &SessionData, target: &CompareTarget) -> Result<LapSelection> {
    let lap = match target.lap {
        Some(lap) => lap,
        None => session
            .driver(&target.driver)
            .and_then(|d| d.fastest_lap())
            .map(|lap| lap.lap_number)
            .with_context(|| format!("No timed lap found for {}", target.driver))?,
    };
    Ok(LapSelection {
        driver: target.driver.clone(),
        lap,
    })
}

fn run(args: Cli) -> Result<String> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    let session = load_session(&args.session)?;

    match args.command {
        Command::Race { drivers } => {
            let summary = session::summarize_race(&session, &drivers, &config.degradation)?;
            match args.format {
                OutputFormat::Text => Ok(report::render_race(&summary)),
                OutputFormat::Json => report::to_json(&summary),
            }
        }
        Command::Telemetry {
            drivers,
            laps,
            grid,
        } => {
            if drivers.is_empty() && laps.is_empty() {
                anyhow::bail!("Specify --drivers or at least one --lap DRIVER:LAP");
            }
            apply_grid_args(&mut config, &grid);
            let request = TelemetryRequest {
                drivers,
                laps,
                resolution: grid.resolution,
            };
            let loaded = session::load_telemetry(&session, &request, &config.resample)?;
            match args.format {
                OutputFormat::Text => Ok(report::render_telemetry(&loaded)),
                OutputFormat::Json => report::to_json(&loaded),
            }
        }
        Command::Compare {
            first,
            second,
            grid,
        } => {
            apply_grid_args(&mut config, &grid);
            let first = resolve_target(&session, &first)?;
            let second = resolve_target(&session, &second)?;
            let request = TelemetryRequest {
                drivers: Vec::new(),
                laps: vec![first.clone(), second.clone()],
                resolution: grid.resolution,
            };
            let loaded = session::load_telemetry(&session, &request, &config.resample)?;
            let insights = loaded.compare(&first.key(), &second.key(), &config.comparison)?;
            match args.format {
                OutputFormat::Text => Ok(report::render_insights(&insights)),
                OutputFormat::Json => report::to_json(&insights),
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let output = run(args)?;
    print!("{}", output);
    Ok(())
}
