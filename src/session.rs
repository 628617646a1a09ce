//! Session-level orchestration over the analysis core
//!
//! Two requests are served here:
//!
//! - [`summarize_race`]: lap-time distribution, stints per driver, tyre
//!   degradation insights, the session headline and weather
//! - [`load_telemetry`]: aligned telemetry for several driver-laps on the
//!   reference lap's grid, ready for [`TelemetryComparison::compare`]
//!
//! A driver (or lap) that cannot be processed is logged and skipped. Only a
//! request with nothing usable left fails.

use crate::compare::{compare_frames, ComparisonConfig, ComparisonInsight};
use crate::degradation::{driver_insights, DegradationConfig};
use crate::error::{AnalysisError, Result};
use crate::records::{Compound, DriverSession, LapRecord, SessionData, SessionKind, WeatherSummary};
use crate::resample::{AlignedTelemetryFrame, ReferenceGrid, ResampleConfig};
use crate::stint::{segment_stints, Stint};
use serde::{Deserialize, Serialize};

/// One timed lap in the lap-time distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapTimePoint {
    pub driver: String,
    pub lap_number: u32,
    pub lap_time_seconds: f64,
    pub compound: Compound,
}

/// Stints of one driver, in lap order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverStints {
    pub driver: String,
    pub stints: Vec<Stint>,
}

/// Who the session is "about": winner or fastest driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub label: String,
    pub name: String,
}

impl Headline {
    fn unavailable() -> Self {
        Self {
            label: "WINNER".to_string(),
            name: "N/A".to_string(),
        }
    }
}

/// Result of [`summarize_race`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSummary {
    pub laps: Vec<LapTimePoint>,
    pub stints: Vec<DriverStints>,
    /// Degradation insight texts, generation order
    pub insights: Vec<String>,
    pub headline: Headline,
    pub weather: WeatherSummary,
}

/// Lap distribution, stints and degradation insights for `drivers`
///
/// # Errors
/// `NoLapData` when none of the requested drivers has a timed lap.
pub fn summarize_race(
    session: &SessionData,
    drivers: &[String],
    config: &DegradationConfig,
) -> Result<RaceSummary> {
    let mut laps = Vec::new();
    let mut stints = Vec::new();
    let mut insights = Vec::new();

    for code in drivers {
        let Some(driver) = session.driver(code) else {
            tracing::warn!("driver {} not found in session, skipping", code);
            continue;
        };

        let mut ordered: Vec<&LapRecord> = driver.laps.iter().collect();
        ordered.sort_by_key(|lap| lap.lap_number);
        laps.extend(ordered.iter().filter_map(|lap| {
            Some(LapTimePoint {
                driver: code.clone(),
                lap_number: lap.lap_number,
                lap_time_seconds: lap.valid_lap_time()?,
                compound: lap.compound(),
            })
        }));

        let segmented = segment_stints(&driver.laps);
        insights.extend(
            driver_insights(code, &segmented, config)
                .iter()
                .map(|insight| insight.message()),
        );
        stints.push(DriverStints {
            driver: code.clone(),
            stints: segmented.into_iter().map(|s| s.stint).collect(),
        });
    }

    if laps.is_empty() {
        return Err(AnalysisError::NoLapData);
    }
    insights.truncate(config.max_insights);

    tracing::info!(
        "race summary: {} laps, {} drivers, {} insights",
        laps.len(),
        stints.len(),
        insights.len()
    );

    Ok(RaceSummary {
        laps,
        stints,
        insights,
        headline: headline(session),
        weather: session.weather.clone().unwrap_or_default(),
    })
}

/// Fastest driver for practice, classified winner otherwise
pub fn headline(session: &SessionData) -> Headline {
    match session.kind {
        SessionKind::Practice => match session.fastest_lap() {
            Some((driver, _)) => Headline {
                label: "FASTEST LAP".to_string(),
                name: display_name(session, &driver.driver),
            },
            None => Headline::unavailable(),
        },
        kind => {
            let label = match kind {
                SessionKind::Sprint | SessionKind::SprintQualifying => "SPRINT WINNER",
                _ => "RACE WINNER",
            };
            session
                .results
                .iter()
                .filter(|r| r.position.is_some())
                .min_by_key(|r| r.position)
                .map(|p1| Headline {
                    label: label.to_string(),
                    name: display_name(session, &p1.abbreviation),
                })
                .unwrap_or_else(Headline::unavailable)
        }
    }
}

/// Full name from the classification, the driver code otherwise
fn display_name(session: &SessionData, code: &str) -> String {
    session
        .classified(code)
        .map(|row| row.full_name())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| code.to_string())
}

/// An explicitly requested driver-lap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapSelection {
    pub driver: String,
    pub lap: u32,
}

impl LapSelection {
    /// Entry key used in [`TelemetryComparison`], e.g. `HAM (L12)`
    pub fn key(&self) -> String {
        format!("{} (L{})", self.driver, self.lap)
    }
}

/// Which laps to align
///
/// With explicit `laps` the driver list is ignored; otherwise each driver's
/// fastest timed lap is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryRequest {
    #[serde(default)]
    pub drivers: Vec<String>,
    #[serde(default)]
    pub laps: Vec<LapSelection>,
    /// Grid points; the configured resolution when absent
    #[serde(default)]
    pub resolution: Option<usize>,
}

/// One aligned driver-lap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEntry {
    pub key: String,
    pub driver: String,
    pub frame: AlignedTelemetryFrame,
}

/// The lap that defines the grid and the delta-time baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLap {
    pub driver: String,
    pub lap_number: u32,
    pub lap_time: f64,
}

/// Result of [`load_telemetry`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryComparison {
    pub entries: Vec<TelemetryEntry>,
    /// Fastest sector times of the session, 0 when unknown
    pub session_best_sectors: [f64; 3],
    /// Distance covered by the reference lap (meters)
    pub track_length: f64,
    pub reference: ReferenceLap,
    pub weather: WeatherSummary,
}

impl TelemetryComparison {
    pub fn entry(&self, key: &str) -> Option<&TelemetryEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Compare two loaded entries by key
    ///
    /// A missing key yields a single "Insufficient data" summary rather than
    /// an error.
    pub fn compare(
        &self,
        key_a: &str,
        key_b: &str,
        config: &ComparisonConfig,
    ) -> Result<Vec<ComparisonInsight>> {
        match (self.entry(key_a), self.entry(key_b)) {
            (Some(a), Some(b)) => compare_frames(&a.frame, &b.frame, key_a, key_b, config),
            _ => Ok(vec![ComparisonInsight::insufficient_data()]),
        }
    }
}

/// A driver-lap resolved against the session, ready to resample
struct Target<'a> {
    key: String,
    driver: &'a DriverSession,
    lap: &'a LapRecord,
}

fn resolve_targets<'a>(session: &'a SessionData, request: &TelemetryRequest) -> Vec<Target<'a>> {
    if !request.laps.is_empty() {
        return request
            .laps
            .iter()
            .filter_map(|selection| {
                let driver = session.driver(&selection.driver);
                let lap = driver.and_then(|d| d.lap(selection.lap));
                match (driver, lap) {
                    (Some(driver), Some(lap)) => Some(Target {
                        key: selection.key(),
                        driver,
                        lap,
                    }),
                    _ => {
                        tracing::warn!("lap {} not found in session, skipping", selection.key());
                        None
                    }
                }
            })
            .collect();
    }

    request
        .drivers
        .iter()
        .filter_map(|code| {
            let Some(driver) = session.driver(code) else {
                tracing::warn!("driver {} not found in session, skipping", code);
                return None;
            };
            let Some(lap) = driver.fastest_lap() else {
                tracing::warn!("driver {} has no timed lap, skipping", code);
                return None;
            };
            Some(Target {
                key: code.clone(),
                driver,
                lap,
            })
        })
        .collect()
}

fn resample_target(
    target: &Target<'_>,
    grid: &ReferenceGrid,
    config: &ResampleConfig,
) -> Result<AlignedTelemetryFrame> {
    let samples = target
        .driver
        .telemetry_for(target.lap.lap_number)
        .ok_or_else(|| AnalysisError::no_telemetry(format!("no telemetry for {}", target.key)))?;
    grid.resample(target.lap, samples, config)
}

/// Largest distance recorded on a target's raw telemetry
fn recorded_distance(target: &Target<'_>) -> f64 {
    target
        .driver
        .telemetry_for(target.lap.lap_number)
        .unwrap_or_default()
        .iter()
        .filter_map(|s| s.distance)
        .filter(|d| d.is_finite())
        .fold(0.0, f64::max)
}

fn resample_all(
    targets: &[Target<'_>],
    grid: &ReferenceGrid,
    config: &ResampleConfig,
) -> Vec<Result<AlignedTelemetryFrame>> {
    if !config.parallel || targets.len() < 2 {
        return targets
            .iter()
            .map(|target| resample_target(target, grid, config))
            .collect();
    }

    // One worker per driver-lap; results are collected in request order
    let outcome = crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = targets
            .iter()
            .map(|target| scope.spawn(move |_| resample_target(target, grid, config)))
            .collect();

        handles
            .into_iter()
            .zip(targets)
            .map(|(handle, target)| {
                handle.join().unwrap_or_else(|_| {
                    Err(AnalysisError::no_telemetry(format!(
                        "worker for {} panicked",
                        target.key
                    )))
                })
            })
            .collect::<Vec<_>>()
    });

    outcome.unwrap_or_else(|_| {
        tracing::warn!("parallel resampling failed, no laps loaded");
        Vec::new()
    })
}

/// Align the requested laps onto the session reference lap's grid
///
/// # Errors
/// `NoTelemetryData` when the session has no timed lap with telemetry, or
/// when none of the requested laps could be aligned.
pub fn load_telemetry(
    session: &SessionData,
    request: &TelemetryRequest,
    config: &ResampleConfig,
) -> Result<TelemetryComparison> {
    let (ref_driver, ref_lap) = session
        .reference_lap()
        .ok_or_else(|| AnalysisError::no_telemetry("no timed lap with telemetry in session"))?;
    let ref_samples = ref_driver
        .telemetry_for(ref_lap.lap_number)
        .ok_or_else(|| AnalysisError::no_telemetry("reference lap telemetry missing"))?;

    let config = ResampleConfig {
        resolution: request.resolution.unwrap_or(config.resolution),
        ..config.clone()
    };
    let grid = ReferenceGrid::new(ref_samples, config.resolution)?;

    let targets = resolve_targets(session, request);
    let max_distance = targets.iter().map(recorded_distance).fold(0.0, f64::max);

    let entries: Vec<TelemetryEntry> = resample_all(&targets, &grid, &config)
        .into_iter()
        .zip(&targets)
        .filter_map(|(result, target)| match result {
            Ok(frame) => Some(TelemetryEntry {
                key: target.key.clone(),
                driver: target.driver.driver.clone(),
                frame,
            }),
            Err(e) => {
                tracing::warn!("{}: {}, skipping", target.key, e);
                None
            }
        })
        .collect();

    if entries.is_empty() || max_distance <= 0.0 {
        return Err(AnalysisError::no_telemetry(
            "none of the requested laps has usable telemetry",
        ));
    }

    tracing::info!(
        "aligned {} laps on {} points over {:.0} m",
        entries.len(),
        grid.resolution(),
        grid.track_length()
    );

    Ok(TelemetryComparison {
        entries,
        session_best_sectors: session.best_sectors(),
        track_length: grid.track_length(),
        reference: ReferenceLap {
            driver: ref_driver.driver.clone(),
            lap_number: ref_lap.lap_number,
            lap_time: ref_lap.valid_lap_time().unwrap_or_default(),
        },
        weather: session.weather.clone().unwrap_or_default(),
    })
}
