//! Typed session records handed over by the timing data collaborator
//!
//! Every record here is produced outside the crate (usually deserialized from
//! JSON) and consumed read-only by the analysis modules. Optional values are
//! modelled with `Option`, never with sentinel strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Compound label used when the raw value is missing or unusable
pub const UNKNOWN_COMPOUND: &str = "UNKNOWN";

/// Normalized tyre compound symbol (`SOFT`, `MEDIUM`, `INTERMEDIATE`, ...)
///
/// # Example
/// ```
/// use apexline::records::Compound;
///
/// assert_eq!(Compound::normalize(Some("soft")).as_str(), "SOFT");
/// assert!(Compound::normalize(Some("nan")).is_unknown());
/// assert!(Compound::normalize(None).is_unknown());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Compound(String);

impl Compound {
    /// Uppercase the raw label; `NAN`, `NONE`, empty and missing map to `UNKNOWN`
    pub fn normalize(raw: Option<&str>) -> Self {
        let upper = raw.map(|s| s.trim().to_uppercase()).unwrap_or_default();
        match upper.as_str() {
            "" | "NAN" | "NONE" => Self(UNKNOWN_COMPOUND.to_string()),
            _ => Self(upper),
        }
    }

    pub fn unknown() -> Self {
        Self(UNKNOWN_COMPOUND.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_COMPOUND
    }

    /// Single-letter badge (`S`, `M`, `H`, ...), `?` for an empty label
    pub fn symbol(&self) -> char {
        self.0.chars().next().unwrap_or('?')
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One completed (or in-progress) lap for one driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    /// Lap number, starting at 1
    pub lap_number: u32,
    /// Lap time in seconds; absent for incomplete laps
    #[serde(default)]
    pub lap_time: Option<f64>,
    /// Raw compound label as reported by the timing feed
    #[serde(default)]
    pub compound: Option<String>,
    /// Sector times in seconds
    #[serde(default)]
    pub sector_times: [Option<f64>; 3],
    /// Driver entered the pit lane on this lap
    #[serde(default)]
    pub pit_in: bool,
    /// Driver left the pit lane on this lap
    #[serde(default)]
    pub pit_out: bool,
    /// Tyre age in laps
    #[serde(default)]
    pub tyre_age: Option<u32>,
}

impl LapRecord {
    /// Lap time if it is present, finite and positive
    pub fn valid_lap_time(&self) -> Option<f64> {
        self.lap_time.filter(|t| t.is_finite() && *t > 0.0)
    }

    pub fn compound(&self) -> Compound {
        Compound::normalize(self.compound.as_deref())
    }

    /// Clean laps feed the degradation fit: timed, no pit entry or exit
    pub fn is_clean(&self) -> bool {
        self.valid_lap_time().is_some() && !self.pit_in && !self.pit_out
    }
}

/// One timestamped physical-state reading along a lap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Cumulative distance from the start line in meters
    #[serde(default)]
    pub distance: Option<f64>,
    /// Elapsed time since the start of the lap in seconds
    pub time: f64,
    /// Speed in km/h
    pub speed: f64,
    /// Throttle position, 0-100
    #[serde(default)]
    pub throttle: Option<f64>,
    /// Brake position, either a 0-1 fraction or a 0-100 percentage
    #[serde(default)]
    pub brake: Option<f64>,
    #[serde(default)]
    pub rpm: Option<f64>,
    #[serde(default)]
    pub gear: Option<u8>,
    /// Track position (x) in the timing provider's coordinate frame
    #[serde(default)]
    pub x: Option<f64>,
    /// Track position (y) in the timing provider's coordinate frame
    #[serde(default)]
    pub y: Option<f64>,
}

/// Session-level weather aggregates, passed through untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub air_temp: f64,
    pub track_temp: f64,
    pub humidity: f64,
    pub rain: bool,
}

/// Type of session the laps belong to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Practice,
    Qualifying,
    SprintQualifying,
    Sprint,
    #[default]
    Race,
}

/// One row of the official classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedDriver {
    #[serde(default)]
    pub position: Option<u32>,
    /// Three-letter driver code, e.g. `VER`
    pub abbreviation: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl ClassifiedDriver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// All laps of one driver plus whatever telemetry was loaded for them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverSession {
    /// Driver code, e.g. `HAM`
    pub driver: String,
    /// Laps ordered by lap number
    #[serde(default)]
    pub laps: Vec<LapRecord>,
    /// Telemetry keyed by lap number
    #[serde(default)]
    pub telemetry: BTreeMap<u32, Vec<TelemetrySample>>,
}

impl DriverSession {
    pub fn lap(&self, lap_number: u32) -> Option<&LapRecord> {
        self.laps.iter().find(|lap| lap.lap_number == lap_number)
    }

    pub fn telemetry_for(&self, lap_number: u32) -> Option<&[TelemetrySample]> {
        self.telemetry.get(&lap_number).map(Vec::as_slice)
    }

    /// Fastest timed lap; the earliest one wins a tie
    pub fn fastest_lap(&self) -> Option<&LapRecord> {
        fastest(self.laps.iter())
    }
}

/// Everything the core needs to know about one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub kind: SessionKind,
    #[serde(default)]
    pub weather: Option<WeatherSummary>,
    #[serde(default)]
    pub results: Vec<ClassifiedDriver>,
    #[serde(default)]
    pub drivers: Vec<DriverSession>,
}

impl SessionData {
    pub fn driver(&self, code: &str) -> Option<&DriverSession> {
        self.drivers.iter().find(|d| d.driver == code)
    }

    /// Fastest timed lap of the whole session
    pub fn fastest_lap(&self) -> Option<(&DriverSession, &LapRecord)> {
        self.drivers
            .iter()
            .filter_map(|d| d.fastest_lap().map(|lap| (d, lap)))
            .fold(None, pick_faster)
    }

    /// Fastest timed lap that also has telemetry attached
    ///
    /// This lap defines the distance grid and the delta-time baseline.
    pub fn reference_lap(&self) -> Option<(&DriverSession, &LapRecord)> {
        self.drivers
            .iter()
            .filter_map(|d| {
                fastest(
                    d.laps
                        .iter()
                        .filter(|lap| d.telemetry.contains_key(&lap.lap_number)),
                )
                .map(|lap| (d, lap))
            })
            .fold(None, pick_faster)
    }

    /// Fastest sector times over every lap in the session, 0 when unknown
    pub fn best_sectors(&self) -> [f64; 3] {
        let mut best = [f64::INFINITY; 3];
        for lap in self.drivers.iter().flat_map(|d| d.laps.iter()) {
            for (slot, sector) in best.iter_mut().zip(lap.sector_times.iter()) {
                if let Some(t) = sector.filter(|t| t.is_finite() && *t > 0.0) {
                    *slot = slot.min(t);
                }
            }
        }
        best.map(|t| if t.is_finite() { t } else { 0.0 })
    }

    pub fn classified(&self, code: &str) -> Option<&ClassifiedDriver> {
        self.results.iter().find(|r| r.abbreviation == code)
    }
}

fn fastest<'a>(laps: impl Iterator<Item = &'a LapRecord>) -> Option<&'a LapRecord> {
    laps.filter_map(|lap| lap.valid_lap_time().map(|t| (t, lap)))
        .fold(None, |best: Option<(f64, &LapRecord)>, (t, lap)| match best {
            Some((bt, _)) if bt <= t => best,
            _ => Some((t, lap)),
        })
        .map(|(_, lap)| lap)
}

fn pick_faster<'a>(
    best: Option<(&'a DriverSession, &'a LapRecord)>,
    candidate: (&'a DriverSession, &'a LapRecord),
) -> Option<(&'a DriverSession, &'a LapRecord)> {
    let candidate_time = candidate.1.valid_lap_time().unwrap_or(f64::INFINITY);
    match best {
        Some((_, lap)) if lap.valid_lap_time().unwrap_or(f64::INFINITY) <= candidate_time => best,
        _ => Some(candidate),
    }
}
