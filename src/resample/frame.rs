// Aligned telemetry frame: one driver-lap on the shared distance grid

use crate::records::{Compound, LapRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw telemetry channels that may be absent from a lap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Time,
    Speed,
    Throttle,
    Brake,
    Rpm,
    Gear,
    X,
    Y,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Time => "time",
            Channel::Speed => "speed",
            Channel::Throttle => "throttle",
            Channel::Brake => "brake",
            Channel::Rpm => "rpm",
            Channel::Gear => "gear",
            Channel::X => "x",
            Channel::Y => "y",
        };
        f.write_str(name)
    }
}

/// Tyre state of the lap a frame was built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TyreInfo {
    pub compound: Compound,
    pub symbol: char,
    /// Tyre age in laps, 0 when unknown
    pub age: u32,
}

impl TyreInfo {
    pub fn from_lap(lap: &LapRecord) -> Self {
        let compound = lap.compound();
        Self {
            symbol: compound.symbol(),
            compound,
            age: lap.tyre_age.unwrap_or(0),
        }
    }
}

/// Parallel channels sampled on the same distance grid
///
/// Every vector has exactly `resolution` entries and contains only finite
/// values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelSet {
    /// Grid distance (meters)
    pub distance: Vec<f64>,
    /// Elapsed lap time (seconds)
    pub time: Vec<f64>,
    /// km/h
    pub speed: Vec<f64>,
    /// Percent
    pub throttle: Vec<f64>,
    /// Percent, normalized from 0-1 fractions when needed
    pub brake: Vec<f64>,
    pub rpm: Vec<f64>,
    pub gear: Vec<f64>,
    /// Longitudinal acceleration (g)
    pub long_g: Vec<f64>,
    /// Elapsed-time difference to the reference lap at equal distance (seconds)
    pub delta_to_reference: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl ChannelSet {
    pub fn len(&self) -> usize {
        self.distance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }

    /// All channels, for invariant checks
    pub fn iter_channels(&self) -> impl Iterator<Item = (&'static str, &[f64])> {
        [
            ("distance", self.distance.as_slice()),
            ("time", self.time.as_slice()),
            ("speed", self.speed.as_slice()),
            ("throttle", self.throttle.as_slice()),
            ("brake", self.brake.as_slice()),
            ("rpm", self.rpm.as_slice()),
            ("gear", self.gear.as_slice()),
            ("long_g", self.long_g.as_slice()),
            ("delta_to_reference", self.delta_to_reference.as_slice()),
            ("x", self.x.as_slice()),
            ("y", self.y.as_slice()),
        ]
        .into_iter()
    }
}

/// Resampler output for one driver-lap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedTelemetryFrame {
    pub telemetry: ChannelSet,
    /// Sector times in seconds, 0 when unknown
    pub sectors: [f64; 3],
    pub lap_time: Option<f64>,
    pub lap_number: u32,
    pub tyre: TyreInfo,
    /// Channels that were absent from the raw lap and are zero-filled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_channels: Vec<Channel>,
}

impl AlignedTelemetryFrame {
    pub fn len(&self) -> usize {
        self.telemetry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.telemetry.is_empty()
    }

    /// Distance covered by the grid (meters)
    pub fn track_length(&self) -> f64 {
        self.telemetry.distance.last().copied().unwrap_or(0.0)
    }

    /// Spacing between consecutive grid points (meters)
    pub fn grid_spacing(&self) -> f64 {
        match self.len() {
            0 | 1 => 0.0,
            n => self.track_length() / (n - 1) as f64,
        }
    }
}
