// Telemetry resampling onto a shared distance grid
//
// Raw telemetry arrives at irregular distances. To compare two drivers at
// equal track position every lap is interpolated onto the same uniform grid,
// spanning 0 to the reference lap's recorded length, and acceleration and
// delta-to-reference channels are derived on that grid.
//
// Guarantees:
// - every channel has exactly `resolution` points
// - no value is extrapolated beyond the observed range (constant clamping)
// - no non-finite value leaves this module
// - absent channels become zero-filled sequences instead of errors

mod config;
mod frame;
pub mod interp;

pub use config::{ResampleConfig, DEFAULT_RESOLUTION};
pub use frame::{AlignedTelemetryFrame, Channel, ChannelSet, TyreInfo};

use crate::error::{AnalysisError, Result};
use crate::records::{LapRecord, TelemetrySample};
use interp::{gradient, interp, linspace, sanitize};

/// Samples that carry a usable distance, sorted by distance
fn distance_ordered(samples: &[TelemetrySample]) -> Vec<&TelemetrySample> {
    let mut ordered: Vec<&TelemetrySample> = samples
        .iter()
        .filter(|s| s.distance.is_some_and(f64::is_finite))
        .collect();
    // Stable, so equal distances keep their time order
    ordered.sort_by(|a, b| {
        a.distance
            .unwrap_or_default()
            .total_cmp(&b.distance.unwrap_or_default())
    });
    ordered
}

/// Interpolate one channel onto the grid
///
/// Returns `None` if no sample has a finite value for the channel.
fn resample_channel<F>(grid: &[f64], ordered: &[&TelemetrySample], value: F) -> Option<Vec<f64>>
where
    F: Fn(&TelemetrySample) -> Option<f64>,
{
    let (xp, fp): (Vec<f64>, Vec<f64>) = ordered
        .iter()
        .filter_map(|s| {
            let v = value(s).filter(|v| v.is_finite())?;
            Some((s.distance?, v))
        })
        .unzip();

    interp(grid, &xp, &fp)
}

/// The distance grid and baseline elapsed time shared by every lap of a request
///
/// Built once from the reference lap (normally the session's fastest lap).
#[derive(Debug, Clone)]
pub struct ReferenceGrid {
    distance: Vec<f64>,
    reference_time: Vec<f64>,
}

impl ReferenceGrid {
    /// Build the grid from the reference lap's telemetry
    ///
    /// # Errors
    /// `InvalidResolution` for fewer than 2 points, `NoTelemetryData` if the
    /// reference lap has no distance-tagged samples.
    pub fn new(reference: &[TelemetrySample], resolution: usize) -> Result<Self> {
        if resolution < 2 {
            return Err(AnalysisError::InvalidResolution(resolution));
        }

        let ordered = distance_ordered(reference);
        let max_track_length = ordered
            .last()
            .and_then(|s| s.distance)
            .ok_or_else(|| AnalysisError::no_telemetry("reference lap has no distance samples"))?;
        if !(max_track_length > 0.0) {
            return Err(AnalysisError::no_telemetry("reference lap covers no distance"));
        }

        let distance = linspace(0.0, max_track_length, resolution);
        let mut reference_time =
            resample_channel(&distance, &ordered, |s: &TelemetrySample| Some(s.time))
                .unwrap_or_else(|| vec![0.0; resolution]);
        sanitize(&mut reference_time);

        Ok(Self {
            distance,
            reference_time,
        })
    }

    pub fn resolution(&self) -> usize {
        self.distance.len()
    }

    /// Maximum distance recorded on the reference lap (meters)
    pub fn track_length(&self) -> f64 {
        self.distance.last().copied().unwrap_or(0.0)
    }

    pub fn distance(&self) -> &[f64] {
        &self.distance
    }

    /// Align one lap's telemetry onto this grid
    ///
    /// # Errors
    /// `NoTelemetryData` if the lap has no distance-tagged samples.
    pub fn resample(
        &self,
        lap: &LapRecord,
        samples: &[TelemetrySample],
        config: &ResampleConfig,
    ) -> Result<AlignedTelemetryFrame> {
        let ordered = distance_ordered(samples);
        if ordered.is_empty() {
            return Err(AnalysisError::no_telemetry(format!(
                "lap {} has no distance samples",
                lap.lap_number
            )));
        }

        let grid = &self.distance;
        let n = grid.len();
        let mut missing = Vec::new();
        let mut channel = |which: Channel, value: &dyn Fn(&TelemetrySample) -> Option<f64>| {
            resample_channel(grid, &ordered, value).unwrap_or_else(|| {
                tracing::debug!(
                    "lap {} has no {} samples, zero-filling",
                    lap.lap_number,
                    which
                );
                missing.push(which);
                vec![0.0; n]
            })
        };

        let time = channel(Channel::Time, &|s: &TelemetrySample| Some(s.time));
        let speed = channel(Channel::Speed, &|s: &TelemetrySample| Some(s.speed));
        let throttle = channel(Channel::Throttle, &|s: &TelemetrySample| s.throttle);
        let mut brake = channel(Channel::Brake, &|s: &TelemetrySample| s.brake);
        let rpm = channel(Channel::Rpm, &|s: &TelemetrySample| s.rpm);
        let gear = channel(Channel::Gear, &|s: &TelemetrySample| s.gear.map(f64::from));
        let x = channel(Channel::X, &|s: &TelemetrySample| s.x);
        let y = channel(Channel::Y, &|s: &TelemetrySample| s.y);

        let long_g = longitudinal_g(&speed, &time, config);

        let delta_to_reference: Vec<f64> = time
            .iter()
            .zip(&self.reference_time)
            .map(|(t, r)| t - r)
            .collect();

        let brake_max = brake.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if brake_max <= config.brake_fraction_ceiling {
            for b in brake.iter_mut() {
                *b *= 100.0;
            }
        }

        let mut telemetry = ChannelSet {
            distance: grid.clone(),
            time,
            speed,
            throttle,
            brake,
            rpm,
            gear,
            long_g,
            delta_to_reference,
            x,
            y,
        };
        for values in [
            &mut telemetry.time,
            &mut telemetry.speed,
            &mut telemetry.throttle,
            &mut telemetry.brake,
            &mut telemetry.rpm,
            &mut telemetry.gear,
            &mut telemetry.long_g,
            &mut telemetry.delta_to_reference,
            &mut telemetry.x,
            &mut telemetry.y,
        ] {
            sanitize(values);
        }

        Ok(AlignedTelemetryFrame {
            telemetry,
            sectors: lap
                .sector_times
                .map(|s| s.filter(|t| t.is_finite()).unwrap_or(0.0)),
            lap_time: lap.valid_lap_time(),
            lap_number: lap.lap_number,
            tyre: TyreInfo::from_lap(lap),
            missing_channels: missing,
        })
    }
}

/// Longitudinal acceleration in g from speed (km/h) and elapsed time (s)
fn longitudinal_g(speed_kph: &[f64], time: &[f64], config: &ResampleConfig) -> Vec<f64> {
    let speed_ms: Vec<f64> = speed_kph.iter().map(|v| v / 3.6).collect();
    let dv = gradient(&speed_ms);
    let dt = gradient(time);

    dv.iter()
        .zip(&dt)
        .map(|(dv, &dt)| {
            let dt = if dt == 0.0 { config.time_epsilon_s } else { dt };
            dv / dt / config.gravity
        })
        .collect()
}

/// Align one lap against a reference lap
///
/// Convenience wrapper that builds the [`ReferenceGrid`] from `reference`
/// and resamples `samples` onto it with `config.resolution` points.
///
/// # Example
/// ```
/// use apexline::records::{LapRecord, TelemetrySample};
/// use apexline::resample::{resample_lap, ResampleConfig};
///
/// let samples: Vec<TelemetrySample> = (0..=50)
///     .map(|i| TelemetrySample {
///         distance: Some(i as f64 * 100.0),
///         time: i as f64 * 1.2,
///         speed: 300.0,
///         throttle: Some(100.0),
///         brake: Some(0.0),
///         rpm: None,
///         gear: Some(8),
///         x: None,
///         y: None,
///     })
///     .collect();
/// let lap = LapRecord {
///     lap_number: 7,
///     lap_time: Some(60.0),
///     compound: Some("soft".into()),
///     sector_times: [None; 3],
///     pit_in: false,
///     pit_out: false,
///     tyre_age: Some(3),
/// };
/// let config = ResampleConfig { resolution: 500, ..Default::default() };
///
/// let frame = resample_lap(&lap, &samples, &samples, &config).unwrap();
/// assert_eq!(frame.len(), 500);
/// assert!(frame.telemetry.delta_to_reference.iter().all(|d| d.abs() < 1e-9));
/// ```
pub fn resample_lap(
    lap: &LapRecord,
    samples: &[TelemetrySample],
    reference: &[TelemetrySample],
    config: &ResampleConfig,
) -> Result<AlignedTelemetryFrame> {
    ReferenceGrid::new(reference, config.resolution)?.resample(lap, samples, config)
}
