// Corner detection over a speed trace
//
// The grid is scanned in fixed windows. Each window's slowest point is a
// candidate apex; it counts as a corner when it is slow in absolute terms
// and sits well below the average speed of its neighbourhood. Candidates
// too close to the previous corner are folded into it, keeping the slower
// apex.

use crate::compare::config::ComparisonConfig;
use serde::{Deserialize, Serialize};
use trueno::Vector;

/// A detected corner apex on the shared grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    /// 1-based corner number in track order
    pub turn: usize,
    /// Grid index of the apex
    pub index: usize,
    /// Grid distance of the apex (meters)
    pub distance_m: f64,
    /// Speed of the scanned trace at the apex (km/h)
    pub apex_speed_kph: f64,
}

/// Convert a distance span into a number of grid points (at least one)
///
/// Spans beyond the addressable range saturate at `usize::MAX`; callers add
/// them to indices with `saturating_add`.
pub fn span_points(meters: f64, spacing: f64) -> usize {
    if !(spacing > 0.0) || !meters.is_finite() {
        return 1;
    }
    ((meters / spacing).round() as usize).max(1)
}

/// Index of the first minimum in `values`
fn argmin(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b <= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Index of the first maximum in `values`
pub fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Average speed over `values`
fn local_mean(values: &[f64]) -> f64 {
    let v: Vec<f32> = values.iter().map(|&s| s as f32).collect();
    Vector::from_slice(&v)
        .mean()
        .map(f64::from)
        .unwrap_or(0.0)
}

/// Find corner apexes in `speed`, sampled on `distance`
///
/// # Example
/// ```
/// use apexline::compare::{detect_corners, ComparisonConfig};
///
/// // 2 km straight at 300 km/h with one hairpin at 1 km
/// let distance: Vec<f64> = (0..2000).map(|i| i as f64).collect();
/// let speed: Vec<f64> = distance
///     .iter()
///     .map(|d| 300.0 - (200.0 - (d - 1000.0).abs()).max(0.0))
///     .collect();
///
/// let corners = detect_corners(&distance, &speed, &ComparisonConfig::default());
/// assert_eq!(corners.len(), 1);
/// assert_eq!(corners[0].index, 1000);
/// ```
pub fn detect_corners(distance: &[f64], speed: &[f64], config: &ComparisonConfig) -> Vec<Corner> {
    let n = distance.len().min(speed.len());
    if n < 2 {
        return Vec::new();
    }
    let spacing = distance[n - 1] / (n - 1) as f64;
    let window = span_points(config.corner_window_m, spacing);
    let half_span = span_points(config.local_mean_half_span_m, spacing);

    let mut corners: Vec<Corner> = Vec::new();
    let mut i = window;
    while i.saturating_add(window) <= n {
        let start = i - window;
        let Some(offset) = argmin(&speed[start..i + window]) else {
            break;
        };
        let apex = start + offset;
        let apex_speed = speed[apex];

        let neighbourhood =
            &speed[apex.saturating_sub(half_span)..apex.saturating_add(half_span).min(n)];
        let is_corner = apex_speed < config.corner_max_speed_kph
            && apex_speed < local_mean(neighbourhood) - config.corner_min_dip_kph;

        if is_corner {
            let same_corner = corners.last().is_some_and(|last| {
                (distance[apex] - last.distance_m).abs() <= config.corner_min_separation_m
            });

            if !same_corner {
                corners.push(Corner {
                    turn: corners.len() + 1,
                    index: apex,
                    distance_m: distance[apex],
                    apex_speed_kph: apex_speed,
                });
            } else if let Some(last) = corners
                .last_mut()
                .filter(|last| apex_speed < last.apex_speed_kph)
            {
                last.index = apex;
                last.distance_m = distance[apex];
                last.apex_speed_kph = apex_speed;
            }
        }

        i += window;
    }

    tracing::debug!("detected {} corners over {} grid points", corners.len(), n);
    corners
}

/// First index in `range` whose value exceeds `threshold`
pub fn first_above(values: &[f64], range: std::ops::Range<usize>, threshold: f64) -> Option<usize> {
    let end = range.end.min(values.len());
    let start = range.start.min(end);
    values[start..end]
        .iter()
        .position(|&v| v > threshold)
        .map(|offset| start + offset)
}
