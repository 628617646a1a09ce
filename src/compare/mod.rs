// Driver-to-driver comparison over two aligned frames
//
// Produces a short list of findings that explain where one lap gains on the
// other:
//
// 1. lap-time headline (when both laps are timed)
// 2. per corner, in track order: minimum speed at the apex, braking onset
//    before it, full-throttle point after it
// 3. top speed at the fastest point of the lap
//
// Corners and the top-speed point are located on the mean of both speed
// traces, so swapping the two drivers yields the same findings with the
// favoured driver swapped. Window sizes are configured in meters and
// converted to grid points with the frames' spacing.

mod config;
mod corners;
mod insight;

pub use config::ComparisonConfig;
pub use corners::{detect_corners, first_above, span_points, Corner};
pub use insight::{ComparisonInsight, InsightCategory};

use crate::error::{AnalysisError, Result};
use crate::resample::AlignedTelemetryFrame;
use std::collections::HashSet;

/// Compare two frames resampled onto the same grid
///
/// Findings are returned in generation order (headline, corners in track
/// order, top speed), duplicates removed, capped at `config.max_insights`.
/// When nothing beyond the headline is material a single fallback summary
/// is added.
///
/// # Errors
/// `FrameLengthMismatch` when the frames were not built on the same grid,
/// `NoTelemetryData` when they are empty.
pub fn compare_frames(
    frame_a: &AlignedTelemetryFrame,
    frame_b: &AlignedTelemetryFrame,
    label_a: &str,
    label_b: &str,
    config: &ComparisonConfig,
) -> Result<Vec<ComparisonInsight>> {
    if frame_a.len() != frame_b.len() {
        return Err(AnalysisError::FrameLengthMismatch {
            left: frame_a.len(),
            right: frame_b.len(),
        });
    }
    if frame_a.is_empty() {
        return Err(AnalysisError::no_telemetry("frames to compare are empty"));
    }

    let mut insights = Vec::new();

    if let Some(headline) = lap_time_headline(frame_a, frame_b, label_a, label_b) {
        insights.push(headline);
    }
    let headline_count = insights.len();

    let (a, b) = (&frame_a.telemetry, &frame_b.telemetry);
    let distance = &a.distance;
    let mean_speed: Vec<f64> = a.speed.iter().zip(&b.speed).map(|(x, y)| (x + y) / 2.0).collect();

    let spacing = frame_a.grid_spacing();
    let lookback = span_points(config.brake_lookback_m, spacing);
    let lookahead = span_points(config.throttle_lookahead_m, spacing);

    for corner in detect_corners(distance, &mean_speed, config) {
        let idx = corner.index;

        let diff = a.speed[idx] - b.speed[idx];
        if diff.abs() > config.min_speed_margin_kph {
            let favoured = if diff > 0.0 { label_a } else { label_b };
            insights.push(ComparisonInsight::minimum_speed(
                corner.turn,
                corner.distance_m,
                favoured,
                diff.abs(),
            ));
        }

        let before = idx.saturating_sub(lookback)..idx;
        if let (Some(onset_a), Some(onset_b)) = (
            first_above(&a.brake, before.clone(), config.brake_onset_pct),
            first_above(&b.brake, before, config.brake_onset_pct),
        ) {
            // Braking further down the road means braking later
            let diff = distance[onset_a] - distance[onset_b];
            if diff.abs() > config.brake_margin_m {
                let later = if diff > 0.0 { label_a } else { label_b };
                insights.push(ComparisonInsight::braking(
                    corner.turn,
                    corner.distance_m,
                    later,
                    diff.abs(),
                ));
            }
        }

        let after = idx..idx.saturating_add(lookahead);
        if let (Some(full_a), Some(full_b)) = (
            first_above(&a.throttle, after.clone(), config.full_throttle_pct),
            first_above(&b.throttle, after, config.full_throttle_pct),
        ) {
            let diff = distance[full_a] - distance[full_b];
            if diff.abs() > config.throttle_margin_m {
                let earlier = if diff > 0.0 { label_b } else { label_a };
                insights.push(ComparisonInsight::throttle(
                    corner.turn,
                    corner.distance_m,
                    earlier,
                    diff.abs(),
                ));
            }
        }
    }

    if let Some(idx) = corners::argmax(&mean_speed) {
        let diff = a.speed[idx] - b.speed[idx];
        if diff.abs() > config.top_speed_margin_kph {
            let faster = if diff > 0.0 { label_a } else { label_b };
            insights.push(ComparisonInsight::top_speed(distance[idx], faster, diff.abs()));
        }
    }

    if insights.len() == headline_count {
        insights.push(ComparisonInsight::no_differences(label_a, label_b));
    }

    let mut seen = HashSet::new();
    insights.retain(|insight| seen.insert(insight.message.clone()));
    insights.truncate(config.max_insights);

    tracing::debug!(
        "{} vs {}: {} insights",
        label_a,
        label_b,
        insights.len()
    );
    Ok(insights)
}

fn lap_time_headline(
    frame_a: &AlignedTelemetryFrame,
    frame_b: &AlignedTelemetryFrame,
    label_a: &str,
    label_b: &str,
) -> Option<ComparisonInsight> {
    let gap = frame_b.lap_time? - frame_a.lap_time?;
    let insight = if gap > 0.0 {
        ComparisonInsight::lap_time(label_a, gap)
    } else if gap < 0.0 {
        ComparisonInsight::lap_time(label_b, -gap)
    } else {
        ComparisonInsight::lap_time_level(label_a, label_b)
    };
    Some(insight)
}
