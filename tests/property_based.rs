//! Property-based tests for the analysis pipeline
//!
//! Uses proptest to check the resampling, stint and comparison invariants
//! over randomly generated laps.

use apexline::compare::{compare_frames, ComparisonConfig, InsightCategory};
use apexline::degradation::{classify_slope, estimate_degradation, DegradationConfig, StintSkip};
use apexline::records::{LapRecord, TelemetrySample};
use apexline::resample::{resample_lap, ResampleConfig};
use apexline::stint::segment_stints;
use proptest::prelude::*;

fn lap_record(n: u32, time: Option<f64>, compound: Option<&str>, pit_in: bool, pit_out: bool) -> LapRecord {
    LapRecord {
        lap_number: n,
        lap_time: time,
        compound: compound.map(str::to_string),
        sector_times: [None; 3],
        pit_in,
        pit_out,
        tyre_age: None,
    }
}

/// Telemetry with strictly increasing distances built from positive steps
fn samples_from(steps: &[(f64, f64)], brake_scale: f64) -> Vec<TelemetrySample> {
    let mut distance = 0.0;
    let mut time = 0.0;
    steps
        .iter()
        .enumerate()
        .map(|(i, &(step, speed))| {
            if i > 0 {
                distance += step;
                time += step / (speed / 3.6);
            }
            TelemetrySample {
                distance: Some(distance),
                time,
                speed,
                throttle: Some((speed - 80.0).clamp(0.0, 100.0)),
                brake: Some(if speed < 150.0 { brake_scale } else { 0.0 }),
                rpm: Some(speed * 40.0),
                gear: Some((speed / 45.0).clamp(1.0, 8.0) as u8),
                x: Some(distance),
                y: None,
            }
        })
        .collect()
}

fn step_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.5f64..50.0, 60.0f64..340.0), 2..150)
}

fn compound_strategy() -> impl Strategy<Value = Option<&'static str>> {
    prop::sample::select(vec![
        Some("SOFT"),
        Some("MEDIUM"),
        Some("hard"),
        Some("nan"),
        None,
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every channel has exactly `resolution` finite points
    #[test]
    fn prop_resampled_channels_have_resolution_points(
        steps in step_strategy(),
        reference in step_strategy(),
        resolution in 2usize..2000,
    ) {
        let lap = lap_record(1, Some(90.0), Some("SOFT"), false, false);
        let config = ResampleConfig { resolution, ..Default::default() };
        let frame = resample_lap(&lap, &samples_from(&steps, 1.0), &samples_from(&reference, 1.0), &config).unwrap();

        for (name, values) in frame.telemetry.iter_channels() {
            prop_assert_eq!(values.len(), resolution, "channel {}", name);
            prop_assert!(values.iter().all(|v| v.is_finite()), "channel {} not finite", name);
        }
    }

    /// The grid starts at 0, ends at the reference length and never decreases
    #[test]
    fn prop_grid_spans_reference_lap(
        steps in step_strategy(),
        resolution in 2usize..1000,
    ) {
        let samples = samples_from(&steps, 1.0);
        let max_distance = samples.last().and_then(|s| s.distance).unwrap();
        let lap = lap_record(1, Some(90.0), None, false, false);
        let config = ResampleConfig { resolution, ..Default::default() };
        let frame = resample_lap(&lap, &samples, &samples, &config).unwrap();

        let distance = &frame.telemetry.distance;
        prop_assert_eq!(distance[0], 0.0);
        prop_assert_eq!(distance[resolution - 1], max_distance);
        prop_assert!(distance.windows(2).all(|w| w[0] <= w[1]));
    }

    /// Speed never leaves the range observed on the raw lap
    #[test]
    fn prop_no_extrapolation_beyond_observed_speed(
        steps in step_strategy(),
        reference in step_strategy(),
    ) {
        let lap = lap_record(1, Some(90.0), None, false, false);
        let config = ResampleConfig { resolution: 500, ..Default::default() };
        let frame = resample_lap(&lap, &samples_from(&steps, 1.0), &samples_from(&reference, 1.0), &config).unwrap();

        let lo = steps.iter().map(|s| s.1).fold(f64::INFINITY, f64::min);
        let hi = steps.iter().map(|s| s.1).fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(frame.telemetry.speed.iter().all(|v| *v >= lo - 1e-9 && *v <= hi + 1e-9));
    }

    /// 0-1 brake fractions come out as the same trace in percent
    #[test]
    fn prop_brake_fraction_scaled_to_percent(
        steps in step_strategy(),
        fraction in 0.05f64..1.0,
    ) {
        let lap = lap_record(1, Some(90.0), None, false, false);
        let config = ResampleConfig { resolution: 300, ..Default::default() };
        let as_fraction = samples_from(&steps, fraction);
        let as_percent = samples_from(&steps, fraction * 100.0);

        let a = resample_lap(&lap, &as_fraction, &as_fraction, &config).unwrap();
        let b = resample_lap(&lap, &as_percent, &as_percent, &config).unwrap();
        for (x, y) in a.telemetry.brake.iter().zip(&b.telemetry.brake) {
            prop_assert!((x - y).abs() < 1e-6);
        }
    }

    /// Every lap lands in exactly one stint, stints are ordered and pit
    /// entry closes the stint it happens in
    #[test]
    fn prop_stints_cover_every_lap_once(
        laps in prop::collection::vec((compound_strategy(), any::<bool>(), any::<bool>()), 1..60),
    ) {
        let records: Vec<LapRecord> = laps
            .iter()
            .enumerate()
            .map(|(i, &(compound, pit_in, pit_out))| {
                lap_record(i as u32 + 1, Some(90.0), compound, pit_in, pit_out)
            })
            .collect();
        let stints = segment_stints(&records);

        for lap in &records {
            let holders = stints.iter().filter(|s| s.stint.contains(lap.lap_number)).count();
            prop_assert_eq!(holders, 1, "lap {}", lap.lap_number);
            if lap.pit_in {
                let holder = stints.iter().find(|s| s.stint.contains(lap.lap_number)).unwrap();
                prop_assert_eq!(holder.stint.end, lap.lap_number);
            }
        }
        prop_assert!(stints.windows(2).all(|w| w[0].stint.end < w[1].stint.start));
    }

    /// A perfectly linear stint recovers its slope and the matching verdict
    #[test]
    fn prop_linear_stint_slope_recovered(
        base in 80.0f64..100.0,
        slope in -0.2f64..0.2,
        count in 4u32..30,
    ) {
        let records: Vec<LapRecord> = (1..=count)
            .map(|n| lap_record(n, Some(base + slope * f64::from(n)), Some("MEDIUM"), false, false))
            .collect();
        let stints = segment_stints(&records);
        prop_assert_eq!(stints.len(), 1);

        let config = DegradationConfig::default();
        let stint = &stints[0];
        match estimate_degradation("NOR", &stint.stint, &stint.clean_laps, &config) {
            Ok(insight) => {
                prop_assert!((insight.slope - slope).abs() < 1e-6);
                prop_assert_eq!(Some(insight.trend), classify_slope(insight.slope, &config));
            }
            Err(StintSkip::NoTrend { slope: fitted }) => {
                prop_assert!((fitted - slope).abs() < 1e-6);
                prop_assert!(classify_slope(fitted, &config).is_none());
            }
            Err(other) => prop_assert!(false, "unexpected skip: {}", other),
        }
    }

    /// Swapping the two laps yields the same findings in mirror image
    #[test]
    fn prop_comparison_symmetric(
        gain_a in -12.0f64..12.0,
        gain_b in -12.0f64..12.0,
        time_a in 85.0f64..95.0,
        time_b in 85.0f64..95.0,
    ) {
        let profile = |gain: f64| -> Vec<(f64, f64)> {
            (0..=800)
                .map(|i| {
                    let d = i as f64 * 5.0;
                    let from_apex = (d - 2000.0).abs();
                    let speed = if from_apex < 180.0 { 90.0 + from_apex + gain } else { 270.0 };
                    (5.0, speed)
                })
                .collect()
        };
        let reference = samples_from(&profile(0.0), 1.0);
        let config = ResampleConfig { resolution: 1600, ..Default::default() };
        let frame_a = resample_lap(
            &lap_record(3, Some(time_a), None, false, false),
            &samples_from(&profile(gain_a), 1.0),
            &reference,
            &config,
        ).unwrap();
        let frame_b = resample_lap(
            &lap_record(4, Some(time_b), None, false, false),
            &samples_from(&profile(gain_b), 1.0),
            &reference,
            &config,
        ).unwrap();

        let compare = ComparisonConfig::default();
        let ab = compare_frames(&frame_a, &frame_b, "AAA", "BBB", &compare).unwrap();
        let ba = compare_frames(&frame_b, &frame_a, "BBB", "AAA", &compare).unwrap();

        let key = |insights: &[apexline::compare::ComparisonInsight]| {
            let mut keys: Vec<(InsightCategory, Option<usize>, Option<String>, String)> = insights
                .iter()
                .map(|i| (i.category, i.turn, i.favoured.clone(), i.message.clone()))
                .collect();
            keys.sort();
            keys
        };
        prop_assert_eq!(key(&ab), key(&ba));
        prop_assert!(ab.len() <= compare.max_insights);
    }
}
