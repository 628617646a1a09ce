// Tyre degradation estimation per stint
//
// For each closed stint, fit a straight line to lap time against lap number
// over the clean laps and turn the slope into a one-line judgment:
//
// 1. at least `min_clean_laps` clean laps are required
// 2. laps further than `outlier_sigma` population standard deviations from
//    the mean are dropped (safety car, yellow flags, traffic), and the
//    minimum is checked again
// 3. stints on an unknown compound are skipped
// 4. the OLS slope is classified into a trend band; gaps between bands
//    produce nothing
//
// Skips are ordinary outcomes, reported as `StintSkip` and never surfaced
// to the caller of the session API.

mod config;
mod statistics;
mod verdict;

pub use config::DegradationConfig;
pub use statistics::{lap_time_slope, mean_and_stddev, reject_outliers};
pub use verdict::{classify_slope, DegradationInsight, DegradationTrend};

use crate::stint::{CleanLap, SegmentedStint, Stint};
use thiserror::Error;

/// Why a stint produced no degradation insight
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StintSkip {
    #[error("only {clean} clean laps, {required} required")]
    InsufficientStintData { clean: usize, required: usize },

    #[error("only {kept} laps left after outlier rejection, {required} required")]
    OutliersRejected { kept: usize, required: usize },

    #[error("compound is unknown")]
    UnknownCompound,

    #[error("slope {slope:.3} s/lap falls between trend bands")]
    NoTrend { slope: f64 },
}

/// Estimate the degradation trend of one stint
///
/// # Example
/// ```
/// use apexline::degradation::{estimate_degradation, DegradationConfig, DegradationTrend};
/// use apexline::records::Compound;
/// use apexline::stint::{CleanLap, Stint};
///
/// let stint = Stint { compound: Compound::normalize(Some("soft")), start: 1, end: 10 };
/// let laps: Vec<CleanLap> = (1..=10)
///     .map(|n| CleanLap { lap_number: n, lap_time: 90.0 + 0.1 * n as f64 })
///     .collect();
///
/// let insight = estimate_degradation("VER", &stint, &laps, &DegradationConfig::default()).unwrap();
/// assert_eq!(insight.trend, DegradationTrend::DegradedHeavily);
/// assert_eq!(insight.message(), "VER SOFTs degraded heavily (+0.10s/lap).");
/// ```
pub fn estimate_degradation(
    driver: &str,
    stint: &Stint,
    clean_laps: &[CleanLap],
    config: &DegradationConfig,
) -> Result<DegradationInsight, StintSkip> {
    let required = config.min_clean_laps;
    if clean_laps.len() < required {
        return Err(StintSkip::InsufficientStintData {
            clean: clean_laps.len(),
            required,
        });
    }

    let kept = reject_outliers(clean_laps, config.outlier_sigma);
    if kept.len() < required {
        return Err(StintSkip::OutliersRejected {
            kept: kept.len(),
            required,
        });
    }

    if stint.compound.is_unknown() {
        return Err(StintSkip::UnknownCompound);
    }

    // Lap numbers within a stint are distinct, so the fit always exists
    let slope = lap_time_slope(&kept).ok_or(StintSkip::InsufficientStintData {
        clean: kept.len(),
        required,
    })?;
    let trend = classify_slope(slope, config).ok_or(StintSkip::NoTrend { slope })?;

    Ok(DegradationInsight {
        driver: driver.to_string(),
        compound: stint.compound.clone(),
        stint_start: stint.start,
        stint_end: stint.end,
        slope,
        trend,
        laps_used: kept.len(),
    })
}

/// Degradation insights for every stint of one driver, in stint order
///
/// Skipped stints are logged at debug level.
pub fn driver_insights(
    driver: &str,
    stints: &[SegmentedStint],
    config: &DegradationConfig,
) -> Vec<DegradationInsight> {
    stints
        .iter()
        .filter_map(|segmented| {
            let stint = &segmented.stint;
            match estimate_degradation(driver, stint, &segmented.clean_laps, config) {
                Ok(insight) => Some(insight),
                Err(skip) => {
                    tracing::debug!(
                        "{} stint {}-{} on {}: no insight ({})",
                        driver,
                        stint.start,
                        stint.end,
                        stint.compound,
                        skip
                    );
                    None
                }
            }
        })
        .collect()
}
