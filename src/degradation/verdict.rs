// Slope classification and rendering of degradation insights

use crate::degradation::config::DegradationConfig;
use crate::records::Compound;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative label for a stint's lap-time trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradationTrend {
    DegradedHeavily,
    Degraded,
    HeldSteady,
    GotFaster,
}

/// Map a slope (s/lap) to a trend label, first match wins
///
/// Slopes in the gaps between bands (e.g. 0.02 with default thresholds)
/// have no label.
///
/// # Example
/// ```
/// use apexline::degradation::{classify_slope, DegradationConfig, DegradationTrend};
///
/// let config = DegradationConfig::default();
/// assert_eq!(classify_slope(0.09, &config), Some(DegradationTrend::DegradedHeavily));
/// assert_eq!(classify_slope(0.02, &config), None);
/// ```
pub fn classify_slope(slope: f64, config: &DegradationConfig) -> Option<DegradationTrend> {
    if slope > config.heavy_slope {
        Some(DegradationTrend::DegradedHeavily)
    } else if slope > config.degraded_slope {
        Some(DegradationTrend::Degraded)
    } else if slope > -config.steady_band && slope < config.steady_band {
        Some(DegradationTrend::HeldSteady)
    } else if slope < config.faster_slope {
        Some(DegradationTrend::GotFaster)
    } else {
        None
    }
}

/// Text judgment for one completed stint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationInsight {
    pub driver: String,
    pub compound: Compound,
    pub stint_start: u32,
    pub stint_end: u32,
    /// Fitted lap-time slope (s/lap)
    pub slope: f64,
    pub trend: DegradationTrend,
    /// Clean laps left after outlier rejection
    pub laps_used: usize,
}

impl DegradationInsight {
    pub fn message(&self) -> String {
        let (driver, compound, slope) = (&self.driver, &self.compound, self.slope);
        match self.trend {
            DegradationTrend::DegradedHeavily => {
                format!("{driver} {compound}s degraded heavily (+{slope:.2}s/lap).")
            }
            DegradationTrend::Degraded => {
                format!("{driver} {compound}s degraded by {slope:.2}s per lap.")
            }
            DegradationTrend::HeldSteady => format!("{driver} {compound}s held steady."),
            DegradationTrend::GotFaster => {
                format!("{driver} got faster on {compound}s (-{:.2}s/lap).", slope.abs())
            }
        }
    }
}

impl fmt::Display for DegradationInsight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
