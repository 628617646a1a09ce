// Configuration for stint degradation estimation
//
// The slope bands are product-tuning values, not algorithmic constants: they
// decide which lap-time trends are worth a sentence in the race summary.

use serde::{Deserialize, Serialize};

/// Configuration for tyre degradation estimation
///
/// # Example
/// ```
/// use apexline::degradation::DegradationConfig;
///
/// let config = DegradationConfig::default();
/// assert_eq!(config.min_clean_laps, 4);
/// assert_eq!(config.heavy_slope, 0.08);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DegradationConfig {
    /// Minimum clean laps before (and after) outlier rejection
    pub min_clean_laps: usize,

    /// Laps further than this many standard deviations from the stint mean
    /// are treated as safety-car or traffic laps and dropped
    pub outlier_sigma: f64,

    /// Slope (s/lap) above which a stint "degraded heavily"
    pub heavy_slope: f64,

    /// Slope (s/lap) above which a stint "degraded"
    pub degraded_slope: f64,

    /// Half-width of the open band around zero that counts as "held steady"
    pub steady_band: f64,

    /// Slope (s/lap) below which the driver "got faster"
    pub faster_slope: f64,

    /// Cap on degradation insights returned for a whole session
    pub max_insights: usize,
}

impl Default for DegradationConfig {
    fn default() -> Self {
        Self {
            min_clean_laps: 4,
            outlier_sigma: 2.0,
            heavy_slope: 0.08,
            degraded_slope: 0.03,
            steady_band: 0.01,
            faster_slope: -0.02,
            max_insights: 7,
        }
    }
}

impl DegradationConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_clean_laps < 2 {
            return Err(format!(
                "min_clean_laps must be >= 2 for a line fit, got {}",
                self.min_clean_laps
            ));
        }

        if !(self.outlier_sigma > 0.0) {
            return Err(format!(
                "outlier_sigma must be positive, got {}",
                self.outlier_sigma
            ));
        }

        if self.heavy_slope < self.degraded_slope {
            return Err(format!(
                "heavy_slope ({}) must not be below degraded_slope ({})",
                self.heavy_slope, self.degraded_slope
            ));
        }

        if self.steady_band < 0.0 {
            return Err(format!(
                "steady_band must be non-negative, got {}",
                self.steady_band
            ));
        }

        if self.faster_slope > 0.0 {
            return Err(format!(
                "faster_slope must be <= 0, got {}",
                self.faster_slope
            ));
        }

        Ok(())
    }
}
