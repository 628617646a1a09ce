// Configuration for distance-grid resampling

use serde::{Deserialize, Serialize};

/// Default number of grid points per aligned lap
pub const DEFAULT_RESOLUTION: usize = 4000;

/// Configuration for telemetry resampling
///
/// # Example
/// ```
/// use apexline::resample::ResampleConfig;
///
/// let config = ResampleConfig::default();
/// assert_eq!(config.resolution, 4000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleConfig {
    /// Number of evenly spaced grid points between 0 and the reference lap's length
    pub resolution: usize,

    /// Substitute for a zero time step when differentiating speed (seconds)
    pub time_epsilon_s: f64,

    /// Standard gravity used to express acceleration in g (m/s²)
    pub gravity: f64,

    /// Brake traces whose maximum is at or below this value are 0-1 fractions
    /// and get scaled to percent
    pub brake_fraction_ceiling: f64,

    /// Resample drivers on scoped worker threads
    pub parallel: bool,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            time_epsilon_s: 1e-6,
            gravity: 9.81,
            brake_fraction_ceiling: 1.5,
            parallel: false,
        }
    }
}

impl ResampleConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.resolution < 2 {
            return Err(format!(
                "resolution must be >= 2 grid points, got {}",
                self.resolution
            ));
        }

        if !(self.time_epsilon_s > 0.0) {
            return Err(format!(
                "time_epsilon_s must be positive, got {}",
                self.time_epsilon_s
            ));
        }

        if !(self.gravity > 0.0) {
            return Err(format!("gravity must be positive, got {}", self.gravity));
        }

        Ok(())
    }
}
