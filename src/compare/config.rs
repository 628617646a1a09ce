// Configuration for driver-to-driver telemetry comparison
//
// Window sizes are expressed in meters and converted to grid points using
// the spacing of the frames being compared, so the same thresholds hold for
// any resampling resolution.

use serde::{Deserialize, Serialize};

/// Thresholds for corner detection and per-corner comparisons
///
/// # Example
/// ```
/// use apexline::compare::ComparisonConfig;
///
/// let config = ComparisonConfig::default();
/// assert_eq!(config.max_insights, 12);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Stride and half-width of the corner search windows (meters)
    pub corner_window_m: f64,

    /// Half-width of the span used for the local average speed (meters)
    pub local_mean_half_span_m: f64,

    /// A corner apex must be slower than this (km/h)
    pub corner_max_speed_kph: f64,

    /// A corner apex must sit this far below the local average speed (km/h)
    pub corner_min_dip_kph: f64,

    /// Apexes closer than this to the previous corner are merged into it (meters)
    pub corner_min_separation_m: f64,

    /// Minimum-speed difference worth reporting (km/h)
    pub min_speed_margin_kph: f64,

    /// Distance before the apex searched for brake onset (meters)
    pub brake_lookback_m: f64,

    /// Brake level marking the start of the braking phase (percent)
    pub brake_onset_pct: f64,

    /// Braking-point difference worth reporting (meters)
    pub brake_margin_m: f64,

    /// Distance after the apex searched for full throttle (meters)
    pub throttle_lookahead_m: f64,

    /// Throttle level counted as full throttle (percent)
    pub full_throttle_pct: f64,

    /// Full-throttle-point difference worth reporting (meters)
    pub throttle_margin_m: f64,

    /// Top-speed difference worth reporting (km/h)
    pub top_speed_margin_kph: f64,

    /// Cap on comparison insights, headline included
    pub max_insights: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            corner_window_m: 62.5,
            local_mean_half_span_m: 125.0,
            corner_max_speed_kph: 250.0,
            corner_min_dip_kph: 20.0,
            corner_min_separation_m: 200.0,
            min_speed_margin_kph: 3.0,
            brake_lookback_m: 375.0,
            brake_onset_pct: 10.0,
            brake_margin_m: 5.0,
            throttle_lookahead_m: 375.0,
            full_throttle_pct: 90.0,
            throttle_margin_m: 10.0,
            top_speed_margin_kph: 2.0,
            max_insights: 12,
        }
    }
}

impl ComparisonConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        let distances = [
            ("corner_window_m", self.corner_window_m),
            ("local_mean_half_span_m", self.local_mean_half_span_m),
            ("brake_lookback_m", self.brake_lookback_m),
            ("throttle_lookahead_m", self.throttle_lookahead_m),
        ];
        for (name, value) in distances {
            if !(value > 0.0) {
                return Err(format!("{} must be positive, got {}", name, value));
            }
        }

        let margins = [
            ("corner_min_dip_kph", self.corner_min_dip_kph),
            ("corner_min_separation_m", self.corner_min_separation_m),
            ("min_speed_margin_kph", self.min_speed_margin_kph),
            ("brake_margin_m", self.brake_margin_m),
            ("throttle_margin_m", self.throttle_margin_m),
            ("top_speed_margin_kph", self.top_speed_margin_kph),
        ];
        for (name, value) in margins {
            if value < 0.0 {
                return Err(format!("{} must be non-negative, got {}", name, value));
            }
        }

        if self.max_insights == 0 {
            return Err("max_insights must be at least 1".to_string());
        }

        Ok(())
    }
}
