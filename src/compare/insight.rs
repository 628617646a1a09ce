// Comparison insight records and their rendered text

use serde::{Deserialize, Serialize};
use std::fmt;

/// What part of the lap an insight talks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    LapTime,
    MinimumSpeed,
    Braking,
    Throttle,
    TopSpeed,
    /// Fallback text when nothing material was found
    Summary,
}

impl fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InsightCategory::LapTime => "lap time",
            InsightCategory::MinimumSpeed => "minimum speed",
            InsightCategory::Braking => "braking",
            InsightCategory::Throttle => "throttle",
            InsightCategory::TopSpeed => "top speed",
            InsightCategory::Summary => "summary",
        };
        f.write_str(name)
    }
}

/// One finding from a driver-to-driver comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonInsight {
    pub category: InsightCategory,
    /// 1-based corner number for corner findings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn: Option<usize>,
    /// Grid distance the finding is anchored to (meters)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
    /// Driver the finding favours
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favoured: Option<String>,
    /// Unsigned size of the advantage: seconds, km/h or meters by category
    pub magnitude: f64,
    pub message: String,
}

impl ComparisonInsight {
    pub fn lap_time(faster: &str, gap_s: f64) -> Self {
        Self {
            category: InsightCategory::LapTime,
            turn: None,
            distance_m: None,
            favoured: Some(faster.to_string()),
            magnitude: gap_s,
            message: format!("Lap time: {} is faster by {:.3}s.", faster, gap_s),
        }
    }

    /// Identical lap times; names are sorted so the text does not depend on
    /// argument order
    pub fn lap_time_level(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            category: InsightCategory::LapTime,
            turn: None,
            distance_m: None,
            favoured: None,
            magnitude: 0.0,
            message: format!("Lap time: {} and {} are level.", first, second),
        }
    }

    pub fn minimum_speed(turn: usize, distance_m: f64, favoured: &str, kph: f64) -> Self {
        Self {
            category: InsightCategory::MinimumSpeed,
            turn: Some(turn),
            distance_m: Some(distance_m),
            favoured: Some(favoured.to_string()),
            magnitude: kph,
            message: format!(
                "Turn {} ({:.0}m): {} carries +{:.0} km/h minimum speed.",
                turn, distance_m, favoured, kph
            ),
        }
    }

    pub fn braking(turn: usize, distance_m: f64, later: &str, meters: f64) -> Self {
        Self {
            category: InsightCategory::Braking,
            turn: Some(turn),
            distance_m: Some(distance_m),
            favoured: Some(later.to_string()),
            magnitude: meters,
            message: format!(
                "Braking into Turn {}: {} brakes {:.0}m later.",
                turn, later, meters
            ),
        }
    }

    pub fn throttle(turn: usize, distance_m: f64, earlier: &str, meters: f64) -> Self {
        Self {
            category: InsightCategory::Throttle,
            turn: Some(turn),
            distance_m: Some(distance_m),
            favoured: Some(earlier.to_string()),
            magnitude: meters,
            message: format!(
                "Exit of Turn {}: {} reaches full throttle {:.0}m earlier.",
                turn, earlier, meters
            ),
        }
    }

    pub fn top_speed(distance_m: f64, faster: &str, kph: f64) -> Self {
        Self {
            category: InsightCategory::TopSpeed,
            turn: None,
            distance_m: Some(distance_m),
            favoured: Some(faster.to_string()),
            magnitude: kph,
            message: format!(
                "Top speed: {} is faster by {:.0} km/h on the main straight.",
                faster, kph
            ),
        }
    }

    pub fn summary(message: impl Into<String>) -> Self {
        Self {
            category: InsightCategory::Summary,
            turn: None,
            distance_m: None,
            favoured: None,
            magnitude: 0.0,
            message: message.into(),
        }
    }

    pub fn no_differences(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self::summary(format!(
            "No significant differences found between {} and {}.",
            first, second
        ))
    }

    pub fn insufficient_data() -> Self {
        Self::summary("Insufficient data for analysis.")
    }
}

impl fmt::Display for ComparisonInsight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
