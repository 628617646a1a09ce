// Lap-time statistics for stint trend fitting
//
// Mean and population standard deviation go through trueno::Vector. Lap
// times are shifted by the first value before the f32 conversion so the
// spread (tenths of a second) is not lost next to the magnitude (~90 s).
// The least-squares slope stays in f64.

use crate::stint::CleanLap;
use trueno::Vector;

/// Mean and population standard deviation of `values`
///
/// Returns `None` for an empty slice.
pub fn mean_and_stddev(values: &[f64]) -> Option<(f64, f64)> {
    let origin = *values.first()?;
    let centered: Vec<f32> = values.iter().map(|v| (v - origin) as f32).collect();

    let v = Vector::from_slice(&centered);
    let mean = v.mean().ok()?;
    let stddev = v.stddev().unwrap_or(0.0);

    Some((origin + f64::from(mean), f64::from(stddev)))
}

/// Keep laps within `sigma` standard deviations of the mean (strict)
///
/// A stint with no spread at all keeps every lap.
pub fn reject_outliers(laps: &[CleanLap], sigma: f64) -> Vec<CleanLap> {
    let times: Vec<f64> = laps.iter().map(|l| l.lap_time).collect();
    let Some((mean, stddev)) = mean_and_stddev(&times) else {
        return Vec::new();
    };

    if stddev <= f64::EPSILON {
        return laps.to_vec();
    }

    laps.iter()
        .filter(|l| (l.lap_time - mean).abs() < sigma * stddev)
        .copied()
        .collect()
}

/// Ordinary least-squares slope of lap time against lap number (s/lap)
///
/// Returns `None` with fewer than two distinct lap numbers.
pub fn lap_time_slope(laps: &[CleanLap]) -> Option<f64> {
    if laps.len() < 2 {
        return None;
    }

    let n = laps.len() as f64;
    let mean_x = laps.iter().map(|l| f64::from(l.lap_number)).sum::<f64>() / n;
    let mean_y = laps.iter().map(|l| l.lap_time).sum::<f64>() / n;

    let (sxy, sxx) = laps.iter().fold((0.0, 0.0), |(sxy, sxx), l| {
        let dx = f64::from(l.lap_number) - mean_x;
        (sxy + dx * (l.lap_time - mean_y), sxx + dx * dx)
    });

    if sxx == 0.0 {
        return None;
    }
    Some(sxy / sxx)
}
