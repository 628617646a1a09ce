// Numeric kernels for distance-grid resampling
//
// Linear interpolation with constant extrapolation at both ends, and a
// second-order discrete gradient (central differences in the interior,
// one-sided differences at the edges).

/// `count` evenly spaced values covering `[start, end]` inclusive
///
/// The last value is exactly `end`.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut grid: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            grid[count - 1] = end;
            grid
        }
    }
}

/// Interpolate the `(xp, fp)` pairs at every point of `grid`
///
/// `xp` must be non-decreasing. Points left of `xp[0]` take `fp[0]`, points
/// right of the last sample take the last value. Returns `None` when there
/// is nothing to interpolate from.
pub fn interp(grid: &[f64], xp: &[f64], fp: &[f64]) -> Option<Vec<f64>> {
    let n = xp.len().min(fp.len());
    if n == 0 {
        return None;
    }
    let (xp, fp) = (&xp[..n], &fp[..n]);

    let values = grid
        .iter()
        .map(|&x| {
            if x <= xp[0] {
                return fp[0];
            }
            if x >= xp[n - 1] {
                return fp[n - 1];
            }
            // First sample strictly beyond x; always in 1..n here
            let hi = xp.partition_point(|&d| d <= x);
            let lo = hi - 1;
            let span = xp[hi] - xp[lo];
            if span <= 0.0 {
                return fp[hi];
            }
            let t = (x - xp[lo]) / span;
            fp[lo] + t * (fp[hi] - fp[lo])
        })
        .collect();

    Some(values)
}

/// Discrete gradient of `values` with unit spacing
pub fn gradient(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let mut out = Vec::with_capacity(n);
    out.push(values[1] - values[0]);
    for i in 1..n - 1 {
        out.push((values[i + 1] - values[i - 1]) / 2.0);
    }
    out.push(values[n - 1] - values[n - 2]);
    out
}

/// Replace every non-finite value with 0
pub fn sanitize(values: &mut [f64]) {
    for v in values.iter_mut() {
        if !v.is_finite() {
            *v = 0.0;
        }
    }
}
