//! Point spacing and 1-D interpolation.
//!
//! These mirror the array primitives the schedules are defined in terms of:
//!
//! - `linspace(start, end, steps)`: a single point yields `[start]`, and the last
//!   point is exactly `end` (no accumulated rounding at the boundary)
//! - `interp(x, xp, fp)`: piecewise-linear with edge clamping
//! - `loglinear_interp(table, k)`: resample a decreasing table in log space

/// Generate `steps` evenly spaced points between `start` and `end` (inclusive).
pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (steps as f64 - 1.0);
            let mut out: Vec<f64> = (0..steps).map(|i| start + step * i as f64).collect();
            out[steps - 1] = end;
            out
        }
    }
}

/// Piecewise-linear interpolation of `x` against ascending sample points `xp`.
///
/// Values outside `[xp[0], xp[last]]` clamp to the edge samples. A single sample
/// point yields that sample everywhere. Empty inputs yield NaN.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let n = xp.len().min(fp.len());
    if n == 0 {
        return f64::NAN;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }

    // First index with xp[hi] > x; guaranteed in 1..n by the checks above.
    let hi = xp[..n].partition_point(|&v| v <= x);
    let lo = hi - 1;
    let span = xp[hi] - xp[lo];
    if span <= 0.0 {
        return fp[hi];
    }
    let w = (x - xp[lo]) / span;
    fp[lo] + w * (fp[hi] - fp[lo])
}

/// Log-linear resampling of a decreasing table to `num_steps` points.
///
/// The table is reversed to ascending order, interpolated linearly in log space
/// over evenly spaced positions, exponentiated, and reversed back. Resampling a
/// table to its own length returns the original values (up to `exp(ln(x))`
/// rounding).
///
/// All entries of `t_steps` must be positive.
pub fn loglinear_interp(t_steps: &[f64], num_steps: usize) -> Vec<f64> {
    let xs = linspace(0.0, 1.0, t_steps.len());
    let ys: Vec<f64> = t_steps.iter().rev().map(|v| v.ln()).collect();

    let mut out: Vec<f64> = linspace(0.0, 1.0, num_steps)
        .into_iter()
        .map(|x| interp(x, &xs, &ys).exp())
        .collect();
    out.reverse();
    out
}
