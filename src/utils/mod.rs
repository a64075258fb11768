//! Shared numeric utilities

pub mod fft;

pub use fft::Fft;

/// Remove the best-fit linear trend from a segment
///
/// Fits `a + b*i` over the sample index by least squares and subtracts it,
/// leaving a zero-mean, zero-net-slope residual.
pub fn detrend(samples: &[f64]) -> Vec<f64> {
    let n = samples.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let nf = n as f64;
    let mean_t = (nf - 1.0) / 2.0;
    let mean_y: f64 = samples.iter().sum::<f64>() / nf;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, &y) in samples.iter().enumerate() {
        let dt = i as f64 - mean_t;
        num += dt * (y - mean_y);
        den += dt * dt;
    }

    let slope = if den > 0.0 { num / den } else { 0.0 };
    let intercept = mean_y - slope * mean_t;

    samples
        .iter()
        .enumerate()
        .map(|(i, &y)| y - (intercept + slope * i as f64))
        .collect()
}

/// Evenly spaced values over `[start, stop]`, endpoint included
///
/// Matches numpy's `linspace(start, stop, n)`. Requires `n >= 2`; `n == 0`
/// yields an empty vector and `n == 1` yields `[start]`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        stop
                    } else {
                        start + i as f64 * step
                    }
                })
                .collect()
        }
    }
}

/// Values `start + i*step` strictly below `stop`
///
/// Matches numpy's `arange(start, stop, step)` for positive steps. Each value
/// is computed as `start + i*step` rather than by accumulation, so rounding
/// does not drift over long grids.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    debug_assert!(step > 0.0);
    let mut out = Vec::new();
    let mut i = 0usize;
    loop {
        let v = start + i as f64 * step;
        if v >= stop {
            break;
        }
        out.push(v);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_detrend_removes_line() {
        let samples: Vec<f64> = (0..50).map(|i| 3.0 + 0.25 * i as f64).collect();
        let residual = detrend(&samples);
        for r in residual {
            assert_relative_eq!(r, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_detrend_preserves_oscillation() {
        // A sine plus a line: detrending should leave roughly the sine
        let samples: Vec<f64> = (0..100)
            .map(|i| {
                let t = i as f64;
                (2.0 * std::f64::consts::PI * 0.1 * t).sin() + 0.5 * t - 4.0
            })
            .collect();
        let residual = detrend(&samples);
        let mean: f64 = residual.iter().sum::<f64>() / residual.len() as f64;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-10);
        // The oscillation survives
        let peak = residual.iter().cloned().fold(0.0f64, |a, b| a.max(b.abs()));
        assert!(peak > 0.8);
    }

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(-1.0, 1.0, 5);
        assert_eq!(v.len(), 5);
        assert_relative_eq!(v[0], -1.0);
        assert_relative_eq!(v[2], 0.0, epsilon = 1e-12);
        assert_relative_eq!(v[4], 1.0);
    }

    #[test]
    fn test_arange_excludes_stop() {
        let v = arange(0.0, 1.0, 0.25);
        assert_eq!(v.len(), 4);
        assert_relative_eq!(v[3], 0.75);
    }

    #[test]
    fn test_arange_no_drift() {
        let v = arange(0.0, 10.0, 0.1);
        assert_eq!(v.len(), 100);
        assert_relative_eq!(v[99], 9.9, epsilon = 1e-9);
    }
}
