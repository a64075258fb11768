//! Gaussian and selective median smoothing
//!
//! The Gaussian smoother is a plain convolution with a truncated Gaussian
//! kernel. The median smoother is selective: it computes the neighbourhood
//! median for every sample but only replaces samples whose deviation from
//! that median exceeds a threshold, which removes spikes without blurring
//! the rest of the signal.

use log::debug;

use crate::{Result, SeriesError};

/// Smooth with a Gaussian kernel
///
/// # Arguments
/// * `y` - Input samples
/// * `sigma` - Kernel width in samples, must be positive
/// * `truncate` - Kernel radius in units of sigma; 4.0 is the usual choice
///
/// The kernel radius is `(truncate * sigma + 0.5)` truncated to an integer,
/// and edges extend the nearest sample.
pub fn gaussian_smooth(y: &[f64], sigma: f64, truncate: f64) -> Result<Vec<f64>> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(SeriesError::InvalidInput(format!(
            "sigma must be positive, got {sigma}"
        )));
    }
    if !(truncate.is_finite() && truncate > 0.0) {
        return Err(SeriesError::InvalidInput(format!(
            "truncate must be positive, got {truncate}"
        )));
    }

    let lw = (truncate * sigma + 0.5) as usize;
    let mut kernel: Vec<f64> = (0..=2 * lw)
        .map(|k| {
            let d = k as f64 - lw as f64;
            (-0.5 * (d / sigma).powi(2)).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }

    let n = y.len();
    debug!("gaussian smoothing {n} samples, sigma {sigma}, kernel radius {lw}");

    Ok((0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, &w)| {
                    let j = i as isize + k as isize - lw as isize;
                    let j = j.clamp(0, n as isize - 1) as usize;
                    w * y[j]
                })
                .sum()
        })
        .collect())
}

/// Replace outliers with the neighbourhood median
///
/// # Arguments
/// * `y` - Input samples
/// * `window` - Median window size, odd and at least 3
/// * `threshold` - A sample is replaced only when it deviates from its
///   window median by more than this
///
/// # Returns
/// The smoothed samples and how many were replaced
pub fn median_smooth(y: &[f64], window: usize, threshold: f64) -> Result<(Vec<f64>, usize)> {
    if window < 3 || window % 2 == 0 {
        return Err(SeriesError::InvalidInput(format!(
            "median window must be odd and >= 3, got {window}"
        )));
    }
    if !(threshold.is_finite() && threshold >= 0.0) {
        return Err(SeriesError::InvalidInput(format!(
            "threshold must be non-negative, got {threshold}"
        )));
    }

    let n = y.len();
    let half = window / 2;
    let mut out = y.to_vec();
    let mut replaced = 0usize;
    let mut buf = Vec::with_capacity(window);

    for i in 0..n {
        buf.clear();
        for k in 0..window {
            let j = (i as isize + k as isize - half as isize).clamp(0, n as isize - 1) as usize;
            buf.push(y[j]);
        }
        buf.sort_by(|a, b| a.total_cmp(b));
        let med = buf[half];
        if (y[i] - med).abs() > threshold {
            out[i] = med;
            replaced += 1;
        }
    }

    debug!("median smoothing replaced {replaced} of {n} samples");
    Ok((out, replaced))
}
