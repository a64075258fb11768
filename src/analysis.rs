//! Spectrum and error analysis
//!
//! [`amplitude_spectrum`] gives the one-sided amplitude spectrum with
//! forward normalization (each bin divided by the transform length), so a
//! unit sine shows up as a 0.5 amplitude peak. [`error_stats`] compares an
//! estimate against a reference series point by point.

use crate::utils::Fft;
use crate::{Result, SeriesError};

/// One-sided amplitude spectrum of a real signal
///
/// # Arguments
/// * `y` - Input samples
/// * `sample_rate` - Samples per unit time; sets the frequency axis
/// * `n_fft` - Transform length; the input is zero-padded or truncated to
///   fit. The frequency axis always uses `n_fft`, not the input length.
///
/// # Returns
/// `(frequencies, amplitudes)` over bins `0 ..= n_fft / 2`
pub fn amplitude_spectrum(
    y: &[f64],
    sample_rate: f64,
    n_fft: usize,
) -> Result<(Vec<f64>, Vec<f64>)> {
    if y.is_empty() {
        return Err(SeriesError::InvalidInput(
            "cannot analyze an empty signal".to_string(),
        ));
    }
    if n_fft == 0 {
        return Err(SeriesError::InvalidInput(
            "transform length must be at least 1".to_string(),
        ));
    }
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(SeriesError::InvalidInput(format!(
            "sample rate must be positive, got {sample_rate}"
        )));
    }

    let mut fft = Fft::new();
    let input = if y.len() > n_fft { &y[..n_fft] } else { y };
    let spectrum = fft.real_fft(input, n_fft);

    let n_bins = n_fft / 2 + 1;
    let scale = 1.0 / n_fft as f64;
    let amplitudes: Vec<f64> = spectrum[..n_bins].iter().map(|c| c.norm() * scale).collect();
    let frequencies: Vec<f64> = (0..n_bins)
        .map(|k| k as f64 * sample_rate / n_fft as f64)
        .collect();

    Ok((frequencies, amplitudes))
}

/// Histogram of values over a fixed range (`np.histogram` semantics)
///
/// # Arguments
/// * `y` - Input values; samples outside the range are ignored
/// * `bins` - Number of uniform bins, at least 1
/// * `range` - `(min, max)` of the binned interval; the last bin is closed
///   so a value equal to `max` lands in it
/// * `density` - When true, counts are scaled so the histogram integrates
///   to 1 over the range
///
/// # Returns
/// `(counts, bin_edges)` with `bins` counts and `bins + 1` edges
pub fn histogram(
    y: &[f64],
    bins: usize,
    range: (f64, f64),
    density: bool,
) -> Result<(Vec<f64>, Vec<f64>)> {
    if bins < 1 {
        return Err(SeriesError::InvalidInput(
            "histogram needs at least 1 bin".to_string(),
        ));
    }
    let (min, max) = range;
    if !(min.is_finite() && max.is_finite()) || max <= min {
        return Err(SeriesError::InvalidRange(format!(
            "histogram range ({min}, {max}) is not an increasing interval"
        )));
    }

    let edges = crate::utils::linspace(min, max, bins + 1);
    let width = (max - min) / bins as f64;

    let mut counts = vec![0.0; bins];
    for &v in y {
        if v < min || v > max {
            continue;
        }
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1.0;
    }

    if density {
        let total: f64 = counts.iter().sum();
        if total > 0.0 {
            for c in &mut counts {
                *c /= total * width;
            }
        }
    }

    Ok((counts, edges))
}

/// Point-by-point error statistics of an estimate against a reference
///
/// Relative errors are computed only where the reference is nonzero;
/// `n_valid_rel` counts those points. All values are fractions, not
/// percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorStats {
    pub abs_mean: f64,
    pub abs_std: f64,
    pub abs_max: f64,
    pub rel_mean: f64,
    pub rel_std: f64,
    pub rel_max: f64,
    /// Points with a nonzero reference, where a relative error exists
    pub n_valid_rel: usize,
}

/// Compare `estimate` against `reference`, element by element
///
/// Errors are signed (`estimate - reference`); the `*_max` fields hold the
/// largest magnitude.
pub fn error_stats(reference: &[f64], estimate: &[f64]) -> Result<ErrorStats> {
    if reference.len() != estimate.len() {
        return Err(SeriesError::InvalidInput(format!(
            "reference and estimate lengths differ: {} vs {}",
            reference.len(),
            estimate.len()
        )));
    }
    if reference.is_empty() {
        return Err(SeriesError::InvalidInput(
            "cannot compute error statistics of empty series".to_string(),
        ));
    }

    let abs_errors: Vec<f64> = estimate
        .iter()
        .zip(reference.iter())
        .map(|(e, r)| e - r)
        .collect();
    let rel_errors: Vec<f64> = estimate
        .iter()
        .zip(reference.iter())
        .filter(|(_, r)| **r != 0.0)
        .map(|(e, r)| (e - r) / r)
        .collect();

    let (abs_mean, abs_std, abs_max) = moments(&abs_errors);
    let (rel_mean, rel_std, rel_max) = if rel_errors.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        moments(&rel_errors)
    };

    Ok(ErrorStats {
        abs_mean,
        abs_std,
        abs_max,
        rel_mean,
        rel_std,
        rel_max,
        n_valid_rel: rel_errors.len(),
    })
}

/// Mean, population standard deviation, and max magnitude
fn moments(values: &[f64]) -> (f64, f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let max = values.iter().fold(0.0f64, |a, &b| a.max(b.abs()));
    (mean, var.sqrt(), max)
}
