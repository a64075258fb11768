//! Spectral gap filling
//!
//! Replaces a region of a series with synthetic samples whose frequency
//! content matches the surrounding data. The spectra of context segments
//! before and after the gap (each exactly as long as the gap) are combined,
//! transformed back to the time domain, detrended, and laid on a linear ramp
//! joining the gap edges. A first-order taper then pins the synthetic
//! endpoints to the ramp so the result meets the neighbouring samples
//! without a step.

use std::str::FromStr;

use log::debug;

use crate::utils::{detrend, linspace, Fft};
use crate::{Result, SeriesError};

/// Which context segments feed the synthetic spectrum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapFillMode {
    /// Mean of the pre-gap and post-gap spectra; falls back to whichever
    /// side is available when the other is too short
    #[default]
    Average,
    /// Pre-gap segment only; errors when it is too short
    PreOnly,
    /// Post-gap segment only; errors when it is too short
    PostOnly,
    /// Weighted blend of both spectra, currently 0.5/0.5; same fallback
    /// behaviour as `Average`
    Weighted,
}

impl FromStr for GapFillMode {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "average" => Ok(GapFillMode::Average),
            "pre" | "pre-only" => Ok(GapFillMode::PreOnly),
            "post" | "post-only" => Ok(GapFillMode::PostOnly),
            "weighted" => Ok(GapFillMode::Weighted),
            other => Err(SeriesError::UnrecognizedOption(format!(
                "unknown gap fill mode '{other}'"
            ))),
        }
    }
}

/// Fill the gap `[xa, xb)` with spectrally shaped synthetic samples
///
/// The samples whose x values fall in `[xa, xb)` are replaced; everything
/// else is returned unchanged. Each context segment must be at least as long
/// as the gap itself to be usable.
///
/// # Arguments
/// * `x` - x values, sorted ascending, at least 10 of them
/// * `y` - y values, same length as `x`
/// * `xa` - Gap start (inclusive), must be less than `xb`
/// * `xb` - Gap end (exclusive)
/// * `mode` - Which context segments to use
///
/// # Returns
/// A new y vector with the gap region replaced
pub fn fill_gap(x: &[f64], y: &[f64], xa: f64, xb: f64, mode: GapFillMode) -> Result<Vec<f64>> {
    let n = x.len();
    if n != y.len() {
        return Err(SeriesError::InvalidInput(format!(
            "x and y lengths differ: {n} vs {}",
            y.len()
        )));
    }
    if n < 10 {
        return Err(SeriesError::InvalidInput(
            "gap filling needs at least 10 points".to_string(),
        ));
    }
    if xa >= xb {
        return Err(SeriesError::InvalidRange(format!(
            "gap start {xa} must be less than gap end {xb}"
        )));
    }

    // First indices at or past each boundary
    let idx_a = x.partition_point(|&v| v < xa);
    let idx_b = x.partition_point(|&v| v < xb);

    let gap_size = idx_b - idx_a;
    if gap_size < 2 {
        return Err(SeriesError::InsufficientGapSize(gap_size));
    }

    let has_pre = idx_a >= gap_size;
    let has_post = n - idx_b >= gap_size;

    // Average and Weighted degrade to the single available side
    let mode = match mode {
        GapFillMode::Average | GapFillMode::Weighted => match (has_pre, has_post) {
            (true, true) => mode,
            (true, false) => GapFillMode::PreOnly,
            (false, true) => GapFillMode::PostOnly,
            (false, false) => return Err(SeriesError::InsufficientContextData),
        },
        GapFillMode::PreOnly if !has_pre => return Err(SeriesError::InsufficientContextData),
        GapFillMode::PostOnly if !has_post => return Err(SeriesError::InsufficientContextData),
        other => other,
    };

    debug!("filling gap [{idx_a}, {idx_b}) of {gap_size} points, mode {mode:?}");

    let mut fft = Fft::new();
    let spectrum = match mode {
        GapFillMode::Average | GapFillMode::Weighted => {
            let pre = fft.real_fft(&y[idx_a - gap_size..idx_a], gap_size);
            let post = fft.real_fft(&y[idx_b..idx_b + gap_size], gap_size);
            // Both modes currently blend 50/50
            pre.iter()
                .zip(post.iter())
                .map(|(&a, &b)| 0.5 * a + 0.5 * b)
                .collect::<Vec<_>>()
        }
        GapFillMode::PreOnly => fft.real_fft(&y[idx_a - gap_size..idx_a], gap_size),
        GapFillMode::PostOnly => fft.real_fft(&y[idx_b..idx_b + gap_size], gap_size),
    };

    let time_domain: Vec<f64> = fft.inverse_fft(&spectrum).iter().map(|c| c.re).collect();
    let residual = detrend(&time_domain);

    // Boundary values just outside the gap
    let y_before = if idx_a > 0 { y[idx_a - 1] } else { y[0] };
    let y_after = if idx_b < n { y[idx_b] } else { y[n - 1] };

    // Ramp across gap_size + 2 points, interior only; the boundary samples
    // themselves stay in place
    let ramp_full = linspace(y_before, y_after, gap_size + 2);
    let ramp = &ramp_full[1..=gap_size];

    let mut filled: Vec<f64> = residual
        .iter()
        .zip(ramp.iter())
        .map(|(r, l)| r + l)
        .collect();

    // Taper the edge errors back to zero towards the gap centre
    let start_error = ramp[0] - filled[0];
    let end_error = ramp[gap_size - 1] - filled[gap_size - 1];
    let t = linspace(0.0, 1.0, gap_size);
    for (i, v) in filled.iter_mut().enumerate() {
        *v += start_error * (1.0 - t[i]) + end_error * t[i];
    }

    let mut result = y.to_vec();
    result[idx_a..idx_b].copy_from_slice(&filled);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn sine_series(n: usize, freq: f64) -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&v| (2.0 * PI * freq * v).sin()).collect();
        (x, y)
    }

    #[test]
    fn test_fill_preserves_outside_samples() {
        let (x, y) = sine_series(100, 0.05);
        let filled = fill_gap(&x, &y, 40.0, 60.0, GapFillMode::Average).unwrap();
        assert_eq!(filled.len(), 100);
        for i in 0..40 {
            assert_relative_eq!(filled[i], y[i]);
        }
        for i in 60..100 {
            assert_relative_eq!(filled[i], y[i]);
        }
        // The gap region was actually rewritten
        assert!((0..20).any(|i| (filled[40 + i] - y[40 + i]).abs() > 1e-12));
    }

    #[test]
    fn test_fill_endpoints_meet_ramp() {
        let (x, y) = sine_series(100, 0.05);
        let filled = fill_gap(&x, &y, 40.0, 60.0, GapFillMode::Average).unwrap();

        // After the taper, the first and last synthetic samples sit exactly
        // on the linear ramp between the boundary values
        let ramp = crate::utils::linspace(y[39], y[60], 22);
        assert_relative_eq!(filled[40], ramp[1], epsilon = 1e-9);
        assert_relative_eq!(filled[59], ramp[20], epsilon = 1e-9);
    }

    #[test]
    fn test_fill_carries_the_context_tone() {
        // A whole number of periods per segment keeps the spectra clean. The
        // fill is pinned to the boundary ramp, so it will not match the
        // hidden sine sample for sample, but its dominant frequency must be
        // the context tone (bin 2 of a 20-point transform at freq 0.1)
        let (x, y) = sine_series(100, 0.1);
        let filled = fill_gap(&x, &y, 40.0, 60.0, GapFillMode::Average).unwrap();

        let (_, amps) = crate::analysis::amplitude_spectrum(&filled[40..60], 1.0, 20).unwrap();
        let peak_bin = amps
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| k)
            .unwrap();
        assert_eq!(peak_bin, 2);

        // Deviation from the hidden tone stays below the edge ramp height
        let worst = (40..60)
            .map(|i| (filled[i] - y[i]).abs())
            .fold(0.0f64, f64::max);
        assert!(worst < 0.7, "fill error too large: {worst}");
    }

    #[test]
    fn test_modes_agree_on_symmetric_data() {
        let (x, y) = sine_series(120, 0.1);
        let avg = fill_gap(&x, &y, 50.0, 70.0, GapFillMode::Average).unwrap();
        let weighted = fill_gap(&x, &y, 50.0, 70.0, GapFillMode::Weighted).unwrap();
        // 0.5/0.5 weighting is identical to the plain average
        for (a, w) in avg.iter().zip(weighted.iter()) {
            assert_relative_eq!(a, w, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_average_falls_back_to_post_near_start() {
        let (x, y) = sine_series(100, 0.05);
        // Gap [0, 5): no pre-gap context at all
        let filled = fill_gap(&x, &y, 0.0, 5.0, GapFillMode::Average).unwrap();
        let post_only = fill_gap(&x, &y, 0.0, 5.0, GapFillMode::PostOnly).unwrap();
        for (a, p) in filled.iter().zip(post_only.iter()) {
            assert_relative_eq!(a, p, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_pre_only_fails_without_context() {
        let (x, y) = sine_series(100, 0.05);
        assert!(matches!(
            fill_gap(&x, &y, 0.0, 5.0, GapFillMode::PreOnly),
            Err(SeriesError::InsufficientContextData)
        ));
    }

    #[test]
    fn test_whole_signal_gap_fails() {
        let (x, y) = sine_series(100, 0.05);
        assert!(matches!(
            fill_gap(&x, &y, 0.0, 100.0, GapFillMode::Average),
            Err(SeriesError::InsufficientContextData)
        ));
    }

    #[test]
    fn test_invalid_range() {
        let (x, y) = sine_series(100, 0.05);
        assert!(matches!(
            fill_gap(&x, &y, 60.0, 40.0, GapFillMode::Average),
            Err(SeriesError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_tiny_gap_rejected() {
        let (x, y) = sine_series(100, 0.05);
        assert!(matches!(
            fill_gap(&x, &y, 40.0, 40.5, GapFillMode::Average),
            Err(SeriesError::InsufficientGapSize(_))
        ));
    }

    #[test]
    fn test_short_series_rejected() {
        let x: Vec<f64> = (0..5).map(|i| i as f64).collect();
        let y = vec![0.0; 5];
        assert!(fill_gap(&x, &y, 1.0, 3.0, GapFillMode::Average).is_err());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("average".parse::<GapFillMode>().unwrap(), GapFillMode::Average);
        assert_eq!("pre".parse::<GapFillMode>().unwrap(), GapFillMode::PreOnly);
        assert_eq!("POST".parse::<GapFillMode>().unwrap(), GapFillMode::PostOnly);
        assert!("sideways".parse::<GapFillMode>().is_err());
    }
}
