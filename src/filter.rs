//! Anti-aliasing filters for the decimation path of the resampler
//!
//! Downsampling keeps every q-th sample; without a low-pass ahead of it,
//! energy above the new Nyquist frequency folds back into the output. Two
//! filter families are provided: a linear-phase windowed-sinc FIR and an
//! 8th-order Butterworth low-pass built from RBJ biquad sections. Both are
//! applied zero-phase so the decimated samples stay aligned with the input
//! grid.

use std::str::FromStr;

use log::debug;

use crate::{Result, SeriesError};

/// Anti-aliasing filter used before decimation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecimationFilter {
    /// Hamming-windowed-sinc FIR low-pass, 20q+1 taps
    #[default]
    Fir,
    /// 8th-order Butterworth low-pass (cascade of 4 biquads)
    Iir,
    /// No filtering; plain interpolation (may alias)
    None,
}

impl FromStr for DecimationFilter {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fir" => Ok(DecimationFilter::Fir),
            "iir" => Ok(DecimationFilter::Iir),
            "none" => Ok(DecimationFilter::None),
            other => Err(SeriesError::UnrecognizedOption(format!(
                "unknown decimation filter '{other}'"
            ))),
        }
    }
}

/// Low-pass filter and keep every q-th sample
///
/// # Arguments
/// * `y` - Input samples
/// * `q` - Integer decimation factor, >= 2
/// * `filter` - Anti-aliasing filter family; `None` skips filtering
///
/// # Returns
/// The decimated samples, `ceil(len / q)` of them
pub fn decimate(y: &[f64], q: usize, filter: DecimationFilter) -> Result<Vec<f64>> {
    if q < 2 {
        return Err(SeriesError::InvalidInput(format!(
            "decimation factor must be >= 2, got {q}"
        )));
    }
    if y.len() < 2 {
        return Err(SeriesError::InvalidInput(
            "decimation needs at least 2 samples".to_string(),
        ));
    }

    let filtered = match filter {
        DecimationFilter::Fir => {
            let taps = design_fir_lowpass(20 * q + 1, 1.0 / q as f64);
            debug!("decimating by {q} with a {}-tap FIR low-pass", taps.len());
            convolve_zero_phase(y, &taps)
        }
        DecimationFilter::Iir => {
            let sections = butterworth_lowpass_sections(8, 0.8 / (2.0 * q as f64));
            debug!("decimating by {q} with an order-8 Butterworth low-pass");
            filtfilt(&sections, y)
        }
        DecimationFilter::None => y.to_vec(),
    };

    Ok(filtered.iter().step_by(q).copied().collect())
}

/// Design a Hamming-windowed-sinc FIR low-pass
///
/// # Arguments
/// * `num_taps` - Filter length; odd lengths give an exactly linear phase
/// * `cutoff` - Cutoff as a fraction of the Nyquist frequency, in (0, 1]
///
/// The taps are normalized to unity DC gain.
pub fn design_fir_lowpass(num_taps: usize, cutoff: f64) -> Vec<f64> {
    let mid = (num_taps - 1) as f64 / 2.0;
    let wc = std::f64::consts::PI * cutoff;

    let mut taps: Vec<f64> = (0..num_taps)
        .map(|k| {
            let t = k as f64 - mid;
            let sinc = if t.abs() < 1e-12 {
                wc / std::f64::consts::PI
            } else {
                (wc * t).sin() / (std::f64::consts::PI * t)
            };
            let window = 0.54
                - 0.46 * (2.0 * std::f64::consts::PI * k as f64 / (num_taps - 1) as f64).cos();
            sinc * window
        })
        .collect();

    let sum: f64 = taps.iter().sum();
    for t in &mut taps {
        *t /= sum;
    }
    taps
}

/// Convolve with a symmetric kernel, same-length output, edge values replicated
///
/// A symmetric FIR has exactly linear phase, so centering the kernel on each
/// output sample cancels the group delay.
pub fn convolve_zero_phase(y: &[f64], taps: &[f64]) -> Vec<f64> {
    let n = y.len();
    let half = taps.len() / 2;

    (0..n)
        .map(|i| {
            taps.iter()
                .enumerate()
                .map(|(k, &t)| {
                    let j = i as isize + k as isize - half as isize;
                    let j = j.clamp(0, n as isize - 1) as usize;
                    t * y[j]
                })
                .sum()
        })
        .collect()
}

/// Design a Hamming-windowed-sinc FIR band-pass
///
/// # Arguments
/// * `num_taps` - Filter length; bumped to the next odd value when even,
///   since a band-pass needs a symmetric odd-length kernel
/// * `low` - Lower band edge as a fraction of the Nyquist frequency
/// * `high` - Upper band edge as a fraction of the Nyquist frequency
///
/// A `low` of 0 degrades to the plain low-pass. The taps are normalized to
/// unity gain at the band centre.
pub fn design_fir_bandpass(num_taps: usize, low: f64, high: f64) -> Result<Vec<f64>> {
    if !(0.0..1.0).contains(&low) || high <= low || high > 1.0 {
        return Err(SeriesError::InvalidRange(format!(
            "band edges must satisfy 0 <= low < high <= 1, got {low} and {high}"
        )));
    }
    if num_taps < 3 {
        return Err(SeriesError::InvalidInput(format!(
            "band-pass needs at least 3 taps, got {num_taps}"
        )));
    }

    if low == 0.0 {
        return Ok(design_fir_lowpass(num_taps | 1, high));
    }

    let num_taps = num_taps | 1;
    let hp = design_fir_lowpass(num_taps, high);
    let lp = design_fir_lowpass(num_taps, low);
    let mut taps: Vec<f64> = hp.iter().zip(lp.iter()).map(|(a, b)| a - b).collect();

    // Unity gain at the band centre
    let mid = (num_taps - 1) as f64 / 2.0;
    let wc = std::f64::consts::PI * 0.5 * (low + high);
    let gain: f64 = taps
        .iter()
        .enumerate()
        .map(|(k, &t)| t * (wc * (k as f64 - mid)).cos())
        .sum();
    for t in &mut taps {
        *t /= gain;
    }

    Ok(taps)
}

/// Output alignment of [`convolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvolveMode {
    /// Every overlap position; `signal + kernel - 1` samples
    Full,
    /// Centred, as long as the longer input
    #[default]
    Same,
    /// Only positions where the inputs overlap completely
    Valid,
}

impl FromStr for ConvolveMode {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(ConvolveMode::Full),
            "same" => Ok(ConvolveMode::Same),
            "valid" => Ok(ConvolveMode::Valid),
            other => Err(SeriesError::UnrecognizedOption(format!(
                "unknown convolution mode '{other}'"
            ))),
        }
    }
}

/// Discrete convolution of a signal with a kernel (`np.convolve` semantics)
pub fn convolve(signal: &[f64], kernel: &[f64], mode: ConvolveMode) -> Result<Vec<f64>> {
    if signal.is_empty() || kernel.is_empty() {
        return Err(SeriesError::InvalidInput(
            "convolution inputs must not be empty".to_string(),
        ));
    }

    let n = signal.len();
    let m = kernel.len();
    let full_len = n + m - 1;

    let full: Vec<f64> = (0..full_len)
        .map(|k| {
            let j_lo = k.saturating_sub(m - 1);
            let j_hi = k.min(n - 1);
            (j_lo..=j_hi).map(|j| signal[j] * kernel[k - j]).sum()
        })
        .collect();

    let (longer, shorter) = (n.max(m), n.min(m));
    Ok(match mode {
        ConvolveMode::Full => full,
        ConvolveMode::Same => {
            let start = (shorter - 1) / 2;
            full[start..start + longer].to_vec()
        }
        ConvolveMode::Valid => {
            let start = shorter - 1;
            full[start..start + (longer - shorter + 1)].to_vec()
        }
    })
}

/// One second-order IIR section in direct form I coefficients, a0-normalized
#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    /// RBJ low-pass section
    ///
    /// # Arguments
    /// * `freq` - Cutoff in cycles per sample (Nyquist is 0.5)
    /// * `q` - Section quality factor
    pub fn lowpass(freq: f64, q: f64) -> Self {
        let omega = 2.0 * std::f64::consts::PI * freq;
        let sn = omega.sin();
        let cs = omega.cos();
        let alpha = sn / (2.0 * q);

        let b0 = (1.0 - cs) / 2.0;
        let b1 = 1.0 - cs;
        let b2 = (1.0 - cs) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cs;
        let a2 = 1.0 - alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Run the section over a signal (direct form II transposed)
    fn process(&self, input: &[f64]) -> Vec<f64> {
        let mut s1 = 0.0;
        let mut s2 = 0.0;
        input
            .iter()
            .map(|&x| {
                let y = self.b0 * x + s1;
                s1 = self.b1 * x - self.a1 * y + s2;
                s2 = self.b2 * x - self.a2 * y;
                y
            })
            .collect()
    }
}

/// Butterworth low-pass as a cascade of biquad sections
///
/// # Arguments
/// * `order` - Filter order, must be even
/// * `freq` - Cutoff in cycles per sample (Nyquist is 0.5)
///
/// Section Q values come from the Butterworth pole angles:
/// `Q_k = 1 / (2 cos(pi (2k+1) / (2 order)))`.
pub fn butterworth_lowpass_sections(order: usize, freq: f64) -> Vec<Biquad> {
    debug_assert!(order % 2 == 0);
    (0..order / 2)
        .map(|k| {
            let angle = std::f64::consts::PI * (2 * k + 1) as f64 / (2 * order) as f64;
            Biquad::lowpass(freq, 1.0 / (2.0 * angle.cos()))
        })
        .collect()
}

/// Zero-phase IIR filtering: forward pass, then a reversed pass
///
/// Transient edge artifacts are reduced by odd-reflection padding at both
/// ends, the same scheme scipy's `filtfilt` uses.
pub fn filtfilt(sections: &[Biquad], y: &[f64]) -> Vec<f64> {
    let n = y.len();
    let pad = (3 * (2 * sections.len() * 2 + 1)).min(n.saturating_sub(1));

    // Odd reflection around the end samples
    let mut padded = Vec::with_capacity(n + 2 * pad);
    for i in (1..=pad).rev() {
        padded.push(2.0 * y[0] - y[i]);
    }
    padded.extend_from_slice(y);
    for i in 1..=pad {
        padded.push(2.0 * y[n - 1] - y[n - 1 - i]);
    }

    let mut data = padded;
    for section in sections {
        data = section.process(&data);
    }
    data.reverse();
    for section in sections {
        data = section.process(&data);
    }
    data.reverse();

    data[pad..(pad + n)].to_vec()
}
