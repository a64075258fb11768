//! Waveform generation and degradation
//!
//! Generators evaluate a waveform over caller-supplied x values, so they
//! compose with any grid (uniform or not). The degradation helpers add
//! noise or spikes in place; both take the random source as an argument so
//! results are reproducible with a seeded generator.

use rand::Rng;

use crate::{Result, SeriesError};

/// Sine wave `offset + amplitude * sin(2*pi*frequency*t + phase)`
pub fn sine_wave(t: &[f64], amplitude: f64, frequency: f64, phase: f64, offset: f64) -> Vec<f64> {
    t.iter()
        .map(|&v| offset + amplitude * (2.0 * std::f64::consts::PI * frequency * v + phase).sin())
        .collect()
}

/// Square wave switching between +1 and -1
///
/// # Arguments
/// * `t` - Sample times
/// * `frequency` - Cycles per unit time
/// * `duty` - Fraction of each cycle spent at +1, in [0, 1]
pub fn square_wave(t: &[f64], frequency: f64, duty: f64) -> Result<Vec<f64>> {
    square_wave_with_duty(t, frequency, &vec![duty; t.len()])
}

/// Square wave with a per-sample duty cycle
///
/// Lets the duty come from another series evaluated over the same times.
pub fn square_wave_with_duty(t: &[f64], frequency: f64, duty: &[f64]) -> Result<Vec<f64>> {
    if duty.len() != t.len() {
        return Err(SeriesError::InvalidInput(format!(
            "duty length {} does not match time length {}",
            duty.len(),
            t.len()
        )));
    }
    if duty.iter().any(|&d| !(0.0..=1.0).contains(&d)) {
        return Err(SeriesError::InvalidInput(
            "duty cycle values must be in [0, 1]".to_string(),
        ));
    }

    Ok(t.iter()
        .zip(duty.iter())
        .map(|(&v, &d)| {
            let cycle = (frequency * v).rem_euclid(1.0);
            if cycle < d {
                1.0
            } else {
                -1.0
            }
        })
        .collect())
}

/// Output of [`gauss_pulse`]: the modulated pulse plus its quadrature and
/// envelope components
#[derive(Debug, Clone)]
pub struct GaussPulse {
    /// In-phase component, `env * cos(2*pi*fc*t)`
    pub in_phase: Vec<f64>,
    /// Quadrature component, `env * sin(2*pi*fc*t)`
    pub quadrature: Vec<f64>,
    /// Gaussian envelope `exp(-a*t^2)`
    pub envelope: Vec<f64>,
}

/// Gaussian-modulated sinusoid pulse centred at t = 0
///
/// # Arguments
/// * `t` - Sample times
/// * `fc` - Centre frequency, must be positive
/// * `bw` - Fractional bandwidth in the frequency domain, must be positive
/// * `bwr` - Reference level (dB, negative) at which the bandwidth is
///   measured; -6 dB is the conventional choice
pub fn gauss_pulse(t: &[f64], fc: f64, bw: f64, bwr: f64) -> Result<GaussPulse> {
    if fc <= 0.0 {
        return Err(SeriesError::InvalidInput(format!(
            "centre frequency must be positive, got {fc}"
        )));
    }
    if bw <= 0.0 {
        return Err(SeriesError::InvalidInput(format!(
            "fractional bandwidth must be positive, got {bw}"
        )));
    }
    if bwr >= 0.0 {
        return Err(SeriesError::InvalidInput(format!(
            "bandwidth reference level must be negative, got {bwr}"
        )));
    }

    // Pulse width from the requested bandwidth at the bwr level
    let reference = 10f64.powf(bwr / 20.0);
    let a = -(std::f64::consts::PI * fc * bw).powi(2) / (4.0 * reference.ln());

    let envelope: Vec<f64> = t.iter().map(|&v| (-a * v * v).exp()).collect();
    let in_phase = t
        .iter()
        .zip(envelope.iter())
        .map(|(&v, &e)| e * (2.0 * std::f64::consts::PI * fc * v).cos())
        .collect();
    let quadrature = t
        .iter()
        .zip(envelope.iter())
        .map(|(&v, &e)| e * (2.0 * std::f64::consts::PI * fc * v).sin())
        .collect();

    Ok(GaussPulse {
        in_phase,
        quadrature,
        envelope,
    })
}

/// Distribution of additive noise
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseKind {
    /// Normal distribution with the given mean and standard deviation
    Gaussian { mean: f64, std_dev: f64 },
    /// Uniform distribution over `[low, high)`
    Uniform { low: f64, high: f64 },
}

/// Add random noise to every sample in place
pub fn add_noise<R: Rng>(y: &mut [f64], kind: NoiseKind, rng: &mut R) -> Result<()> {
    match kind {
        NoiseKind::Gaussian { mean, std_dev } => {
            if std_dev < 0.0 {
                return Err(SeriesError::InvalidInput(format!(
                    "standard deviation must be non-negative, got {std_dev}"
                )));
            }
            for v in y.iter_mut() {
                *v += mean + std_dev * standard_normal(rng);
            }
        }
        NoiseKind::Uniform { low, high } => {
            if low >= high {
                return Err(SeriesError::InvalidRange(format!(
                    "noise bounds {low} and {high} are not an increasing range"
                )));
            }
            for v in y.iter_mut() {
                *v += rng.gen_range(low..high);
            }
        }
    }
    Ok(())
}

/// Add spikes of uniform random amplitude at distinct random positions
///
/// # Arguments
/// * `y` - Samples, modified in place
/// * `proportion` - Fraction of samples to spike, in (0, 1]
/// * `min_amp` - Smallest spike amplitude
/// * `max_amp` - Largest spike amplitude
///
/// # Returns
/// The number of spikes added
pub fn add_spikes<R: Rng>(
    y: &mut [f64],
    proportion: f64,
    min_amp: f64,
    max_amp: f64,
    rng: &mut R,
) -> Result<usize> {
    if !(0.0..=1.0).contains(&proportion) {
        return Err(SeriesError::InvalidInput(format!(
            "spike proportion must be in [0, 1], got {proportion}"
        )));
    }
    if min_amp > max_amp {
        return Err(SeriesError::InvalidRange(format!(
            "spike amplitude bounds {min_amp} and {max_amp} are reversed"
        )));
    }

    let n = y.len();
    let n_spikes = (n as f64 * proportion) as usize;
    if n_spikes == 0 {
        return Err(SeriesError::InvalidInput(
            "spike proportion too low, no samples would be spiked".to_string(),
        ));
    }

    // Partial Fisher-Yates gives n_spikes distinct indices
    let mut indices: Vec<usize> = (0..n).collect();
    for i in 0..n_spikes {
        let j = rng.gen_range(i..n);
        indices.swap(i, j);
        let amp = if min_amp == max_amp {
            min_amp
        } else {
            rng.gen_range(min_amp..max_amp)
        };
        y[indices[i]] += amp;
    }

    Ok(n_spikes)
}

/// Standard normal sample via the Box-Muller transform
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sine_wave_values() {
        let t = vec![0.0, 0.25, 0.5, 0.75];
        let y = sine_wave(&t, 2.0, 1.0, 0.0, 1.0);
        assert_relative_eq!(y[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(y[1], 3.0, epsilon = 1e-12);
        assert_relative_eq!(y[2], 1.0, epsilon = 1e-10);
        assert_relative_eq!(y[3], -1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_square_wave_duty() {
        let t: Vec<f64> = (0..10).map(|i| i as f64 * 0.1).collect();
        // One cycle over [0, 1), duty 0.3: high for t in [0, 0.3)
        let y = square_wave(&t, 1.0, 0.3).unwrap();
        assert_eq!(&y[0..3], &[1.0, 1.0, 1.0]);
        assert!(y[3..].iter().all(|&v| v == -1.0));
    }

    #[test]
    fn test_square_wave_rejects_bad_duty() {
        let t = vec![0.0, 1.0];
        assert!(square_wave(&t, 1.0, 1.5).is_err());
    }

    #[test]
    fn test_gauss_pulse_envelope() {
        let t: Vec<f64> = (-50..=50).map(|i| i as f64 * 0.01).collect();
        let pulse = gauss_pulse(&t, 10.0, 0.5, -6.0).unwrap();
        // Envelope peaks at 1 in the centre and decays symmetrically
        assert_relative_eq!(pulse.envelope[50], 1.0, epsilon = 1e-12);
        assert!(pulse.envelope[0] < 0.01);
        assert_relative_eq!(pulse.envelope[0], pulse.envelope[100], epsilon = 1e-12);
        // In-phase equals the envelope at t = 0
        assert_relative_eq!(pulse.in_phase[50], 1.0, epsilon = 1e-12);
        assert_relative_eq!(pulse.quadrature[50], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gauss_pulse_validates() {
        let t = vec![0.0];
        assert!(gauss_pulse(&t, -1.0, 0.5, -6.0).is_err());
        assert!(gauss_pulse(&t, 10.0, 0.5, 6.0).is_err());
    }

    #[test]
    fn test_gaussian_noise_statistics() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut y = vec![0.0; 20000];
        add_noise(
            &mut y,
            NoiseKind::Gaussian {
                mean: 2.0,
                std_dev: 0.5,
            },
            &mut rng,
        )
        .unwrap();
        let mean: f64 = y.iter().sum::<f64>() / y.len() as f64;
        let var: f64 = y.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / y.len() as f64;
        assert_relative_eq!(mean, 2.0, epsilon = 0.02);
        assert_relative_eq!(var.sqrt(), 0.5, epsilon = 0.02);
    }

    #[test]
    fn test_uniform_noise_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut y = vec![0.0; 1000];
        add_noise(&mut y, NoiseKind::Uniform { low: -1.0, high: 1.0 }, &mut rng).unwrap();
        assert!(y.iter().all(|&v| (-1.0..1.0).contains(&v)));
    }

    #[test]
    fn test_spikes_count_and_distinct() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut y = vec![0.0; 100];
        let n = add_spikes(&mut y, 0.1, 5.0, 10.0, &mut rng).unwrap();
        assert_eq!(n, 10);
        let spiked = y.iter().filter(|&&v| v != 0.0).count();
        assert_eq!(spiked, 10);
        assert!(y.iter().all(|&v| v == 0.0 || (5.0..10.0).contains(&v)));
    }

    #[test]
    fn test_spikes_rejects_zero_count() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut y = vec![0.0; 10];
        assert!(add_spikes(&mut y, 0.01, 1.0, 2.0, &mut rng).is_err());
    }
}
