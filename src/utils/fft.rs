//! FFT wrapper used by the gap filler and the spectrum analysis
//!
//! Thin convenience layer over rustfft with cached plans. Forward transforms
//! are unnormalized; the inverse divides by N so that a forward/inverse pair
//! reproduces the input.

use num_complex::Complex;
use rustfft::FftPlanner;

/// FFT processor with cached plans
pub struct Fft {
    planner: FftPlanner<f64>,
}

impl Fft {
    /// Create a new FFT processor
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Compute the FFT of real-valued input
    ///
    /// # Arguments
    /// * `input` - Real-valued input samples
    /// * `output_size` - Size of the FFT (zero-padded if larger than the input)
    ///
    /// # Returns
    /// Complex-valued FFT result of length `output_size`
    pub fn real_fft(&mut self, input: &[f64], output_size: usize) -> Vec<Complex<f64>> {
        let fft_size = output_size.max(input.len());
        let fft = self.planner.plan_fft_forward(fft_size);

        let mut buffer: Vec<Complex<f64>> = input
            .iter()
            .map(|&x| Complex::new(x, 0.0))
            .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
            .take(fft_size)
            .collect();

        fft.process(&mut buffer);
        buffer
    }

    /// Compute the inverse FFT, normalized by 1/N
    ///
    /// Take the real part of the result when the spectrum came from real data.
    pub fn inverse_fft(&mut self, input: &[Complex<f64>]) -> Vec<Complex<f64>> {
        let fft_size = input.len();
        let fft = self.planner.plan_fft_inverse(fft_size);

        let mut buffer = input.to_vec();
        fft.process(&mut buffer);

        let scale = 1.0 / fft_size as f64;
        for c in &mut buffer {
            *c *= scale;
        }

        buffer
    }
}

impl Default for Fft {
    fn default() -> Self {
        Self::new()
    }
}
