//! series-dsp: numeric core for point-series processing
//!
//! This library provides the signal-processing operations behind a plotting
//! tool's series menu: spectral gap filling, resampling with anti-aliasing,
//! interpolation, smoothing, waveform generation, and spectrum analysis.
//! Everything operates on plain `f64` slices or the [`Series`] container.
//!
//! # Core Operations
//!
//! - [`gapfill::fill_gap`] - Replace a region with spectrally shaped data
//! - [`resample::resample`] - Move a series onto a new sampling period
//! - [`interpolate::InterpolationMethod`] - Linear, cubic spline, PCHIP, Akima
//! - [`smooth`] - Gaussian and selective median smoothing
//! - [`generate`] - Sine, square, Gaussian pulse, noise, spikes
//! - [`analysis`] - Amplitude spectrum and error statistics

pub mod analysis;
pub mod combine;
pub mod filter;
pub mod gapfill;
pub mod generate;
pub mod interpolate;
pub mod resample;
pub mod series;
pub mod smooth;

pub mod utils;

// Re-export main types at crate root
pub use filter::{ConvolveMode, DecimationFilter};
pub use gapfill::GapFillMode;
pub use interpolate::{CubicHermite, InterpolationMethod};
pub use resample::ResampleSpec;
pub use series::{Series, SeriesStats};

use thiserror::Error;

/// Errors that can occur in series operations
#[derive(Error, Debug)]
pub enum SeriesError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Insufficient context data around the gap")]
    InsufficientContextData,

    #[error("Gap must contain at least 2 points, found {0}")]
    InsufficientGapSize(usize),

    #[error("Point count must be at least 2, got {0}")]
    InvalidPointCount(usize),

    #[error("Unrecognized option: {0}")]
    UnrecognizedOption(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, SeriesError>;
