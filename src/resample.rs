//! Resampling of a point series onto a new sampling period
//!
//! The target period can be given four ways (directly, as a frequency, as a
//! point count, or as a factor of the current density). When the new period
//! is coarser than the current one and an anti-aliasing filter is requested,
//! resampling runs as integer decimation of the original samples; otherwise
//! a fresh uniform grid is built and the series is interpolated onto it.

use std::str::FromStr;

use log::debug;

use crate::filter::{decimate, DecimationFilter};
use crate::interpolate::InterpolationMethod;
use crate::utils::arange;
use crate::{Result, SeriesError};

/// How the target sampling period is specified
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResampleSpec {
    /// Target period directly, in x units
    Period(f64),
    /// Target sampling frequency; the period is its reciprocal
    Frequency(f64),
    /// Total number of output points spread over the x range
    PointCount(usize),
    /// Multiplier on the current point count; 2.0 doubles the points
    Factor(f64),
}

impl ResampleSpec {
    /// Resolve the spec to a concrete sampling period
    ///
    /// # Arguments
    /// * `x` - The current x values, strictly increasing
    pub fn period(&self, x: &[f64]) -> Result<f64> {
        if x.len() < 2 {
            return Err(SeriesError::InvalidInput(format!(
                "period resolution needs at least 2 x values, got {}",
                x.len()
            )));
        }
        let span = x[x.len() - 1] - x[0];
        let period = match *self {
            ResampleSpec::Period(p) => p,
            ResampleSpec::Frequency(f) => {
                if f <= 0.0 {
                    return Err(SeriesError::InvalidRange(format!(
                        "sampling frequency must be positive, got {f}"
                    )));
                }
                1.0 / f
            }
            ResampleSpec::PointCount(n) => {
                if n < 2 {
                    return Err(SeriesError::InvalidPointCount(n));
                }
                span / (n - 1) as f64
            }
            ResampleSpec::Factor(f) => {
                if f <= 0.0 {
                    return Err(SeriesError::InvalidRange(format!(
                        "resampling factor must be positive, got {f}"
                    )));
                }
                let count = (x.len() as f64 * f).round() as usize;
                if count < 2 {
                    return Err(SeriesError::InvalidPointCount(count));
                }
                span / (count - 1) as f64
            }
        };

        if !(period.is_finite() && period > 0.0) {
            return Err(SeriesError::InvalidRange(format!(
                "resolved sampling period must be positive, got {period}"
            )));
        }
        Ok(period)
    }
}

impl FromStr for ResampleSpec {
    type Err = SeriesError;

    /// Parse `"period=0.5"`, `"frequency=10"`, `"points=100"` or `"factor=2"`
    fn from_str(s: &str) -> Result<Self> {
        let (key, value) = s.split_once('=').ok_or_else(|| {
            SeriesError::UnrecognizedOption(format!("expected 'kind=value', got '{s}'"))
        })?;
        let parse_f64 = |v: &str| {
            v.trim().parse::<f64>().map_err(|_| {
                SeriesError::InvalidInput(format!("'{v}' is not a number"))
            })
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "period" => Ok(ResampleSpec::Period(parse_f64(value)?)),
            "frequency" => Ok(ResampleSpec::Frequency(parse_f64(value)?)),
            "points" => {
                let n = value.trim().parse::<usize>().map_err(|_| {
                    SeriesError::InvalidInput(format!("'{value}' is not a point count"))
                })?;
                Ok(ResampleSpec::PointCount(n))
            }
            "factor" => Ok(ResampleSpec::Factor(parse_f64(value)?)),
            other => Err(SeriesError::UnrecognizedOption(format!(
                "unknown resample spec '{other}'"
            ))),
        }
    }
}

/// Mean spacing of the x values
pub fn mean_period(x: &[f64]) -> f64 {
    let n = x.len();
    (x[n - 1] - x[0]) / (n - 1) as f64
}

/// Resample a series onto a new sampling period
///
/// # Arguments
/// * `x` - Current x values, strictly increasing, at least 2 of them
/// * `y` - Current y values, same length as `x`
/// * `spec` - How the target period is specified
/// * `method` - Interpolation used on the grid path
/// * `filter` - Anti-aliasing filter; with `None` the grid path is always
///   taken, even when downsampling
///
/// # Returns
/// The new `(x, y)` pair
pub fn resample(
    x: &[f64],
    y: &[f64],
    spec: ResampleSpec,
    method: InterpolationMethod,
    filter: DecimationFilter,
) -> Result<(Vec<f64>, Vec<f64>)> {
    if x.len() != y.len() {
        return Err(SeriesError::InvalidInput(format!(
            "x and y lengths differ: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(SeriesError::InvalidInput(
            "resampling needs at least 2 points".to_string(),
        ));
    }
    if x.windows(2).any(|w| w[1] <= w[0]) {
        return Err(SeriesError::InvalidInput(
            "x values must be strictly increasing".to_string(),
        ));
    }

    let new_period = spec.period(x)?;
    let current_period = mean_period(x);
    let is_downsampling = new_period > current_period;

    if is_downsampling && filter != DecimationFilter::None {
        let q = ((new_period / current_period).round() as usize).max(2);
        debug!(
            "downsampling {} -> period {new_period} via decimation, q = {q}",
            x.len()
        );
        let x_new: Vec<f64> = x.iter().step_by(q).copied().collect();
        let y_new = decimate(y, q, filter)?;
        return Ok((x_new, y_new));
    }

    let x_new = arange(x[0], x[x.len() - 1] + new_period / 2.0, new_period);
    debug!(
        "resampling {} -> {} points on a uniform grid, period {new_period}",
        x.len(),
        x_new.len()
    );
    let y_new = method.evaluate(x, y, &x_new)?;
    Ok((x_new, y_new))
}
