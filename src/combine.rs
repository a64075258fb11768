//! Weighted sums of series over a common grid
//!
//! Each term is interpolated onto the base grid with a cubic spline before
//! weighting, so series sampled on different grids can still be combined.
//! Extrapolation is allowed where a term does not cover the full base range.

use crate::interpolate::CubicHermite;
use crate::{Result, SeriesError};

/// One weighted term of a combination
#[derive(Debug, Clone, Copy)]
pub struct Term<'a> {
    /// Multiplier applied after interpolation
    pub factor: f64,
    pub x: &'a [f64],
    pub y: &'a [f64],
}

/// Sum of `factor * y` over all terms, evaluated on `x_base`
///
/// Terms already sampled exactly on `x_base` are used directly; the rest
/// are resampled with a not-a-knot cubic spline, extrapolating beyond
/// their own range where needed.
pub fn linear_combination(x_base: &[f64], terms: &[Term]) -> Result<Vec<f64>> {
    if x_base.is_empty() {
        return Err(SeriesError::InvalidInput(
            "the base grid must not be empty".to_string(),
        ));
    }
    if terms.is_empty() {
        return Err(SeriesError::InvalidInput(
            "at least one term is required".to_string(),
        ));
    }

    let mut combined = vec![0.0; x_base.len()];
    for term in terms {
        if term.x.len() != term.y.len() {
            return Err(SeriesError::InvalidInput(format!(
                "term x and y lengths differ: {} vs {}",
                term.x.len(),
                term.y.len()
            )));
        }

        if term.x == x_base {
            for (c, &v) in combined.iter_mut().zip(term.y.iter()) {
                *c += term.factor * v;
            }
        } else {
            let spline = CubicHermite::not_a_knot(term.x, term.y)?;
            for (c, &q) in combined.iter_mut().zip(x_base.iter()) {
                *c += term.factor * spline.evaluate(q, true);
            }
        }
    }

    Ok(combined)
}
