//! Interpolation methods for resampling point series
//!
//! Provides the four interpolators the resampler can choose from: linear
//! (numpy `interp` semantics), not-a-knot cubic spline, PCHIP (monotone
//! cubic) and Akima. The three cubic variants share a Hermite representation:
//! each method only differs in how it assigns derivatives at the knots.

use std::str::FromStr;

use crate::{Result, SeriesError};

/// Interpolation methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMethod {
    /// Piecewise linear, boundary values clamped
    Linear,
    /// C2 cubic spline with not-a-knot end conditions
    #[default]
    CubicSpline,
    /// Monotone piecewise cubic (Fritsch-Carlson); preserves local shape
    Pchip,
    /// Akima spline; reduces oscillation on noisy data
    Akima,
}

impl InterpolationMethod {
    /// Evaluate this method at the query points
    ///
    /// # Arguments
    /// * `x`, `y` - Knots, `x` strictly increasing, equal lengths >= 2
    /// * `x_new` - Query points; values outside `[x[0], x[n-1]]` are clamped
    pub fn evaluate(self, x: &[f64], y: &[f64], x_new: &[f64]) -> Result<Vec<f64>> {
        validate_knots(x, y)?;
        match self {
            InterpolationMethod::Linear => Ok(x_new.iter().map(|&q| interp_one(q, x, y)).collect()),
            InterpolationMethod::CubicSpline => {
                let spline = CubicHermite::not_a_knot(x, y)?;
                Ok(x_new.iter().map(|&q| spline.evaluate(q, false)).collect())
            }
            InterpolationMethod::Pchip => {
                let spline = CubicHermite::pchip(x, y)?;
                Ok(x_new.iter().map(|&q| spline.evaluate(q, false)).collect())
            }
            InterpolationMethod::Akima => {
                let spline = CubicHermite::akima(x, y)?;
                Ok(x_new.iter().map(|&q| spline.evaluate(q, false)).collect())
            }
        }
    }
}

impl FromStr for InterpolationMethod {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(InterpolationMethod::Linear),
            "cubic" | "cubicspline" | "cubic-spline" => Ok(InterpolationMethod::CubicSpline),
            "pchip" => Ok(InterpolationMethod::Pchip),
            "akima" => Ok(InterpolationMethod::Akima),
            other => Err(SeriesError::UnrecognizedOption(format!(
                "unknown interpolation method '{other}'"
            ))),
        }
    }
}

fn validate_knots(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(SeriesError::InvalidInput(format!(
            "x and y must have the same length ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(SeriesError::InvalidInput(
            "interpolation needs at least 2 points".to_string(),
        ));
    }
    Ok(())
}

/// Linear interpolation of a single value (numpy `interp` semantics)
///
/// Queries outside the knot range return the boundary value.
pub fn interp_one(q: f64, x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if q <= x[0] {
        return y[0];
    }
    if q >= x[n - 1] {
        return y[n - 1];
    }

    let idx = x.partition_point(|&v| v < q);
    let lo = idx - 1;
    let t = (q - x[lo]) / (x[idx] - x[lo]);
    y[lo] + t * (y[idx] - y[lo])
}

/// Piecewise cubic in Hermite form: knot values plus knot derivatives
///
/// The segment between two knots is the unique cubic matching the values and
/// first derivatives at both ends. All three spline methods reduce to this
/// after choosing the derivatives.
#[derive(Debug, Clone)]
pub struct CubicHermite {
    x: Vec<f64>,
    y: Vec<f64>,
    d: Vec<f64>,
}

impl CubicHermite {
    /// Not-a-knot cubic spline (scipy's `CubicSpline` default end condition)
    ///
    /// Solves the tridiagonal moment system with the third derivative forced
    /// continuous across the second and next-to-last knots, which makes the
    /// spline reproduce a single cubic polynomial exactly.
    pub fn not_a_knot(x: &[f64], y: &[f64]) -> Result<Self> {
        validate_knots(x, y)?;
        let n = x.len();

        if n == 2 {
            let slope = (y[1] - y[0]) / (x[1] - x[0]);
            return Ok(Self {
                x: x.to_vec(),
                y: y.to_vec(),
                d: vec![slope, slope],
            });
        }

        if n == 3 {
            // Not-a-knot with three points degenerates to the parabola
            // through them
            let d = quadratic_derivatives(x, y);
            return Ok(Self {
                x: x.to_vec(),
                y: y.to_vec(),
                d,
            });
        }

        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let m: Vec<f64> = y
            .windows(2)
            .zip(h.iter())
            .map(|(w, &hi)| (w[1] - w[0]) / hi)
            .collect();

        // Interior unknowns are the moments M_1..M_{n-2}; the not-a-knot rows
        // eliminate M_0 and M_{n-1}
        let k = n - 2;
        let mut sub = vec![0.0; k];
        let mut diag = vec![0.0; k];
        let mut sup = vec![0.0; k];
        let mut rhs = vec![0.0; k];

        for i in 1..=k {
            let j = i - 1;
            rhs[j] = 6.0 * (m[i] - m[i - 1]);
            if i == 1 {
                diag[j] = (h[0] + h[1]) * (h[0] + 2.0 * h[1]) / h[1];
                sup[j] = (h[1] * h[1] - h[0] * h[0]) / h[1];
            } else if i == k {
                sub[j] = (h[n - 3] * h[n - 3] - h[n - 2] * h[n - 2]) / h[n - 3];
                diag[j] = (h[n - 3] + h[n - 2]) * (h[n - 2] + 2.0 * h[n - 3]) / h[n - 3];
            } else {
                sub[j] = h[i - 1];
                diag[j] = 2.0 * (h[i - 1] + h[i]);
                sup[j] = h[i];
            }
        }

        let interior = solve_tridiagonal(&sub, &diag, &sup, &rhs)?;

        let mut moments = vec![0.0; n];
        moments[1..(n - 1)].copy_from_slice(&interior);
        moments[0] = ((h[0] + h[1]) * moments[1] - h[0] * moments[2]) / h[1];
        moments[n - 1] =
            ((h[n - 3] + h[n - 2]) * moments[n - 2] - h[n - 2] * moments[n - 3]) / h[n - 3];

        // Knot derivatives from the moments
        let mut d = vec![0.0; n];
        for i in 0..(n - 1) {
            d[i] = m[i] - h[i] * (2.0 * moments[i] + moments[i + 1]) / 6.0;
        }
        d[n - 1] = m[n - 2] + h[n - 2] * (2.0 * moments[n - 1] + moments[n - 2]) / 6.0;

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            d,
        })
    }

    /// PCHIP derivatives (Fritsch-Carlson, scipy's weighted harmonic mean)
    ///
    /// The interpolant is monotone wherever the data is, and never overshoots
    /// local extrema.
    pub fn pchip(x: &[f64], y: &[f64]) -> Result<Self> {
        validate_knots(x, y)?;
        let n = x.len();

        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let m: Vec<f64> = y
            .windows(2)
            .zip(h.iter())
            .map(|(w, &hi)| (w[1] - w[0]) / hi)
            .collect();

        if n == 2 {
            return Ok(Self {
                x: x.to_vec(),
                y: y.to_vec(),
                d: vec![m[0], m[0]],
            });
        }

        let mut d = vec![0.0; n];
        for i in 1..(n - 1) {
            if m[i - 1] * m[i] <= 0.0 {
                d[i] = 0.0;
            } else {
                let w1 = 2.0 * h[i] + h[i - 1];
                let w2 = h[i] + 2.0 * h[i - 1];
                d[i] = (w1 + w2) / (w1 / m[i - 1] + w2 / m[i]);
            }
        }
        d[0] = pchip_edge(h[0], h[1], m[0], m[1]);
        d[n - 1] = pchip_edge(h[n - 2], h[n - 3], m[n - 2], m[n - 3]);

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            d,
        })
    }

    /// Akima derivatives (Akima 1970), with the standard two-segment slope
    /// extrapolation at each end and the 50/50 tie-break when both weights
    /// vanish
    pub fn akima(x: &[f64], y: &[f64]) -> Result<Self> {
        validate_knots(x, y)?;
        let n = x.len();

        let m: Vec<f64> = x
            .windows(2)
            .zip(y.windows(2))
            .map(|(xw, yw)| (yw[1] - yw[0]) / (xw[1] - xw[0]))
            .collect();

        if n == 2 {
            return Ok(Self {
                x: x.to_vec(),
                y: y.to_vec(),
                d: vec![m[0], m[0]],
            });
        }

        // ext[j] holds the slope of segment j-2, with two extrapolated ghost
        // segments on each side
        let mut ext = vec![0.0; n + 3];
        ext[2..(n + 1)].copy_from_slice(&m);
        ext[1] = 2.0 * ext[2] - ext[3];
        ext[0] = 2.0 * ext[1] - ext[2];
        ext[n + 1] = 2.0 * ext[n] - ext[n - 1];
        ext[n + 2] = 2.0 * ext[n + 1] - ext[n];

        let mut d = vec![0.0; n];
        for i in 0..n {
            let w1 = (ext[i + 3] - ext[i + 2]).abs();
            let w2 = (ext[i + 1] - ext[i]).abs();
            let den = w1 + w2;
            d[i] = if den > 0.0 {
                (w1 * ext[i + 1] + w2 * ext[i + 2]) / den
            } else {
                0.5 * (ext[i + 1] + ext[i + 2])
            };
        }

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            d,
        })
    }

    /// Evaluate the spline at a query point
    ///
    /// With `extrapolate` false, queries outside the knot range are clamped to
    /// the boundary values; with it true, the end segment's cubic is extended.
    pub fn evaluate(&self, q: f64, extrapolate: bool) -> f64 {
        let n = self.x.len();

        if !extrapolate {
            if q <= self.x[0] {
                return self.y[0];
            }
            if q >= self.x[n - 1] {
                return self.y[n - 1];
            }
        }

        // Segment index, clamped so out-of-range queries extend the end cubics
        let idx = self.x.partition_point(|&v| v <= q);
        let i = idx.clamp(1, n - 1) - 1;

        let h = self.x[i + 1] - self.x[i];
        let t = (q - self.x[i]) / h;
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        h00 * self.y[i] + h10 * h * self.d[i] + h01 * self.y[i + 1] + h11 * h * self.d[i + 1]
    }

    /// Evaluate at many query points
    pub fn evaluate_many(&self, queries: &[f64], extrapolate: bool) -> Vec<f64> {
        queries
            .iter()
            .map(|&q| self.evaluate(q, extrapolate))
            .collect()
    }
}

/// Shape-preserving one-sided derivative estimate for the PCHIP endpoints
fn pchip_edge(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if m0 == 0.0 || d * m0 < 0.0 {
        0.0
    } else if m0 * m1 < 0.0 && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}

/// Knot derivatives of the parabola through three points
fn quadratic_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    // Lagrange form: y(q) = sum_i y_i * prod_{j != i} (q - x_j)/(x_i - x_j)
    let (x0, x1, x2) = (x[0], x[1], x[2]);
    let (y0, y1, y2) = (y[0], y[1], y[2]);

    let c0 = y0 / ((x0 - x1) * (x0 - x2));
    let c1 = y1 / ((x1 - x0) * (x1 - x2));
    let c2 = y2 / ((x2 - x0) * (x2 - x1));

    // Derivative of the parabola at q: c0(2q - x1 - x2) + c1(2q - x0 - x2) + c2(2q - x0 - x1)
    let deriv = |q: f64| {
        c0 * (2.0 * q - x1 - x2) + c1 * (2.0 * q - x0 - x2) + c2 * (2.0 * q - x0 - x1)
    };

    vec![deriv(x0), deriv(x1), deriv(x2)]
}

/// Thomas algorithm for a tridiagonal system
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Result<Vec<f64>> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    if diag[0] == 0.0 {
        return Err(SeriesError::InvalidInput(
            "singular spline system (coincident knots?)".to_string(),
        ));
    }

    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];

    for i in 1..n {
        let denom = diag[i] - sub[i] * c[i - 1];
        if denom == 0.0 {
            return Err(SeriesError::InvalidInput(
                "singular spline system (coincident knots?)".to_string(),
            ));
        }
        if i < n - 1 {
            c[i] = sup[i] / denom;
        }
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / denom;
    }

    let mut out = vec![0.0; n];
    out[n - 1] = d[n - 1];
    for i in (0..(n - 1)).rev() {
        out[i] = d[i] - c[i] * out[i + 1];
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_between_and_clamped() {
        let x = vec![0.0, 1.0, 2.0];
        let y = vec![0.0, 10.0, 20.0];

        assert_relative_eq!(interp_one(0.5, &x, &y), 5.0, epsilon = 1e-12);
        assert_relative_eq!(interp_one(1.5, &x, &y), 15.0, epsilon = 1e-12);
        // Clamped outside the range
        assert_relative_eq!(interp_one(-1.0, &x, &y), 0.0);
        assert_relative_eq!(interp_one(3.0, &x, &y), 20.0);
    }

    #[test]
    fn test_spline_interpolates_knots() {
        let x = vec![0.0, 1.0, 2.5, 4.0, 5.0];
        let y = vec![1.0, -2.0, 0.5, 3.0, 2.0];
        let spline = CubicHermite::not_a_knot(&x, &y).unwrap();

        for (xi, yi) in x.iter().zip(y.iter()) {
            assert_relative_eq!(spline.evaluate(*xi, false), *yi, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_not_a_knot_reproduces_cubic() {
        // Not-a-knot reproduces a single cubic polynomial exactly
        let poly = |t: f64| 2.0 * t * t * t - t * t + 3.0 * t - 5.0;
        let x: Vec<f64> = (0..8).map(|i| i as f64 * 0.7).collect();
        let y: Vec<f64> = x.iter().map(|&t| poly(t)).collect();
        let spline = CubicHermite::not_a_knot(&x, &y).unwrap();

        for i in 0..70 {
            let q = i as f64 * 0.07;
            assert_relative_eq!(spline.evaluate(q, false), poly(q), epsilon = 1e-8);
        }
    }

    #[test]
    fn test_three_point_parabola() {
        let poly = |t: f64| t * t - 2.0 * t + 1.0;
        let x = vec![0.0, 1.0, 3.0];
        let y: Vec<f64> = x.iter().map(|&t| poly(t)).collect();
        let spline = CubicHermite::not_a_knot(&x, &y).unwrap();

        for q in [0.25, 0.9, 1.5, 2.0, 2.75] {
            assert_relative_eq!(spline.evaluate(q, false), poly(q), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_pchip_no_overshoot() {
        // Step-like data: a monotone interpolant stays within [0, 1]
        let x = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let spline = CubicHermite::pchip(&x, &y).unwrap();

        for i in 0..=100 {
            let q = 5.0 * i as f64 / 100.0;
            let v = spline.evaluate(q, false);
            assert!((-1e-12..=1.0 + 1e-12).contains(&v), "overshoot at {q}: {v}");
        }
    }

    #[test]
    fn test_pchip_flat_on_constant() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y = vec![4.0, 4.0, 4.0, 4.0];
        let spline = CubicHermite::pchip(&x, &y).unwrap();
        assert_relative_eq!(spline.evaluate(1.7, false), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_akima_exact_on_line() {
        let x: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&t| 2.0 * t - 1.0).collect();
        let spline = CubicHermite::akima(&x, &y).unwrap();

        for q in [0.3, 1.8, 2.5, 4.9] {
            assert_relative_eq!(spline.evaluate(q, false), 2.0 * q - 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_extrapolation_extends_end_cubic() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y = vec![0.0, 1.0, 2.0, 3.0];
        let spline = CubicHermite::not_a_knot(&x, &y).unwrap();

        // Linear data extrapolates along the line
        assert_relative_eq!(spline.evaluate(4.0, true), 4.0, epsilon = 1e-9);
        assert_relative_eq!(spline.evaluate(-1.0, true), -1.0, epsilon = 1e-9);
        // Clamped without extrapolation
        assert_relative_eq!(spline.evaluate(4.0, false), 3.0);
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(
            "pchip".parse::<InterpolationMethod>().unwrap(),
            InterpolationMethod::Pchip
        );
        assert_eq!(
            "CubicSpline".parse::<InterpolationMethod>().unwrap(),
            InterpolationMethod::CubicSpline
        );
        assert!(matches!(
            "spline9000".parse::<InterpolationMethod>(),
            Err(SeriesError::UnrecognizedOption(_))
        ));
    }

    #[test]
    fn test_evaluate_rejects_bad_input() {
        let err = InterpolationMethod::Linear.evaluate(&[0.0], &[1.0], &[0.5]);
        assert!(matches!(err, Err(SeriesError::InvalidInput(_))));
    }
}
