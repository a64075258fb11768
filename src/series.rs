//! Point-series container and summary statistics
//!
//! A [`Series`] is a pair of parallel x/y vectors with x sorted ascending.
//! It is the unit every operation in the crate works on; the free functions
//! in the other modules accept raw slices so they can also be used without
//! the container.

use crate::{Result, SeriesError};

/// A series of (x, y) points with x sorted in ascending order
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Series {
    /// Create a series from parallel x and y vectors
    ///
    /// # Arguments
    /// * `x` - x values, must be sorted ascending and contain no NaN
    /// * `y` - y values, same length as `x`
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(SeriesError::InvalidInput(format!(
                "x and y lengths differ: {} vs {}",
                x.len(),
                y.len()
            )));
        }
        if x.iter().chain(y.iter()).any(|v| v.is_nan()) {
            return Err(SeriesError::InvalidInput(
                "series values must not be NaN".to_string(),
            ));
        }
        if x.windows(2).any(|w| w[1] < w[0]) {
            return Err(SeriesError::InvalidInput(
                "x values must be sorted ascending".to_string(),
            ));
        }
        Ok(Self { x, y })
    }

    /// Create a uniformly sampled series from y values alone
    ///
    /// x values become `x0 + i * period`.
    pub fn from_uniform(y: Vec<f64>, x0: f64, period: f64) -> Result<Self> {
        if !(period.is_finite() && period > 0.0) {
            return Err(SeriesError::InvalidInput(format!(
                "sampling period must be positive, got {period}"
            )));
        }
        let x = (0..y.len()).map(|i| x0 + i as f64 * period).collect();
        Self::new(x, y)
    }

    /// The x values
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// The y values
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Mutable access to the y values; x stays fixed
    pub fn y_mut(&mut self) -> &mut [f64] {
        &mut self.y
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the series has no points
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Smallest x value
    pub fn x_min(&self) -> Option<f64> {
        self.x.first().copied()
    }

    /// Largest x value
    pub fn x_max(&self) -> Option<f64> {
        self.x.last().copied()
    }

    /// Mean spacing between consecutive x values
    ///
    /// Returns `None` for series with fewer than 2 points.
    pub fn sampling_period(&self) -> Option<f64> {
        let n = self.x.len();
        if n < 2 {
            return None;
        }
        Some((self.x[n - 1] - self.x[0]) / (n - 1) as f64)
    }

    /// Consume the series, returning the x and y vectors
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.x, self.y)
    }

    /// Keep only the points with x in `[start, end]`
    pub fn crop(&self, start: f64, end: f64) -> Result<Series> {
        if start >= end {
            return Err(SeriesError::InvalidRange(format!(
                "crop start {start} must be less than end {end}"
            )));
        }
        let lo = self.x.partition_point(|&v| v < start);
        let hi = self.x.partition_point(|&v| v <= end);
        Ok(Series {
            x: self.x[lo..hi].to_vec(),
            y: self.y[lo..hi].to_vec(),
        })
    }

    /// Multiply every y value by `factor`
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.y {
            *v *= factor;
        }
    }

    /// Add `delta` to every y value
    pub fn offset(&mut self, delta: f64) {
        for v in &mut self.y {
            *v += delta;
        }
    }

    /// Summary statistics over the series
    pub fn stats(&self) -> Result<SeriesStats> {
        if self.is_empty() {
            return Err(SeriesError::InvalidInput(
                "cannot compute statistics of an empty series".to_string(),
            ));
        }

        let n = self.y.len() as f64;
        let mean = self.y.iter().sum::<f64>() / n;
        let variance = self.y.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let rms = (self.y.iter().map(|v| v * v).sum::<f64>() / n).sqrt();

        let mut sorted = self.y.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median = if sorted.len() % 2 == 1 {
            sorted[sorted.len() / 2]
        } else {
            0.5 * (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2])
        };

        let y_min = sorted[0];
        let y_max = sorted[sorted.len() - 1];

        Ok(SeriesStats {
            n_points: self.y.len(),
            x_min: self.x[0],
            x_max: self.x[self.x.len() - 1],
            y_min,
            y_max,
            mean,
            median,
            std_dev: variance.sqrt(),
            rms,
            sampling_period: self.sampling_period(),
        })
    }
}

/// Summary statistics of a [`Series`]
///
/// The standard deviation is the population form (divisor n).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub n_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub rms: f64,
    pub sampling_period: Option<f64>,
}
