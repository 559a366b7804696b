//! Additive Trend + Seasonality Model
//!
//! `y(t) = a + b·t + Σ_k [c_k·sin(2πk·d/365.25) + s_k·cos(2πk·d/365.25)]`
//!
//! `t` is time scaled to [0, 1] over the history, `d` the absolute day
//! number. Values are scaled by their maximum magnitude before fitting and
//! the coefficients are found by ridge-regularized least squares (the
//! intercept is not penalized).

use super::error::{ForecastError, ForecastResult};
use chrono::{Datelike, NaiveDate};
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::PI;

/// Days per year used for the seasonal period
const YEAR_DAYS: f64 = 365.25;

/// A linear trend needs two points
pub const MIN_POINTS: usize = 2;

/// Pivot magnitude below which the system is treated as singular
const PIVOT_EPSILON: f64 = 1e-12;

/// Fitted additive model
#[derive(Debug, Clone)]
pub struct AdditiveModel {
    params: Vec<f64>,
    fourier_order: usize,
    start_day: f64,
    span_days: f64,
    y_scale: f64,
    /// Residual standard deviation in original units
    sigma: f64,
}

impl AdditiveModel {
    /// Fit the model to `(date, value)` observations.
    ///
    /// `fourier_order` is lowered so parameters never outnumber points.
    pub fn fit(
        observations: &[(NaiveDate, f64)],
        fourier_order: usize,
        regularization: f64,
    ) -> ForecastResult<Self> {
        let n = observations.len();
        if n < MIN_POINTS {
            return Err(ForecastError::InsufficientData {
                required: MIN_POINTS,
                found: n,
            });
        }

        let fourier_order = fourier_order.min((n - 2) / 2);
        let start_day = day_number(observations[0].0);
        let last_day = observations
            .iter()
            .map(|(d, _)| day_number(*d))
            .fold(start_day, f64::max);
        let span_days = (last_day - start_day).max(1.0);
        let y_scale = observations
            .iter()
            .map(|(_, y)| y.abs())
            .fold(0.0, f64::max)
            .max(1.0);

        let mut model = Self {
            params: Vec::new(),
            fourier_order,
            start_day,
            span_days,
            y_scale,
            sigma: 0.0,
        };

        let p = model.param_count();
        let mut xtx = vec![vec![0.0; p]; p];
        let mut xty = vec![0.0; p];

        for (date, y) in observations {
            let x = model.features(*date);
            let y = y / y_scale;
            for i in 0..p {
                xty[i] += x[i] * y;
                for j in 0..p {
                    xtx[i][j] += x[i] * x[j];
                }
            }
        }

        for (i, row) in xtx.iter_mut().enumerate().skip(1) {
            row[i] += regularization;
        }

        model.params = solve(xtx, xty).ok_or(ForecastError::Singular)?;

        let sse: f64 = observations
            .iter()
            .map(|(date, y)| (y - model.predict(*date)).powi(2))
            .sum();
        let dof = n.saturating_sub(p).max(1) as f64;
        model.sigma = (sse / dof).sqrt();

        Ok(model)
    }

    /// Full prediction (trend + yearly) in original units
    pub fn predict(&self, date: NaiveDate) -> f64 {
        dot(&self.features(date), &self.params) * self.y_scale
    }

    /// Trend component in original units
    pub fn trend(&self, date: NaiveDate) -> f64 {
        let x = self.features(date);
        dot(&x[..2], &self.params[..2]) * self.y_scale
    }

    /// Yearly seasonal component in original units
    pub fn yearly(&self, date: NaiveDate) -> f64 {
        let x = self.features(date);
        dot(&x[2..], &self.params[2..]) * self.y_scale
    }

    pub fn fourier_order(&self) -> usize {
        self.fourier_order
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    fn param_count(&self) -> usize {
        2 + 2 * self.fourier_order
    }

    fn features(&self, date: NaiveDate) -> Vec<f64> {
        let day = day_number(date);
        let t = (day - self.start_day) / self.span_days;

        let mut x = Vec::with_capacity(self.param_count());
        x.push(1.0);
        x.push(t);
        for k in 1..=self.fourier_order {
            let angle = 2.0 * PI * k as f64 * day / YEAR_DAYS;
            x.push(angle.sin());
            x.push(angle.cos());
        }
        x
    }
}

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Solve `a·x = b` by Gaussian elimination with partial pivoting
pub(crate) fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < PIVOT_EPSILON {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

/// Two-sided standard normal quantile for a central interval of `width`
pub fn normal_quantile(width: f64) -> ForecastResult<f64> {
    if !(width > 0.0 && width < 1.0) {
        return Err(ForecastError::InvalidConfig(format!(
            "interval_width must be in (0, 1), got {}",
            width
        )));
    }

    let normal =
        Normal::new(0.0, 1.0).map_err(|e| ForecastError::InvalidConfig(e.to_string()))?;
    Ok(normal.inverse_cdf(0.5 + width / 2.0))
}
