//! # Stage 3a: sunspot-number to ICME-rate regression
//!
//! Ordinary least squares of the yearly ICME rate on the yearly mean
//! sunspot number, fit over the concatenated reference cycles. The model
//! exposes the slope standard error and the Pearson correlation
//! coefficient; the band conversion widens the ±1σ slope envelope by the
//! empirical residual spread observed over the reference cycles, so the
//! band reflects both fit confidence and real year-to-year scatter.

use crate::icme_rate_errors::IcmeRateError;
use crate::stats;

/// Fewest finite pairs for which every reported statistic (slope standard
/// error needs n − 2 degrees of freedom) is defined.
pub const MIN_FIT_PAIRS: usize = 3;

/// Ordinary-least-squares fit of rate on sunspot number.
/// Immutable once fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionModel {
    pub slope: f64,
    pub intercept: f64,
    /// standard error of the slope
    pub slope_stderr: f64,
    /// Pearson correlation coefficient
    pub r_value: f64,
}

impl RegressionModel {
    /// Fit the model over `(sunspot number, rate)` pairs.
    ///
    /// Non-finite pairs are excluded from the fit; the fit fails with
    /// [`IcmeRateError::NotEnoughFinitePairs`] when fewer than
    /// [`MIN_FIT_PAIRS`] remain, and with
    /// [`IcmeRateError::DegenerateRegression`] when the remaining
    /// abscissae have no variance.
    pub fn fit(pairs: &[(f64, f64)]) -> Result<Self, IcmeRateError> {
        let finite: Vec<(f64, f64)> = pairs
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        let n = finite.len();
        if n < MIN_FIT_PAIRS {
            return Err(IcmeRateError::NotEnoughFinitePairs {
                min: MIN_FIT_PAIRS,
                got: n,
            });
        }

        let nf = n as f64;
        let mx = finite.iter().map(|(x, _)| x).sum::<f64>() / nf;
        let my = finite.iter().map(|(_, y)| y).sum::<f64>() / nf;
        let sxx: f64 = finite.iter().map(|(x, _)| (x - mx).powi(2)).sum();
        let syy: f64 = finite.iter().map(|(_, y)| (y - my).powi(2)).sum();
        let sxy: f64 = finite.iter().map(|(x, y)| (x - mx) * (y - my)).sum();

        if sxx == 0.0 {
            return Err(IcmeRateError::DegenerateRegression);
        }

        let slope = sxy / sxx;
        let intercept = my - slope * mx;
        // residual sum of squares, clamped against roundoff on exact fits
        let ss_res = (syy - slope * sxy).max(0.0);
        let slope_stderr = (ss_res / (nf - 2.0) / sxx).sqrt();
        let r_value = if syy == 0.0 {
            0.0
        } else {
            sxy / (sxx * syy).sqrt()
        };

        Ok(RegressionModel {
            slope,
            intercept,
            slope_stderr,
            r_value,
        })
    }

    /// Central prediction `slope · ssn + intercept`.
    pub fn predict(&self, ssn: f64) -> f64 {
        self.slope * ssn + self.intercept
    }
}

/// Mean over reference cycles of the population standard deviation of the
/// fit residuals (predicted − observed): the empirical spread that widens
/// the conversion band beyond pure slope uncertainty.
pub fn residual_spread(model: &RegressionModel, cycles: &[&[(f64, f64)]]) -> f64 {
    let per_cycle: Vec<f64> = cycles
        .iter()
        .filter_map(|pairs| {
            let residuals: Vec<f64> = pairs
                .iter()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|(x, y)| model.predict(*x) - y)
                .collect();
            stats::std_pop(&residuals)
        })
        .collect();
    stats::mean(&per_cycle).unwrap_or(0.0)
}

/// A central rate with its asymmetric confidence bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateBand {
    pub mid: f64,
    pub low: f64,
    pub high: f64,
}

/// The fitted conversion from sunspot number to ICME rate with its band.
#[derive(Debug, Clone, Copy)]
pub struct SsnToRate {
    pub model: RegressionModel,
    /// empirical widening from [`residual_spread`]
    pub spread: f64,
}

impl SsnToRate {
    pub fn new(model: RegressionModel, spread: f64) -> Self {
        Self { model, spread }
    }

    /// Convert one sunspot number into a rate band:
    /// `mid = s·x + i`, `low = (s − se)·x + i − spread`,
    /// `high = (s + se)·x + i + spread`.
    pub fn convert(&self, ssn: f64) -> RateBand {
        let m = &self.model;
        RateBand {
            mid: m.predict(ssn),
            low: (m.slope - m.slope_stderr) * ssn + m.intercept - self.spread,
            high: (m.slope + m.slope_stderr) * ssn + m.intercept + self.spread,
        }
    }

    /// Convert a whole sunspot series.
    pub fn convert_series(&self, ssn: &[f64]) -> Vec<RateBand> {
        ssn.iter().map(|&s| self.convert(s)).collect()
    }
}
