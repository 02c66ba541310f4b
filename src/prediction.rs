//! # Stage 3c: cycle 25 ICME-rate prediction
//!
//! Ties the earlier stages together: a sunspot-number scenario (a triple of
//! [`CycleShape`] curves for mid/low/high) is sampled at year midpoints,
//! converted to ICME rates through the fitted [`SsnToRate`] regression, and
//! wrapped in a total error bar combining three independent sources in
//! quadrature:
//!
//! * `e1`: spread of the sunspot-number scenario itself (zero for the
//!   average-cycle scenario, which has no published bounds),
//! * `e2`: half-width of the regression band at the scenario's central
//!   sunspot number,
//! * `e3`: observed cross-spacecraft rate spread of the previous cycle,
//!   mapped by cycle-year index and padded with
//!   [`SPREAD_FLOOR`](crate::constants::SPREAD_FLOOR) beyond catalog
//!   coverage.
//!
//! The yearly curve is then densified to a daily grid with the quadratic
//! spline; mid, low and high are interpolated independently.

use log::debug;

use crate::constants::{Mjd, Year, SPREAD_FLOOR};
use crate::cycle_shape::{fit_shape, CycleShape, FitSeed, MC20_AMPLITUDE_SIGMA};
use crate::icme_rate_errors::IcmeRateError;
use crate::regression::SsnToRate;
use crate::spline::QuadraticSpline;
use crate::time::{daily_grid, year_mid_mjd};

/// A sunspot-number scenario: central curve plus its published envelope.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub mid: CycleShape,
    pub low: CycleShape,
    pub high: CycleShape,
}

impl Scenario {
    /// Average of cycles 1–24. No published envelope, so the bounds
    /// coincide with the central curve.
    pub fn mean_cycle(cycle_start: Mjd) -> Self {
        let mid = CycleShape::mean_cycle(cycle_start);
        Scenario {
            name: "mean cycle",
            mid,
            low: mid,
            high: mid,
        }
    }

    /// McIntosh et al. (2020) amplitude with its symmetric 68 % bounds.
    pub fn published_amplitude(cycle_start: Mjd) -> Self {
        let mid = CycleShape::mc20(cycle_start);
        Scenario {
            name: "published amplitude",
            mid,
            low: mid.with_amplitude_offset(-MC20_AMPLITUDE_SIGMA),
            high: mid.with_amplitude_offset(MC20_AMPLITUDE_SIGMA),
        }
    }

    /// Panel-forecast scenario: the published predicted/low/high series are
    /// each refit with the full four-parameter shape, so the envelope may
    /// be asymmetric.
    pub fn panel_forecast(
        times: &[Mjd],
        predicted: &[f64],
        low: &[f64],
        high: &[f64],
        reference: Mjd,
    ) -> Result<Self, IcmeRateError> {
        let seed = FitSeed::default();
        let mid = fit_shape(times, predicted, reference, seed)?;
        let low = fit_shape(times, low, reference, seed)?;
        let high = fit_shape(times, high, reference, seed)?;
        debug!(
            "panel forecast fit: amplitude {:.1} ({:.1}..{:.1})",
            mid.amplitude, low.amplitude, high.amplitude
        );
        Ok(Scenario {
            name: "panel forecast",
            mid,
            low,
            high,
        })
    }

    /// Scenario sunspot numbers `(mid, low, high)` at epoch `t`.
    pub fn ssn_at(&self, t: Mjd) -> (f64, f64, f64) {
        (self.mid.eval(t), self.low.eval(t), self.high.eval(t))
    }
}

/// Total error from the three independent sources, combined in quadrature.
pub fn quadrature3(e1: f64, e2: f64, e3: f64) -> f64 {
    (e1 * e1 + e2 * e2 + e3 * e3).sqrt()
}

/// Map the previous cycle's observed yearly rate spreads onto `n_years` of
/// prediction, by cycle-year index. Years without an observed spread (and
/// years beyond the previous cycle's coverage) get [`SPREAD_FLOOR`].
pub fn spread_series(previous_cycle_std: &[Option<f64>], n_years: usize) -> Vec<f64> {
    (0..n_years)
        .map(|i| {
            previous_cycle_std
                .get(i)
                .copied()
                .flatten()
                .unwrap_or(SPREAD_FLOOR)
        })
        .collect()
}

/// Predicted ICME rates with their total error band, at yearly control
/// points (year midpoints).
#[derive(Debug, Clone)]
pub struct PredictionCurve {
    pub epochs: Vec<Mjd>,
    pub mid: Vec<f64>,
    pub low: Vec<f64>,
    pub high: Vec<f64>,
}

impl PredictionCurve {
    /// Independent quadratic splines through the three curves, ready for
    /// daily evaluation.
    pub fn densify(&self) -> Result<RateSplines, IcmeRateError> {
        Ok(RateSplines {
            mid: QuadraticSpline::new(self.epochs.clone(), self.mid.clone())?,
            low: QuadraticSpline::new(self.epochs.clone(), self.low.clone())?,
            high: QuadraticSpline::new(self.epochs.clone(), self.high.clone())?,
        })
    }
}

/// Daily-evaluable smoothed prediction band.
#[derive(Debug, Clone)]
pub struct RateSplines {
    mid: QuadraticSpline,
    low: QuadraticSpline,
    high: QuadraticSpline,
}

impl RateSplines {
    /// `(mid, low, high)` yearly rate at epoch `t`; out-of-span queries are
    /// an error, never an extrapolation.
    pub fn eval(&self, t: Mjd) -> Result<(f64, f64, f64), IcmeRateError> {
        Ok((self.mid.eval(t)?, self.low.eval(t)?, self.high.eval(t)?))
    }

    /// Knot span shared by the three splines.
    pub fn domain(&self) -> (Mjd, Mjd) {
        self.mid.domain()
    }

    /// The band sampled on a one-day grid spanning exactly the control
    /// points (both endpoints included).
    pub fn daily(&self) -> Result<PredictionCurve, IcmeRateError> {
        let (start, end) = self.domain();
        let epochs = daily_grid(start, end);
        Ok(PredictionCurve {
            mid: self.mid.eval_grid(&epochs)?,
            low: self.low.eval_grid(&epochs)?,
            high: self.high.eval_grid(&epochs)?,
            epochs,
        })
    }
}

/// Yearly prediction for one scenario over an inclusive year span.
///
/// Arguments
/// -----------------
/// * `scenario`: the sunspot-number scenario to convert.
/// * `convert`: the fitted sunspot-to-rate regression with its band.
/// * `first`, `last`: prediction years; control points sit at midyear.
/// * `spreads`: per-year `e3` values aligned to the span
///   (from [`spread_series`]).
pub fn yearly_prediction(
    scenario: &Scenario,
    convert: &SsnToRate,
    first: Year,
    last: Year,
    spreads: &[f64],
) -> Result<PredictionCurve, IcmeRateError> {
    let n_years = (last - first + 1) as usize;
    if spreads.len() != n_years {
        return Err(IcmeRateError::SeriesLengthMismatch {
            left: spreads.len(),
            right: n_years,
        });
    }

    let mut epochs = Vec::with_capacity(n_years);
    let mut mid = Vec::with_capacity(n_years);
    let mut low = Vec::with_capacity(n_years);
    let mut high = Vec::with_capacity(n_years);

    for (i, year) in (first..=last).enumerate() {
        let t = year_mid_mjd(year);
        let (ssn_mid, ssn_low, ssn_high) = scenario.ssn_at(t);
        let rate = convert.model.predict(ssn_mid);

        // scenario spread, one-sided averages around the central curve
        let e1 = ((convert.model.predict(ssn_high) - rate)
            + (convert.model.predict(ssn_low) - rate).abs())
            / 2.0;
        // regression band half-width at the central sunspot number
        let band = convert.convert(ssn_mid);
        let e2 = band.mid - band.low;
        let e3 = spreads[i];
        let total = quadrature3(e1, e2, e3);

        epochs.push(t);
        mid.push(rate);
        low.push(rate - total);
        high.push(rate + total);
    }

    debug!(
        "scenario '{}': {} yearly control points, {}..{}",
        scenario.name, n_years, first, last
    );
    Ok(PredictionCurve {
        epochs,
        mid,
        low,
        high,
    })
}

#[cfg(test)]
mod prediction_test {
    use super::*;
    use crate::regression::RegressionModel;
    use approx::assert_relative_eq;

    fn test_convert() -> SsnToRate {
        SsnToRate::new(
            RegressionModel {
                slope: 0.2,
                intercept: 1.0,
                slope_stderr: 0.01,
                r_value: 0.98,
            },
            1.5,
        )
    }

    #[test]
    fn test_quadrature_permutation_invariant() {
        let (a, b, c) = (1.7, 4.2, 0.3);
        let total = quadrature3(a, b, c);
        assert_relative_eq!(total, quadrature3(c, a, b), epsilon = 1e-15);
        assert_relative_eq!(total, quadrature3(b, c, a), epsilon = 1e-15);
        assert_relative_eq!(quadrature3(3.0, 4.0, 0.0), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_spread_series_floor_and_padding() {
        let observed = [Some(4.5), Some(0.7), None];
        let spreads = spread_series(&observed, 5);
        assert_eq!(spreads, vec![4.5, 0.7, SPREAD_FLOOR, SPREAD_FLOOR, SPREAD_FLOOR]);
    }

    #[test]
    fn test_mean_cycle_has_no_scenario_spread() {
        let scenario = Scenario::mean_cycle(58849.0);
        let convert = test_convert();
        let spreads = vec![2.0; 3];
        let curve = yearly_prediction(&scenario, &convert, 2020, 2022, &spreads).unwrap();

        for i in 0..3 {
            let (ssn, ssn_low, ssn_high) = scenario.ssn_at(curve.epochs[i]);
            assert_relative_eq!(ssn_low, ssn, epsilon = 1e-12);
            assert_relative_eq!(ssn_high, ssn, epsilon = 1e-12);
            // e1 = 0, so the band is sqrt(e2² + e3²) around the mid curve
            let band = convert.convert(ssn);
            let expected = quadrature3(0.0, band.mid - band.low, 2.0);
            assert_relative_eq!(curve.mid[i] - curve.low[i], expected, epsilon = 1e-12);
            assert_relative_eq!(curve.high[i] - curve.mid[i], expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_band_ordering() {
        let scenario = Scenario::published_amplitude(58849.0);
        let convert = test_convert();
        let spreads = spread_series(&[], 6);
        let curve = yearly_prediction(&scenario, &convert, 2020, 2025, &spreads).unwrap();
        for i in 0..curve.epochs.len() {
            assert!(curve.low[i] < curve.mid[i]);
            assert!(curve.mid[i] < curve.high[i]);
        }
    }

    #[test]
    fn test_spreads_length_checked() {
        let scenario = Scenario::mean_cycle(58849.0);
        let convert = test_convert();
        assert!(matches!(
            yearly_prediction(&scenario, &convert, 2020, 2025, &[1.0, 2.0]),
            Err(IcmeRateError::SeriesLengthMismatch { left: 2, right: 6 })
        ));
    }

    #[test]
    fn test_densified_rejects_query_past_last_knot() {
        let scenario = Scenario::mean_cycle(58849.0);
        let convert = test_convert();
        let spreads = spread_series(&[], 4);
        let curve = yearly_prediction(&scenario, &convert, 2021, 2024, &spreads).unwrap();
        let splines = curve.densify().unwrap();

        let (_, end) = splines.domain();
        assert!(splines.eval(end).is_ok());
        assert!(matches!(
            splines.eval(end + 1.0),
            Err(IcmeRateError::OutOfDomain { .. })
        ));
    }

    #[test]
    fn test_daily_grid_spans_control_points() {
        let scenario = Scenario::published_amplitude(58849.0);
        let convert = test_convert();
        let spreads = spread_series(&[], 4);
        let yearly = yearly_prediction(&scenario, &convert, 2021, 2024, &spreads).unwrap();
        let daily = yearly.densify().unwrap().daily().unwrap();

        assert_eq!(daily.epochs[0], yearly.epochs[0]);
        assert!(*daily.epochs.last().unwrap() <= *yearly.epochs.last().unwrap());
        // three year-midpoint gaps of 365/366 days each
        assert!(daily.epochs.len() > 1090 && daily.epochs.len() < 1100);
        // spline interpolates the control points
        assert_relative_eq!(daily.mid[0], yearly.mid[0], epsilon = 1e-9);
    }
}
