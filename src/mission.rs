//! # Stage 4: mission ICME-exposure integration
//!
//! Given a spacecraft trajectory (daily heliocentric distance samples) and
//! the densified yearly-rate band from [`prediction`](crate::prediction),
//! accumulate the expected number of ICME encounters while the spacecraft
//! is inside a distance threshold: each surviving day contributes the
//! yearly rate at that epoch divided by 365.24. Mid, low and high are
//! integrated independently.

use log::debug;

use crate::constants::{Au, Mjd, DAYS_PER_YEAR};
use crate::icme_rate_errors::IcmeRateError;
use crate::prediction::RateSplines;

/// One trajectory sample: epoch and heliocentric distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySample {
    pub epoch: Mjd,
    pub distance: Au,
}

/// Expected encounter counts with their error band. Full precision;
/// [`ExpectedCount::rounded`] belongs to the reporting boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedCount {
    pub mid: f64,
    pub low: f64,
    pub high: f64,
}

impl ExpectedCount {
    pub const ZERO: ExpectedCount = ExpectedCount {
        mid: 0.0,
        low: 0.0,
        high: 0.0,
    };

    /// Counts rounded to the nearest whole encounter.
    pub fn rounded(&self) -> ExpectedCount {
        ExpectedCount {
            mid: self.mid.round(),
            low: self.low.round(),
            high: self.high.round(),
        }
    }
}

/// Expected encounters while the trajectory is inside `threshold`.
///
/// Arguments
/// -----------------
/// * `trajectory`: daily samples; each one counts as one day of exposure.
/// * `rates`: densified yearly-rate band; every surviving epoch must lie
///   inside its span.
/// * `threshold`: strict upper bound on distance (AU).
/// * `window`: optional inclusive epoch window further restricting the
///   selection (e.g. "until end of mission phase").
///
/// Return
/// ----------
/// * The integrated [`ExpectedCount`]; a selection with no surviving
///   samples is a defined zero, not an error.
pub fn expected_encounters(
    trajectory: &[TrajectorySample],
    rates: &RateSplines,
    threshold: Au,
    window: Option<(Mjd, Mjd)>,
) -> Result<ExpectedCount, IcmeRateError> {
    let mut total = ExpectedCount::ZERO;
    let mut days = 0usize;

    for sample in trajectory {
        if sample.distance >= threshold {
            continue;
        }
        if let Some((start, end)) = window {
            if sample.epoch < start || sample.epoch > end {
                continue;
            }
        }
        let (mid, low, high) = rates.eval(sample.epoch)?;
        total.mid += mid / DAYS_PER_YEAR;
        total.low += low / DAYS_PER_YEAR;
        total.high += high / DAYS_PER_YEAR;
        days += 1;
    }

    debug!(
        "exposure below {threshold} AU: {days} days, {:.2} expected encounters",
        total.mid
    );
    Ok(total)
}

/// Number of trajectory samples strictly below `threshold` (days, for a
/// daily-sampled trajectory).
pub fn days_below_threshold(trajectory: &[TrajectorySample], threshold: Au) -> usize {
    trajectory
        .iter()
        .filter(|s| s.distance < threshold)
        .count()
}

#[cfg(test)]
mod mission_test {
    use super::*;
    use crate::prediction::PredictionCurve;
    use approx::assert_relative_eq;

    /// Flat band at `rate` events per year across `[start, start + span]`.
    fn flat_rates(start: Mjd, span: f64, rate: f64) -> RateSplines {
        let epochs: Vec<Mjd> = (0..=4).map(|i| start + span * i as f64 / 4.0).collect();
        let n = epochs.len();
        PredictionCurve {
            epochs,
            mid: vec![rate; n],
            low: vec![rate * 0.5; n],
            high: vec![rate * 1.5; n],
        }
        .densify()
        .unwrap()
    }

    fn daily_trajectory(start: Mjd, distances: &[f64]) -> Vec<TrajectorySample> {
        distances
            .iter()
            .enumerate()
            .map(|(i, &distance)| TrajectorySample {
                epoch: start + i as f64,
                distance,
            })
            .collect()
    }

    #[test]
    fn test_constant_rate_exposure() {
        // 4 of 10 days below 0.3 AU at 0.05 events/day -> 0.2, reported as 0
        let start = 59000.0;
        let rates = flat_rates(start, 20.0, 0.05 * DAYS_PER_YEAR);
        let trajectory = daily_trajectory(
            start,
            &[0.9, 0.5, 0.29, 0.1, 0.25, 0.31, 0.8, 0.2, 0.6, 0.45],
        );

        let count = expected_encounters(&trajectory, &rates, 0.3, None).unwrap();
        assert_relative_eq!(count.mid, 0.2, epsilon = 1e-9);
        assert_eq!(count.rounded().mid, 0.0);
        assert_eq!(days_below_threshold(&trajectory, 0.3), 4);
    }

    #[test]
    fn test_empty_selection_is_zero() {
        let start = 59000.0;
        let rates = flat_rates(start, 20.0, 20.0);
        let trajectory = daily_trajectory(start, &[0.9, 0.8, 0.7]);
        let count = expected_encounters(&trajectory, &rates, 0.3, None).unwrap();
        assert_eq!(count, ExpectedCount::ZERO);
    }

    #[test]
    fn test_window_restricts_selection() {
        let start = 59000.0;
        let rates = flat_rates(start, 20.0, DAYS_PER_YEAR); // 1 event/day
        let trajectory = daily_trajectory(start, &[0.1; 10]);

        let all = expected_encounters(&trajectory, &rates, 0.3, None).unwrap();
        assert_relative_eq!(all.mid, 10.0, epsilon = 1e-9);

        let windowed =
            expected_encounters(&trajectory, &rates, 0.3, Some((start + 2.0, start + 5.0)))
                .unwrap();
        assert_relative_eq!(windowed.mid, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_band_scales_with_rate_band() {
        let start = 59000.0;
        let rates = flat_rates(start, 20.0, 10.0);
        let trajectory = daily_trajectory(start, &[0.1; 5]);
        let count = expected_encounters(&trajectory, &rates, 0.3, None).unwrap();
        assert_relative_eq!(count.low, count.mid * 0.5, epsilon = 1e-9);
        assert_relative_eq!(count.high, count.mid * 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_epoch_outside_rate_span_errors() {
        let start = 59000.0;
        let rates = flat_rates(start, 5.0, 10.0);
        let trajectory = daily_trajectory(start + 4.0, &[0.1, 0.1, 0.1]);
        assert!(matches!(
            expected_encounters(&trajectory, &rates, 0.3, None),
            Err(IcmeRateError::OutOfDomain { .. })
        ));
    }
}
