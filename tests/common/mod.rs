use approx::assert_relative_eq;

use icme_rate::constants::{Year, MINUTES_PER_DAY};
use icme_rate::coverage::InsituSample;
use icme_rate::time::year_start_mjd;

/// Defined fixed-cadence samples covering exactly `days` from the start of
/// `year`, so the cadence coverage of that year is `days`.
#[allow(dead_code)]
pub fn cadence_days(year: Year, days: f64, minutes: f64) -> Vec<InsituSample> {
    let start = year_start_mjd(year);
    let n = (days * MINUTES_PER_DAY / minutes) as usize;
    (0..n)
        .map(|i| InsituSample {
            epoch: start + i as f64 * minutes / MINUTES_PER_DAY,
            field: Some(5.0),
        })
        .collect()
}

#[allow(dead_code)]
pub fn assert_band_close(actual: (f64, f64, f64), expected: (f64, f64, f64), epsilon: f64) {
    assert_relative_eq!(actual.0, expected.0, epsilon = epsilon);
    assert_relative_eq!(actual.1, expected.1, epsilon = epsilon);
    assert_relative_eq!(actual.2, expected.2, epsilon = epsilon);
}
