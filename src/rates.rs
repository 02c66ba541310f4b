//! # Stages 1 and 2: coverage-corrected yearly rates and cross-spacecraft summaries
//!
//! Combines yearly event counts with the available-days series from
//! [`coverage`](crate::coverage) into corrected rates
//! (`events × 365.24 / days`), then reduces the per-spacecraft rates of a
//! year into a [`CycleSummary`] (mean, median, population std, min, max over
//! the defined subset).
//!
//! Undefined coverage makes the rate undefined; undefined rates are skipped
//! by the summaries and a year where every spacecraft is undefined has an
//! entirely undefined summary.
//!
//! Year/spacecraft combinations whose computed rate is known to be wrong
//! (beacon-only data, too little coverage to trust the normalization) are
//! pinned through the explicit [`RateOverrides`] table, including pins to
//! *undefined*, after the generic computation.

use std::collections::HashMap;
use std::fmt;

use ahash::RandomState;
use itertools::izip;

use crate::constants::{Mjd, ScId, Year, DAYS_PER_YEAR};
use crate::stats;
use crate::time::year_window;

/// One catalog event: the detecting spacecraft and the event start epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub spacecraft: ScId,
    pub start: Mjd,
}

/// Raw event counts per calendar year over an inclusive span,
/// binned into `[Jan 1 y, Jan 1 y+1)` windows.
pub fn yearly_event_counts(events: &[EventRecord], first: Year, last: Year) -> Vec<u32> {
    (first..=last)
        .map(|year| {
            let (start, end) = year_window(year);
            events
                .iter()
                .filter(|e| e.start >= start && e.start < end)
                .count() as u32
        })
        .collect()
}

/// Coverage-corrected yearly rate: `events × 365.24 / days`.
///
/// Undefined coverage propagates to an undefined rate; full precision is
/// kept here, rounding belongs to the reporting boundary
/// ([`stats::round1`]).
pub fn corrected_rate(events: u32, available_days: Option<f64>) -> Option<f64> {
    available_days.map(|days| f64::from(events) * DAYS_PER_YEAR / days)
}

/// Corrected rate of one spacecraft for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyRate {
    pub spacecraft: ScId,
    pub year: Year,
    pub events: u32,
    pub rate: Option<f64>,
}

/// Explicit `(spacecraft, year) → rate` pins replacing the computed rate,
/// including pins to undefined.
#[derive(Debug, Clone, Default)]
pub struct RateOverrides {
    table: HashMap<(ScId, Year), Option<f64>, RandomState>,
}

impl RateOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the rate of `(spacecraft, year)` to a fixed value.
    pub fn pin(mut self, spacecraft: &str, year: Year, rate: f64) -> Self {
        self.table.insert((spacecraft.to_string(), year), Some(rate));
        self
    }

    /// Pin the rate of `(spacecraft, year)` to undefined
    /// (e.g. "not enough data" years).
    pub fn pin_undefined(mut self, spacecraft: &str, year: Year) -> Self {
        self.table.insert((spacecraft.to_string(), year), None);
        self
    }

    /// Replace `computed` with the pinned value when one exists.
    pub fn apply(&self, spacecraft: &str, year: Year, computed: Option<f64>) -> Option<f64> {
        match self.table.get(&(spacecraft.to_string(), year)) {
            Some(pinned) => *pinned,
            None => computed,
        }
    }
}

/// Corrected rates of one spacecraft over an inclusive year span.
///
/// Arguments
/// -----------------
/// * `events`: this spacecraft's catalog events.
/// * `available_days`: per-year coverage aligned to `first..=last`
///   (from [`yearly_available_days`](crate::coverage::yearly_available_days)).
/// * `overrides`: explicit rate pins applied after the computation.
pub fn yearly_rates(
    spacecraft: &str,
    events: &[EventRecord],
    available_days: &[Option<f64>],
    first: Year,
    last: Year,
    overrides: &RateOverrides,
) -> Vec<YearlyRate> {
    let counts = yearly_event_counts(events, first, last);
    izip!(counts, available_days, first..=last)
        .map(|(events, &days, year)| {
            let computed = corrected_rate(events, days);
            YearlyRate {
                spacecraft: spacecraft.to_string(),
                year,
                events,
                rate: overrides.apply(spacecraft, year, computed),
            }
        })
        .collect()
}

/// Cross-spacecraft summary of the corrected rates of one year.
///
/// All statistics run over the defined subset; a year with no defined
/// rate at any spacecraft is summarized as entirely undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSummary {
    pub year: Year,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
}

impl CycleSummary {
    pub fn from_rates(year: Year, rates: &[Option<f64>]) -> Self {
        let defined = stats::defined(rates);
        CycleSummary {
            year,
            mean: stats::mean(&defined),
            median: stats::median(&defined),
            std: stats::std_pop(&defined),
            max: stats::max(&defined),
            min: stats::min(&defined),
        }
    }
}

impl fmt::Display for CycleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn field(v: Option<f64>) -> String {
            v.map_or_else(|| "n/a".to_string(), |x| format!("{:.1}", stats::round1(x)))
        }
        write!(
            f,
            "{}: mean={}, median={}, std={}, min={}, max={}",
            self.year,
            field(self.mean),
            field(self.median),
            field(self.std),
            field(self.min),
            field(self.max),
        )
    }
}

/// Per-year summaries across a set of spacecraft rate series.
///
/// Each input series may cover a different year span; a spacecraft simply
/// contributes nothing to years outside its span.
pub fn cross_spacecraft_summaries(
    rate_series: &[&[YearlyRate]],
    first: Year,
    last: Year,
) -> Vec<CycleSummary> {
    (first..=last)
        .map(|year| {
            let rates: Vec<Option<f64>> = rate_series
                .iter()
                .filter_map(|series| series.iter().find(|r| r.year == year))
                .map(|r| r.rate)
                .collect();
            CycleSummary::from_rates(year, &rates)
        })
        .collect()
}

#[cfg(test)]
mod rates_test {
    use super::*;
    use crate::time::year_start_mjd;
    use approx::assert_relative_eq;

    fn event(spacecraft: &str, mjd: Mjd) -> EventRecord {
        EventRecord {
            spacecraft: spacecraft.to_string(),
            start: mjd,
        }
    }

    #[test]
    fn test_yearly_event_counts_binning() {
        let y2015 = year_start_mjd(2015);
        let y2016 = year_start_mjd(2016);
        let events = vec![
            event("A", y2015),
            event("A", y2015 + 100.0),
            event("A", y2016 - 0.001),
            event("A", y2016), // first instant of 2016
        ];
        let counts = yearly_event_counts(&events, 2015, 2016);
        assert_eq!(counts, vec![3, 1]);
    }

    #[test]
    fn test_corrected_rate_example() {
        // 10 events over 300 available days -> 12.17, reported as 12.2
        let rate = corrected_rate(10, Some(300.0)).unwrap();
        assert_relative_eq!(rate, 10.0 / 300.0 * 365.24, epsilon = 1e-12);
        assert_eq!(crate::stats::round1(rate), 12.2);
    }

    #[test]
    fn test_undefined_coverage_propagates() {
        assert_eq!(corrected_rate(10, None), None);
    }

    #[test]
    fn test_rate_overrides() {
        let overrides = RateOverrides::new()
            .pin("STEREO-A", 2019, 13.0)
            .pin_undefined("MAVEN", 2014);
        assert_eq!(overrides.apply("STEREO-A", 2019, Some(22.5)), Some(13.0));
        assert_eq!(overrides.apply("MAVEN", 2014, Some(40.1)), None);
        assert_eq!(overrides.apply("Wind", 2014, Some(7.0)), Some(7.0));
    }

    #[test]
    fn test_yearly_rates_with_overrides() {
        let y2014 = year_start_mjd(2014);
        let events = vec![event("MAVEN", y2014 + 10.0), event("MAVEN", y2014 + 20.0)];
        let days = vec![Some(30.0)];
        let overrides = RateOverrides::new().pin_undefined("MAVEN", 2014);
        let rates = yearly_rates("MAVEN", &events, &days, 2014, 2014, &overrides);
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].events, 2);
        assert_eq!(rates[0].rate, None);
    }

    #[test]
    fn test_summary_with_undefined_entry() {
        // one defined rate, one undefined: every statistic comes from the
        // defined subset alone
        let summary = CycleSummary::from_rates(2012, &[Some(10.0), None]);
        assert_eq!(summary.mean, Some(10.0));
        assert_eq!(summary.median, Some(10.0));
        assert_eq!(summary.min, Some(10.0));
        assert_eq!(summary.max, Some(10.0));
        assert_eq!(summary.std, Some(0.0));
    }

    #[test]
    fn test_summary_all_undefined() {
        let summary = CycleSummary::from_rates(2012, &[None, None, None]);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.median, None);
        assert_eq!(summary.std, None);
        assert_eq!(summary.min, None);
        assert_eq!(summary.max, None);
    }

    #[test]
    fn test_summary_ordering_invariants() {
        let rates = [Some(12.0), Some(31.5), None, Some(19.9), Some(26.0)];
        let s = CycleSummary::from_rates(2013, &rates);
        let (min, max) = (s.min.unwrap(), s.max.unwrap());
        assert!(min <= s.mean.unwrap() && s.mean.unwrap() <= max);
        assert!(min <= s.median.unwrap() && s.median.unwrap() <= max);
    }

    #[test]
    fn test_cross_spacecraft_summaries() {
        let a = vec![
            YearlyRate {
                spacecraft: "A".into(),
                year: 2012,
                events: 10,
                rate: Some(10.0),
            },
            YearlyRate {
                spacecraft: "A".into(),
                year: 2013,
                events: 20,
                rate: Some(20.0),
            },
        ];
        let b = vec![YearlyRate {
            spacecraft: "B".into(),
            year: 2013,
            events: 30,
            rate: Some(30.0),
        }];
        let summaries = cross_spacecraft_summaries(&[&a, &b], 2012, 2013);
        assert_eq!(summaries[0].mean, Some(10.0));
        assert_eq!(summaries[1].mean, Some(25.0));
        assert_eq!(summaries[1].std, Some(5.0));
    }
}
