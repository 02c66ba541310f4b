//! # Stage 1: instrument coverage per calendar year
//!
//! An ICME count for a year is only meaningful relative to how long the
//! detecting instrument was actually returning data that year. This module
//! turns a raw in-situ sample series (timestamps with an optional field
//! magnitude; `None` when the instrument returned nothing usable) into
//! **available observation days** per `(spacecraft, year)`.
//!
//! Two methods cover the instrument families of the source catalogs:
//!
//! * [`CoverageMethod::Cadence`] for spacecraft sampling on a fixed cadence
//!   in the solar wind: defined samples × cadence.
//! * [`CoverageMethod::GapSum`] for irregular-orbit instruments whose
//!   series contain long voids (planetary orbiters): sum of
//!   consecutive-sample gaps below
//!   [`ORBIT_GAP_MAX_DAYS`](crate::constants::ORBIT_GAP_MAX_DAYS),
//!   so a void between orbits is never counted as covered time.
//!
//! A year with no usable data has **undefined** coverage (`None`), which
//! propagates into an undefined rate downstream; it is never zero.
//!
//! Known anomalous epochs (e.g. heavily despiked years) are handled by an
//! explicit [`CoverageOverrides`] table consulted *after* the generic
//! computation, so every pinned value is auditable in one place.

use ahash::RandomState;
use std::collections::HashMap;

use crate::constants::{Mjd, ScId, Year, MINUTES_PER_DAY, ORBIT_GAP_MAX_DAYS};
use crate::time::year_window;

/// One raw in-situ measurement: a timestamp and the total field magnitude,
/// `None` where the instrument delivered no usable value.
#[derive(Debug, Clone, Copy)]
pub struct InsituSample {
    pub epoch: Mjd,
    pub field: Option<f64>,
}

/// How available days are derived from a sample series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoverageMethod {
    /// Fixed-cadence instrument: defined samples × `minutes` of coverage each.
    Cadence { minutes: f64 },
    /// Irregular-orbit instrument: sum consecutive defined-sample gaps
    /// strictly below `max_gap_days`.
    GapSum { max_gap_days: f64 },
}

impl CoverageMethod {
    /// Gap-sum coverage with the study's orbit-gap calibration (0.25 day).
    pub fn orbit_gap_sum() -> Self {
        CoverageMethod::GapSum {
            max_gap_days: ORBIT_GAP_MAX_DAYS,
        }
    }
}

/// Available observation days of one spacecraft in one calendar year.
///
/// Arguments
/// -----------------
/// * `samples`: the raw series, sorted by time (required for gap sums).
/// * `year`: calendar year, binned as `[Jan 1, Jan 1 next)`.
/// * `method`: cadence or gap-sum derivation.
///
/// Return
/// ----------
/// * `Some(days)` with `days > 0`, or `None` when the year holds no usable
///   data. Callers must propagate `None`, never substitute zero.
pub fn available_days(samples: &[InsituSample], year: Year, method: CoverageMethod) -> Option<f64> {
    let (start, end) = year_window(year);
    let epochs: Vec<Mjd> = samples
        .iter()
        .filter(|s| s.epoch >= start && s.epoch < end && s.field.is_some())
        .map(|s| s.epoch)
        .collect();

    let days = match method {
        CoverageMethod::Cadence { minutes } => epochs.len() as f64 * minutes / MINUTES_PER_DAY,
        CoverageMethod::GapSum { max_gap_days } => epochs
            .windows(2)
            .map(|w| w[1] - w[0])
            .filter(|gap| *gap < max_gap_days)
            .sum(),
    };

    (days > 0.0).then_some(days)
}

/// Explicit `(spacecraft, year) → days` pins replacing the computed
/// coverage for known anomalous epochs.
#[derive(Debug, Clone, Default)]
pub struct CoverageOverrides {
    table: HashMap<(ScId, Year), f64, RandomState>,
}

impl CoverageOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the coverage of `(spacecraft, year)` to `days`.
    pub fn pin(mut self, spacecraft: &str, year: Year, days: f64) -> Self {
        self.table.insert((spacecraft.to_string(), year), days);
        self
    }

    /// Replace `computed` with the pinned value when one exists.
    pub fn apply(&self, spacecraft: &str, year: Year, computed: Option<f64>) -> Option<f64> {
        self.table
            .get(&(spacecraft.to_string(), year))
            .copied()
            .or(computed)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Per-year available days of one spacecraft over an inclusive year span,
/// with overrides applied after the generic computation.
pub fn yearly_available_days(
    spacecraft: &str,
    samples: &[InsituSample],
    first: Year,
    last: Year,
    method: CoverageMethod,
    overrides: &CoverageOverrides,
) -> Vec<Option<f64>> {
    (first..=last)
        .map(|year| {
            let computed = available_days(samples, year, method);
            overrides.apply(spacecraft, year, computed)
        })
        .collect()
}
