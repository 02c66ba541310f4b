//! Historical reference catalog reader.
//!
//! The near-Earth reference list (Richardson & Cane style) carries one
//! disturbance arrival timestamp per row in a `disturbance_time` column.
//! Its yearly event counts are ground truth for the reference cycles: no
//! coverage normalization applies, near-Earth monitoring is continuous
//! over the list's span.

use std::io::Read;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::constants::{Mjd, Year};
use crate::icme_rate_errors::IcmeRateError;
use crate::time::{iso_to_mjd, year_window};

#[derive(Debug, Deserialize)]
struct ReferenceRow {
    disturbance_time: String,
}

/// Read the reference list into sorted event epochs.
pub fn read_reference<R: Read>(reader: R) -> Result<Vec<Mjd>, IcmeRateError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut epochs = Vec::new();
    for row in csv_reader.deserialize::<ReferenceRow>() {
        let row = row?;
        epochs.push(iso_to_mjd(&row.disturbance_time)?);
    }
    epochs.sort_by(f64::total_cmp);
    debug!("reference list: {} events", epochs.len());
    Ok(epochs)
}

/// [`read_reference`] from a file path.
pub fn read_reference_file(path: impl AsRef<Path>) -> Result<Vec<Mjd>, IcmeRateError> {
    read_reference(std::fs::File::open(path)?)
}

/// A labeled per-year count series over an inclusive year span, typically
/// one solar cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSeries {
    pub label: String,
    pub first: Year,
    pub last: Year,
    pub counts: Vec<u32>,
}

impl ReferenceSeries {
    /// Bin events into `[Jan 1 y, Jan 1 y+1)` windows over `first..=last`.
    pub fn from_events(label: &str, events: &[Mjd], first: Year, last: Year) -> Self {
        let counts = (first..=last)
            .map(|year| {
                let (start, end) = year_window(year);
                events.iter().filter(|&&e| e >= start && e < end).count() as u32
            })
            .collect();
        ReferenceSeries {
            label: label.to_string(),
            first,
            last,
            counts,
        }
    }

    /// `(year, count)` pairs in year order.
    pub fn years(&self) -> impl Iterator<Item = (Year, u32)> + '_ {
        (self.first..=self.last).zip(self.counts.iter().copied())
    }

    /// Counts as `f64`, for pairing with sunspot numbers in the regression.
    pub fn counts_f64(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| f64::from(c)).collect()
    }
}
