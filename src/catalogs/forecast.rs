//! Published monthly sunspot forecast reader (JSON).
//!
//! The feed is an array of monthly objects:
//! `{"time-tag": "2020-06", "predicted_ssn": …, "high_ssn": …, "low_ssn": …}`.
//! The `time-tag` is a year-month; each entry is anchored at the first of
//! its month.

use std::io::Read;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::constants::Mjd;
use crate::icme_rate_errors::IcmeRateError;
use crate::time::ymd_to_mjd;

#[derive(Debug, Deserialize)]
struct ForecastRow {
    #[serde(rename = "time-tag")]
    time_tag: String,
    predicted_ssn: f64,
    high_ssn: f64,
    low_ssn: f64,
}

/// The forecast as aligned monthly series.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    pub epochs: Vec<Mjd>,
    pub predicted: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
}

impl ForecastSeries {
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }
}

fn month_tag_to_mjd(tag: &str) -> Result<Mjd, IcmeRateError> {
    let bad = || IcmeRateError::InvalidTimestamp(tag.to_string());
    let (year, month) = tag.split_once('-').ok_or_else(bad)?;
    let year = year.parse().map_err(|_| bad())?;
    let month: u8 = month.parse().map_err(|_| bad())?;
    if !(1..=12).contains(&month) {
        return Err(bad());
    }
    Ok(ymd_to_mjd(year, month, 1))
}

/// Read the forecast feed, keeping its chronological order.
pub fn read_forecast<R: Read>(reader: R) -> Result<ForecastSeries, IcmeRateError> {
    let rows: Vec<ForecastRow> = serde_json::from_reader(reader)?;
    let mut series = ForecastSeries {
        epochs: Vec::with_capacity(rows.len()),
        predicted: Vec::with_capacity(rows.len()),
        high: Vec::with_capacity(rows.len()),
        low: Vec::with_capacity(rows.len()),
    };
    for row in rows {
        series.epochs.push(month_tag_to_mjd(&row.time_tag)?);
        series.predicted.push(row.predicted_ssn);
        series.high.push(row.high_ssn);
        series.low.push(row.low_ssn);
    }
    debug!("forecast: {} monthly entries", series.len());
    Ok(series)
}

/// [`read_forecast`] from a file path.
pub fn read_forecast_file(path: impl AsRef<Path>) -> Result<ForecastSeries, IcmeRateError> {
    read_forecast(std::fs::File::open(path)?)
}
