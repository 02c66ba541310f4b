//! Sunspot-number inputs: the SILSO daily total series and the solar-cycle
//! minima/maxima table.
//!
//! The daily series is semicolon-separated with no header:
//! `year;month;day;decimal_year;ssn;std;n_obs;definitive`, where a negative
//! sunspot number marks a day without an estimate. The cycle table is a
//! whitespace-separated text file, one cycle per line:
//! `cycle start_date max_date max_ssn` with ISO dates; `#` lines and blank
//! lines are skipped.

use std::io::Read;
use std::path::Path;

use log::debug;

use crate::constants::{Mjd, Year, SSN_SMOOTHING_WINDOW};
use crate::icme_rate_errors::IcmeRateError;
use crate::stats;
use crate::time::{iso_to_mjd, year_window, ymd_to_mjd};

/// One day of the sunspot series; `None` where no estimate exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailySsn {
    pub epoch: Mjd,
    pub ssn: Option<f64>,
}

type SilsoRow = (Year, u8, u8, f64, f64, f64, i32, i32);

/// Read the daily sunspot series, keeping its chronological order.
pub fn read_daily_ssn<R: Read>(reader: R) -> Result<Vec<DailySsn>, IcmeRateError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut daily = Vec::new();
    for row in csv_reader.deserialize::<SilsoRow>() {
        let (year, month, day, _decimal_year, ssn, _std, _n_obs, _definitive) = row?;
        daily.push(DailySsn {
            epoch: ymd_to_mjd(year, month, day),
            ssn: (ssn >= 0.0).then_some(ssn),
        });
    }
    debug!("silso: {} daily sunspot values", daily.len());
    Ok(daily)
}

/// [`read_daily_ssn`] from a file path.
pub fn read_daily_ssn_file(path: impl AsRef<Path>) -> Result<Vec<DailySsn>, IcmeRateError> {
    read_daily_ssn(std::fs::File::open(path)?)
}

/// Mean sunspot number per calendar year over an inclusive span, `None`
/// for years without any defined daily value.
pub fn yearly_mean_ssn(daily: &[DailySsn], first: Year, last: Year) -> Vec<Option<f64>> {
    (first..=last)
        .map(|year| {
            let (start, end) = year_window(year);
            let in_year: Vec<f64> = daily
                .iter()
                .filter(|d| d.epoch >= start && d.epoch < end)
                .filter_map(|d| d.ssn)
                .collect();
            stats::mean(&in_year)
        })
        .collect()
}

/// 12-month centered running mean of the daily series
/// ([`SSN_SMOOTHING_WINDOW`] samples); edges and all-missing windows stay
/// undefined.
pub fn smoothed_ssn(daily: &[DailySsn]) -> Vec<Option<f64>> {
    let values: Vec<Option<f64>> = daily.iter().map(|d| d.ssn).collect();
    stats::running_mean(&values, SSN_SMOOTHING_WINDOW)
}

/// One solar cycle from the minima/maxima table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleExtremum {
    pub cycle: u32,
    /// cycle start (minimum) epoch
    pub start: Mjd,
    /// epoch of the smoothed maximum
    pub maximum: Mjd,
    /// smoothed sunspot number at maximum
    pub max_ssn: f64,
}

/// Parse the cycle minima/maxima table.
pub fn parse_cycle_table(text: &str) -> Result<Vec<CycleExtremum>, IcmeRateError> {
    let mut cycles = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let bad = || IcmeRateError::InvalidCycleTableLine(line.to_string());
        let mut fields = line.split_whitespace();
        let cycle = fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let start = iso_to_mjd(fields.next().ok_or_else(bad)?).map_err(|_| bad())?;
        let maximum = iso_to_mjd(fields.next().ok_or_else(bad)?).map_err(|_| bad())?;
        let max_ssn = fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        cycles.push(CycleExtremum {
            cycle,
            start,
            maximum,
            max_ssn,
        });
    }
    Ok(cycles)
}

/// [`parse_cycle_table`] from a file path.
pub fn read_cycle_table_file(path: impl AsRef<Path>) -> Result<Vec<CycleExtremum>, IcmeRateError> {
    parse_cycle_table(&std::fs::read_to_string(path)?)
}

/// Mean of the per-cycle maxima, the summary behind the average-cycle
/// amplitude.
pub fn mean_of_maxima(cycles: &[CycleExtremum]) -> Option<f64> {
    let maxima: Vec<f64> = cycles.iter().map(|c| c.max_ssn).collect();
    stats::mean(&maxima)
}
