use hifitime::{Epoch, TimeScale};
use std::str::FromStr;

use crate::constants::{Mjd, Year};
use crate::icme_rate_errors::IcmeRateError;

/// Transformation from a calendar date (UTC midnight) to modified julian date (MJD)
///
/// Argument
/// --------
/// * `year`, `month`, `day`: a calendar date
///
/// Return
/// ------
/// * the date at 00:00:00 UTC as a float MJD
pub fn ymd_to_mjd(year: i32, month: u8, day: u8) -> Mjd {
    Epoch::from_gregorian(year, month, day, 0, 0, 0, 0, TimeScale::UTC).to_mjd_utc_days()
}

/// Transformation from an ISO timestamp string to MJD.
///
/// Accepts `YYYY-MM-DDTHH:mm:ss` as well as a bare `YYYY-MM-DD`
/// (interpreted as UTC midnight), the two forms found in the catalogs.
pub fn iso_to_mjd(timestamp: &str) -> Result<Mjd, IcmeRateError> {
    let ts = timestamp.trim();
    let parsed = Epoch::from_str(ts).or_else(|_| {
        // date-only catalog rows
        Epoch::from_str(&format!("{ts}T00:00:00"))
    });
    parsed
        .map(|e| e.to_mjd_utc_days())
        .map_err(|_| IcmeRateError::InvalidTimestamp(timestamp.to_string()))
}

/// Calendar year containing an MJD epoch.
pub fn year_of_mjd(mjd: Mjd) -> Year {
    let (year, ..) = Epoch::from_mjd_utc(mjd).to_gregorian_utc();
    year
}

/// January 1, 00:00 UTC of `year`, as MJD.
pub fn year_start_mjd(year: Year) -> Mjd {
    ymd_to_mjd(year, 1, 1)
}

/// July 1, 00:00 UTC of `year`, as MJD: the mid-year epoch carrying
/// yearly aggregates.
pub fn year_mid_mjd(year: Year) -> Mjd {
    ymd_to_mjd(year, 7, 1)
}

/// Half-open yearly window `[Jan 1 year, Jan 1 year+1)` in MJD.
pub fn year_window(year: Year) -> (Mjd, Mjd) {
    (year_start_mjd(year), year_start_mjd(year + 1))
}

/// Mid-year epochs for an inclusive span of calendar years.
pub fn year_mid_epochs(first: Year, last: Year) -> Vec<Mjd> {
    (first..=last).map(year_mid_mjd).collect()
}

/// One-day-resolution grid of epochs covering `[start, end]`; the end
/// point is included when it lies a whole number of days from the start.
pub fn daily_grid(start: Mjd, end: Mjd) -> Vec<Mjd> {
    let mut grid = Vec::new();
    let mut t = start;
    while t <= end {
        grid.push(t);
        t += 1.0;
    }
    grid
}
