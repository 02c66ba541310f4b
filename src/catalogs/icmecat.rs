//! ICME catalog reader.
//!
//! The catalog is a CSV export with one row per detected ICME; the columns
//! used here are `sc_insitu` (detecting spacecraft) and `icme_start_time`
//! (ISO timestamp of the disturbance arrival). Remaining columns are
//! ignored.

use std::io::Read;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::constants::EventSet;
use crate::icme_rate_errors::IcmeRateError;
use crate::rates::EventRecord;
use crate::time::iso_to_mjd;

#[derive(Debug, Deserialize)]
struct IcmeRow {
    sc_insitu: String,
    icme_start_time: String,
}

/// Read the ICME catalog into events grouped by spacecraft, each group
/// sorted by start epoch.
pub fn read_icmecat<R: Read>(reader: R) -> Result<EventSet, IcmeRateError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut events = EventSet::default();
    let mut rows = 0usize;

    for row in csv_reader.deserialize::<IcmeRow>() {
        let row = row?;
        let start = iso_to_mjd(&row.icme_start_time)?;
        let spacecraft = row.sc_insitu;
        events
            .entry(spacecraft.clone())
            .or_default()
            .push(EventRecord { spacecraft, start });
        rows += 1;
    }
    for group in events.values_mut() {
        group.sort_by(|a, b| a.start.total_cmp(&b.start));
    }

    debug!("icmecat: {rows} events across {} spacecraft", events.len());
    Ok(events)
}

/// [`read_icmecat`] from a file path.
pub fn read_icmecat_file(path: impl AsRef<Path>) -> Result<EventSet, IcmeRateError> {
    read_icmecat(std::fs::File::open(path)?)
}
