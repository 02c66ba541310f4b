//! Readers for the pre-processed input catalogs.
//!
//! Each reader takes any `io::Read` source (tests feed in-memory strings,
//! callers feed files) and produces the typed series the analysis stages
//! consume. Formats:
//!
//! * [`icmecat`]: the in-situ ICME catalog, CSV with a spacecraft id and
//!   an event start timestamp per row.
//! * [`reference`]: the historical near-Earth reference list, CSV with one
//!   disturbance timestamp per row.
//! * [`silso`]: the daily sunspot-number series (semicolon separated) and
//!   the cycle minima/maxima table (whitespace separated).
//! * [`forecast`]: the published monthly sunspot forecast, JSON.

pub mod forecast;
pub mod icmecat;
pub mod reference;
pub mod silso;
