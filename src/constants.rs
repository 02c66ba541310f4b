//! # Constants and type definitions for icme-rate
//!
//! This module centralizes the **calendar constants**, **calibration
//! constants from the underlying study**, and **common type definitions**
//! used throughout the `icme-rate` library.
//!
//! ## Overview
//!
//! - Calendar conversions (days per year/month, minutes per day)
//! - Domain calibrations (orbit-gap threshold, rate-spread floor)
//! - Core type aliases used across the crate
//! - Container types for catalog events keyed by spacecraft
//!
//! The calibration constants are empirical choices inherited from the
//! reference study. They are deliberately exposed as named constants so a
//! caller can see them, and the methods taking them as parameters
//! ([`CoverageMethod`](crate::coverage::CoverageMethod)) can be fed other
//! values.

use ahash::RandomState;
use std::collections::HashMap;

use crate::rates::EventRecord;

// -------------------------------------------------------------------------------------------------
// Calendar constants
// -------------------------------------------------------------------------------------------------

/// Mean length of a calendar year in days, as used for rate normalization
pub const DAYS_PER_YEAR: f64 = 365.24;

/// Mean length of a calendar month in days (365.24 / 12)
pub const DAYS_PER_MONTH: f64 = 30.42;

/// Minutes per day, for cadence-based coverage computation
pub const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

// -------------------------------------------------------------------------------------------------
// Calibration constants from the reference study
// -------------------------------------------------------------------------------------------------

/// Maximum consecutive-sample gap (days) counted as covered time for
/// irregular-orbit instruments. Gaps at or above this are data voids.
pub const ORBIT_GAP_MAX_DAYS: f64 = 0.25;

/// Assumed cross-spacecraft rate spread (events/year) for forecast years
/// beyond the span of the observed catalog.
pub const SPREAD_FLOOR: f64 = 2.0;

/// Onset shift applied to cycle-shape models anchored at a cycle start
/// date: the pulse onset sits this many days before the start (a four-month
/// lead, Hathaway 2015).
pub const ONSET_SHIFT_DAYS: f64 = 4.0 * 30.0 + 1.0;

/// Smoothing window for the running mean of the daily sunspot series,
/// in samples: round(30.42 × 12) + 1, about one year of daily values.
pub const SSN_SMOOTHING_WINDOW: usize = 366;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Modified Julian Date (days)
pub type Mjd = f64;

/// Heliocentric distance in astronomical units
pub type Au = f64;

/// Calendar year
pub type Year = i32;

/// Identifier of an in-situ spacecraft (e.g. `"Wind"`, `"STEREO-A"`)
pub type ScId = String;

// -------------------------------------------------------------------------------------------------
// Containers
// -------------------------------------------------------------------------------------------------

/// Catalog events grouped by detecting spacecraft.
pub type EventSet = HashMap<ScId, Vec<EventRecord>, RandomState>;
