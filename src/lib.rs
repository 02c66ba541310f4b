pub mod catalogs;
pub mod constants;
pub mod coverage;
pub mod cycle_shape;
pub mod icme_rate_errors;
pub mod mission;
pub mod prediction;
pub mod rates;
pub mod regression;
pub mod spline;
pub mod stats;
pub mod time;
