use thiserror::Error;

#[derive(Error, Debug)]
pub enum IcmeRateError {
    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid cycle table line: {0}")]
    InvalidCycleTableLine(String),

    #[error("Regression needs at least {min} finite pairs, {got} remain after filtering")]
    NotEnoughFinitePairs { min: usize, got: usize },

    #[error("Regression abscissa has zero variance, slope is undefined")]
    DegenerateRegression,

    #[error(
        "Cycle shape fit did not converge from seed \
         (onset offset {onset_offset} d, amplitude {amplitude}, rise {rise_months} months, shape {shape})"
    )]
    ShapeFitDidNotConverge {
        onset_offset: f64,
        amplitude: f64,
        rise_months: f64,
        shape: f64,
    },

    #[error("Interpolation needs at least {min} strictly increasing knots")]
    InvalidKnots { min: usize },

    #[error("Query at t={t} outside interpolation span [{start}, {end}]")]
    OutOfDomain { t: f64, start: f64, end: f64 },

    #[error("Prediction series length mismatch: {left} vs {right}")]
    SeriesLengthMismatch { left: usize, right: usize },
}
