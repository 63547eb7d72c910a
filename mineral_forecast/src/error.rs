//! Error types for the mineral_forecast crate

use thiserror::Error;

/// Custom error types for the mineral_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// A line of an input file that is not a number
    #[error("Parse error on line {line}: {text:?} is not a number")]
    ParseError { line: usize, text: String },

    /// Error from an invalid year range
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Error from fitting or querying a model
    #[error("Model error: {0}")]
    ModelError(String),

    /// Magnitude larger than the scale word table covers
    #[error("Magnitude {0} is beyond the largest scale word")]
    FormatOverflow(f64),

    /// Error drawing or saving a chart
    #[error("Render error: {0}")]
    RenderError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error writing CSV exports
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error serializing summaries
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Failure while processing one mineral of a batch
    #[error("processing {name}: {source}")]
    Mineral {
        name: String,
        #[source]
        source: Box<ForecastError>,
    },

    /// Error from the numerical core
    #[error("Math error: {0}")]
    MathError(#[from] forecast_math::MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
