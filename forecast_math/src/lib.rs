//! # Forecast Math
//!
//! Numerical building blocks for forecasting annual production series.
//! This crate provides ARIMA estimation by conditional sum of squares,
//! recursive prediction with integration back to levels, and fixed
//! linear trend extrapolation.

use thiserror::Error;

pub mod arima;
pub mod differencing;
pub mod transform;
pub mod trend;

pub use crate::arima::{ArimaEstimator, ArimaFit, ArimaOrder};
pub use crate::trend::LinearTrend;

/// Errors that can occur in forecasting calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for forecasting math operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MathError::InsufficientData("need 33 observations".to_string());
        assert_eq!(
            err.to_string(),
            "Insufficient data for calculation: need 33 observations"
        );

        let err = MathError::CalculationError("singular matrix".to_string());
        assert!(err.to_string().starts_with("Calculation error"));
    }
}
