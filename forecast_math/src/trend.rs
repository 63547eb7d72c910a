//! Fixed linear trend extrapolation

use serde::{Deserialize, Serialize};

use crate::{MathError, Result};

/// Straight line `intercept + slope * (year - anchor_year)`.
///
/// The constants are chosen by hand; nothing here is fitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    anchor_year: i32,
    intercept: f64,
    slope: f64,
}

impl LinearTrend {
    /// Create a new trend through `(anchor_year, intercept)`
    pub fn new(anchor_year: i32, intercept: f64, slope: f64) -> Result<Self> {
        if !intercept.is_finite() || !slope.is_finite() {
            return Err(MathError::InvalidInput(format!(
                "Trend constants must be finite (intercept {}, slope {})",
                intercept, slope
            )));
        }

        Ok(Self {
            anchor_year,
            intercept,
            slope,
        })
    }

    pub fn anchor_year(&self) -> i32 {
        self.anchor_year
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Value of the line in a given year
    pub fn value(&self, year: i32) -> f64 {
        self.intercept + self.slope * f64::from(year - self.anchor_year)
    }

    /// Values for every year in `[start_year, end_year]`
    pub fn values(&self, start_year: i32, end_year: i32) -> Result<Vec<f64>> {
        if start_year > end_year {
            return Err(MathError::InvalidInput(format!(
                "Start year {} is after end year {}",
                start_year, end_year
            )));
        }
        Ok((start_year..=end_year).map(|y| self.value(y)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_trend() {
        let trend = LinearTrend::new(2022, 540.0, 35.3).unwrap();

        assert_eq!(trend.value(2022), 540.0);
        assert_relative_eq!(trend.value(2023), 575.3);
        assert_relative_eq!(trend.value(2057), 540.0 + 35.3 * 35.0);
        // Before the anchor the line keeps going down
        assert_relative_eq!(trend.value(2021), 504.7);
    }

    #[test]
    fn test_values_range() {
        let trend = LinearTrend::new(2022, 190_000.0, 7360.0).unwrap();
        let values = trend.values(2022, 2057).unwrap();

        assert_eq!(values.len(), 36);
        assert_eq!(values[0], 190_000.0);
        assert_relative_eq!(values[35], 447_600.0);
        assert!(trend.values(2030, 2029).is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(LinearTrend::new(2022, f64::NAN, 1.0).is_err());
        assert!(LinearTrend::new(2022, 1.0, f64::INFINITY).is_err());
    }
}
