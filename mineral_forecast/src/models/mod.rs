//! Forecasting models for annual production series

use crate::data::{ObservationSeries, YearRange};
use crate::error::{ForecastError, Result};
use crate::summary::FitSummary;
use serde::Serialize;
use std::fmt::Debug;

/// Forecast result containing predicted values per calendar year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Calendar year of each value
    years: Vec<i32>,
    /// Forecasted values
    values: Vec<f64>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(years: Vec<i32>, values: Vec<f64>) -> Result<Self> {
        if values.len() != years.len() {
            return Err(ForecastError::ModelError(format!(
                "Values length ({}) doesn't match years length ({})",
                values.len(),
                years.len()
            )));
        }

        Ok(Self { years, values })
    }

    /// Create a forecast covering every year of `range`
    pub fn for_range(range: YearRange, values: Vec<f64>) -> Result<Self> {
        Self::new(range.years().collect(), values)
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// `(year, value)` pairs in order
    pub fn points(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.years.iter().copied().zip(self.values.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Final forecast point
    pub fn last(&self) -> Option<(i32, f64)> {
        self.points().last()
    }

    /// Sum of all forecast values
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Point predictions for every year in the range
    fn predict(&self, range: YearRange) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;

    /// Diagnostic summary, for models that were estimated from data
    fn summary(&self) -> Option<FitSummary> {
        None
    }
}

/// Forecast model that can be trained on an observation series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on an observation series
    fn train(&self, data: &ObservationSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod arima;
pub mod linear_trend;

pub use arima::{ArimaModel, TrainedArimaModel};
pub use linear_trend::{LinearTrendModel, TrainedLinearTrendModel};
