//! ARIMA models for annual production series

use crate::data::{ObservationSeries, YearRange};
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use crate::summary::FitSummary;
use forecast_math::{ArimaEstimator, ArimaFit, ArimaOrder};
use log::info;

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    /// Model order
    order: ArimaOrder,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    /// Name of the model
    name: String,
    /// Year of offset zero
    base_year: i32,
    /// Year of the last fitted observation
    last_year: i32,
    /// Estimated model
    fit: ArimaFit,
}

impl ArimaModel {
    /// Create a new ARIMA model
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        Self::with_order(ArimaOrder::new(p, d, q))
    }

    pub fn with_order(order: ArimaOrder) -> Result<Self> {
        if order.p + order.q == 0 && order.d == 0 {
            return Err(ForecastError::ModelError(
                "ARIMA(0,0,0) has nothing to estimate".to_string(),
            ));
        }

        Ok(Self {
            name: order.to_string(),
            order,
        })
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, data: &ObservationSeries) -> Result<TrainedArimaModel> {
        info!(
            "Fitting {} to {} observations from {}",
            self.name,
            data.len(),
            data.base_year()
        );

        let fit = ArimaEstimator::new(self.order)
            .fit(data.values())
            .map_err(|e| ForecastError::ModelError(format!("{} fit failed: {}", self.name, e)))?;

        Ok(TrainedArimaModel {
            name: self.name.clone(),
            base_year: data.base_year(),
            last_year: data.last_year(),
            fit,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn predict(&self, range: YearRange) -> Result<ForecastResult> {
        let (start, end) = range.offsets(self.base_year)?;
        let values = self.fit.predict(start, end)?;
        ForecastResult::for_range(range, values)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> Option<FitSummary> {
        Some(FitSummary::from_fit(&self.fit, self.base_year, self.last_year))
    }
}
