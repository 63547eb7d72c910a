//! Hand-calibrated linear trend models

use crate::data::{ObservationSeries, YearRange};
use crate::error::Result;
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use forecast_math::LinearTrend;

/// Linear trend with fixed constants
#[derive(Debug, Clone)]
pub struct LinearTrendModel {
    /// Name of the model
    name: String,
    trend: LinearTrend,
}

/// Trained linear trend. Training only carries the constants over.
#[derive(Debug, Clone)]
pub struct TrainedLinearTrendModel {
    name: String,
    trend: LinearTrend,
}

impl LinearTrendModel {
    /// Create a new linear trend model
    pub fn new(anchor_year: i32, intercept: f64, slope: f64) -> Result<Self> {
        Ok(Self::from_trend(LinearTrend::new(
            anchor_year,
            intercept,
            slope,
        )?))
    }

    pub fn from_trend(trend: LinearTrend) -> Self {
        Self {
            name: format!(
                "LinearTrend({} + {}/yr from {})",
                trend.intercept(),
                trend.slope(),
                trend.anchor_year()
            ),
            trend,
        }
    }
}

impl ForecastModel for LinearTrendModel {
    type Trained = TrainedLinearTrendModel;

    fn train(&self, _data: &ObservationSeries) -> Result<TrainedLinearTrendModel> {
        Ok(TrainedLinearTrendModel {
            name: self.name.clone(),
            trend: self.trend,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedLinearTrendModel {
    fn predict(&self, range: YearRange) -> Result<ForecastResult> {
        let values = self.trend.values(range.start(), range.end())?;
        ForecastResult::for_range(range, values)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
