//! Per-mineral parameters
//!
//! Every constant a chart depends on lives here: data file, base year, model
//! order or trend constants, forecast range and label wording.

use crate::data::{ObservationSeries, YearRange};
use crate::error::{ForecastError, Result};
use crate::format::format_magnitude;
use crate::models::{
    ArimaModel, ForecastModel, ForecastResult, LinearTrendModel, TrainedForecastModel,
};
use clap::ValueEnum;
use forecast_math::{ArimaOrder, LinearTrend};
use serde::Serialize;

/// Year named in the chart annotation
pub const LABEL_YEAR: i32 = 2058;

/// Years summed into the total cumulative forecast
pub const TOTAL_YEARS: (i32, i32) = (2024, 2058);

/// Year of the single point forecast printed after each ARIMA chart
pub const POINT_YEAR: i32 = 2030;

/// The five charted minerals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
pub enum MineralId {
    /// Rare earth elements
    Rees,
    /// Platinum group elements
    Pges,
    Lithium,
    Cobalt,
    Gallium,
}

/// How a forecast is produced
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ForecasterKind {
    /// Fit an ARIMA model to the whole series
    Arima(ArimaOrder),
    /// Extrapolate fixed, hand-calibrated constants
    LinearTrend(LinearTrend),
}

impl ForecasterKind {
    /// Train the configured model on `series`
    pub fn train(&self, series: &ObservationSeries) -> Result<Box<dyn TrainedForecastModel>> {
        match self {
            ForecasterKind::Arima(order) => {
                let trained = ArimaModel::with_order(*order)?.train(series)?;
                Ok(Box::new(trained))
            }
            ForecasterKind::LinearTrend(trend) => {
                let trained = LinearTrendModel::from_trend(*trend).train(series)?;
                Ok(Box::new(trained))
            }
        }
    }
}

/// Whether a chart speaks of mining or production
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Activity {
    Mined,
    Produced,
}

impl Activity {
    fn past_tense(&self) -> &'static str {
        match self {
            Activity::Mined => "mined",
            Activity::Produced => "produced",
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            Activity::Mined => "mining",
            Activity::Produced => "production",
        }
    }
}

/// How the final value is written in the annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnnotationStyle {
    /// Scale words, e.g. `2.5 million`
    Scaled,
    /// Whole number of tons
    Rounded,
}

/// Everything needed to forecast and plot one mineral
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MineralSpec {
    pub id: MineralId,
    /// Display name; the chart file is this without spaces
    pub name: String,
    pub data_file: String,
    pub base_year: i32,
    /// Power of ten shown in the axis labels. Values are never rescaled.
    pub label_exponent: Option<u32>,
    pub activity: Activity,
    pub forecaster: ForecasterKind,
    pub forecast_range: YearRange,
    pub annotation: AnnotationStyle,
    /// Added to the final value when placing the star marker
    pub marker_lift: f64,
}

impl MineralSpec {
    /// The five minerals in charting order
    pub fn catalog() -> Result<Vec<MineralSpec>> {
        let arima = ForecasterKind::Arima(ArimaOrder::new(13, 3, 3));
        let arima_range = YearRange::new(2021, LABEL_YEAR)?;
        let trend_range = YearRange::new(2022, 2057)?;

        Ok(vec![
            MineralSpec {
                id: MineralId::Rees,
                name: "Rare Earth Elements".to_string(),
                data_file: "data_REEs.txt".to_string(),
                base_year: 1900,
                label_exponent: Some(6),
                activity: Activity::Mined,
                forecaster: arima,
                forecast_range: arima_range,
                annotation: AnnotationStyle::Scaled,
                marker_lift: 0.0,
            },
            MineralSpec {
                id: MineralId::Pges,
                name: "Platinum Group Elements".to_string(),
                data_file: "data_PGEs.txt".to_string(),
                base_year: 1900,
                label_exponent: None,
                activity: Activity::Mined,
                forecaster: arima,
                forecast_range: arima_range,
                annotation: AnnotationStyle::Scaled,
                marker_lift: 0.0,
            },
            MineralSpec {
                id: MineralId::Lithium,
                name: "Lithium".to_string(),
                data_file: "data_lithium.txt".to_string(),
                base_year: 1900,
                label_exponent: Some(7),
                activity: Activity::Mined,
                forecaster: arima,
                forecast_range: arima_range,
                annotation: AnnotationStyle::Scaled,
                marker_lift: 0.0,
            },
            MineralSpec {
                id: MineralId::Cobalt,
                name: "Cobalt".to_string(),
                data_file: "data_cobalt.txt".to_string(),
                base_year: 2010,
                label_exponent: None,
                activity: Activity::Mined,
                forecaster: ForecasterKind::LinearTrend(LinearTrend::new(
                    2022, 190_000.0, 7360.0,
                )?),
                forecast_range: trend_range,
                annotation: AnnotationStyle::Scaled,
                marker_lift: 5000.0,
            },
            MineralSpec {
                id: MineralId::Gallium,
                name: "Gallium".to_string(),
                data_file: "data_gallium.txt".to_string(),
                base_year: 2016,
                label_exponent: None,
                activity: Activity::Produced,
                forecaster: ForecasterKind::LinearTrend(LinearTrend::new(2022, 540.0, 35.3)?),
                forecast_range: trend_range,
                annotation: AnnotationStyle::Rounded,
                marker_lift: 0.0,
            },
        ])
    }

    /// Look up one catalog entry
    pub fn by_id(id: MineralId) -> Result<MineralSpec> {
        Self::catalog()?
            .into_iter()
            .find(|spec| spec.id == id)
            .ok_or_else(|| ForecastError::DataError(format!("No catalog entry for {:?}", id)))
    }

    /// Name with spaces removed, used for output files
    pub fn file_stem(&self) -> String {
        self.name.replace(' ', "")
    }

    fn unit_label(&self) -> String {
        match self.label_exponent {
            Some(exp) => format!("10^{} metric tons", exp),
            None => "metric tons".to_string(),
        }
    }

    /// Chart title, e.g. `Cobalt Mined (metric tons) versus Time (years)`
    pub fn title(&self) -> String {
        let verb = self.activity.past_tense();
        let mut capitalised = verb.to_string();
        capitalised[..1].make_ascii_uppercase();
        format!(
            "{} {} ({}) versus Time (years)",
            self.name,
            capitalised,
            self.unit_label()
        )
    }

    pub fn y_label(&self) -> String {
        format!(
            "{} {} ({})",
            self.name,
            self.activity.past_tense(),
            self.unit_label()
        )
    }

    /// Annotation text for the final forecast value. Truncated to whole tons
    /// before formatting.
    pub fn annotation_text(&self, forecast: &ForecastResult) -> Result<String> {
        let final_value = forecast.last().map(|(_, v)| v).unwrap_or(0.0).trunc();
        let amount = match self.annotation {
            AnnotationStyle::Scaled => format_magnitude(final_value)?,
            AnnotationStyle::Rounded => format!("{}", final_value as i64),
        };
        Ok(format!(
            "Predicted annual {} in {}: {} metric tons",
            self.activity.noun(),
            LABEL_YEAR,
            amount
        ))
    }
}
