//! The forecast-and-plot procedure for one mineral
//!
//! Load → forecast → render, plus the console diagnostics for fitted models.
//! Nothing is shared between minerals; every call starts from the files.

use crate::data::{DataLoader, ObservationSeries, YearRange};
use crate::error::{ForecastError, Result};
use crate::format::format_magnitude;
use crate::mineral::{MineralSpec, POINT_YEAR, TOTAL_YEARS};
use crate::models::{ForecastResult, TrainedForecastModel};
use crate::plot::{render_chart, ChartSpec};
use crate::summary::FitSummary;
use log::info;
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Where to read and write, and which extras to produce
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory holding the `data_*.txt` files
    pub data_dir: PathBuf,
    /// Existing directory the charts are written to
    pub plots_dir: PathBuf,
    /// Also write `<Name>.csv` next to each chart
    pub export_csv: bool,
    /// Print fit summaries as JSON instead of a table
    pub summary_json: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            plots_dir: PathBuf::from("plots"),
            export_csv: false,
            summary_json: false,
        }
    }
}

/// Fit diagnostics printed for estimated models
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub summary: FitSummary,
    /// Sum of the predictions over [`TOTAL_YEARS`]
    pub total_forecast: f64,
    /// Prediction for [`POINT_YEAR`]
    pub point_forecast: f64,
}

impl Diagnostics {
    /// Collect the summary and aggregate figures, `None` for unfitted models
    pub fn collect(model: &dyn TrainedForecastModel) -> Result<Option<Self>> {
        let summary = match model.summary() {
            Some(summary) => summary,
            None => return Ok(None),
        };

        let total_range = YearRange::new(TOTAL_YEARS.0, TOTAL_YEARS.1)?;
        let total_forecast = model.predict(total_range)?.total();

        let point_range = YearRange::new(POINT_YEAR, POINT_YEAR)?;
        let point_forecast = model
            .predict(point_range)?
            .last()
            .map(|(_, v)| v)
            .ok_or_else(|| {
                ForecastError::ModelError(format!("No prediction for {}", POINT_YEAR))
            })?;

        Ok(Some(Self {
            summary,
            total_forecast,
            point_forecast,
        }))
    }

    /// Lines printed before the chart is drawn
    pub fn fit_report(&self) -> Result<String> {
        Ok(format!(
            "{}\nParameters:\n{}\n\n\n\nAIC: {}\n\n\n\nTotal mined (tons): {}",
            self.summary,
            self.summary.parameter_listing(),
            self.summary.aic,
            format_magnitude(self.total_forecast)?
        ))
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}    {}", POINT_YEAR, self.point_forecast)
    }
}

/// What one run of the pipeline produced
#[derive(Debug, Clone)]
pub struct MineralReport {
    pub name: String,
    pub model: String,
    pub history: ObservationSeries,
    pub forecast: ForecastResult,
    pub diagnostics: Option<Diagnostics>,
    pub chart_path: PathBuf,
    pub csv_path: Option<PathBuf>,
}

/// One row of the CSV export
#[derive(Debug, Serialize)]
struct ChartRow {
    year: i32,
    kind: &'static str,
    value: f64,
}

/// Load, forecast and chart one mineral
pub fn run_mineral(spec: &MineralSpec, options: &PipelineOptions) -> Result<MineralReport> {
    ensure_dir(&options.plots_dir)?;

    let data_path = options.data_dir.join(&spec.data_file);
    info!("Loading {} from {}", spec.name, data_path.display());
    let history = DataLoader::from_path(&data_path, spec.base_year)?;
    info!(
        "{}: {} observations, {} to {}",
        spec.name,
        history.len(),
        history.base_year(),
        history.last_year()
    );

    let model = spec.forecaster.train(&history)?;
    let diagnostics = Diagnostics::collect(model.as_ref())?;
    if let Some(diagnostics) = &diagnostics {
        if options.summary_json {
            println!("{}", serde_json::to_string_pretty(diagnostics)?);
        } else {
            println!("{}", diagnostics.fit_report()?);
        }
    }

    let forecast = model.predict(spec.forecast_range)?;
    info!(
        "{}: {} forecast {} values for {} to {}",
        spec.name,
        model.name(),
        forecast.len(),
        spec.forecast_range.start(),
        spec.forecast_range.end()
    );

    let chart = ChartSpec {
        title: spec.title(),
        x_label: "Year".to_string(),
        y_label: spec.y_label(),
        annotation: spec.annotation_text(&forecast)?,
        history: &history,
        forecast: &forecast,
        marker_lift: spec.marker_lift,
    };
    let chart_path = options.plots_dir.join(format!("{}.png", spec.file_stem()));
    render_chart(&chart, &chart_path)?;

    let csv_path = if options.export_csv {
        let path = options.plots_dir.join(format!("{}.csv", spec.file_stem()));
        write_csv(&history, &forecast, &path)?;
        Some(path)
    } else {
        None
    };

    if let Some(diagnostics) = &diagnostics {
        println!("{}", diagnostics);
    }

    Ok(MineralReport {
        name: spec.name.clone(),
        model: model.name().to_string(),
        history,
        forecast,
        diagnostics,
        chart_path,
        csv_path,
    })
}

/// Run every catalog entry in order, stopping at the first failure.
///
/// Charts written before the failing mineral are left on disk. The error
/// names the mineral that failed.
pub fn run_all(specs: &[MineralSpec], options: &PipelineOptions) -> Result<Vec<MineralReport>> {
    let mut reports = Vec::with_capacity(specs.len());
    for spec in specs {
        let report = run_mineral(spec, options).map_err(|e| ForecastError::Mineral {
            name: spec.name.clone(),
            source: Box::new(e),
        })?;
        info!("{}: chart ready at {}", report.name, report.chart_path.display());
        reports.push(report);
    }
    Ok(reports)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    Err(ForecastError::IoError(io::Error::new(
        io::ErrorKind::NotFound,
        format!("output directory {} does not exist", dir.display()),
    )))
}

/// Write history and forecast rows as `year,kind,value`
pub fn write_csv(history: &ObservationSeries, forecast: &ForecastResult, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    for (year, value) in history.points() {
        writer.serialize(ChartRow {
            year,
            kind: "history",
            value,
        })?;
    }
    for (year, value) in forecast.points() {
        writer.serialize(ChartRow {
            year,
            kind: "forecast",
            value,
        })?;
    }

    writer.flush()?;
    info!("Wrote {}", path.display());
    Ok(())
}
