//! Chart rendering
//!
//! History is drawn as a solid black line and the forecast as a dashed blue
//! line on a shared date axis. A boxed annotation sits in the upper left of
//! the plotting area and a star marks the final forecast point.

use crate::data::{year_start, ObservationSeries};
use crate::error::{ForecastError, Result};
use crate::models::ForecastResult;
use chrono::NaiveDate;
use log::info;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// 7.5 x 5 inches at 100 dpi
pub const CHART_SIZE: (u32, u32) = (750, 500);

const STAR_RADIUS: f64 = 10.0;

/// Inputs for one chart
#[derive(Debug, Clone)]
pub struct ChartSpec<'a> {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub annotation: String,
    pub history: &'a ObservationSeries,
    pub forecast: &'a ForecastResult,
    /// Vertical offset for the star marker, in data units
    pub marker_lift: f64,
}

/// Draw the chart and save it as a PNG at `path`
pub fn render_chart(spec: &ChartSpec<'_>, path: &Path) -> Result<()> {
    let dates = DateSeries::from_spec(spec)?;
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();

    draw_chart(&root, spec, &dates).map_err(|e| ForecastError::RenderError(e.to_string()))?;
    root.present()
        .map_err(|e| ForecastError::RenderError(e.to_string()))?;

    info!("Saved chart to {}", path.display());
    Ok(())
}

/// Series already mapped onto dates
struct DateSeries {
    history: Vec<(NaiveDate, f64)>,
    forecast: Vec<(NaiveDate, f64)>,
    marker: Option<(NaiveDate, f64)>,
    x_range: (NaiveDate, NaiveDate),
    y_range: (f64, f64),
}

impl DateSeries {
    fn from_spec(spec: &ChartSpec<'_>) -> Result<Self> {
        let history = spec
            .history
            .points()
            .map(|(year, v)| Ok((year_start(year)?, v)))
            .collect::<Result<Vec<_>>>()?;
        let forecast = spec
            .forecast
            .points()
            .map(|(year, v)| Ok((year_start(year)?, v)))
            .collect::<Result<Vec<_>>>()?;
        let marker = forecast
            .last()
            .map(|(date, v)| (*date, v + spec.marker_lift));

        let first_year = spec
            .history
            .base_year()
            .min(spec.forecast.years().first().copied().unwrap_or(i32::MAX));
        let last_year = spec
            .history
            .last_year()
            .max(spec.forecast.years().last().copied().unwrap_or(i32::MIN));
        // One spare year on the right keeps the star inside the frame
        let x_range = (year_start(first_year)?, year_start(last_year + 1)?);

        let values = history.iter().chain(forecast.iter()).map(|(_, v)| *v);
        let (low, high) = values
            .chain(marker.map(|(_, v)| v))
            .fold((0.0_f64, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let high = if high > low { high } else { low + 1.0 };
        let headroom = (high - low) * 0.1;
        let y_range = (if low < 0.0 { low - headroom } else { low }, high + headroom);

        Ok(Self {
            history,
            forecast,
            marker,
            x_range,
            y_range,
        })
    }
}

fn draw_chart<DB>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec<'_>,
    dates: &DateSeries,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE)?;

    let x_axis: RangedDate<NaiveDate> = (dates.x_range.0..dates.x_range.1).into();
    let y_axis: RangedCoordf64 = (dates.y_range.0..dates.y_range.1).into();

    let mut chart = ChartBuilder::on(root)
        .caption(
            &spec.title,
            ("sans-serif", 16).into_font().style(FontStyle::Bold),
        )
        .margin(15)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x_axis, y_axis)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y").to_string())
        .y_label_formatter(&|v: &f64| format!("{:.0}", v))
        .draw()?;

    chart.draw_series(LineSeries::new(
        dates.history.iter().copied(),
        BLACK.stroke_width(2),
    ))?;
    chart.draw_series(DashedLineSeries::new(
        dates.forecast.iter().copied(),
        8,
        5,
        BLUE.stroke_width(2),
    ))?;

    if let Some(point) = dates.marker {
        let center = chart.backend_coord(&point);
        root.draw(&Polygon::new(star_points(center, STAR_RADIUS), BLUE.filled()))?;
    }

    // Annotation box 5% in from the top-left corner of the plotting area
    let (x_pixels, y_pixels) = chart.plotting_area().get_pixel_range();
    let left = x_pixels.start + (x_pixels.end - x_pixels.start) / 20;
    let top = y_pixels.start + (y_pixels.end - y_pixels.start) / 20;
    let font = TextStyle::from(("sans-serif", 13).into_font());
    let (width, height) = root.estimate_text_size(&spec.annotation, &font)?;
    let padding = 6;

    root.draw(&Rectangle::new(
        [
            (left, top),
            (left + width as i32 + 2 * padding, top + height as i32 + 2 * padding),
        ],
        WHITE.filled(),
    ))?;
    root.draw(&Rectangle::new(
        [
            (left, top),
            (left + width as i32 + 2 * padding, top + height as i32 + 2 * padding),
        ],
        BLACK.stroke_width(1),
    ))?;
    root.draw(&Text::new(
        spec.annotation.clone(),
        (left + padding, top + padding),
        font,
    ))?;

    Ok(())
}

/// Corners of a five-pointed star centred on `center`, in pixels
fn star_points(center: (i32, i32), radius: f64) -> Vec<(i32, i32)> {
    let inner = radius * 0.4;
    (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { radius } else { inner };
            let angle = -std::f64::consts::FRAC_PI_2 + i as f64 * std::f64::consts::PI / 5.0;
            (
                center.0 + (r * angle.cos()).round() as i32,
                center.1 + (r * angle.sin()).round() as i32,
            )
        })
        .collect()
}
