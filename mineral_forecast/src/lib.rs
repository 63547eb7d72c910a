//! # Mineral Forecast
//!
//! Forecast charts of annual critical-mineral production.
//!
//! ## Features
//!
//! - Newline-delimited annual series with a configured base year
//! - ARIMA forecasts fitted by conditional sum of squares
//! - Fixed linear trends for minerals with short histories
//! - PNG charts with the history, the dashed forecast and a boxed annotation
//!
//! ## Quick Start
//!
//! ```no_run
//! use mineral_forecast::mineral::{MineralId, MineralSpec};
//! use mineral_forecast::pipeline::{run_mineral, PipelineOptions};
//!
//! let spec = MineralSpec::by_id(MineralId::Gallium)?;
//! let report = run_mineral(&spec, &PipelineOptions::default())?;
//! println!("{} -> {}", report.name, report.chart_path.display());
//! # Ok::<(), mineral_forecast::ForecastError>(())
//! ```

pub mod data;
pub mod error;
pub mod format;
pub mod mineral;
pub mod models;
pub mod pipeline;
pub mod plot;
pub mod summary;

// Re-export commonly used types
pub use crate::data::{DataLoader, ObservationSeries, YearRange};
pub use crate::error::ForecastError;
pub use crate::format::format_magnitude;
pub use crate::mineral::{ForecasterKind, MineralId, MineralSpec};
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::pipeline::{run_all, run_mineral, MineralReport, PipelineOptions};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
