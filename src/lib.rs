//! # Mineral Outlook
//!
//! Umbrella crate over the numerical core and the charting pipeline.
//!
//! ```
//! use mineral_outlook::forecast_math::LinearTrend;
//!
//! let trend = LinearTrend::new(2022, 540.0, 35.3).unwrap();
//! assert_eq!(trend.value(2022), 540.0);
//! ```

pub use forecast_math;
pub use mineral_forecast;
