//! ridership-chart: series aggregation and interaction state for transit
//! ridership charts.
//!
//! Rows already parsed from the ridership CSV exports go in; ordered series,
//! axis domains, scales, heatmap grids and per-series visibility flags come
//! out. Drawing is left to whatever rendering layer consumes them.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod telemetry;

pub use api::{ChartConfig, LineChart};
pub use error::{ChartError, ChartResult};
