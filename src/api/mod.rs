mod chart_config;
mod line_chart;
mod snapshot;

pub use chart_config::ChartConfig;
pub use line_chart::LineChart;
pub use snapshot::{ChartSnapshot, SNAPSHOT_SCHEMA_VERSION};
