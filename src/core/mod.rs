pub mod aggregate;
pub mod color;
pub mod domain;
pub mod filter;
pub mod heatmap;
pub mod line_path;
pub mod order;
pub mod scale;
pub mod transform;
pub mod types;

pub use aggregate::{AggregationSpec, Aggregator, aggregate};
pub use color::Color;
pub use domain::{Axis, Domain, domain, nice_domain, x_domain, y_domain};
pub use filter::{ALL_CATEGORIES, filter_options, filter_rows, normalize_filter};
pub use heatmap::{
    ColorRamp, DEFAULT_BAND_PADDING, HeatCell, Heatmap, HeatmapScales, HeatmapSpec, build_heatmap,
};
pub use line_path::{LinePath, project_line_path, project_line_paths};
pub use order::{KeyOrder, parse_period_key};
pub use scale::{BandScale, LinearScale, PlotScales, PointScale};
pub use transform::{Rect, ZoomConstraints, ZoomTransform};
pub use types::{FieldValue, Point, Row, Series, Viewport};
