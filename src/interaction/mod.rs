//! Chart interaction state: zoom, brush, click selection, legend muting,
//! hover and filter.

mod brush;
mod state;
mod visibility;

pub use brush::{BrushExtent, cells_in_brush};
pub use state::{EmphasisSource, InteractionState, PointKey, apply_transform};
pub use visibility::{
    DEFAULT_DIMMED_OPACITY, PointEmphasis, SeriesVisibility, point_emphasis, point_hits_brush,
    series_hits_brush, visibility_of, visibility_with_opacity,
};
