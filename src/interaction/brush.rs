use serde::{Deserialize, Serialize};

use crate::core::{HeatCell, Heatmap, HeatmapScales, Rect};

/// Screen-space brush selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BrushExtent {
    /// Two-dimensional brush.
    Area(Rect),
    /// X-only brush spanning the full plot height.
    Horizontal { x0: f64, x1: f64 },
}

impl BrushExtent {
    #[must_use]
    pub fn area(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::Area(Rect::new(x0, y0, x1, y1))
    }

    #[must_use]
    pub fn horizontal(x0: f64, x1: f64) -> Self {
        Self::Horizontal {
            x0: x0.min(x1),
            x1: x0.max(x1),
        }
    }

    /// Inclusive hit test in screen coordinates.
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        match self {
            Self::Area(rect) => rect.contains(x, y),
            Self::Horizontal { x0, x1 } => x >= x0 && x <= x1,
        }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        match self {
            Self::Area(rect) => rect.is_finite(),
            Self::Horizontal { x0, x1 } => x0.is_finite() && x1.is_finite(),
        }
    }
}

/// Heatmap cells whose band centre lies inside the brush, in cell order.
///
/// This is the linked selection handed to other views when a heatmap brush
/// ends.
#[must_use]
pub fn cells_in_brush<'a>(
    heatmap: &'a Heatmap,
    scales: &HeatmapScales,
    extent: BrushExtent,
) -> Vec<&'a HeatCell> {
    heatmap
        .cells
        .iter()
        .filter(|cell| {
            scales
                .cell_center(cell)
                .is_some_and(|(x, y)| extent.contains(x, y))
        })
        .collect()
}
