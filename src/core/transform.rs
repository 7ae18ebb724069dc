use serde::{Deserialize, Serialize};

use crate::core::scale::LinearScale;
use crate::core::types::Viewport;
use crate::error::{ChartError, ChartResult};

/// Axis-aligned screen rectangle, normalized so `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    #[must_use]
    pub fn from_viewport(viewport: Viewport) -> Self {
        Self::new(
            0.0,
            0.0,
            f64::from(viewport.width),
            f64::from(viewport.height),
        )
    }

    /// Inclusive on every edge.
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }
}

/// Affine zoom/pan mapping applied on top of base scales.
///
/// Each axis maps `screen = scale * base + translate` on its own; there is no
/// rotation or shear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub scale_x: f64,
    pub translate_x: f64,
    pub scale_y: f64,
    pub translate_y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ZoomTransform {
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            scale_x: 1.0,
            translate_x: 0.0,
            scale_y: 1.0,
            translate_y: 0.0,
        }
    }

    /// Uniform zoom, as produced by pinch and wheel gestures.
    #[must_use]
    pub const fn uniform(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale_x: scale,
            translate_x,
            scale_y: scale,
            translate_y,
        }
    }

    #[must_use]
    pub const fn per_axis(scale_x: f64, translate_x: f64, scale_y: f64, translate_y: f64) -> Self {
        Self {
            scale_x,
            translate_x,
            scale_y,
            translate_y,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        for (name, scale) in [("scale_x", self.scale_x), ("scale_y", self.scale_y)] {
            if !scale.is_finite() || scale == 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "zoom `{name}` must be finite and non-zero"
                )));
            }
        }
        if !self.translate_x.is_finite() || !self.translate_y.is_finite() {
            return Err(ChartError::InvalidData(
                "zoom translation must be finite".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::identity()
    }

    #[must_use]
    pub fn apply_x(self, x: f64) -> f64 {
        self.scale_x * x + self.translate_x
    }

    #[must_use]
    pub fn apply_y(self, y: f64) -> f64 {
        self.scale_y * y + self.translate_y
    }

    #[must_use]
    pub fn apply(self, point: (f64, f64)) -> (f64, f64) {
        (self.apply_x(point.0), self.apply_y(point.1))
    }

    #[must_use]
    pub fn invert_x(self, x: f64) -> f64 {
        (x - self.translate_x) / self.scale_x
    }

    #[must_use]
    pub fn invert_y(self, y: f64) -> f64 {
        (y - self.translate_y) / self.scale_y
    }

    /// Transform that undoes `self`.
    #[must_use]
    pub fn inverse(self) -> Self {
        Self {
            scale_x: 1.0 / self.scale_x,
            translate_x: -self.translate_x / self.scale_x,
            scale_y: 1.0 / self.scale_y,
            translate_y: -self.translate_y / self.scale_y,
        }
    }

    /// Applies `self` first, then `next`.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        Self {
            scale_x: next.scale_x * self.scale_x,
            translate_x: next.scale_x * self.translate_x + next.translate_x,
            scale_y: next.scale_y * self.scale_y,
            translate_y: next.scale_y * self.translate_y + next.translate_y,
        }
    }

    /// Zoomed copy of a horizontal linear scale.
    pub fn rescale_x(self, scale: LinearScale) -> ChartResult<LinearScale> {
        scale.rescaled(self.scale_x, self.translate_x)
    }

    /// Zoomed copy of a vertical linear scale.
    pub fn rescale_y(self, scale: LinearScale) -> ChartResult<LinearScale> {
        scale.rescaled(self.scale_y, self.translate_y)
    }
}

/// Limits applied to gesture-driven zoom transforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomConstraints {
    /// Allowed `(min, max)` zoom factor on each axis.
    pub scale_extent: (f64, f64),
    /// Content area the view may not leave. `None` means the viewport itself.
    pub translate_extent: Option<Rect>,
}

impl Default for ZoomConstraints {
    fn default() -> Self {
        Self {
            scale_extent: (1.0, 10.0),
            translate_extent: None,
        }
    }
}

impl ZoomConstraints {
    pub fn validate(self) -> ChartResult<()> {
        let (min, max) = self.scale_extent;
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(ChartError::InvalidData(
                "zoom scale extent must be finite, positive and ordered".to_owned(),
            ));
        }
        if let Some(extent) = self.translate_extent {
            if !extent.is_finite() {
                return Err(ChartError::InvalidData(
                    "zoom translate extent must be finite".to_owned(),
                ));
            }
        }
        Ok(())
    }

    /// Clamps the zoom factor, then pans so the visible `view` stays inside
    /// the translate extent. When the extent is smaller than the view, the
    /// view is centred on it.
    #[must_use]
    pub fn constrain(self, transform: ZoomTransform, view: Rect) -> ZoomTransform {
        let (min, max) = self.scale_extent;
        let extent = self.translate_extent.unwrap_or(view);
        let mut out = transform;
        out.scale_x = transform.scale_x.clamp(min, max);
        out.scale_y = transform.scale_y.clamp(min, max);

        let dx = constrain_offset(
            out.invert_x(view.x0) - extent.x0,
            out.invert_x(view.x1) - extent.x1,
        );
        let dy = constrain_offset(
            out.invert_y(view.y0) - extent.y0,
            out.invert_y(view.y1) - extent.y1,
        );
        out.translate_x += out.scale_x * dx;
        out.translate_y += out.scale_y * dy;
        out
    }
}

fn constrain_offset(low: f64, high: f64) -> f64 {
    if high > low {
        (low + high) / 2.0
    } else if low < 0.0 {
        low
    } else {
        high.max(0.0)
    }
}
