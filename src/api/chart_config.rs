use serde::{Deserialize, Serialize};

use crate::core::{Viewport, ZoomConstraints};
use crate::error::{ChartError, ChartResult};
use crate::interaction::DEFAULT_DIMMED_OPACITY;

/// Public chart bootstrap configuration.
///
/// This type is serializable so host pages can keep chart setup next to their
/// dataset descriptions instead of hard-coding it per chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub viewport: Viewport,
    #[serde(default = "default_dimmed_opacity")]
    pub dimmed_opacity: f64,
    #[serde(default = "default_base_stroke_width")]
    pub base_stroke_width: f64,
    #[serde(default = "default_emphasized_stroke_width")]
    pub emphasized_stroke_width: f64,
    #[serde(default)]
    pub zoom_constraints: ZoomConstraints,
    /// Approximate y-axis tick count used to round the value domain.
    /// `0` keeps the raw `[0, max]` domain.
    #[serde(default = "default_nice_tick_count")]
    pub nice_tick_count: usize,
    /// Outer padding of the categorical x-axis, in steps.
    #[serde(default)]
    pub x_padding: f64,
}

impl ChartConfig {
    /// Creates a config with the defaults of the ridership line charts.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            dimmed_opacity: default_dimmed_opacity(),
            base_stroke_width: default_base_stroke_width(),
            emphasized_stroke_width: default_emphasized_stroke_width(),
            zoom_constraints: ZoomConstraints::default(),
            nice_tick_count: default_nice_tick_count(),
            x_padding: 0.0,
        }
    }

    #[must_use]
    pub fn with_dimmed_opacity(mut self, opacity: f64) -> Self {
        self.dimmed_opacity = opacity;
        self
    }

    #[must_use]
    pub fn with_stroke_widths(mut self, base: f64, emphasized: f64) -> Self {
        self.base_stroke_width = base;
        self.emphasized_stroke_width = emphasized;
        self
    }

    #[must_use]
    pub fn with_zoom_constraints(mut self, constraints: ZoomConstraints) -> Self {
        self.zoom_constraints = constraints;
        self
    }

    #[must_use]
    pub fn with_nice_tick_count(mut self, count: usize) -> Self {
        self.nice_tick_count = count;
        self
    }

    #[must_use]
    pub fn with_x_padding(mut self, padding: f64) -> Self {
        self.x_padding = padding;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if !self.dimmed_opacity.is_finite() || !(0.0..=1.0).contains(&self.dimmed_opacity) {
            return Err(ChartError::InvalidData(
                "dimmed opacity must be finite and in [0, 1]".to_owned(),
            ));
        }
        for (name, width) in [
            ("base stroke width", self.base_stroke_width),
            ("emphasized stroke width", self.emphasized_stroke_width),
        ] {
            if !width.is_finite() || width <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if !self.x_padding.is_finite() || !(0.0..=1.0).contains(&self.x_padding) {
            return Err(ChartError::InvalidData(
                "x padding must be finite and in [0, 1]".to_owned(),
            ));
        }
        self.zoom_constraints.validate()
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_dimmed_opacity() -> f64 {
    DEFAULT_DIMMED_OPACITY
}

fn default_base_stroke_width() -> f64 {
    2.0
}

fn default_emphasized_stroke_width() -> f64 {
    4.0
}

fn default_nice_tick_count() -> usize {
    10
}
