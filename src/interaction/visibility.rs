use serde::{Deserialize, Serialize};

use crate::core::{Point, PlotScales, Series, ZoomTransform};

use super::{BrushExtent, EmphasisSource, InteractionState};

/// Opacity given to series that are not highlighted.
pub const DEFAULT_DIMMED_OPACITY: f64 = 0.1;

/// Display flags for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesVisibility {
    pub key: String,
    pub opacity: f64,
    pub emphasis: bool,
}

/// Per-point emphasis for one series, aligned with its slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEmphasis {
    pub key: String,
    pub points: Vec<bool>,
}

impl PointEmphasis {
    /// Slot keys of the emphasised points.
    pub fn emphasised_slots<'a>(&'a self, series: &'a Series) -> impl Iterator<Item = &'a str> {
        series
            .points
            .iter()
            .zip(&self.points)
            .filter(|(_, emphasised)| **emphasised)
            .map(|(point, _)| point.key.as_str())
    }
}

/// Derives per-series opacity and emphasis from the interaction state.
///
/// Precedence: click selection, then brush, then hover, then idle. Series
/// muted through the legend stay dimmed unless a selection is active. The
/// category filter never shows up here; it is applied to rows before
/// aggregation.
#[must_use]
pub fn visibility_of(
    series: &[Series],
    state: &InteractionState,
    scales: &PlotScales,
) -> Vec<SeriesVisibility> {
    visibility_with_opacity(series, state, scales, DEFAULT_DIMMED_OPACITY)
}

/// [`visibility_of`] with a custom dimmed opacity.
#[must_use]
pub fn visibility_with_opacity(
    series: &[Series],
    state: &InteractionState,
    scales: &PlotScales,
    dimmed_opacity: f64,
) -> Vec<SeriesVisibility> {
    let source = state.emphasis_source();
    let transform = state.zoom_transform();
    let selecting = matches!(source, EmphasisSource::Selection(_));

    series
        .iter()
        .map(|line| {
            let (opacity, emphasis) = match source {
                _ if !selecting && state.is_muted(&line.key) => (dimmed_opacity, false),
                EmphasisSource::Selection(key) | EmphasisSource::Hover(key) => {
                    if line.key == key {
                        (1.0, true)
                    } else {
                        (dimmed_opacity, false)
                    }
                }
                EmphasisSource::Brush(extent) => {
                    if series_hits_brush(line, scales, transform, extent) {
                        (1.0, false)
                    } else {
                        (dimmed_opacity, false)
                    }
                }
                EmphasisSource::Idle => (1.0, false),
            };
            SeriesVisibility {
                key: line.key.clone(),
                opacity,
                emphasis,
            }
        })
        .collect()
}

/// True when at least one present point, zoomed, falls inside the brush.
#[must_use]
pub fn series_hits_brush(
    series: &Series,
    scales: &PlotScales,
    transform: ZoomTransform,
    extent: BrushExtent,
) -> bool {
    series
        .points
        .iter()
        .any(|point| point_hits_brush(point, scales, transform, extent))
}

/// True when the point is present and its zoomed screen position lies
/// inside the brush.
#[must_use]
pub fn point_hits_brush(
    point: &Point,
    scales: &PlotScales,
    transform: ZoomTransform,
    extent: BrushExtent,
) -> bool {
    point
        .value
        .and_then(|value| scales.project(&point.key, value))
        .map(|base| transform.apply(base))
        .is_some_and(|(x, y)| extent.contains(x, y))
}

/// Derives which drawn points are emphasised.
///
/// A point is emphasised when it was clicked, or when a brush is active and
/// the point lies inside it. Brushing skips muted series; gaps are never
/// emphasised.
#[must_use]
pub fn point_emphasis(
    series: &[Series],
    state: &InteractionState,
    scales: &PlotScales,
) -> Vec<PointEmphasis> {
    let transform = state.zoom_transform();
    let brush = state.brush_extent();

    series
        .iter()
        .map(|line| {
            let brushable = !state.is_muted(&line.key);
            let points = line
                .points
                .iter()
                .map(|point| {
                    if point.is_gap() {
                        return false;
                    }
                    state.is_point_selected(&line.key, &point.key)
                        || (brushable
                            && brush.is_some_and(|extent| {
                                point_hits_brush(point, scales, transform, extent)
                            }))
                })
                .collect();
            PointEmphasis {
                key: line.key.clone(),
                points,
            }
        })
        .collect()
}
