use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{ZoomTransform, normalize_filter};

use super::BrushExtent;

/// Which signal currently drives series emphasis, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmphasisSource<'a> {
    Selection(&'a str),
    Brush(BrushExtent),
    Hover(&'a str),
    Idle,
}

/// One drawn point: a series key and the slot key on the x-axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointKey {
    pub series: String,
    pub slot: String,
}

impl PointKey {
    #[must_use]
    pub fn new(series: impl Into<String>, slot: impl Into<String>) -> Self {
        Self {
            series: series.into(),
            slot: slot.into(),
        }
    }
}

/// Interaction state owned by one chart instance.
///
/// Handlers take the state by value and return the next state, so no handler
/// keeps hidden mutable state of its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionState {
    zoom_transform: ZoomTransform,
    brush_extent: Option<BrushExtent>,
    selected_key: Option<String>,
    hovered_key: Option<String>,
    active_filter: Option<String>,
    #[serde(default)]
    muted_keys: IndexSet<String>,
    #[serde(default)]
    selected_points: IndexSet<PointKey>,
}

impl InteractionState {
    #[must_use]
    pub fn zoom_transform(&self) -> ZoomTransform {
        self.zoom_transform
    }

    #[must_use]
    pub fn brush_extent(&self) -> Option<BrushExtent> {
        self.brush_extent
    }

    #[must_use]
    pub fn selected_key(&self) -> Option<&str> {
        self.selected_key.as_deref()
    }

    #[must_use]
    pub fn hovered_key(&self) -> Option<&str> {
        self.hovered_key.as_deref()
    }

    /// Active category filter; `None` means "All".
    #[must_use]
    pub fn active_filter(&self) -> Option<&str> {
        self.active_filter.as_deref()
    }

    /// Series hidden through the legend, in toggle order.
    #[must_use]
    pub fn muted_keys(&self) -> &IndexSet<String> {
        &self.muted_keys
    }

    #[must_use]
    pub fn is_muted(&self, key: &str) -> bool {
        self.muted_keys.contains(key)
    }

    #[must_use]
    pub fn selected_points(&self) -> &IndexSet<PointKey> {
        &self.selected_points
    }

    #[must_use]
    pub fn is_point_selected(&self, series: &str, slot: &str) -> bool {
        self.selected_points
            .iter()
            .any(|point| point.series == series && point.slot == slot)
    }

    #[must_use]
    pub fn emphasis_source(&self) -> EmphasisSource<'_> {
        if let Some(key) = self.selected_key.as_deref() {
            EmphasisSource::Selection(key)
        } else if let Some(extent) = self.brush_extent {
            EmphasisSource::Brush(extent)
        } else if let Some(key) = self.hovered_key.as_deref() {
            EmphasisSource::Hover(key)
        } else {
            EmphasisSource::Idle
        }
    }

    /// Replaces the zoom transform.
    #[must_use]
    pub fn apply_transform(self, transform: ZoomTransform) -> Self {
        trace!(?transform, "apply zoom transform");
        Self {
            zoom_transform: transform,
            ..self
        }
    }

    #[must_use]
    pub fn with_brush(self, extent: BrushExtent) -> Self {
        trace!(?extent, "brush moved");
        Self {
            brush_extent: Some(extent),
            ..self
        }
    }

    #[must_use]
    pub fn clear_brush(self) -> Self {
        Self {
            brush_extent: None,
            ..self
        }
    }

    /// Click on a series: selects it, or clears the selection when it is
    /// already selected.
    #[must_use]
    pub fn toggle_selection(self, key: &str) -> Self {
        let selected_key = if self.selected_key.as_deref() == Some(key) {
            None
        } else {
            Some(key.to_owned())
        };
        trace!(?selected_key, "selection toggled");
        Self {
            selected_key,
            ..self
        }
    }

    /// Background click: drops the selected series and every selected point.
    #[must_use]
    pub fn clear_selection(self) -> Self {
        Self {
            selected_key: None,
            selected_points: IndexSet::new(),
            ..self
        }
    }

    /// Legend click: mutes the series, or unmutes it when already muted.
    #[must_use]
    pub fn toggle_legend(mut self, key: &str) -> Self {
        if !self.muted_keys.shift_remove(key) {
            self.muted_keys.insert(key.to_owned());
        }
        trace!(key, muted = self.muted_keys.contains(key), "legend toggled");
        self
    }

    /// Click on a point: adds it to the point selection, or removes it when
    /// already selected. Other selected points stay selected.
    #[must_use]
    pub fn toggle_point(mut self, series: &str, slot: &str) -> Self {
        let point = PointKey::new(series, slot);
        if !self.selected_points.shift_remove(&point) {
            self.selected_points.insert(point);
        }
        trace!(
            series,
            slot,
            selected = self.selected_points.len(),
            "point toggled"
        );
        self
    }

    #[must_use]
    pub fn hover(self, key: &str) -> Self {
        Self {
            hovered_key: Some(key.to_owned()),
            ..self
        }
    }

    #[must_use]
    pub fn pointer_leave(self) -> Self {
        Self {
            hovered_key: None,
            ..self
        }
    }

    /// Sets the category filter from a dropdown value; `"All"` clears it.
    #[must_use]
    pub fn with_filter(self, value: &str) -> Self {
        Self {
            active_filter: normalize_filter(Some(value)).map(str::to_owned),
            ..self
        }
    }

    /// Drops selection, hover, muting and selected points whose series is
    /// no longer drawn.
    #[must_use]
    pub fn retain_keys<'a, I>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keys: Vec<&str> = keys.into_iter().collect();
        let drawn = |key: &str| keys.contains(&key);
        self.muted_keys.retain(|key| drawn(key.as_str()));
        self.selected_points.retain(|point| drawn(point.series.as_str()));
        Self {
            selected_key: self.selected_key.filter(|key| drawn(key.as_str())),
            hovered_key: self.hovered_key.filter(|key| drawn(key.as_str())),
            ..self
        }
    }

    /// Back to the idle state of a freshly drawn chart.
    #[must_use]
    pub fn reset(self) -> Self {
        Self::default()
    }
}

/// Free-function form of [`InteractionState::apply_transform`].
#[must_use]
pub fn apply_transform(state: InteractionState, transform: ZoomTransform) -> InteractionState {
    state.apply_transform(transform)
}
