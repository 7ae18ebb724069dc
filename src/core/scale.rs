use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::types::Viewport;
use crate::error::{ChartError, ChartResult};

/// Continuous mapping from a numeric domain to a screen range.
///
/// A zero-span domain maps every value to the middle of the range, so a chart
/// whose series are all empty draws a flat axis instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    /// Creates a scale over `domain_start..domain_end` with a unit range.
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start: 0.0,
            range_end: 1.0,
        })
    }

    /// Vertical value axis: domain start sits at the bottom edge.
    pub fn for_y_axis(domain: (f64, f64), viewport: Viewport) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Self::new(domain.0, domain.1)?.with_range(f64::from(viewport.height), 0.0)
    }

    pub fn with_range(self, range_start: f64, range_end: f64) -> ChartResult<Self> {
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }
        Ok(Self {
            range_start,
            range_end,
            ..self
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        let normalized = if span == 0.0 {
            0.5
        } else {
            (value - self.domain_start) / span
        };
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let range_span = self.range_end - self.range_start;
        if range_span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / range_span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    /// Returns a copy whose domain covers what the range shows after applying
    /// `screen = scale * pixel + translate` on this axis.
    pub fn rescaled(self, scale: f64, translate: f64) -> ChartResult<Self> {
        if !scale.is_finite() || scale == 0.0 || !translate.is_finite() {
            return Err(ChartError::InvalidData(
                "zoom scale must be finite and non-zero".to_owned(),
            ));
        }
        let start = self.invert((self.range_start - translate) / scale);
        let end = self.invert((self.range_end - translate) / scale);
        Ok(Self {
            domain_start: start,
            domain_end: end,
            ..self
        })
    }
}

/// Shared layout math for point and band scales.
#[derive(Debug, Clone, PartialEq)]
struct OrdinalLayout {
    keys: IndexSet<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl OrdinalLayout {
    fn new(
        keys: IndexSet<String>,
        range: (f64, f64),
        padding_inner: f64,
        padding_outer: f64,
    ) -> Self {
        let count = keys.len() as f64;
        let reversed = range.1 < range.0;
        let (low, high) = if reversed {
            (range.1, range.0)
        } else {
            range
        };
        let step = (high - low) / (count - padding_inner + padding_outer * 2.0).max(1.0);
        let start = low + (high - low - step * (count - padding_inner)) * 0.5;
        let bandwidth = step * (1.0 - padding_inner);

        let (start, step) = if reversed {
            (high - (start - low) - bandwidth, -step)
        } else {
            (start, step)
        };
        Self {
            keys,
            start,
            step,
            bandwidth,
        }
    }

    fn position(&self, key: &str) -> Option<f64> {
        self.keys
            .get_index_of(key)
            .map(|index| self.start + self.step * index as f64)
    }
}

fn collect_keys<I, S>(keys: I) -> ChartResult<IndexSet<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out = IndexSet::new();
    for key in keys {
        let key = key.into();
        if out.contains(&key) {
            return Err(ChartError::InvalidData(format!(
                "duplicate scale key `{key}`"
            )));
        }
        out.insert(key);
    }
    Ok(out)
}

fn check_padding(padding: f64) -> ChartResult<()> {
    if !padding.is_finite() || !(0.0..=1.0).contains(&padding) {
        return Err(ChartError::InvalidData(
            "scale padding must be finite and in [0, 1]".to_owned(),
        ));
    }
    Ok(())
}

/// Evenly spaced positions for categorical x-axis slots.
#[derive(Debug, Clone, PartialEq)]
pub struct PointScale {
    layout: OrdinalLayout,
}

impl PointScale {
    /// `padding` is the outer gap in steps; `0.0` puts the first and last
    /// keys on the range ends. A single key sits in the middle.
    pub fn new<I, S>(keys: I, range: (f64, f64), padding: f64) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        check_padding(padding)?;
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }
        Ok(Self {
            layout: OrdinalLayout::new(collect_keys(keys)?, range, 1.0, padding),
        })
    }

    #[must_use]
    pub fn position(&self, key: &str) -> Option<f64> {
        self.layout.position(key)
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.layout.step
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.layout.keys.iter().map(String::as_str)
    }
}

/// Equal-width bands, used by the heatmap for both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    layout: OrdinalLayout,
}

impl BandScale {
    /// `padding` applies to both the gaps between bands and the outer edges.
    pub fn new<I, S>(keys: I, range: (f64, f64), padding: f64) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        check_padding(padding)?;
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }
        Ok(Self {
            layout: OrdinalLayout::new(collect_keys(keys)?, range, padding, padding),
        })
    }

    /// Leading edge of the band for `key`.
    #[must_use]
    pub fn position(&self, key: &str) -> Option<f64> {
        self.layout.position(key)
    }

    #[must_use]
    pub fn center(&self, key: &str) -> Option<f64> {
        self.position(key)
            .map(|position| position + self.layout.bandwidth / 2.0)
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.layout.bandwidth
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.layout.keys.iter().map(String::as_str)
    }
}

/// Base (pre-zoom) scales of a categorical line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotScales {
    pub x: PointScale,
    pub y: LinearScale,
}

impl PlotScales {
    /// Lays `x_keys` across the viewport width and `y_domain` up its height.
    pub fn new<I, S>(
        x_keys: I,
        y_domain: (f64, f64),
        viewport: Viewport,
        x_padding: f64,
    ) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(Self {
            x: PointScale::new(x_keys, (0.0, f64::from(viewport.width)), x_padding)?,
            y: LinearScale::for_y_axis(y_domain, viewport)?,
        })
    }

    /// Base screen position of one slot value, before any zoom.
    #[must_use]
    pub fn project(&self, key: &str, value: f64) -> Option<(f64, f64)> {
        self.x.position(key).map(|x| (x, self.y.map(value)))
    }
}
