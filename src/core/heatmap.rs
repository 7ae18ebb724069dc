use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::aggregate::{Aggregator, partition_rows};
use crate::core::color::Color;
use crate::core::order::KeyOrder;
use crate::core::scale::{BandScale, LinearScale};
use crate::core::types::{Row, Viewport};
use crate::error::{ChartError, ChartResult};

/// Band padding used between heatmap cells.
pub const DEFAULT_BAND_PADDING: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapSpec {
    /// Field naming a heatmap row (stop).
    pub row_field: String,
    /// Field naming a heatmap column (time period).
    pub column_field: String,
    pub value_field: String,
    #[serde(default)]
    pub column_order: KeyOrder,
    /// Keeps only the rows with the largest totals.
    #[serde(default)]
    pub top_n: Option<usize>,
}

impl HeatmapSpec {
    #[must_use]
    pub fn new(
        row_field: impl Into<String>,
        column_field: impl Into<String>,
        value_field: impl Into<String>,
    ) -> Self {
        Self {
            row_field: row_field.into(),
            column_field: column_field.into(),
            value_field: value_field.into(),
            column_order: KeyOrder::FirstSeen,
            top_n: None,
        }
    }

    #[must_use]
    pub fn with_column_order(mut self, order: KeyOrder) -> Self {
        self.column_order = order;
        self
    }

    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (label, field) in [
            ("row field", &self.row_field),
            ("column field", &self.column_field),
            ("value field", &self.value_field),
        ] {
            if field.trim().is_empty() {
                return Err(ChartError::InvalidSpec(format!("{label} must not be empty")));
            }
        }
        if self.top_n == Some(0) {
            return Err(ChartError::InvalidSpec(
                "top_n must be at least 1".to_owned(),
            ));
        }
        self.column_order.validate("column order")
    }

    fn validate_against(&self, rows: &[Row]) -> ChartResult<()> {
        for (label, field) in [
            ("row field", &self.row_field),
            ("column field", &self.column_field),
            ("value field", &self.value_field),
        ] {
            if !rows.iter().any(|row| row.has_field(field)) {
                return Err(ChartError::InvalidSpec(format!(
                    "{label} `{field}` is not present in any row"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatCell {
    pub row: String,
    pub column: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    /// Rows ranked by total value, largest first.
    pub row_keys: Vec<String>,
    pub column_keys: Vec<String>,
    /// Only (row, column) pairs that have at least one source row.
    pub cells: Vec<HeatCell>,
    pub max_value: f64,
}

/// Band scales positioning heatmap columns (x) and rows (y).
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapScales {
    pub columns: BandScale,
    pub rows: BandScale,
}

impl HeatmapScales {
    /// Screen centre of a cell.
    #[must_use]
    pub fn cell_center(&self, cell: &HeatCell) -> Option<(f64, f64)> {
        Some((self.columns.center(&cell.column)?, self.rows.center(&cell.row)?))
    }
}

impl Heatmap {
    pub fn scales(&self, viewport: Viewport, padding: f64) -> ChartResult<HeatmapScales> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(HeatmapScales {
            columns: BandScale::new(
                self.column_keys.iter().cloned(),
                (0.0, f64::from(viewport.width)),
                padding,
            )?,
            rows: BandScale::new(
                self.row_keys.iter().cloned(),
                (0.0, f64::from(viewport.height)),
                padding,
            )?,
        })
    }

    #[must_use]
    pub fn cell(&self, row: &str, column: &str) -> Option<&HeatCell> {
        self.cells
            .iter()
            .find(|cell| cell.row == row && cell.column == column)
    }
}

/// Builds a summed heatmap grid, keeping the `top_n` rows by total.
///
/// Row totals cover every column a row has, including columns the column
/// order leaves out; the column order only decides which cells are drawn.
/// Ties in the ranking keep first-seen order. Empty input yields an empty
/// heatmap.
pub fn build_heatmap(rows: &[Row], spec: &HeatmapSpec) -> ChartResult<Heatmap> {
    spec.validate()?;
    if rows.is_empty() {
        return Ok(Heatmap::default());
    }
    spec.validate_against(rows)?;

    let partitions = partition_rows(
        rows,
        &spec.row_field,
        &spec.column_field,
        &spec.value_field,
        &KeyOrder::FirstSeen,
    );
    let column_keys = spec.column_order.arrange_slots(&partitions.seen_groups);

    let mut ranked: Vec<(&String, f64)> = partitions
        .categories
        .iter()
        .map(|(key, groups)| {
            let total: f64 = groups
                .values()
                .filter_map(|samples| Aggregator::Sum.reduce(samples))
                .sum();
            (key, total)
        })
        .collect();
    ranked.sort_by_key(|(_, total)| Reverse(OrderedFloat(*total)));
    if let Some(top_n) = spec.top_n {
        ranked.truncate(top_n);
    }

    let mut cells = Vec::new();
    for (row_key, _) in &ranked {
        let Some(groups) = partitions.categories.get(*row_key) else {
            continue;
        };
        for column in &column_keys {
            if let Some(value) = groups
                .get(column)
                .and_then(|samples| Aggregator::Sum.reduce(samples))
            {
                cells.push(HeatCell {
                    row: (*row_key).clone(),
                    column: column.clone(),
                    value,
                });
            }
        }
    }

    let max_value = cells.iter().map(|cell| cell.value).fold(0.0, f64::max);
    let row_keys: Vec<String> = ranked.into_iter().map(|(key, _)| key.clone()).collect();
    debug!(
        rows = row_keys.len(),
        columns = column_keys.len(),
        cells = cells.len(),
        max_value,
        "built heatmap"
    );

    Ok(Heatmap {
        row_keys,
        column_keys,
        cells,
        max_value,
    })
}

/// Two-stop colour scale over `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRamp {
    pub low: Color,
    pub high: Color,
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self {
            low: Color::rgb(230.0 / 255.0, 247.0 / 255.0, 1.0),
            high: Color::rgb(8.0 / 255.0, 48.0 / 255.0, 107.0 / 255.0),
        }
    }
}

impl ColorRamp {
    #[must_use]
    pub fn new(low: Color, high: Color) -> Self {
        Self { low, high }
    }

    /// Colour of `value` on a `[0, max]` ramp. A zero `max` yields the midpoint.
    pub fn color_at(self, value: f64, max: f64) -> ChartResult<Color> {
        let t = LinearScale::new(0.0, max)?.map(value);
        Ok(self.low.lerp(self.high, t))
    }
}
