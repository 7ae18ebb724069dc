use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::order::KeyOrder;
use crate::core::types::{Point, Row, Series};
use crate::error::{ChartError, ChartResult};

/// Numeric samples collected for one (category, group) slot.
pub(crate) type SlotSamples = SmallVec<[f64; 4]>;

/// Reduction applied to the samples of one slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregator {
    /// Arithmetic total. Non-numeric or missing values contribute 0 and an
    /// empty slot totals 0.
    #[default]
    Sum,
    /// Arithmetic mean over numeric values only. An empty slot has no value.
    Mean,
}

impl Aggregator {
    /// Reduces slot samples. Samples are summed in ascending order so the
    /// result does not depend on row order.
    #[must_use]
    pub fn reduce(self, samples: &[f64]) -> Option<f64> {
        let mut ordered = SlotSamples::from_slice(samples);
        ordered.sort_unstable_by(f64::total_cmp);
        let total: f64 = ordered.iter().sum();
        match self {
            Self::Sum => Some(total),
            Self::Mean if ordered.is_empty() => None,
            Self::Mean => Some(total / ordered.len() as f64),
        }
    }

    /// Value of a slot that no row maps to.
    #[must_use]
    pub fn empty_slot(self) -> Option<f64> {
        match self {
            Self::Sum => Some(0.0),
            Self::Mean => None,
        }
    }
}

/// Describes how flat rows become named series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationSpec {
    /// Field whose value names a series (mode, route, stop).
    pub category_field: String,
    /// Field whose value names an x-axis slot (time period, month).
    pub group_field: String,
    /// Numeric field reduced per slot (flow, ridership).
    pub value_field: String,
    #[serde(default)]
    pub aggregator: Aggregator,
    #[serde(default)]
    pub group_order: KeyOrder,
    #[serde(default)]
    pub series_order: KeyOrder,
}

impl AggregationSpec {
    #[must_use]
    pub fn new(
        category_field: impl Into<String>,
        group_field: impl Into<String>,
        value_field: impl Into<String>,
        aggregator: Aggregator,
    ) -> Self {
        Self {
            category_field: category_field.into(),
            group_field: group_field.into(),
            value_field: value_field.into(),
            aggregator,
            group_order: KeyOrder::FirstSeen,
            series_order: KeyOrder::FirstSeen,
        }
    }

    #[must_use]
    pub fn with_group_order(mut self, order: KeyOrder) -> Self {
        self.group_order = order;
        self
    }

    /// Fixes and pads the x-axis slots to `keys`.
    #[must_use]
    pub fn with_fixed_groups<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_group_order(KeyOrder::fixed(keys))
    }

    #[must_use]
    pub fn with_series_order(mut self, order: KeyOrder) -> Self {
        self.series_order = order;
        self
    }

    /// Checks the spec on its own, without looking at rows.
    pub fn validate(&self) -> ChartResult<()> {
        for (label, field) in self.fields() {
            if field.trim().is_empty() {
                return Err(ChartError::InvalidSpec(format!("{label} must not be empty")));
            }
        }
        self.group_order.validate("group order")?;
        self.series_order.validate("series order")?;
        Ok(())
    }

    /// Checks that every referenced field exists in the row schema.
    ///
    /// The schema is the union of fields over all rows, so sparse rows are
    /// accepted as long as some row carries the field.
    pub fn validate_against(&self, rows: &[Row]) -> ChartResult<()> {
        for (label, field) in self.fields() {
            if !rows.iter().any(|row| row.has_field(field)) {
                return Err(ChartError::InvalidSpec(format!(
                    "{label} `{field}` is not present in any row"
                )));
            }
        }
        Ok(())
    }

    fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("category field", self.category_field.as_str()),
            ("group field", self.group_field.as_str()),
            ("value field", self.value_field.as_str()),
        ]
    }
}

/// Rows partitioned by category, then by admitted group key.
#[derive(Debug, Default)]
pub(crate) struct Partitions {
    pub(crate) categories: IndexMap<String, IndexMap<String, SlotSamples>>,
    pub(crate) seen_groups: IndexSet<String>,
}

/// Partitions rows without reducing them.
///
/// Categories are registered even when all of their rows fall outside a
/// fixed group order, so legends stay stable.
pub(crate) fn partition_rows(
    rows: &[Row],
    category_field: &str,
    group_field: &str,
    value_field: &str,
    group_order: &KeyOrder,
) -> Partitions {
    let mut partitions = Partitions::default();
    let mut skipped = 0_usize;
    let mut dropped = 0_usize;

    for row in rows {
        let (Some(category), Some(group)) = (row.key(category_field), row.key(group_field))
        else {
            skipped += 1;
            continue;
        };

        let groups = partitions
            .categories
            .entry(category.into_owned())
            .or_default();
        if !group_order.admits_slot(&group) {
            dropped += 1;
            continue;
        }

        let group = group.into_owned();
        partitions.seen_groups.insert(group.clone());
        let samples = groups.entry(group).or_default();
        if let Some(value) = row.number(value_field) {
            samples.push(value);
        }
    }

    if skipped > 0 || dropped > 0 {
        debug!(
            skipped,
            dropped, "rows left out of partitioning (missing keys or unlisted group)"
        );
    }
    partitions
}

/// Turns flat rows into ordered, named series.
///
/// Every returned series carries one point per x-axis slot, in slot order.
/// Empty input yields an empty result, not an error.
pub fn aggregate(rows: &[Row], spec: &AggregationSpec) -> ChartResult<Vec<Series>> {
    spec.validate()?;
    if rows.is_empty() {
        debug!("aggregate called with no rows");
        return Ok(Vec::new());
    }
    spec.validate_against(rows)?;

    let partitions = partition_rows(
        rows,
        &spec.category_field,
        &spec.group_field,
        &spec.value_field,
        &spec.group_order,
    );
    let slots = spec.group_order.arrange_slots(&partitions.seen_groups);
    let categories: IndexSet<String> = partitions.categories.keys().cloned().collect();
    let series_keys = spec.series_order.arrange_series(&categories);

    let series: Vec<Series> = series_keys
        .into_iter()
        .map(|key| {
            let groups = partitions.categories.get(&key);
            let points = slots
                .iter()
                .map(|slot| {
                    let value = match groups.and_then(|groups| groups.get(slot)) {
                        Some(samples) => spec.aggregator.reduce(samples),
                        None => spec.aggregator.empty_slot(),
                    };
                    Point::new(slot.clone(), value)
                })
                .collect();
            Series::new(key, points)
        })
        .collect();

    trace!(
        rows = rows.len(),
        series = series.len(),
        slots = slots.len(),
        aggregator = ?spec.aggregator,
        "aggregated rows into series"
    );
    Ok(series)
}
