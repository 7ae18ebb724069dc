use indexmap::IndexSet;
use tracing::debug;

use crate::core::types::Row;

/// Dropdown entry meaning "no filter".
pub const ALL_CATEGORIES: &str = "All";

/// Normalizes a dropdown value: `"All"` and blank values clear the filter.
#[must_use]
pub fn normalize_filter(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != ALL_CATEGORIES)
}

/// Dropdown options for `field`: `"All"` followed by distinct values in
/// first-seen order.
#[must_use]
pub fn filter_options(rows: &[Row], field: &str) -> Vec<String> {
    let mut options: IndexSet<String> = IndexSet::new();
    options.insert(ALL_CATEGORIES.to_owned());
    for row in rows {
        if let Some(key) = row.key(field) {
            options.insert(key.into_owned());
        }
    }
    options.into_iter().collect()
}

/// Keeps rows whose `field` equals the active filter value.
///
/// With no active filter every row is kept. Filtering happens before
/// aggregation; it is never a display-only dimming.
#[must_use]
pub fn filter_rows(rows: &[Row], field: &str, active: Option<&str>) -> Vec<Row> {
    let Some(active) = normalize_filter(active) else {
        return rows.to_vec();
    };
    let kept: Vec<Row> = rows
        .iter()
        .filter(|row| row.key(field).is_some_and(|key| key == active))
        .cloned()
        .collect();
    debug!(
        field,
        active,
        total = rows.len(),
        kept = kept.len(),
        "filtered rows"
    );
    kept
}
