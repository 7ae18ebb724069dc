use std::cmp::Ordering;

use chrono::NaiveDate;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Ordering policy for series keys or x-axis slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyOrder {
    /// Keys appear in the order they are first met in the rows.
    #[default]
    FirstSeen,
    /// Keys are sorted lexicographically.
    Ascending,
    /// Keys are parsed as calendar dates with a `chrono` format string.
    ///
    /// Month-only formats such as `"%Y/%m"` are accepted. Keys that do not
    /// parse keep their first-seen order after all parsed keys.
    Chronological { format: String },
    /// Keys follow a fixed list.
    ///
    /// As an x-axis order the list is the full slot set: listed keys absent
    /// from data still get a slot, and rows with unlisted keys are dropped.
    /// As a series order listed keys come first and unlisted keys follow in
    /// first-seen order.
    Fixed(Vec<String>),
}

impl KeyOrder {
    #[must_use]
    pub fn fixed<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fixed(keys.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn chronological(format: impl Into<String>) -> Self {
        Self::Chronological {
            format: format.into(),
        }
    }

    pub fn validate(&self, label: &str) -> ChartResult<()> {
        match self {
            Self::FirstSeen | Self::Ascending => Ok(()),
            Self::Chronological { format } => {
                if format.trim().is_empty() {
                    return Err(ChartError::InvalidSpec(format!(
                        "{label} date format must not be empty"
                    )));
                }
                Ok(())
            }
            Self::Fixed(keys) => {
                let mut unique = IndexSet::with_capacity(keys.len());
                for key in keys {
                    if !unique.insert(key.as_str()) {
                        return Err(ChartError::InvalidSpec(format!(
                            "{label} lists key `{key}` more than once"
                        )));
                    }
                }
                Ok(())
            }
        }
    }

    /// Returns whether a row with this slot key takes part in an x-axis layout.
    #[must_use]
    pub fn admits_slot(&self, key: &str) -> bool {
        match self {
            Self::Fixed(keys) => keys.iter().any(|listed| listed == key),
            _ => true,
        }
    }

    /// Orders x-axis slots. A fixed order is returned as-is, padding absent keys.
    #[must_use]
    pub fn arrange_slots(&self, seen: &IndexSet<String>) -> Vec<String> {
        match self {
            Self::Fixed(keys) => keys.clone(),
            _ => self.arrange_seen(seen),
        }
    }

    /// Orders series keys. A fixed order leads, unlisted keys trail in first-seen order.
    #[must_use]
    pub fn arrange_series(&self, seen: &IndexSet<String>) -> Vec<String> {
        match self {
            Self::Fixed(keys) => {
                let mut out = keys.clone();
                out.extend(
                    seen.iter()
                        .filter(|key| !keys.contains(*key))
                        .cloned(),
                );
                out
            }
            _ => self.arrange_seen(seen),
        }
    }

    fn arrange_seen(&self, seen: &IndexSet<String>) -> Vec<String> {
        let mut keys: Vec<String> = seen.iter().cloned().collect();
        match self {
            Self::Ascending => keys.sort(),
            Self::Chronological { format } => {
                let mut dated: Vec<(Option<NaiveDate>, String)> = keys
                    .into_iter()
                    .map(|key| (parse_period_key(&key, format), key))
                    .collect();
                dated.sort_by(|left, right| match (left.0, right.0) {
                    (Some(a), Some(b)) => a.cmp(&b).then_with(|| left.1.cmp(&right.1)),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                });
                keys = dated.into_iter().map(|(_, key)| key).collect();
            }
            Self::FirstSeen | Self::Fixed(_) => {}
        }
        keys
    }
}

/// Parses a period key such as `2023/04` or `2023-04-17` with `format`.
///
/// Formats without a day component are retried against the first day of the
/// period.
#[must_use]
pub fn parse_period_key(key: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, format).ok().or_else(|| {
        NaiveDate::parse_from_str(&format!("{key}-01"), &format!("{format}-%d")).ok()
    })
}
