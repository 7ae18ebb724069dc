use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One parsed cell of a ridership row.
///
/// CSV loaders usually hand over text for every column, so numeric reads also
/// accept text that parses as a finite number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Reads the value as a grouping key.
    #[must_use]
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text.as_str()),
            Self::Number(number) => Cow::Owned(number.to_string()),
        }
    }

    /// Reads the value as a finite number, or `None` when it is not numeric.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number).filter(|n| n.is_finite()),
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Flat, immutable record handed over by the CSV loading layer.
///
/// Field order is preserved so snapshots and debug output read like the
/// source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: IndexMap<String, FieldValue>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .insert(field.into(), FieldValue::Text(value.into()));
        self
    }

    #[must_use]
    pub fn with_number(mut self, field: impl Into<String>, value: f64) -> Self {
        self.fields.insert(field.into(), FieldValue::Number(value));
        self
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    #[must_use]
    pub fn key(&self, field: &str) -> Option<Cow<'_, str>> {
        self.fields.get(field).map(FieldValue::as_key)
    }

    #[must_use]
    pub fn number(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(FieldValue::as_number)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        }
    }
}

/// One x-category slot of a series. `None` marks a gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub key: String,
    pub value: Option<f64>,
}

impl Point {
    #[must_use]
    pub fn new(key: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    #[must_use]
    pub fn is_gap(&self) -> bool {
        self.value.is_none()
    }
}

/// One named line of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub key: String,
    pub points: Vec<Point>,
}

impl Series {
    #[must_use]
    pub fn new(key: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            key: key.into(),
            points,
        }
    }

    /// Returns the aggregate stored in slot `key`, if that slot holds a value.
    #[must_use]
    pub fn value_at(&self, key: &str) -> Option<f64> {
        self.points
            .iter()
            .find(|point| point.key == key)
            .and_then(|point| point.value)
    }

    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|point| point.value)
    }

    /// Sum over present values, as shown in series tooltips.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.present_values().sum()
    }
}
