use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::types::Series;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Domain {
    /// Ordered x-axis categories.
    Categorical(Vec<String>),
    /// Closed numeric interval.
    Numeric { min: f64, max: f64 },
}

impl Domain {
    #[must_use]
    pub fn categories(&self) -> Option<&[String]> {
        match self {
            Self::Categorical(keys) => Some(keys),
            Self::Numeric { .. } => None,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            Self::Numeric { min, max } => Some((*min, *max)),
            Self::Categorical(_) => None,
        }
    }
}

/// Computes the domain of one axis over a set of series.
#[must_use]
pub fn domain(series: &[Series], axis: Axis) -> Domain {
    match axis {
        Axis::X => Domain::Categorical(x_domain(series)),
        Axis::Y => {
            let (min, max) = y_domain(series);
            Domain::Numeric { min, max }
        }
    }
}

/// Union of point keys in first-seen order.
///
/// Aggregated series already follow the group order, so a fixed order comes
/// back unchanged.
#[must_use]
pub fn x_domain(series: &[Series]) -> Vec<String> {
    let mut keys: IndexSet<&str> = IndexSet::new();
    for line in series {
        for point in &line.points {
            keys.insert(point.key.as_str());
        }
    }
    keys.into_iter().map(str::to_owned).collect()
}

/// `[0, max]` over present values; `[0, 0]` when no value is present.
#[must_use]
pub fn y_domain(series: &[Series]) -> (f64, f64) {
    let max = series
        .iter()
        .flat_map(Series::present_values)
        .fold(None, |acc: Option<f64>, value| {
            Some(acc.map_or(value, |current| current.max(value)))
        });
    (0.0, max.unwrap_or(0.0))
}

/// Extends a linear domain outward so both ends land on round tick steps.
///
/// Steps are 1, 2 or 5 times a power of ten, aiming at roughly `count`
/// ticks. Degenerate or non-finite domains are returned unchanged.
#[must_use]
pub fn nice_domain(min: f64, max: f64, count: usize) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() || min == max || count == 0 {
        return (min, max);
    }

    let reversed = max < min;
    let (mut start, mut stop) = if reversed { (max, min) } else { (min, max) };
    let mut previous_step: Option<f64> = None;

    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if previous_step == Some(step) {
            break;
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        previous_step = Some(step);
    }

    if reversed { (stop, start) } else { (start, stop) }
}

/// Tick step for `[start, stop]`. Negative results encode `1 / |step|` for
/// sub-unit steps, which keeps decimal steps exact.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let e10 = 50_f64.sqrt();
    let e5 = 10_f64.sqrt();
    let e2 = 2_f64.sqrt();

    let step = (stop - start) / count as f64;
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10_f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };

    if power >= 0.0 {
        factor * 10_f64.powf(power)
    } else {
        -10_f64.powf(-power) / factor
    }
}
