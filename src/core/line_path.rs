use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::scale::PlotScales;
use crate::core::transform::ZoomTransform;
use crate::core::types::Series;

/// Projected polyline of one series in screen coordinates.
///
/// Gaps split the line: each run holds consecutive slots that have values.
/// Renderers draw every run as its own path and never bridge a gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePath {
    pub key: String,
    pub runs: Vec<Vec<(f64, f64)>>,
}

impl LinePath {
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.runs.iter().map(Vec::len).sum()
    }
}

/// Projects one series through the base scales and then the zoom transform.
#[must_use]
pub fn project_line_path(
    series: &Series,
    scales: &PlotScales,
    transform: ZoomTransform,
) -> LinePath {
    let mut runs = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for point in &series.points {
        match point
            .value
            .and_then(|value| scales.project(&point.key, value))
        {
            Some(base) => current.push(transform.apply(base)),
            None => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    LinePath {
        key: series.key.clone(),
        runs,
    }
}

/// Projects every series, in series order.
#[must_use]
pub fn project_line_paths(
    series: &[Series],
    scales: &PlotScales,
    transform: ZoomTransform,
) -> Vec<LinePath> {
    #[cfg(feature = "parallel-projection")]
    {
        series
            .par_iter()
            .map(|line| project_line_path(line, scales, transform))
            .collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        series
            .iter()
            .map(|line| project_line_path(line, scales, transform))
            .collect()
    }
}
