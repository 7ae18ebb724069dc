use tracing::{debug, trace, warn};

use crate::core::{
    AggregationSpec, KeyOrder, LinePath, PlotScales, Rect, Row, Series, ZoomTransform, aggregate,
    filter_options, filter_rows, nice_domain, project_line_paths, x_domain, y_domain,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    BrushExtent, InteractionState, PointEmphasis, SeriesVisibility, point_emphasis,
    visibility_with_opacity,
};

use super::{ChartConfig, ChartSnapshot};

/// One categorical line chart: rows, their aggregated series, base scales and
/// the single interaction state the chart owns.
///
/// Series are rebuilt from rows whenever the filter changes. The x-axis keeps
/// the slots of the unfiltered data so axes and legends stay put.
#[derive(Debug, Clone)]
pub struct LineChart {
    config: ChartConfig,
    spec: AggregationSpec,
    filter_field: String,
    rows: Vec<Row>,
    base_x_domain: Vec<String>,
    series: Vec<Series>,
    scales: PlotScales,
    state: InteractionState,
}

impl LineChart {
    /// Aggregates `rows` and lays out base scales.
    ///
    /// The filter applies to the category field unless
    /// [`LineChart::with_filter_field`] says otherwise.
    pub fn new(rows: Vec<Row>, spec: AggregationSpec, config: ChartConfig) -> ChartResult<Self> {
        config.validate()?;
        let series = aggregate(&rows, &spec)?;
        let base_x_domain = x_domain(&series);
        let scales = build_scales(&config, &base_x_domain, &series)?;
        debug!(
            rows = rows.len(),
            series = series.len(),
            slots = base_x_domain.len(),
            "line chart created"
        );

        Ok(Self {
            config,
            filter_field: spec.category_field.clone(),
            spec,
            rows,
            base_x_domain,
            series,
            scales,
            state: InteractionState::default(),
        })
    }

    /// Filters on `field` instead of the category field.
    pub fn with_filter_field(mut self, field: impl Into<String>) -> ChartResult<Self> {
        let field = field.into();
        if !self.rows.is_empty() && !self.rows.iter().any(|row| row.has_field(&field)) {
            return Err(ChartError::InvalidSpec(format!(
                "filter field `{field}` is not present in any row"
            )));
        }
        self.filter_field = field;
        Ok(self)
    }

    #[must_use]
    pub fn config(&self) -> ChartConfig {
        self.config
    }

    #[must_use]
    pub fn spec(&self) -> &AggregationSpec {
        &self.spec
    }

    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    #[must_use]
    pub fn scales(&self) -> &PlotScales {
        &self.scales
    }

    #[must_use]
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    #[must_use]
    pub fn x_domain(&self) -> &[String] {
        &self.base_x_domain
    }

    #[must_use]
    pub fn y_domain(&self) -> (f64, f64) {
        self.scales.y.domain()
    }

    /// Dropdown entries for the filter field, starting with `"All"`.
    #[must_use]
    pub fn filter_options(&self) -> Vec<String> {
        filter_options(&self.rows, &self.filter_field)
    }

    /// Applies a dropdown value and re-aggregates. `"All"` clears the filter.
    pub fn set_filter(&mut self, value: &str) -> ChartResult<()> {
        let next = self.state.clone().with_filter(value);
        let filtered = filter_rows(&self.rows, &self.filter_field, next.active_filter());
        if filtered.is_empty() && !self.rows.is_empty() {
            warn!(
                field = %self.filter_field,
                value,
                "filter matched no rows; chart will be empty"
            );
        }
        let spec = if next.active_filter().is_some() {
            self.spec
                .clone()
                .with_group_order(KeyOrder::Fixed(self.base_x_domain.clone()))
        } else {
            self.spec.clone()
        };

        let series = aggregate(&filtered, &spec)?;
        let scales = build_scales(&self.config, &self.base_x_domain, &series)?;
        debug!(
            filter = next.active_filter().unwrap_or("All"),
            rows = filtered.len(),
            series = series.len(),
            "filter applied"
        );

        self.state = next.retain_keys(series.iter().map(|line| line.key.as_str()));
        self.series = series;
        self.scales = scales;
        Ok(())
    }

    /// Applies a gesture transform, clamped by the configured zoom constraints.
    pub fn apply_zoom(&mut self, transform: ZoomTransform) -> ChartResult<()> {
        transform.validate()?;
        let view = Rect::from_viewport(self.config.viewport);
        let constrained = self.config.zoom_constraints.constrain(transform, view);
        trace!(?transform, ?constrained, "zoom");
        self.update_state(|state| state.apply_transform(constrained));
        Ok(())
    }

    pub fn reset_zoom(&mut self) {
        self.update_state(|state| state.apply_transform(ZoomTransform::identity()));
    }

    pub fn brush(&mut self, extent: BrushExtent) -> ChartResult<()> {
        if !extent.is_finite() {
            return Err(ChartError::InvalidData(
                "brush extent must be finite".to_owned(),
            ));
        }
        self.update_state(|state| state.with_brush(extent));
        Ok(())
    }

    pub fn clear_brush(&mut self) {
        self.update_state(InteractionState::clear_brush);
    }

    /// Click on a line: toggles its sticky selection.
    pub fn click_series(&mut self, key: &str) -> ChartResult<()> {
        self.require_series(key)?;
        self.update_state(|state| state.toggle_selection(key));
        Ok(())
    }

    /// Click on a legend entry: mutes the series, or unmutes it.
    pub fn click_legend(&mut self, key: &str) -> ChartResult<()> {
        self.require_series(key)?;
        self.update_state(|state| state.toggle_legend(key));
        Ok(())
    }

    /// Click on a drawn point: toggles it in the point selection.
    pub fn click_point(&mut self, series: &str, slot: &str) -> ChartResult<()> {
        let line = self
            .series
            .iter()
            .find(|line| line.key == series)
            .ok_or_else(|| ChartError::UnknownSeries(series.to_owned()))?;
        if line.value_at(slot).is_none() {
            return Err(ChartError::InvalidData(format!(
                "series `{series}` has no point at `{slot}`"
            )));
        }
        self.update_state(|state| state.toggle_point(series, slot));
        Ok(())
    }

    /// Click on empty plot area: clears the selected series and points.
    pub fn click_background(&mut self) {
        self.update_state(InteractionState::clear_selection);
    }

    pub fn hover_series(&mut self, key: &str) -> ChartResult<()> {
        self.require_series(key)?;
        self.update_state(|state| state.hover(key));
        Ok(())
    }

    pub fn pointer_leave(&mut self) {
        self.update_state(InteractionState::pointer_leave);
    }

    #[must_use]
    pub fn visibility(&self) -> Vec<SeriesVisibility> {
        visibility_with_opacity(
            &self.series,
            &self.state,
            &self.scales,
            self.config.dimmed_opacity,
        )
    }

    /// Which drawn points are enlarged: clicked points and, with a brush,
    /// points inside it.
    #[must_use]
    pub fn point_emphasis(&self) -> Vec<PointEmphasis> {
        point_emphasis(&self.series, &self.state, &self.scales)
    }

    #[must_use]
    pub fn stroke_width(&self, visibility: &SeriesVisibility) -> f64 {
        if visibility.emphasis {
            self.config.emphasized_stroke_width
        } else {
            self.config.base_stroke_width
        }
    }

    /// Screen polylines of every series under the current zoom.
    #[must_use]
    pub fn line_paths(&self) -> Vec<LinePath> {
        project_line_paths(&self.series, &self.scales, self.state.zoom_transform())
    }

    /// Value domain visible on the y-axis under the current zoom.
    pub fn zoomed_y_domain(&self) -> ChartResult<(f64, f64)> {
        Ok(self
            .state
            .zoom_transform()
            .rescale_y(self.scales.y)?
            .domain())
    }

    pub fn snapshot(&self) -> ChartResult<ChartSnapshot> {
        Ok(ChartSnapshot {
            viewport: self.config.viewport,
            x_domain: self.base_x_domain.clone(),
            y_domain: self.y_domain(),
            zoomed_y_domain: self.zoomed_y_domain()?,
            series: self.series.clone(),
            state: self.state.clone(),
            visibility: self.visibility(),
            points: self.point_emphasis(),
        })
    }

    fn require_series(&self, key: &str) -> ChartResult<()> {
        if self.series.iter().any(|line| line.key == key) {
            Ok(())
        } else {
            Err(ChartError::UnknownSeries(key.to_owned()))
        }
    }

    fn update_state(&mut self, f: impl FnOnce(InteractionState) -> InteractionState) {
        self.state = f(std::mem::take(&mut self.state));
    }
}

fn build_scales(
    config: &ChartConfig,
    x_keys: &[String],
    series: &[Series],
) -> ChartResult<PlotScales> {
    let (min, max) = y_domain(series);
    let y = if config.nice_tick_count > 0 {
        nice_domain(min, max, config.nice_tick_count)
    } else {
        (min, max)
    };
    PlotScales::new(x_keys.iter().cloned(), y, config.viewport, config.x_padding)
}
