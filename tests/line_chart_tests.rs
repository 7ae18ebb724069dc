use ridership_chart::api::{ChartSnapshot, SNAPSHOT_SCHEMA_VERSION};
use ridership_chart::core::{AggregationSpec, Aggregator, Row, Viewport, ZoomTransform};
use ridership_chart::interaction::BrushExtent;
use ridership_chart::{ChartConfig, ChartError, LineChart};

fn ridership_row(mode: &str, month: &str, flow: f64) -> Row {
    Row::new()
        .with_text("mode", mode)
        .with_text("month", month)
        .with_number("flow", flow)
}

fn rows() -> Vec<Row> {
    vec![
        ridership_row("Bus", "Jan", 10.0),
        ridership_row("Bus", "Feb", 20.0),
        ridership_row("Rail", "Jan", 5.0),
        ridership_row("Rail", "Mar", 8.0),
    ]
}

fn config() -> ChartConfig {
    ChartConfig::new(Viewport::new(200, 100))
}

fn chart(aggregator: Aggregator) -> LineChart {
    let spec = AggregationSpec::new("mode", "month", "flow", aggregator);
    LineChart::new(rows(), spec, config()).expect("chart init")
}

#[test]
fn new_chart_aggregates_and_lays_out_axes() {
    let chart = chart(Aggregator::Sum);
    assert_eq!(chart.x_domain(), ["Jan", "Feb", "Mar"]);
    assert_eq!(chart.y_domain(), (0.0, 20.0));
    assert_eq!(chart.series().len(), 2);
    assert_eq!(chart.series()[1].value_at("Feb"), Some(0.0));
    assert_eq!(chart.scales().x.position("Mar"), Some(200.0));
}

#[test]
fn y_domain_is_rounded_outward() {
    let mut rows = rows();
    rows.push(ridership_row("Bus", "Mar", 97.0));
    let spec = AggregationSpec::new("mode", "month", "flow", Aggregator::Sum);
    let chart = LineChart::new(rows, spec, config()).expect("chart init");
    assert_eq!(chart.y_domain(), (0.0, 100.0));

    let raw = LineChart::new(
        self::rows(),
        AggregationSpec::new("mode", "month", "flow", Aggregator::Sum),
        config().with_nice_tick_count(0),
    )
    .expect("chart init");
    assert_eq!(raw.y_domain(), (0.0, 20.0));
}

#[test]
fn invalid_viewport_is_rejected() {
    let spec = AggregationSpec::new("mode", "month", "flow", Aggregator::Sum);
    let err = LineChart::new(rows(), spec, ChartConfig::new(Viewport::new(200, 0)))
        .expect_err("zero height");
    assert!(matches!(
        err,
        ChartError::InvalidViewport {
            width: 200,
            height: 0
        }
    ));
}

#[test]
fn empty_rows_draw_an_empty_chart() {
    let spec = AggregationSpec::new("mode", "month", "flow", Aggregator::Sum);
    let chart = LineChart::new(Vec::new(), spec, config()).expect("empty chart");
    assert!(chart.series().is_empty());
    assert!(chart.x_domain().is_empty());
    assert_eq!(chart.y_domain(), (0.0, 0.0));
    assert!(chart.visibility().is_empty());
    assert_eq!(chart.filter_options(), vec!["All"]);
}

#[test]
fn filter_reaggregates_but_keeps_the_x_axis() {
    let mut chart = chart(Aggregator::Sum);
    assert_eq!(chart.filter_options(), vec!["All", "Bus", "Rail"]);

    chart.set_filter("Rail").expect("filter");
    assert_eq!(chart.state().active_filter(), Some("Rail"));
    assert_eq!(chart.series().len(), 1);
    assert_eq!(chart.series()[0].key, "Rail");
    assert_eq!(chart.series()[0].points.len(), 3);
    assert_eq!(chart.series()[0].value_at("Feb"), Some(0.0));
    assert_eq!(chart.x_domain(), ["Jan", "Feb", "Mar"]);
    assert_eq!(chart.y_domain(), (0.0, 8.0));
    assert_eq!(chart.scales().x.position("Mar"), Some(200.0));

    chart.set_filter("All").expect("clear filter");
    assert_eq!(chart.state().active_filter(), None);
    assert_eq!(chart.series().len(), 2);
    assert_eq!(chart.y_domain(), (0.0, 20.0));
}

#[test]
fn filtering_to_an_unknown_value_leaves_no_series() {
    let mut chart = chart(Aggregator::Sum);
    chart.set_filter("Ferry").expect("filter");
    assert!(chart.series().is_empty());
    assert_eq!(chart.x_domain(), ["Jan", "Feb", "Mar"]);
}

#[test]
fn filter_drops_selection_of_hidden_series() {
    let mut chart = chart(Aggregator::Sum);
    chart.click_series("Bus").expect("select");
    chart.hover_series("Bus").expect("hover");
    chart.set_filter("Rail").expect("filter");
    assert_eq!(chart.state().selected_key(), None);
    assert_eq!(chart.state().hovered_key(), None);
}

#[test]
fn filter_field_can_differ_from_the_category_field() {
    let chart = chart(Aggregator::Sum)
        .with_filter_field("month")
        .expect("filter field");
    assert_eq!(chart.filter_options(), vec!["All", "Jan", "Feb", "Mar"]);

    let err = self::chart(Aggregator::Sum)
        .with_filter_field("line")
        .expect_err("unknown field");
    assert!(matches!(err, ChartError::InvalidSpec(_)));
}

#[test]
fn clicking_toggles_emphasis_and_stroke_width() {
    let mut chart = chart(Aggregator::Sum);
    chart.click_series("Bus").expect("select");

    let visibility = chart.visibility();
    assert!(visibility[0].emphasis);
    assert_eq!(chart.stroke_width(&visibility[0]), 4.0);
    assert_eq!(visibility[1].opacity, 0.1);
    assert_eq!(chart.stroke_width(&visibility[1]), 2.0);

    chart.click_series("Bus").expect("deselect");
    assert!(chart.visibility().iter().all(|entry| entry.opacity == 1.0));

    chart.click_series("Rail").expect("select");
    chart.click_background();
    assert_eq!(chart.state().selected_key(), None);
}

#[test]
fn unknown_series_are_rejected() {
    let mut chart = chart(Aggregator::Sum);
    let err = chart.click_series("Tram").expect_err("unknown series");
    assert!(matches!(err, ChartError::UnknownSeries(key) if key == "Tram"));
    assert!(chart.hover_series("Tram").is_err());
    assert_eq!(chart.state().selected_key(), None);
}

#[test]
fn zoom_is_constrained_and_reported() {
    let mut chart = chart(Aggregator::Sum);
    chart
        .apply_zoom(ZoomTransform::uniform(25.0, 0.0, 0.0))
        .expect("zoom");
    assert_eq!(chart.state().zoom_transform().scale_x, 10.0);

    chart
        .apply_zoom(ZoomTransform::uniform(2.0, 0.0, 0.0))
        .expect("zoom");
    assert_eq!(chart.zoomed_y_domain().expect("zoomed domain"), (10.0, 20.0));

    assert!(
        chart
            .apply_zoom(ZoomTransform::uniform(f64::NAN, 0.0, 0.0))
            .is_err()
    );

    chart.reset_zoom();
    assert!(chart.state().zoom_transform().is_identity());
    assert_eq!(chart.zoomed_y_domain().expect("zoomed domain"), (0.0, 20.0));
}

#[test]
fn brush_dims_series_outside_the_extent() {
    let mut chart = chart(Aggregator::Sum);
    // Bus Feb sits at (100, 0).
    chart
        .brush(BrushExtent::area(90.0, -1.0, 110.0, 10.0))
        .expect("brush");
    let visibility = chart.visibility();
    assert_eq!(visibility[0].opacity, 1.0);
    assert_eq!(visibility[1].opacity, 0.1);

    chart.clear_brush();
    assert!(chart.visibility().iter().all(|entry| entry.opacity == 1.0));

    let err = chart
        .brush(BrushExtent::horizontal(f64::NAN, 1.0))
        .expect_err("non-finite brush");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn line_paths_split_at_gaps() {
    let chart = chart(Aggregator::Mean);
    let paths = chart.line_paths();
    assert_eq!(paths.len(), 2);

    assert_eq!(paths[0].key, "Bus");
    assert_eq!(paths[0].runs, vec![vec![(0.0, 50.0), (100.0, 0.0)]]);

    assert_eq!(paths[1].key, "Rail");
    assert_eq!(paths[1].runs.len(), 2);
    assert_eq!(paths[1].point_count(), 2);
    assert_eq!(paths[1].runs[1], vec![(200.0, 60.0)]);
}

#[test]
fn line_paths_follow_the_zoom() {
    let mut chart = chart(Aggregator::Sum);
    chart
        .apply_zoom(ZoomTransform::uniform(2.0, -100.0, 0.0))
        .expect("zoom");
    let paths = chart.line_paths();
    assert_eq!(paths[0].runs[0][1], (100.0, 0.0));
}

#[test]
fn pointer_leave_clears_hover_only() {
    let mut chart = chart(Aggregator::Sum);
    chart.click_series("Rail").expect("select");
    chart.hover_series("Bus").expect("hover");
    chart.pointer_leave();
    assert_eq!(chart.state().hovered_key(), None);
    assert_eq!(chart.state().selected_key(), Some("Rail"));
}

#[test]
fn snapshot_round_trips_through_versioned_json() {
    let mut chart = chart(Aggregator::Mean);
    chart.click_series("Rail").expect("select");
    chart.click_point("Bus", "Feb").expect("point");
    chart
        .apply_zoom(ZoomTransform::uniform(2.0, 0.0, 0.0))
        .expect("zoom");

    let snapshot = chart.snapshot().expect("snapshot");
    assert_eq!(snapshot.zoomed_y_domain, (10.0, 20.0));
    assert_eq!(snapshot.points[0].points, vec![false, true, false]);
    let json = snapshot.to_json().expect("serialize");
    assert!(json.contains(&format!("\"schema_version\": {SNAPSHOT_SCHEMA_VERSION}")));

    let restored = ChartSnapshot::from_json(&json).expect("parse snapshot");
    assert_eq!(restored, snapshot);
}

#[test]
fn snapshot_without_envelope_is_rejected() {
    let snapshot = chart(Aggregator::Sum).snapshot().expect("snapshot");
    let bare = serde_json::to_string(&snapshot).expect("serialize bare snapshot");
    let err = ChartSnapshot::from_json(&bare).expect_err("missing schema version");
    assert!(matches!(err, ChartError::InvalidData(message) if message.contains("schema_version")));
}

#[test]
fn snapshot_with_unknown_schema_version_is_rejected() {
    let snapshot = chart(Aggregator::Sum).snapshot().expect("snapshot");
    let json = snapshot.to_json().expect("serialize").replace(
        &format!("\"schema_version\": {SNAPSHOT_SCHEMA_VERSION}"),
        "\"schema_version\": 99",
    );
    let err = ChartSnapshot::from_json(&json).expect_err("unsupported version");
    assert!(matches!(err, ChartError::InvalidData(message) if message.contains("99")));
}

#[test]
fn legend_click_mutes_and_unmutes_a_series() {
    let mut chart = chart(Aggregator::Sum);
    chart.click_legend("Rail").expect("mute");
    let opacities: Vec<f64> = chart.visibility().iter().map(|v| v.opacity).collect();
    assert_eq!(opacities, vec![1.0, 0.1]);

    chart.click_series("Rail").expect("select");
    assert_eq!(chart.visibility()[1].opacity, 1.0);
    chart.click_background();
    assert_eq!(chart.visibility()[1].opacity, 0.1);

    chart.click_legend("Rail").expect("unmute");
    assert!(chart.visibility().iter().all(|v| v.opacity == 1.0));

    let err = chart.click_legend("Ferry").expect_err("unknown series");
    assert!(matches!(err, ChartError::UnknownSeries(key) if key == "Ferry"));
}

#[test]
fn clicked_points_stay_emphasised_until_background_click() {
    let mut chart = chart(Aggregator::Sum);
    chart.click_point("Bus", "Jan").expect("first point");
    chart.click_point("Rail", "Mar").expect("second point");
    chart.click_series("Bus").expect("select line");

    let flags: Vec<Vec<bool>> = chart.point_emphasis().into_iter().map(|p| p.points).collect();
    assert_eq!(flags, vec![vec![true, false, false], vec![false, false, true]]);

    chart.click_point("Bus", "Jan").expect("toggle off");
    assert_eq!(chart.state().selected_points().len(), 1);

    chart.click_background();
    assert!(chart.state().selected_points().is_empty());
    assert_eq!(chart.state().selected_key(), None);
    assert!(chart.point_emphasis().iter().all(|p| p.points.iter().all(|f| !f)));
}

#[test]
fn clicking_a_gap_or_unknown_slot_is_rejected() {
    let mut chart = chart(Aggregator::Mean);
    let err = chart.click_point("Bus", "Mar").expect_err("gap");
    assert!(matches!(err, ChartError::InvalidData(_)));
    let err = chart.click_point("Bus", "Apr").expect_err("unknown slot");
    assert!(matches!(err, ChartError::InvalidData(_)));
    let err = chart.click_point("Ferry", "Jan").expect_err("unknown series");
    assert!(matches!(err, ChartError::UnknownSeries(_)));
    assert!(chart.state().selected_points().is_empty());
}

#[test]
fn brushed_points_follow_the_zoom() {
    let mut chart = chart(Aggregator::Sum);
    chart
        .brush(BrushExtent::area(150.0, 0.0, 200.0, 90.0))
        .expect("brush");
    let flags: Vec<Vec<bool>> = chart.point_emphasis().into_iter().map(|p| p.points).collect();
    assert_eq!(flags, vec![vec![false, false, false], vec![false, false, true]]);

    chart
        .apply_zoom(ZoomTransform::uniform(2.0, 0.0, 0.0))
        .expect("zoom");
    let flags: Vec<Vec<bool>> = chart.point_emphasis().into_iter().map(|p| p.points).collect();
    assert_eq!(flags, vec![vec![false, true, false], vec![false, false, false]]);
}

#[test]
fn config_round_trips_and_fills_defaults() {
    let config = config()
        .with_dimmed_opacity(0.25)
        .with_stroke_widths(1.5, 3.0)
        .with_x_padding(0.5);
    let json = config.to_json_pretty().expect("serialize config");
    assert_eq!(ChartConfig::from_json_str(&json).expect("parse config"), config);

    let minimal = ChartConfig::from_json_str(r#"{"viewport":{"width":640,"height":320}}"#)
        .expect("parse minimal config");
    assert_eq!(minimal, ChartConfig::new(Viewport::new(640, 320)));
}

#[test]
fn invalid_config_values_are_rejected() {
    let spec = AggregationSpec::new("mode", "month", "flow", Aggregator::Sum);
    let err = LineChart::new(rows(), spec, config().with_dimmed_opacity(1.5))
        .expect_err("opacity out of range");
    assert!(matches!(err, ChartError::InvalidData(_)));
    assert!(config().with_stroke_widths(0.0, 4.0).validate().is_err());
    assert!(ChartConfig::from_json_str("{").is_err());
}
