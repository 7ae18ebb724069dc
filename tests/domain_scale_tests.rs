use approx::assert_relative_eq;
use ridership_chart::ChartError;
use ridership_chart::core::{
    Axis, BandScale, Domain, LinearScale, PlotScales, Point, PointScale, Series, Viewport,
    domain, nice_domain, x_domain, y_domain,
};

fn series(key: &str, points: &[(&str, Option<f64>)]) -> Series {
    Series::new(
        key,
        points
            .iter()
            .map(|(slot, value)| Point::new(*slot, *value))
            .collect(),
    )
}

#[test]
fn x_domain_is_the_first_seen_union_of_slots() {
    let lines = vec![
        series("Bus", &[("Jan", Some(1.0)), ("Feb", Some(2.0))]),
        series("Rail", &[("Feb", Some(3.0)), ("Mar", None)]),
    ];
    assert_eq!(x_domain(&lines), vec!["Jan", "Feb", "Mar"]);
    assert_eq!(
        domain(&lines, Axis::X).categories(),
        Some(&["Jan".to_owned(), "Feb".to_owned(), "Mar".to_owned()][..])
    );
}

#[test]
fn y_domain_ignores_gaps() {
    let lines = vec![
        series("Bus", &[("Jan", Some(12.5)), ("Feb", None)]),
        series("Rail", &[("Jan", None), ("Feb", Some(40.0))]),
    ];
    assert_eq!(y_domain(&lines), (0.0, 40.0));
    assert_eq!(
        domain(&lines, Axis::Y),
        Domain::Numeric {
            min: 0.0,
            max: 40.0
        }
    );
}

#[test]
fn y_domain_without_values_is_zero_zero() {
    let lines = vec![series("Bus", &[("Jan", None), ("Feb", None)])];
    assert_eq!(y_domain(&lines), (0.0, 0.0));
    assert_eq!(y_domain(&[]), (0.0, 0.0));
}

#[test]
fn nice_domain_rounds_to_tick_steps() {
    assert_eq!(nice_domain(0.0, 97.0, 10), (0.0, 100.0));
    assert_eq!(nice_domain(0.0, 1234.0, 10), (0.0, 1300.0));
    assert_eq!(nice_domain(0.0, 0.0, 10), (0.0, 0.0));
    let (start, end) = nice_domain(0.0, 0.97, 10);
    assert_eq!(start, 0.0);
    assert_relative_eq!(end, 1.0, epsilon = 1e-12);
}

#[test]
fn point_scale_spreads_slots_across_the_range() {
    let scale = PointScale::new(["Jan", "Feb", "Mar"], (0.0, 800.0), 0.0).expect("scale");
    assert_eq!(scale.position("Jan"), Some(0.0));
    assert_eq!(scale.position("Feb"), Some(400.0));
    assert_eq!(scale.position("Mar"), Some(800.0));
    assert_eq!(scale.position("Apr"), None);
    assert_eq!(scale.step(), 400.0);
}

#[test]
fn point_scale_centres_a_single_slot() {
    let scale = PointScale::new(["AM_PEAK"], (0.0, 800.0), 0.0).expect("scale");
    assert_eq!(scale.position("AM_PEAK"), Some(400.0));
}

#[test]
fn point_scale_outer_padding_insets_the_ends() {
    let scale = PointScale::new(["a", "b"], (0.0, 300.0), 1.0).expect("scale");
    assert_relative_eq!(scale.position("a").expect("a"), 100.0);
    assert_relative_eq!(scale.position("b").expect("b"), 200.0);
}

#[test]
fn band_scale_matches_padded_layout() {
    let scale = BandScale::new(["AM_PEAK", "PM_PEAK"], (0.0, 100.0), 0.05).expect("scale");
    let step = 100.0 / 2.05;
    assert_relative_eq!(scale.bandwidth(), step * 0.95, epsilon = 1e-9);
    let first = scale.position("AM_PEAK").expect("first band");
    assert_relative_eq!(first, (100.0 - step * 1.95) / 2.0, epsilon = 1e-9);
    assert_relative_eq!(
        scale.position("PM_PEAK").expect("second band") - first,
        step,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        scale.center("AM_PEAK").expect("centre"),
        first + scale.bandwidth() / 2.0,
        epsilon = 1e-9
    );
}

#[test]
fn band_scale_with_reversed_range_puts_first_key_at_the_far_end() {
    let scale = BandScale::new(["a", "b"], (100.0, 0.0), 0.0).expect("scale");
    assert_relative_eq!(scale.position("a").expect("a"), 50.0);
    assert_relative_eq!(scale.position("b").expect("b"), 0.0);
    assert_relative_eq!(scale.bandwidth(), 50.0);
}

#[test]
fn duplicate_scale_keys_are_rejected() {
    let err = BandScale::new(["a", "a"], (0.0, 10.0), 0.0).expect_err("duplicate key");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn linear_scale_maps_and_inverts() {
    let scale = LinearScale::new(0.0, 200.0)
        .expect("scale")
        .with_range(400.0, 0.0)
        .expect("range");
    assert_eq!(scale.map(0.0), 400.0);
    assert_eq!(scale.map(200.0), 0.0);
    assert_eq!(scale.map(50.0), 300.0);
    assert_relative_eq!(scale.invert(300.0), 50.0);
}

#[test]
fn zero_span_linear_scale_maps_to_the_middle() {
    let scale = LinearScale::new(0.0, 0.0)
        .expect("scale")
        .with_range(400.0, 0.0)
        .expect("range");
    assert_eq!(scale.map(0.0), 200.0);
}

#[test]
fn non_finite_domains_are_rejected() {
    assert!(LinearScale::new(0.0, f64::NAN).is_err());
    assert!(LinearScale::new(f64::INFINITY, 1.0).is_err());
}

#[test]
fn plot_scales_reject_empty_viewport() {
    let err = PlotScales::new(["Jan"], (0.0, 1.0), Viewport::new(0, 300), 0.0)
        .expect_err("zero width");
    assert!(matches!(
        err,
        ChartError::InvalidViewport {
            width: 0,
            height: 300
        }
    ));
}

#[test]
fn plot_scales_project_slot_values() {
    let scales =
        PlotScales::new(["Jan", "Feb"], (0.0, 20.0), Viewport::new(200, 100), 0.0).expect("scales");
    assert_eq!(scales.project("Jan", 10.0), Some((0.0, 50.0)));
    assert_eq!(scales.project("Feb", 20.0), Some((200.0, 0.0)));
    assert_eq!(scales.project("Mar", 20.0), None);
}
