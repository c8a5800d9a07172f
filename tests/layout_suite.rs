use std::path::Path;

use connected_scatter::{ChartConfig, Theme, compute_layout, parse_csv, render_svg};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
    assert!(!svg.contains("NaN"), "{fixture}: NaN in markup");
}

fn fixture_path(rel: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel)
}

fn render_fixture(path: &Path) -> String {
    let input = std::fs::read_to_string(path).expect("fixture read failed");
    let data = parse_csv(&input).expect("parse failed");
    let theme = Theme::classic();
    let config = ChartConfig::default();
    let layout = compute_layout(&data, &theme, &config);
    render_svg(&layout, &theme, &config)
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = [
        "driving.csv",
        "reordered_columns.csv",
        "single_point.csv",
        "three_points.csv",
    ];

    for rel in candidates {
        let path = fixture_path(rel);
        assert!(path.exists(), "fixture missing: {}", rel);
        let svg = render_fixture(&path);
        assert_valid_svg(&svg, rel);
    }
}

#[test]
fn driving_dataset_reveals_in_order() {
    let input = std::fs::read_to_string(fixture_path("driving.csv")).expect("fixture read failed");
    let data = parse_csv(&input).expect("parse failed");
    assert_eq!(data.len(), 55);

    let layout = compute_layout(&data, &Theme::classic(), &ChartConfig::default());
    let plan = &layout.reveal;
    assert_eq!(plan.label_delays_ms.len(), 55);
    assert_eq!(plan.label_delays_ms[0], 0.0);
    assert_eq!(plan.label_delays_ms[54], 5000.0);
    assert_eq!(plan.partial_lengths[54], plan.total_length);
    assert!(
        plan.partial_lengths.windows(2).all(|w| w[0] <= w[1]),
        "partial lengths must not shrink"
    );
    assert_eq!(layout.x_axis.scale.domain, (3500.0, 10500.0));
}

#[test]
fn every_label_gets_a_halo() {
    let svg = render_fixture(&fixture_path("driving.csv"));
    // One outline per data label plus one per axis title.
    assert_eq!(svg.matches("stroke-linejoin=\"round\"").count(), 55 + 2);
    assert_eq!(svg.matches("attributeName=\"fill-opacity\"").count(), 55);
}

#[test]
fn three_point_delays_match_the_drawing_front() {
    let svg = render_fixture(&fixture_path("three_points.csv"));
    assert!(svg.contains("begin=\"5000ms\""));
    let data = parse_csv(&std::fs::read_to_string(fixture_path("three_points.csv")).unwrap())
        .unwrap();
    let layout = compute_layout(&data, &Theme::classic(), &ChartConfig::default());
    assert_eq!(layout.reveal.label_delays_ms[0], 0.0);
    assert_eq!(layout.reveal.label_delays_ms[2], 5000.0);
}

#[test]
fn single_point_is_shown_at_once() {
    let data = parse_csv(&std::fs::read_to_string(fixture_path("single_point.csv")).unwrap())
        .unwrap();
    let layout = compute_layout(&data, &Theme::classic(), &ChartConfig::default());
    assert_eq!(layout.reveal.total_length, 0.0);
    assert_eq!(layout.reveal.label_delays_ms, vec![0.0]);
}
