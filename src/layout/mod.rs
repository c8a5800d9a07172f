mod curve;
mod label_placement;
mod reveal;
mod scale;
mod text;

pub use curve::{CubicSegment, Curve, Point, prefix_lengths};
pub(crate) use curve::fmt_coord;
pub use label_placement::{
    LabelConflict, LabelPlacement, TextAnchor, find_label_conflicts, placement_for,
};
pub(crate) use label_placement::format_em;
pub use reveal::{RevealPlan, label_delay, plan_reveal};
pub use scale::{LinearScale, format_currency_tick, format_number_tick};

use crate::config::ChartConfig;
use crate::ir::{Dataset, Side};
use crate::theme::Theme;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointLayout {
    pub year: String,
    pub x: f64,
    pub y: f64,
    pub side: Side,
    pub placement: LabelPlacement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub value: f64,
    /// Pixel offset along the axis, in plot coordinates.
    pub offset: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLayout {
    pub scale: LinearScale,
    pub ticks: Vec<Tick>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
}

/// Everything the renderer needs, in plot coordinates (origin at the
/// top-left of the area inside the margins).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub plot_x: f64,
    pub plot_y: f64,
    pub plot_width: f64,
    pub plot_height: f64,
    pub x_axis: AxisLayout,
    pub y_axis: AxisLayout,
    pub x_title: AxisTitle,
    pub y_title: AxisTitle,
    pub points: Vec<PointLayout>,
    pub curve: Curve,
    pub reveal: RevealPlan,
    pub label_conflicts: Vec<LabelConflict>,
}

pub fn compute_layout(data: &Dataset, theme: &Theme, config: &ChartConfig) -> ChartLayout {
    let plot_width = config.inner_width();
    let plot_height = config.inner_height();
    let ticks = config.tick_count;

    let x_scale = LinearScale::new(data.miles_extent().unwrap_or((0.0, 1.0)), (0.0, plot_width))
        .nice(ticks);
    let y_scale = LinearScale::new(data.gas_extent().unwrap_or((0.0, 1.0)), (plot_height, 0.0))
        .nice(ticks);
    tracing::debug!(x_domain = ?x_scale.domain, y_domain = ?y_scale.domain, "scales");

    let x_step = x_scale.tick_step(ticks);
    let x_axis = AxisLayout {
        scale: x_scale,
        ticks: x_scale
            .ticks(ticks)
            .into_iter()
            .map(|value| Tick {
                value,
                offset: x_scale.apply(value),
                label: format_number_tick(value, x_step),
            })
            .collect(),
    };
    let y_axis = AxisLayout {
        scale: y_scale,
        ticks: y_scale
            .ticks(ticks)
            .into_iter()
            .map(|value| Tick {
                value,
                offset: y_scale.apply(value),
                label: format_currency_tick(value),
            })
            .collect(),
    };

    let points: Vec<PointLayout> = data
        .points
        .iter()
        .map(|p| PointLayout {
            year: p.year.clone(),
            x: x_scale.apply(p.miles),
            y: y_scale.apply(p.gas),
            side: p.side,
            placement: placement_for(p.side),
        })
        .collect();

    let pixels: Vec<Point> = points.iter().map(|p| (p.x, p.y)).collect();
    let curve = Curve::catmull_rom(&pixels);
    let reveal = plan_reveal(&pixels, config.duration_ms);

    let widths: Vec<f64> = points
        .iter()
        .map(|p| text::label_width(&p.year, config.label_font_size, &theme.font_family))
        .collect();
    let label_conflicts =
        find_label_conflicts(&points, &widths, config.label_font_size, config.marker_radius);
    for conflict in &label_conflicts {
        let label = &points[conflict.label].year;
        match (conflict.other_label, conflict.marker) {
            (Some(other), _) => tracing::warn!(
                label = %label,
                other = %points[other].year,
                "labels overlap; consider another side"
            ),
            (None, Some(marker)) => tracing::warn!(
                label = %label,
                marker = %points[marker].year,
                "label covers a marker; consider another side"
            ),
            (None, None) => {}
        }
    }

    ChartLayout {
        width: config.outer_width,
        height: config.outer_height,
        plot_x: config.margin.left,
        plot_y: config.margin.top,
        plot_width,
        plot_height,
        x_axis,
        y_axis,
        x_title: AxisTitle {
            text: config.x_title.clone(),
            x: plot_width + 8.0,
            y: plot_height + 37.0,
            anchor: TextAnchor::End,
        },
        y_title: AxisTitle {
            text: config.y_title.clone(),
            x: -36.0,
            y: -18.0,
            anchor: TextAnchor::Start,
        },
        points,
        curve,
        reveal,
        label_conflicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::DataPoint;
    use approx::assert_relative_eq;

    fn sample() -> Dataset {
        Dataset::new(vec![
            DataPoint::new("1956", 3675.0, 2.38, Side::Left),
            DataPoint::new("1957", 3706.0, 2.40, Side::Right),
            DataPoint::new("1958", 3766.0, 2.26, Side::Bottom),
            DataPoint::new("2005", 10067.0, 2.53, Side::Bottom),
            DataPoint::new("1998", 9590.0, 1.40, Side::Bottom),
            DataPoint::new("2008", 9880.0, 3.31, Side::Bottom),
        ])
    }

    #[test]
    fn points_land_inside_the_plot() {
        let layout = compute_layout(&sample(), &Theme::classic(), &ChartConfig::default());
        assert_eq!(layout.plot_width, 750.0);
        assert_eq!(layout.plot_height, 500.0);
        for point in &layout.points {
            assert!((0.0..=750.0).contains(&point.x), "{point:?}");
            assert!((0.0..=500.0).contains(&point.y), "{point:?}");
        }
        assert_eq!(layout.x_axis.scale.domain, (3500.0, 10500.0));
    }

    #[test]
    fn axes_use_their_formats() {
        let layout = compute_layout(&sample(), &Theme::classic(), &ChartConfig::default());
        let first_x = &layout.x_axis.ticks[0];
        assert_eq!(first_x.label, "3,500");
        assert_relative_eq!(first_x.offset, 0.0);
        assert!(layout.y_axis.ticks.iter().all(|t| t.label.starts_with('$')));
        let bottom = &layout.y_axis.ticks[0];
        assert_relative_eq!(bottom.offset, 500.0, epsilon = 1e-9);
    }

    #[test]
    fn placement_follows_side_tag() {
        let layout = compute_layout(&sample(), &Theme::classic(), &ChartConfig::default());
        assert_eq!(layout.points[0].placement, placement_for(Side::Left));
        assert_eq!(layout.points[1].placement.anchor, TextAnchor::Start);
    }

    #[test]
    fn single_point_layout_is_finite() {
        let data = Dataset::new(vec![DataPoint::new("2000", 10.0, 2.0, Side::Top)]);
        let layout = compute_layout(&data, &Theme::classic(), &ChartConfig::default());
        assert_eq!(layout.points[0].x, 375.0);
        assert_eq!(layout.points[0].y, 250.0);
        assert_eq!(layout.reveal.label_delays_ms, vec![0.0]);
        assert_eq!(layout.y_axis.ticks.len(), 1);
    }
}
