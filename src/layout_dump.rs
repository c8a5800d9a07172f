use crate::layout::{ChartLayout, LabelConflict, TextAnchor};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f64,
    pub height: f64,
    pub plot: [f64; 4],
    pub x_domain: [f64; 2],
    pub y_domain: [f64; 2],
    pub x_ticks: Vec<String>,
    pub y_ticks: Vec<String>,
    pub path: String,
    pub total_length: f64,
    pub duration_ms: f64,
    pub points: Vec<PointDump>,
    pub label_conflicts: Vec<LabelConflict>,
}

#[derive(Debug, Serialize)]
pub struct PointDump {
    pub year: String,
    pub x: f64,
    pub y: f64,
    pub side: String,
    pub anchor: TextAnchor,
    pub dx_em: Option<f64>,
    pub dy_em: Option<f64>,
    pub partial_length: f64,
    pub delay_ms: f64,
}

impl LayoutDump {
    pub fn from_layout(layout: &ChartLayout) -> Self {
        let plan = &layout.reveal;
        let points = layout
            .points
            .iter()
            .enumerate()
            .map(|(idx, point)| PointDump {
                year: point.year.clone(),
                x: point.x,
                y: point.y,
                side: point.side.to_string(),
                anchor: point.placement.anchor,
                dx_em: point.placement.dx_em,
                dy_em: point.placement.dy_em,
                partial_length: plan.partial_lengths.get(idx).copied().unwrap_or(0.0),
                delay_ms: plan.label_delays_ms.get(idx).copied().unwrap_or(0.0),
            })
            .collect();

        let x_domain = layout.x_axis.scale.domain;
        let y_domain = layout.y_axis.scale.domain;
        LayoutDump {
            width: layout.width,
            height: layout.height,
            plot: [
                layout.plot_x,
                layout.plot_y,
                layout.plot_width,
                layout.plot_height,
            ],
            x_domain: [x_domain.0, x_domain.1],
            y_domain: [y_domain.0, y_domain.1],
            x_ticks: layout.x_axis.ticks.iter().map(|t| t.label.clone()).collect(),
            y_ticks: layout.y_axis.ticks.iter().map(|t| t.label.clone()).collect(),
            path: layout.curve.to_path_data(),
            total_length: plan.total_length,
            duration_ms: plan.duration_ms,
            points,
            label_conflicts: layout.label_conflicts.clone(),
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &ChartLayout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    tracing::info!(path = %path.display(), "wrote layout dump");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::ir::{DataPoint, Dataset, Side};
    use crate::layout::compute_layout;
    use crate::theme::Theme;

    #[test]
    fn dump_carries_delays_per_point() {
        let data = Dataset::new(vec![
            DataPoint::new("2000", 0.0, 1.0, Side::Top),
            DataPoint::new("2010", 100.0, 1.5, Side::Left),
        ]);
        let layout = compute_layout(&data, &Theme::classic(), &ChartConfig::default());
        let dump = LayoutDump::from_layout(&layout);
        assert_eq!(dump.points.len(), 2);
        assert_eq!(dump.points[0].delay_ms, 0.0);
        assert_eq!(dump.points[1].delay_ms, 5000.0);
        assert_eq!(dump.points[1].side, "left");
        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["points"][1]["anchor"], "end");
        assert!(json["path"].as_str().unwrap().starts_with('M'));
    }
}
