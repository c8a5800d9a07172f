// Per-point label offsets and an advisory overlap check.
// Pure geometry; the SVG side lives in render.rs.

use super::PointLayout;
use crate::ir::Side;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Anchor plus offsets in em; `None` means the attribute is not set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub anchor: TextAnchor,
    pub dx_em: Option<f64>,
    pub dy_em: Option<f64>,
}

pub fn placement_for(side: Side) -> LabelPlacement {
    match side {
        Side::Top => LabelPlacement {
            anchor: TextAnchor::Middle,
            dx_em: None,
            dy_em: Some(-0.7),
        },
        Side::Right => LabelPlacement {
            anchor: TextAnchor::Start,
            dx_em: Some(0.5),
            dy_em: Some(0.32),
        },
        Side::Bottom => LabelPlacement {
            anchor: TextAnchor::Middle,
            dx_em: None,
            dy_em: Some(1.4),
        },
        Side::Left => LabelPlacement {
            anchor: TextAnchor::End,
            dx_em: Some(-0.5),
            dy_em: Some(0.32),
        },
    }
}

pub(crate) fn format_em(value: f64) -> String {
    format!("{value}em")
}

type Rect = (f64, f64, f64, f64);

/// Approximate box of a placed label: (x, y, width, height).
pub(crate) fn label_box(point: &PointLayout, text_width: f64, font_size: f64) -> Rect {
    let placement = point.placement;
    let x = point.x + placement.dx_em.unwrap_or(0.0) * font_size;
    // Baseline sits at y + dy; glyphs rise roughly 0.8em above it.
    let baseline = point.y + placement.dy_em.unwrap_or(0.0) * font_size;
    let top = baseline - font_size * 0.8;
    let left = match placement.anchor {
        TextAnchor::Start => x,
        TextAnchor::Middle => x - text_width / 2.0,
        TextAnchor::End => x - text_width,
    };
    (left, top, text_width, font_size)
}

fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.0 < b.0 + b.2 && a.0 + a.2 > b.0 && a.1 < b.1 + b.3 && a.1 + a.3 > b.1
}

fn marker_box(point: &PointLayout, radius: f64) -> Rect {
    (point.x - radius, point.y - radius, radius * 2.0, radius * 2.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelConflict {
    pub label: usize,
    /// Another label index, or `None` when the label covers a marker.
    pub other_label: Option<usize>,
    pub marker: Option<usize>,
}

/// Reports labels that collide with other labels or with markers.
///
/// Sides are curated input, so this only reports; nothing is moved.
pub fn find_label_conflicts(
    points: &[PointLayout],
    widths: &[f64],
    font_size: f64,
    marker_radius: f64,
) -> Vec<LabelConflict> {
    let boxes: Vec<Rect> = points
        .iter()
        .zip(widths)
        .map(|(point, width)| label_box(point, *width, font_size))
        .collect();
    let mut conflicts = Vec::new();
    for (i, label) in boxes.iter().enumerate() {
        for (j, other) in boxes.iter().enumerate().skip(i + 1) {
            if overlaps(label, other) {
                conflicts.push(LabelConflict {
                    label: i,
                    other_label: Some(j),
                    marker: None,
                });
            }
        }
        for (j, point) in points.iter().enumerate() {
            if overlaps(label, &marker_box(point, marker_radius)) {
                conflicts.push(LabelConflict {
                    label: i,
                    other_label: None,
                    marker: Some(j),
                });
            }
        }
    }
    conflicts
}
