use super::curve::{Curve, Point, prefix_lengths};
use serde::Serialize;

/// Timing of the draw-on animation: the path's dash array grows linearly
/// over `duration_ms`, and each label fades in once the drawing front
/// reaches its point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevealPlan {
    pub total_length: f64,
    pub duration_ms: f64,
    pub partial_lengths: Vec<f64>,
    pub label_delays_ms: Vec<f64>,
}

impl RevealPlan {
    /// Dash array before the animation starts: all gap.
    pub fn initial_dasharray(&self) -> (f64, f64) {
        (0.0, self.total_length)
    }

    /// Dash array once the animation finishes: all dash.
    pub fn final_dasharray(&self) -> (f64, f64) {
        (self.total_length, self.total_length)
    }

    /// A zero-length curve has nothing to draw, so it shows at once.
    pub fn is_instant(&self) -> bool {
        self.total_length <= 0.0 || self.duration_ms <= 0.0
    }
}

pub fn plan_reveal(points: &[Point], duration_ms: f64) -> RevealPlan {
    let total_length = Curve::catmull_rom(points).length();
    let partial_lengths = prefix_lengths(points);
    let label_delays_ms = partial_lengths
        .iter()
        .map(|partial| label_delay(*partial, total_length, duration_ms))
        .collect();
    tracing::debug!(
        total_length,
        points = points.len(),
        duration_ms,
        "planned path reveal"
    );
    RevealPlan {
        total_length,
        duration_ms,
        partial_lengths,
        label_delays_ms,
    }
}

pub fn label_delay(partial_length: f64, total_length: f64, duration_ms: f64) -> f64 {
    if !(total_length > 0.0) {
        return 0.0;
    }
    let delay = partial_length / total_length * duration_ms;
    // Keep -0.0 out of the markup.
    if delay <= 0.0 { 0.0 } else { delay }
}
