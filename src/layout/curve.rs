//! Centripetal Catmull-Rom curve through an ordered point list.
//!
//! The spline is emitted as one cubic Bézier per pair of neighbouring
//! points, so the same segments drive both the SVG `d` attribute and the
//! arc-length measurement.

use serde::Serialize;
use std::fmt::Write;

const CATMULL_ROM_ALPHA: f64 = 0.5;
const EPSILON: f64 = 1e-12;

// 8-point Gauss-Legendre abscissae/weights on [-1, 1].
const GAUSS_NODES: [f64; 8] = [
    -0.9602898564975363,
    -0.7966664774136267,
    -0.5255324099163290,
    -0.1834346424956498,
    0.1834346424956498,
    0.5255324099163290,
    0.7966664774136267,
    0.9602898564975363,
];
const GAUSS_WEIGHTS: [f64; 8] = [
    0.1012285362903763,
    0.2223810344533745,
    0.3137066458778873,
    0.3626837833783620,
    0.3626837833783620,
    0.3137066458778873,
    0.2223810344533745,
    0.1012285362903763,
];
const SUBDIVISIONS: usize = 16;

pub type Point = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubicSegment {
    pub from: Point,
    pub c1: Point,
    pub c2: Point,
    pub to: Point,
}

impl CubicSegment {
    fn line(from: Point, to: Point) -> Self {
        Self {
            from,
            c1: from,
            c2: to,
            to,
        }
    }

    pub fn point_at(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        (
            a * self.from.0 + b * self.c1.0 + c * self.c2.0 + d * self.to.0,
            a * self.from.1 + b * self.c1.1 + c * self.c2.1 + d * self.to.1,
        )
    }

    fn speed_at(&self, t: f64) -> f64 {
        let mt = 1.0 - t;
        let a = 3.0 * mt * mt;
        let b = 6.0 * mt * t;
        let c = 3.0 * t * t;
        let dx = a * (self.c1.0 - self.from.0) + b * (self.c2.0 - self.c1.0) + c * (self.to.0 - self.c2.0);
        let dy = a * (self.c1.1 - self.from.1) + b * (self.c2.1 - self.c1.1) + c * (self.to.1 - self.c2.1);
        dx.hypot(dy)
    }

    /// Arc length by composite Gauss-Legendre quadrature of the speed.
    pub fn length(&self) -> f64 {
        let h = 1.0 / SUBDIVISIONS as f64;
        let mut total = 0.0;
        for k in 0..SUBDIVISIONS {
            let lo = k as f64 * h;
            let mid = lo + h * 0.5;
            let half = h * 0.5;
            for (node, weight) in GAUSS_NODES.iter().zip(GAUSS_WEIGHTS.iter()) {
                total += weight * half * self.speed_at(mid + half * node);
            }
        }
        total
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    pub start: Option<Point>,
    pub segments: Vec<CubicSegment>,
}

impl Curve {
    pub fn catmull_rom(points: &[Point]) -> Self {
        let Some(&first) = points.first() else {
            return Self {
                start: None,
                segments: Vec::new(),
            };
        };
        let segments = match points.len() {
            1 => Vec::new(),
            2 => vec![CubicSegment::line(points[0], points[1])],
            n => (0..n - 1)
                .map(|i| {
                    let prev = if i > 0 { Some(points[i - 1]) } else { None };
                    let next = points.get(i + 2).copied();
                    catmull_rom_segment(prev, points[i], points[i + 1], next)
                })
                .collect(),
        };
        Self {
            start: Some(first),
            segments,
        }
    }

    pub fn length(&self) -> f64 {
        self.segments
            .iter()
            .map(CubicSegment::length)
            .fold(0.0, |acc, len| acc + len)
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }

    /// SVG path data. A lone point becomes `M x,yZ` so it still renders.
    pub fn to_path_data(&self) -> String {
        let Some(start) = self.start else {
            return String::new();
        };
        let mut d = String::new();
        let _ = write!(d, "M{},{}", fmt_coord(start.0), fmt_coord(start.1));
        if self.segments.is_empty() {
            d.push('Z');
            return d;
        }
        for seg in &self.segments {
            if seg.c1 == seg.from && seg.c2 == seg.to {
                let _ = write!(d, "L{},{}", fmt_coord(seg.to.0), fmt_coord(seg.to.1));
            } else {
                let _ = write!(
                    d,
                    "C{},{},{},{},{},{}",
                    fmt_coord(seg.c1.0),
                    fmt_coord(seg.c1.1),
                    fmt_coord(seg.c2.0),
                    fmt_coord(seg.c2.1),
                    fmt_coord(seg.to.0),
                    fmt_coord(seg.to.1)
                );
            }
        }
        d
    }
}

/// Arc length of the curve drawn through `points[..=i]`, for every `i`.
///
/// Each prefix is a curve of its own: the last segment of a shorter
/// prefix ends with a different tangent than the same stretch of the full
/// curve, which matches how a truncated dataset would be drawn.
pub fn prefix_lengths(points: &[Point]) -> Vec<f64> {
    (0..points.len())
        .map(|i| Curve::catmull_rom(&points[..=i]).length())
        .collect()
}

fn catmull_rom_segment(prev: Option<Point>, p1: Point, p2: Point, next: Option<Point>) -> CubicSegment {
    let l12_2a = knot_distance_2a(p1, p2);
    let l12_a = l12_2a.sqrt();

    let mut c1 = p1;
    if let Some(p0) = prev {
        let l01_2a = knot_distance_2a(p0, p1);
        let l01_a = l01_2a.sqrt();
        if l01_a > EPSILON {
            let a = 2.0 * l01_2a + 3.0 * l01_a * l12_a + l12_2a;
            let n = 3.0 * l01_a * (l01_a + l12_a);
            c1 = (
                (p1.0 * a - p0.0 * l12_2a + p2.0 * l01_2a) / n,
                (p1.1 * a - p0.1 * l12_2a + p2.1 * l01_2a) / n,
            );
        }
    }

    let mut c2 = p2;
    if let Some(p3) = next {
        let l23_2a = knot_distance_2a(p2, p3);
        let l23_a = l23_2a.sqrt();
        if l23_a > EPSILON {
            let b = 2.0 * l23_2a + 3.0 * l23_a * l12_a + l12_2a;
            let m = 3.0 * l23_a * (l23_a + l12_a);
            c2 = (
                (p2.0 * b + p1.0 * l23_2a - p3.0 * l12_2a) / m,
                (p2.1 * b + p1.1 * l23_2a - p3.1 * l12_2a) / m,
            );
        }
    }

    CubicSegment {
        from: p1,
        c1,
        c2,
        to: p2,
    }
}

// |a - b| ^ (2 * alpha)
fn knot_distance_2a(a: Point, b: Point) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).powf(CATMULL_ROM_ALPHA)
}

pub(crate) fn fmt_coord(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_lengths_are_positive_zero() {
        let lone = Curve::catmull_rom(&[(4.0, 5.5)]);
        assert!(lone.length().is_sign_positive());
        let prefixes = prefix_lengths(&[(0.0, 0.0), (300.0, 0.0), (600.0, 0.0)]);
        assert_eq!(prefixes[0], 0.0);
        assert!(prefixes[0].is_sign_positive());
    }

    #[test]
    fn straight_segment_length_is_exact() {
        let curve = Curve::catmull_rom(&[(0.0, 0.0), (3.0, 4.0)]);
        assert_relative_eq!(curve.length(), 5.0, epsilon = 1e-9);
        assert_eq!(curve.to_path_data(), "M0,0L3,4");
    }

    #[test]
    fn collinear_points_stay_on_the_line() {
        let curve = Curve::catmull_rom(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0)]);
        assert_eq!(curve.segments.len(), 3);
        assert_relative_eq!(curve.length(), 30.0, epsilon = 1e-6);
        for seg in &curve.segments {
            assert_relative_eq!(seg.c1.1, 0.0);
            assert_relative_eq!(seg.c2.1, 0.0);
        }
    }

    #[test]
    fn curve_passes_through_every_point() {
        let points = [(0.0, 0.0), (50.0, 40.0), (100.0, 10.0), (160.0, 80.0)];
        let curve = Curve::catmull_rom(&points);
        for (seg, pair) in curve.segments.iter().zip(points.windows(2)) {
            assert_eq!(seg.point_at(0.0), pair[0]);
            let end = seg.point_at(1.0);
            assert_relative_eq!(end.0, pair[1].0, epsilon = 1e-9);
            assert_relative_eq!(end.1, pair[1].1, epsilon = 1e-9);
        }
    }

    #[test]
    fn bent_curve_is_longer_than_its_chords() {
        let points = [(0.0, 0.0), (50.0, 80.0), (100.0, 0.0)];
        let chords = 2.0 * (50.0f64).hypot(80.0);
        let length = Curve::catmull_rom(&points).length();
        assert!(length >= chords - 1e-9, "{length} < {chords}");
        assert!(length < chords * 1.2);
    }

    #[test]
    fn degenerate_inputs() {
        let empty = Curve::catmull_rom(&[]);
        assert!(empty.is_empty());
        assert_eq!(empty.length(), 0.0);
        assert_eq!(empty.to_path_data(), "");

        let single = Curve::catmull_rom(&[(4.0, 5.5)]);
        assert_eq!(single.length(), 0.0);
        assert_eq!(single.to_path_data(), "M4,5.5Z");

        let coincident = Curve::catmull_rom(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]);
        assert_eq!(coincident.length(), 0.0);
    }

    #[test]
    fn prefix_lengths_end_at_total() {
        let points = [(0.0, 500.0), (375.0, 0.0), (750.0, 250.0), (900.0, 100.0)];
        let prefixes = prefix_lengths(&points);
        assert_eq!(prefixes.len(), 4);
        assert_eq!(prefixes[0], 0.0);
        assert_eq!(prefixes[3], Curve::catmull_rom(&points).length());
        assert!(prefixes.windows(2).all(|w| w[0] <= w[1]));
    }
}
