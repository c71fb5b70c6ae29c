//! Geometry shared by the extraction, chaining and rendering stages.
//!
//! Points are `glam::DVec2` in logical viewport pixels.

use glam::DVec2;
use serde::{Deserialize, Serialize};

pub type Point = DVec2;

/// One isoline piece inside a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite()
    }
}

/// An ordered polyline of at least two points.
///
/// A closed isoline is represented with its first and last points
/// coinciding (within the chaining tolerance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    /// Starts a path from a segment.
    pub fn from_segment(seg: &Segment) -> Self {
        Self {
            points: vec![seg.a, seg.b],
        }
    }

    /// Builds a path from points; `None` when fewer than two are given.
    pub fn from_points(points: Vec<Point>) -> Option<Self> {
        (points.len() >= 2).then_some(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a path is never built with fewer than two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn head(&self) -> Point {
        self.points[0]
    }

    pub fn tail(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Reverses the point order in place.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Appends a point after the tail.
    pub fn extend_tail(&mut self, p: Point) {
        self.points.push(p);
    }

    /// Whether the endpoints coincide within `tolerance`.
    pub fn is_closed(&self, tolerance: f64) -> bool {
        self.head().distance_squared(self.tail()) <= tolerance * tolerance
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_requires_two() {
        assert!(Path::from_points(vec![]).is_none());
        assert!(Path::from_points(vec![DVec2::ZERO]).is_none());
        assert!(Path::from_points(vec![DVec2::ZERO, DVec2::ONE]).is_some());
    }

    #[test]
    fn extend_tail_then_reverse() {
        let seg = Segment::new(DVec2::new(1.0, 0.0), DVec2::new(2.0, 0.0));
        let mut path = Path::from_segment(&seg);
        path.extend_tail(DVec2::new(3.0, 0.0));
        assert_eq!(path.len(), 3);
        assert_eq!(path.head(), DVec2::new(1.0, 0.0));
        assert_eq!(path.tail(), DVec2::new(3.0, 0.0));
        path.reverse();
        assert_eq!(path.head(), DVec2::new(3.0, 0.0));
    }

    #[test]
    fn closed_within_tolerance() {
        let path = Path::from_points(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(0.3, 0.0),
        ])
        .unwrap();
        assert!(path.is_closed(0.5));
        assert!(!path.is_closed(0.1));
    }

    #[test]
    fn segment_length_and_finiteness() {
        let seg = Segment::new(DVec2::new(0.0, 0.0), DVec2::new(3.0, 4.0));
        assert_eq!(seg.length(), 5.0);
        assert!(seg.is_finite());
        assert!(!Segment::new(DVec2::new(f64::NAN, 0.0), DVec2::ZERO).is_finite());
    }
}
