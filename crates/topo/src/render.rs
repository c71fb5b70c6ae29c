//! Smoothed stroking of chained contour paths.

use contour_field_core::canvas::{Canvas2D, ColorStop, Gradient, Paint, StrokeStyle};
use contour_field_core::color::Srgb;
use contour_field_core::geometry::{Path, Point};
use glam::DVec2;

/// Catmull-Rom tension; 0 gives straight spans, 1 the classic spline.
pub const TENSION: f64 = 0.5;

/// Control handles never reach further than this fraction of their span.
pub const MAX_HANDLE_RATIO: f64 = 0.5;

/// Bezier control points for the span `p1 -> p2` with neighbors `p0`, `p3`.
pub fn control_points(p0: Point, p1: Point, p2: Point, p3: Point) -> (Point, Point) {
    let max_handle = p1.distance(p2) * MAX_HANDLE_RATIO;
    let h1 = ((p2 - p0) * (TENSION / 3.0)).clamp_length_max(max_handle);
    let h2 = ((p3 - p1) * (TENSION / 3.0)).clamp_length_max(max_handle);
    (p1 + h1, p2 - h2)
}

/// Strokes paths as Catmull-Rom splines approximated by cubic Beziers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurveRenderer;

impl CurveRenderer {
    /// Adds `path` to the canvas' current path as one subpath.
    ///
    /// Two-point paths become a straight line. Longer ones get one Bezier
    /// per span, with end neighbors clamped to the path ends.
    pub fn add_path(&self, canvas: &mut dyn Canvas2D, path: &Path) {
        let pts = path.points();
        let [first, .., last] = pts else {
            return;
        };
        canvas.move_to(first.x, first.y);
        if pts.len() == 2 {
            canvas.line_to(last.x, last.y);
            return;
        }
        let n = pts.len();
        for i in 0..n - 1 {
            let p0 = pts[i.saturating_sub(1)];
            let p1 = pts[i];
            let p2 = pts[i + 1];
            let p3 = pts[(i + 2).min(n - 1)];
            let (c1, c2) = control_points(p0, p1, p2, p3);
            canvas.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p2.x, p2.y);
        }
    }

    /// Strokes every path of one level with a single `stroke()` call.
    pub fn draw_level(&self, canvas: &mut dyn Canvas2D, paths: &[Path], style: &StrokeStyle) {
        if paths.is_empty() {
            return;
        }
        canvas.set_stroke(style);
        canvas.begin_path();
        for path in paths {
            self.add_path(canvas, path);
        }
        canvas.stroke();
    }
}

/// Radial backdrop from the viewport center to its corners.
pub fn background_paint(width: f64, height: f64, inner: Srgb, outer: Srgb) -> Paint {
    Paint::Gradient(Gradient::Radial {
        center: DVec2::new(width * 0.5, height * 0.5),
        inner_radius: 0.0,
        outer_radius: width.hypot(height) * 0.5,
        stops: vec![
            ColorStop {
                offset: 0.0,
                color: inner.into(),
            },
            ColorStop {
                offset: 1.0,
                color: outer.into(),
            },
        ],
    })
}
