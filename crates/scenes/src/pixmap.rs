//! CPU rasterizer implementing [`Canvas2D`].
//!
//! Pixels are stored as premultiplied RGBA `f32`. Drawing coordinates are
//! logical pixels; the backing store is `pixel_ratio` times larger in each
//! direction, mirroring how a browser canvas is sized for high-DPI screens.
//!
//! Strokes are rasterized into a coverage mask first (maximum over all
//! pieces of the current path), then composited once, so overlapping
//! pieces of one stroke do not darken where they meet. Every stroke is
//! drawn with round caps and joins.

use contour_field_core::canvas::{Canvas2D, Paint, StrokeStyle};
use contour_field_core::color::Rgba;
use contour_field_core::error::FieldError;
use glam::DVec2;

/// Flattening step for Bezier curves, in device pixels.
const FLATTEN_STEP: f64 = 2.0;
/// Upper bound on line pieces per Bezier curve.
const MAX_FLATTEN_PIECES: usize = 64;

/// Inclusive-exclusive pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelRect {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl PixelRect {
    fn union(self, other: PixelRect) -> PixelRect {
        PixelRect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// Software canvas with a premultiplied RGBA float buffer.
#[derive(Debug, Clone)]
pub struct Pixmap {
    width: f64,
    height: f64,
    pixel_ratio: f64,
    device_width: usize,
    device_height: usize,
    data: Vec<[f32; 4]>,
    stroke_style: Option<StrokeStyle>,
    subpaths: Vec<Vec<DVec2>>,
    mask: Vec<f32>,
}

fn device_extent(logical: f64, ratio: f64) -> Option<usize> {
    let v = (logical * ratio).round();
    if v.is_finite() && v >= 1.0 && v <= u32::MAX as f64 {
        Some(v as usize)
    } else {
        None
    }
}

impl Pixmap {
    /// Creates a transparent pixmap of `width` x `height` logical pixels.
    ///
    /// Returns `FieldError::InvalidDimensions` if the backing size is empty,
    /// non-finite or does not fit in `u32`.
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Result<Self, FieldError> {
        let (dw, dh) = match (
            device_extent(width, pixel_ratio),
            device_extent(height, pixel_ratio),
        ) {
            (Some(w), Some(h)) if pixel_ratio > 0.0 => (w, h),
            _ => return Err(FieldError::InvalidDimensions),
        };
        let len = dw.checked_mul(dh).ok_or(FieldError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            pixel_ratio,
            device_width: dw,
            device_height: dh,
            data: vec![[0.0; 4]; len],
            stroke_style: None,
            subpaths: Vec::new(),
            mask: vec![0.0; len],
        })
    }

    /// Backing store size in device pixels.
    pub fn device_size(&self) -> (usize, usize) {
        (self.device_width, self.device_height)
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Straight-alpha color of device pixel `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.device_width || y >= self.device_height {
            return None;
        }
        Some(unpremultiply(self.data[y * self.device_width + x]))
    }

    /// Row-major RGBA8 bytes with straight alpha, `4 * w * h` long.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.data
            .iter()
            .flat_map(|&px| {
                let c = unpremultiply(px);
                [c.r, c.g, c.b, c.a].map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            })
            .collect()
    }

    fn to_device(&self, p: DVec2) -> DVec2 {
        p * self.pixel_ratio
    }

    /// Pixels whose centers may lie within `pad` of the box `[lo, hi]`.
    fn clip_rect(&self, lo: DVec2, hi: DVec2, pad: f64) -> Option<PixelRect> {
        let lo = lo - DVec2::splat(pad);
        let hi = hi + DVec2::splat(pad);
        if !(lo.is_finite() && hi.is_finite()) {
            return None;
        }
        let x0 = lo.x.floor().max(0.0) as usize;
        let y0 = lo.y.floor().max(0.0) as usize;
        let x1 = (hi.x.ceil().max(0.0) as usize).min(self.device_width);
        let y1 = (hi.y.ceil().max(0.0) as usize).min(self.device_height);
        (x0 < x1 && y0 < y1).then_some(PixelRect { x0, y0, x1, y1 })
    }

    fn blend(&mut self, index: usize, color: Rgba, coverage: f64) {
        let a = (color.a * coverage).clamp(0.0, 1.0) as f32;
        if a <= 0.0 {
            return;
        }
        let src = [
            color.r as f32 * a,
            color.g as f32 * a,
            color.b as f32 * a,
            a,
        ];
        let dst = &mut self.data[index];
        for c in 0..4 {
            dst[c] = src[c] + dst[c] * (1.0 - a);
        }
    }

    fn current_point(&mut self) -> Option<&mut Vec<DVec2>> {
        self.subpaths.last_mut().filter(|sp| !sp.is_empty())
    }

    /// Accumulates the coverage of one thick segment into the mask.
    fn cover_segment(&mut self, a: DVec2, b: DVec2, half_width: f64) -> Option<PixelRect> {
        let rect = self.clip_rect(a.min(b), a.max(b), half_width + 1.0)?;
        let ab = b - a;
        let len2 = ab.length_squared();
        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let t = if len2 > 0.0 {
                    ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let d = p.distance(a + ab * t);
                let coverage = (half_width + 0.5 - d).clamp(0.0, 1.0) as f32;
                let m = &mut self.mask[y * self.device_width + x];
                if coverage > *m {
                    *m = coverage;
                }
            }
        }
        Some(rect)
    }
}

fn unpremultiply(px: [f32; 4]) -> Rgba {
    let a = px[3] as f64;
    if a <= 0.0 {
        return Rgba::TRANSPARENT;
    }
    Rgba {
        r: px[0] as f64 / a,
        g: px[1] as f64 / a,
        b: px[2] as f64 / a,
        a,
    }
}

impl Canvas2D for Pixmap {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Reallocates the backing store. Invalid sizes keep the current one.
    fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) {
        if let Ok(resized) = Pixmap::new(width, height, pixel_ratio) {
            *self = Pixmap {
                stroke_style: self.stroke_style,
                ..resized
            };
        }
    }

    fn clear(&mut self) {
        self.data.fill([0.0; 4]);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: &Paint) {
        let lo = self.to_device(DVec2::new(x, y));
        let hi = self.to_device(DVec2::new(x + width, y + height));
        let Some(rect) = self.clip_rect(lo.min(hi), lo.max(hi), 0.0) else {
            return;
        };
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        for py in rect.y0..rect.y1 {
            for px in rect.x0..rect.x1 {
                let center = DVec2::new(px as f64 + 0.5, py as f64 + 0.5);
                if center.x < lo.x || center.x >= hi.x || center.y < lo.y || center.y >= hi.y {
                    continue;
                }
                let color = match paint {
                    Paint::Solid(c) => *c,
                    Paint::Gradient(g) => {
                        g.color_at(g.parameter_at(center / self.pixel_ratio))
                    }
                };
                self.blend(py * self.device_width + px, color, 1.0);
            }
        }
    }

    fn set_stroke(&mut self, style: &StrokeStyle) {
        self.stroke_style = Some(*style);
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.subpaths.push(vec![DVec2::new(x, y)]);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let p = DVec2::new(x, y);
        match self.current_point() {
            Some(sp) => sp.push(p),
            None => self.subpaths.push(vec![p]),
        }
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        let ratio = self.pixel_ratio;
        let (c1, c2, end) = (
            DVec2::new(cp1x, cp1y),
            DVec2::new(cp2x, cp2y),
            DVec2::new(x, y),
        );
        let Some(sp) = self.current_point() else {
            self.subpaths.push(vec![end]);
            return;
        };
        let start = sp[sp.len() - 1];
        let hull = (start.distance(c1) + c1.distance(c2) + c2.distance(end)) * ratio;
        let pieces = if hull.is_finite() {
            ((hull / FLATTEN_STEP).ceil() as usize).clamp(1, MAX_FLATTEN_PIECES)
        } else {
            1
        };
        for k in 1..=pieces {
            let t = k as f64 / pieces as f64;
            let u = 1.0 - t;
            sp.push(
                start * (u * u * u)
                    + c1 * (3.0 * u * u * t)
                    + c2 * (3.0 * u * t * t)
                    + end * (t * t * t),
            );
        }
    }

    fn stroke(&mut self) {
        let Some(style) = self.stroke_style else {
            return;
        };
        let half_width = (style.width * self.pixel_ratio * 0.5).max(0.0);
        if !half_width.is_finite() {
            return;
        }
        let subpaths = std::mem::take(&mut self.subpaths);
        let mut touched: Option<PixelRect> = None;
        for sp in &subpaths {
            let device: Vec<DVec2> = sp.iter().map(|&p| self.to_device(p)).collect();
            let pieces: Vec<(DVec2, DVec2)> = match device.as_slice() {
                [only] => vec![(*only, *only)],
                pts => pts.windows(2).map(|w| (w[0], w[1])).collect(),
            };
            for (a, b) in pieces {
                if let Some(r) = self.cover_segment(a, b, half_width) {
                    touched = Some(touched.map_or(r, |t| t.union(r)));
                }
            }
        }
        self.subpaths = subpaths;

        let Some(rect) = touched else {
            return;
        };
        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                let i = y * self.device_width + x;
                let coverage = std::mem::take(&mut self.mask[i]);
                if coverage > 0.0 {
                    self.blend(i, style.color, coverage as f64);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contour_field_core::canvas::{ColorStop, Gradient};

    const RED: Rgba = Rgba {
        r: 1.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    const HALF_BLUE: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 1.0,
        a: 0.5,
    };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn new_rejects_degenerate_sizes() {
        assert!(matches!(
            Pixmap::new(0.0, 10.0, 1.0),
            Err(FieldError::InvalidDimensions)
        ));
        assert!(Pixmap::new(10.0, f64::NAN, 1.0).is_err());
        assert!(Pixmap::new(10.0, 10.0, 0.0).is_err());
    }

    #[test]
    fn backing_store_scales_with_pixel_ratio() {
        let pm = Pixmap::new(40.0, 30.0, 2.0).unwrap();
        assert_eq!(pm.device_size(), (80, 60));
        assert_eq!(pm.size(), (40.0, 30.0));
        assert_eq!(pm.to_rgba8().len(), 80 * 60 * 4);
    }

    #[test]
    fn resize_reallocates_and_keeps_stroke_style() {
        let mut pm = Pixmap::new(10.0, 10.0, 1.0).unwrap();
        pm.set_stroke(&StrokeStyle::new(RED, 2.0));
        pm.resize(20.0, 5.0, 3.0);
        assert_eq!(pm.device_size(), (60, 15));
        assert_eq!(pm.stroke_style, Some(StrokeStyle::new(RED, 2.0)));
        pm.resize(0.0, 5.0, 1.0);
        assert_eq!(pm.device_size(), (60, 15));
    }

    #[test]
    fn solid_fill_covers_rect_only() {
        let mut pm = Pixmap::new(10.0, 10.0, 1.0).unwrap();
        pm.fill_rect(2.0, 2.0, 4.0, 4.0, &Paint::Solid(RED));
        assert_eq!(pm.pixel(3, 3), Some(RED));
        assert_eq!(pm.pixel(7, 7), Some(Rgba::TRANSPARENT));
        assert_eq!(pm.pixel(10, 0), None);
    }

    #[test]
    fn source_over_blends_translucent_paint() {
        let mut pm = Pixmap::new(4.0, 4.0, 1.0).unwrap();
        pm.fill_rect(0.0, 0.0, 4.0, 4.0, &Paint::Solid(RED));
        pm.fill_rect(0.0, 0.0, 4.0, 4.0, &Paint::Solid(HALF_BLUE));
        let c = pm.pixel(1, 1).unwrap();
        assert!(close(c.r, 0.5) && close(c.b, 0.5) && close(c.a, 1.0), "{c:?}");
    }

    #[test]
    fn clear_makes_everything_transparent() {
        let mut pm = Pixmap::new(4.0, 4.0, 1.0).unwrap();
        pm.fill_rect(0.0, 0.0, 4.0, 4.0, &Paint::Solid(RED));
        pm.clear();
        assert!(pm.to_rgba8().iter().all(|&b| b == 0));
    }

    #[test]
    fn radial_gradient_runs_inner_to_outer() {
        let mut pm = Pixmap::new(20.0, 20.0, 1.0).unwrap();
        let paint = Paint::Gradient(Gradient::Radial {
            center: DVec2::new(10.0, 10.0),
            inner_radius: 0.0,
            outer_radius: 10.0,
            stops: vec![
                ColorStop {
                    offset: 0.0,
                    color: RED,
                },
                ColorStop {
                    offset: 1.0,
                    color: Rgba {
                        r: 0.0,
                        g: 0.0,
                        b: 1.0,
                        a: 1.0,
                    },
                },
            ],
        });
        pm.fill_rect(0.0, 0.0, 20.0, 20.0, &paint);
        let center = pm.pixel(10, 10).unwrap();
        let corner = pm.pixel(0, 0).unwrap();
        assert!(center.r > 0.9 && center.b < 0.1);
        assert!(corner.b > 0.99 && corner.r < 0.01);
    }

    #[test]
    fn horizontal_stroke_is_antialiased_around_its_center() {
        let mut pm = Pixmap::new(20.0, 20.0, 1.0).unwrap();
        pm.set_stroke(&StrokeStyle::new(RED, 3.0));
        pm.begin_path();
        pm.move_to(2.0, 10.0);
        pm.line_to(18.0, 10.0);
        pm.stroke();
        // rows 9 and 10 straddle y = 10
        assert!(close(pm.pixel(10, 9).unwrap().a, 1.0));
        assert!(close(pm.pixel(10, 10).unwrap().a, 1.0));
        assert_eq!(pm.pixel(10, 14).unwrap().a, 0.0);
        let edge = pm.pixel(10, 11).unwrap().a;
        assert!(edge > 0.0 && edge < 1.0, "edge alpha {edge}");
    }

    #[test]
    fn overlapping_pieces_do_not_double_blend() {
        let mut pm = Pixmap::new(20.0, 20.0, 1.0).unwrap();
        pm.set_stroke(&StrokeStyle::new(HALF_BLUE, 4.0));
        pm.begin_path();
        pm.move_to(2.0, 10.0);
        pm.line_to(18.0, 10.0);
        pm.move_to(10.0, 2.0);
        pm.line_to(10.0, 18.0);
        pm.stroke();
        let crossing = pm.pixel(10, 10).unwrap().a;
        let arm = pm.pixel(4, 10).unwrap().a;
        assert!(close(crossing, 0.5) && close(arm, 0.5));
    }

    #[test]
    fn stroke_without_style_draws_nothing() {
        let mut pm = Pixmap::new(10.0, 10.0, 1.0).unwrap();
        pm.begin_path();
        pm.move_to(0.0, 5.0);
        pm.line_to(10.0, 5.0);
        pm.stroke();
        assert!(pm.to_rgba8().iter().all(|&b| b == 0));
    }

    #[test]
    fn bezier_is_flattened_through_its_endpoint() {
        let mut pm = Pixmap::new(40.0, 40.0, 1.0).unwrap();
        pm.begin_path();
        pm.move_to(0.0, 0.0);
        pm.bezier_curve_to(10.0, 30.0, 30.0, 30.0, 40.0, 0.0);
        let sp = &pm.subpaths[0];
        assert!(sp.len() > 4);
        assert_eq!(*sp.last().unwrap(), DVec2::new(40.0, 0.0));
        // the curve bulges toward the control points
        assert!(sp.iter().any(|p| p.y > 15.0));
    }

    #[test]
    fn stroke_scales_with_pixel_ratio() {
        let mut pm = Pixmap::new(10.0, 10.0, 2.0).unwrap();
        pm.set_stroke(&StrokeStyle::new(RED, 1.0));
        pm.begin_path();
        pm.move_to(0.0, 5.0);
        pm.line_to(10.0, 5.0);
        pm.stroke();
        // logical y = 5 is device y = 10; width 1 logical = 2 device rows
        assert!(close(pm.pixel(10, 9).unwrap().a, 1.0));
        assert!(close(pm.pixel(10, 10).unwrap().a, 1.0));
        assert_eq!(pm.pixel(10, 13).unwrap().a, 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn strokes_never_leave_alpha_out_of_range(
                pts in prop::collection::vec((-10.0_f64..40.0, -10.0_f64..40.0), 2..8),
                width in 0.1_f64..6.0,
                alpha in 0.0_f64..1.0,
            ) {
                let mut pm = Pixmap::new(30.0, 30.0, 1.0).unwrap();
                pm.set_stroke(&StrokeStyle::new(Rgba { r: 0.2, g: 0.4, b: 0.6, a: alpha }, width));
                pm.begin_path();
                pm.move_to(pts[0].0, pts[0].1);
                for &(x, y) in &pts[1..] {
                    pm.line_to(x, y);
                }
                pm.stroke();
                pm.stroke();
                for y in 0..30 {
                    for x in 0..30 {
                        let a = pm.pixel(x, y).unwrap().a;
                        prop_assert!((0.0..=1.0 + 1e-6).contains(&a));
                    }
                }
                prop_assert!(pm.mask.iter().all(|&m| m == 0.0));
            }
        }
    }
}
