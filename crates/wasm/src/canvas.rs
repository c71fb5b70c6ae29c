//! [`Canvas2D`] over an HTML canvas 2D context.

use contour_field_core::canvas::{Canvas2D, Gradient, Paint, StrokeStyle};
use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement, Window};

/// Device pixel ratio of the window, 1 when unavailable.
pub fn device_pixel_ratio(window: &Window) -> f64 {
    let dpr = window.device_pixel_ratio();
    if dpr.is_finite() && dpr > 0.0 {
        dpr
    } else {
        1.0
    }
}

/// Layout (CSS pixel) size of the canvas element.
pub fn css_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
    (
        f64::from(canvas.client_width().max(0)),
        f64::from(canvas.client_height().max(0)),
    )
}

/// Pointer coordinate from an event: the fractional CSS-pixel value when the
/// browser reports one, else the integer one `web-sys` exposes.
pub fn event_coordinate(fractional: Option<f64>, whole: i32) -> f64 {
    fractional
        .filter(|v| v.is_finite())
        .unwrap_or_else(|| f64::from(whole))
}

/// Backing store size for a CSS size at `pixel_ratio`.
pub fn backing_size(width: f64, height: f64, pixel_ratio: f64) -> (u32, u32) {
    let px = |v: f64| {
        let v = (v * pixel_ratio).round();
        if v.is_finite() && v > 0.0 {
            v.min(u32::MAX as f64) as u32
        } else {
            0
        }
    };
    (px(width), px(height))
}

/// Drawing surface backed by a `<canvas>` element.
///
/// The backing store is sized in device pixels while the context transform
/// keeps every drawing call in CSS pixels. Layout size is left to the page.
pub struct WebCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl WebCanvas {
    /// Acquires the 2D context and sizes the backing store.
    ///
    /// Returns `None` if the element has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, window: &Window) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        let mut surface = Self {
            canvas,
            ctx,
            width: 0.0,
            height: 0.0,
        };
        let (w, h) = css_size(&surface.canvas);
        surface.resize(w, h, device_pixel_ratio(window));
        Some(surface)
    }

    fn gradient(&self, gradient: &Gradient) -> Option<CanvasGradient> {
        let g = match gradient {
            Gradient::Linear { from, to, .. } => {
                self.ctx.create_linear_gradient(from.x, from.y, to.x, to.y)
            }
            Gradient::Radial {
                center,
                inner_radius,
                outer_radius,
                ..
            } => self
                .ctx
                .create_radial_gradient(
                    center.x,
                    center.y,
                    *inner_radius,
                    center.x,
                    center.y,
                    *outer_radius,
                )
                .map_err(|e| warn!("radial gradient rejected: {e:?}"))
                .ok()?,
        };
        for stop in gradient.stops() {
            let offset = stop.offset.clamp(0.0, 1.0) as f32;
            if let Err(e) = g.add_color_stop(offset, &stop.color.to_css()) {
                warn!("color stop rejected: {e:?}");
            }
        }
        Some(g)
    }
}

impl Canvas2D for WebCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) {
        let (bw, bh) = backing_size(width, height, pixel_ratio);
        self.canvas.set_width(bw);
        self.canvas.set_height(bh);
        self.width = width;
        self.height = height;
        // Setting the size resets the context state, transform included.
        if let Err(e) = self
            .ctx
            .set_transform(pixel_ratio, 0.0, 0.0, pixel_ratio, 0.0, 0.0)
        {
            warn!("set_transform failed: {e:?}");
        }
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: &Paint) {
        match paint {
            Paint::Solid(c) => self.ctx.set_fill_style_str(&c.to_css()),
            Paint::Gradient(g) => match self.gradient(g) {
                Some(g) => self.ctx.set_fill_style_canvas_gradient(&g),
                None => return,
            },
        }
        self.ctx.fill_rect(x, y, width, height);
    }

    fn set_stroke(&mut self, style: &StrokeStyle) {
        self.ctx.set_stroke_style_str(&style.color.to_css());
        self.ctx.set_line_width(style.width);
        self.ctx.set_line_cap(style.cap.as_str());
        self.ctx.set_line_join(style.join.as_str());
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.ctx.bezier_curve_to(cp1x, cp1y, cp2x, cp2y, x, y);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }
}
