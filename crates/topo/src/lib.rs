#![deny(unsafe_code)]
//! Animated topographic contour scene.
//!
//! Each frame the scene regenerates a coarse layered-sinusoid grid for the
//! current simulated time, then for every threshold level runs marching
//! squares over a bilinear (plus pointer ripple) view of that grid, stitches
//! the segments into polylines and strokes them as Catmull-Rom splines over
//! a radial background.
//!
//! ```text
//!   ScalarField --grid--> FieldSampler --value_at--> ContourExtractor
//!        ^                    ^ ripple                    | segments
//!     advance(dt)        PointerState                PathChainer
//!                                                         | paths
//!                                   Canvas2D <------ CurveRenderer
//! ```

pub mod chain;
pub mod level;
pub mod marching;
pub mod params;
pub mod pointer;
pub mod render;
pub mod sampler;
pub mod synth;

use chain::PathChainer;
use contour_field_core::canvas::{Canvas2D, Paint, StrokeStyle};
use contour_field_core::error::FieldError;
use contour_field_core::geometry::{Path, Segment};
use contour_field_core::Scene;
use level::{level_style, levels, Level};
use log::{debug, trace, warn};
use marching::ContourExtractor;
use pointer::PointerState;
use render::{background_paint, CurveRenderer};
use sampler::{FieldSampler, Ripple};
use serde_json::Value;
use synth::ScalarField;

pub use params::TopoParams;

/// The topographic contour scene.
///
/// Construction regenerates the field at `t = 0`, so the scene can be
/// rendered before the first [`advance`](Scene::advance).
#[derive(Debug, Clone)]
pub struct TopoScene {
    params: TopoParams,
    width: f64,
    height: f64,
    time: f64,
    pointer: PointerState,
    field: ScalarField,
    extractor: ContourExtractor,
    chainer: PathChainer,
    levels: Vec<Level>,
    styles: Vec<StrokeStyle>,
    background: Paint,
    segments: Vec<Segment>,
    pool: Vec<Segment>,
    paths: Vec<Path>,
}

/// Largest viewport side, in logical pixels.
pub const MAX_EXTENT: f64 = 16384.0;

/// Non-finite or negative extents collapse to an empty viewport; oversized
/// ones are clamped to [`MAX_EXTENT`].
fn sanitize_extent(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v.min(MAX_EXTENT)
    } else {
        0.0
    }
}

impl TopoScene {
    /// Creates a scene for a `width` x `height` viewport.
    ///
    /// Returns `FieldError::InvalidParam` if `params` fail validation.
    pub fn new(width: f64, height: f64, params: TopoParams) -> Result<Self, FieldError> {
        params.validate()?;
        let width = sanitize_extent(width);
        let height = sanitize_extent(height);
        let mut field = ScalarField::new(width, height, params.cell_size, params.resolution)?;
        field.regenerate(0.0);
        let levels = levels(params.levels, params.level_min, params.level_max);
        let styles = levels
            .iter()
            .map(|l| level_style(l, params.levels, params.hue, params.hue_span))
            .collect();
        Ok(Self {
            params,
            width,
            height,
            time: 0.0,
            pointer: PointerState::default(),
            field,
            extractor: ContourExtractor::new(params.resolution, width, height),
            chainer: PathChainer::new(params.tolerance),
            levels,
            styles,
            background: background_paint(
                width,
                height,
                params.background_inner,
                params.background_outer,
            ),
            segments: Vec::new(),
            pool: Vec::new(),
            paths: Vec::new(),
        })
    }

    /// Creates a scene from a JSON object of parameter overrides.
    pub fn from_json(width: f64, height: f64, params: &Value) -> Result<Self, FieldError> {
        Self::new(width, height, TopoParams::from_json(params))
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Jumps to simulated time `t` and regenerates the field.
    pub fn set_time(&mut self, t: f64) {
        if t.is_finite() {
            self.time = t;
            self.field.regenerate(t);
        }
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn field(&self) -> &ScalarField {
        &self.field
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn topo_params(&self) -> &TopoParams {
        &self.params
    }

    /// The ripple applied this frame, if the pointer is over the surface.
    pub fn ripple(&self) -> Option<Ripple> {
        (self.pointer.active && self.params.pointer_radius > 0.0).then(|| Ripple {
            center: self.pointer.smoothed,
            radius: self.params.pointer_radius,
            amplitude: self.params.ripple_amplitude,
            frequency: self.params.ripple_frequency,
            speed: self.params.ripple_speed,
            time: self.time,
        })
    }

    /// Continuous view of the current field, ripple included.
    pub fn sampler(&self) -> FieldSampler<'_> {
        FieldSampler::new(self.field.grid(), self.field.cell_size()).with_ripple(self.ripple())
    }

    /// Raw marching-squares output for `threshold`.
    pub fn segments(&self, threshold: f64) -> Vec<Segment> {
        self.extractor.extract(&self.sampler(), threshold)
    }

    /// Chained isolines for `threshold` at the current state.
    pub fn trace(&self, threshold: f64) -> Vec<Path> {
        self.chainer.chain(&self.segments(threshold))
    }
}

impl Scene for TopoScene {
    fn resize(&mut self, width: f64, height: f64) {
        let width = sanitize_extent(width);
        let height = sanitize_extent(height);
        if let Err(e) = self.field.resize(width, height) {
            warn!("keeping {}x{} viewport: {e}", self.width, self.height);
            return;
        }
        self.width = width;
        self.height = height;
        self.field.regenerate(self.time);
        self.extractor.set_viewport(width, height);
        self.background = background_paint(
            width,
            height,
            self.params.background_inner,
            self.params.background_outer,
        );
        debug!(
            "topo field resized to {}x{} nodes",
            self.field.grid().width(),
            self.field.grid().height()
        );
    }

    fn advance(&mut self, dt: f64) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.time += dt * self.params.speed;
        self.pointer
            .follow(self.params.follow_active, self.params.follow_inactive);
        self.field.regenerate(self.time);
    }

    fn render(&mut self, canvas: &mut dyn Canvas2D) {
        canvas.clear();
        canvas.fill_rect(0.0, 0.0, self.width, self.height, &self.background);

        let sampler = FieldSampler::new(self.field.grid(), self.field.cell_size())
            .with_ripple(self.ripple());
        let mut total_segments = 0;
        let mut total_paths = 0;
        for (level, style) in self.levels.iter().zip(&self.styles) {
            self.segments.clear();
            self.paths.clear();
            self.extractor
                .extract_into(&sampler, level.threshold, &mut self.segments);
            self.chainer
                .chain_into(&self.segments, &mut self.pool, &mut self.paths);
            CurveRenderer.draw_level(canvas, &self.paths, style);
            total_segments += self.segments.len();
            total_paths += self.paths.len();
        }
        trace!(
            "t={:.3}: {} levels, {total_segments} segments, {total_paths} paths",
            self.time,
            self.levels.len()
        );
    }

    fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer.moved(x, y);
    }

    fn pointer_left(&mut self) {
        self.pointer.left();
    }

    fn params(&self) -> Value {
        self.params.to_json()
    }

    fn param_schema(&self) -> Value {
        TopoParams::schema()
    }
}
