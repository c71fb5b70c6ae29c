//! Immediate-mode 2D drawing surface.
//!
//! [`Canvas2D`] mirrors the subset of the HTML canvas 2D context the scenes
//! draw with: rect fills with solid or gradient paint, and stroked paths
//! built from `move_to` / `line_to` / `bezier_curve_to`. Coordinates are
//! logical pixels; implementations apply the device pixel ratio themselves.
//!
//! [`RecordingCanvas`] logs every call as a [`DrawCommand`] so geometry can
//! be inspected without a real surface.

use crate::color::Rgba;
use glam::DVec2;

/// How stroke ends are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// How stroke corners are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

impl LineCap {
    pub fn as_str(self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

impl LineJoin {
    pub fn as_str(self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }
}

/// Stroke color, width and end/corner treatment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl StrokeStyle {
    /// A round-capped, round-joined stroke.
    pub fn new(color: Rgba, width: f64) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Round,
            join: LineJoin::Round,
        }
    }
}

/// A color stop at `offset` in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

/// Gradient between two points (linear) or two circles (radial).
#[derive(Debug, Clone, PartialEq)]
pub enum Gradient {
    Linear {
        from: DVec2,
        to: DVec2,
        stops: Vec<ColorStop>,
    },
    Radial {
        center: DVec2,
        inner_radius: f64,
        outer_radius: f64,
        stops: Vec<ColorStop>,
    },
}

impl Gradient {
    pub fn stops(&self) -> &[ColorStop] {
        match self {
            Gradient::Linear { stops, .. } | Gradient::Radial { stops, .. } => stops,
        }
    }

    /// Gradient parameter at `p`, clamped to [0, 1].
    pub fn parameter_at(&self, p: DVec2) -> f64 {
        let t = match self {
            Gradient::Linear { from, to, .. } => {
                let axis = *to - *from;
                let len2 = axis.length_squared();
                if len2 <= f64::EPSILON {
                    0.0
                } else {
                    (p - *from).dot(axis) / len2
                }
            }
            Gradient::Radial {
                center,
                inner_radius,
                outer_radius,
                ..
            } => {
                let span = outer_radius - inner_radius;
                if span <= f64::EPSILON {
                    1.0
                } else {
                    (p.distance(*center) - inner_radius) / span
                }
            }
        };
        t.clamp(0.0, 1.0)
    }

    /// Color at gradient parameter `t`, interpolating between stops.
    ///
    /// Before the first stop the first color is used, after the last the last.
    pub fn color_at(&self, t: f64) -> Rgba {
        let stops = self.stops();
        let Some(first) = stops.first() else {
            return Rgba::TRANSPARENT;
        };
        if t <= first.offset {
            return first.color;
        }
        for pair in stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                let local = if span <= f64::EPSILON {
                    1.0
                } else {
                    (t - a.offset) / span
                };
                return a.color.lerp(b.color, local);
            }
        }
        stops[stops.len() - 1].color
    }
}

/// Fill source for [`Canvas2D::fill_rect`].
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Gradient(Gradient),
}

/// Minimal immediate-mode drawing interface.
///
/// Object-safe, so scenes draw through `&mut dyn Canvas2D`.
pub trait Canvas2D {
    /// Logical (CSS pixel) size of the surface.
    fn size(&self) -> (f64, f64);

    /// Resizes the backing store to `width * pixel_ratio` by
    /// `height * pixel_ratio` and resets the transform so drawing stays in
    /// logical pixels.
    fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64);

    /// Clears the whole surface to transparent.
    fn clear(&mut self);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: &Paint);

    fn set_stroke(&mut self, style: &StrokeStyle);

    fn begin_path(&mut self);

    fn move_to(&mut self, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64);

    /// Strokes the current path with the current stroke style.
    fn stroke(&mut self);
}

/// One recorded [`Canvas2D`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize {
        width: f64,
        height: f64,
        pixel_ratio: f64,
    },
    Clear,
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        paint: Paint,
    },
    SetStroke(StrokeStyle),
    BeginPath,
    MoveTo(DVec2),
    LineTo(DVec2),
    BezierCurveTo {
        cp1: DVec2,
        cp2: DVec2,
        to: DVec2,
    },
    Stroke,
}

/// A [`Canvas2D`] that only records the calls made on it.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    pixel_ratio: f64,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Drops the recorded commands, keeping the size.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of `stroke()` calls recorded.
    pub fn stroke_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Stroke))
            .count()
    }

    /// Every coordinate passed to a path-building call.
    pub fn path_points(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.commands.iter().flat_map(|c| match c {
            DrawCommand::MoveTo(p) | DrawCommand::LineTo(p) => vec![*p],
            DrawCommand::BezierCurveTo { cp1, cp2, to } => vec![*cp1, *cp2, *to],
            _ => Vec::new(),
        })
    }
}

impl Canvas2D for RecordingCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) {
        self.width = width;
        self.height = height;
        self.pixel_ratio = pixel_ratio;
        self.commands.push(DrawCommand::Resize {
            width,
            height,
            pixel_ratio,
        });
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: &Paint) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            paint: paint.clone(),
        });
    }

    fn set_stroke(&mut self, style: &StrokeStyle) {
        self.commands.push(DrawCommand::SetStroke(*style));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(DVec2::new(x, y)));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(DVec2::new(x, y)));
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.commands.push(DrawCommand::BezierCurveTo {
            cp1: DVec2::new(cp1x, cp1y),
            cp2: DVec2::new(cp2x, cp2y),
            to: DVec2::new(x, y),
        });
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }
}
