//! Marching-squares isoline extraction.
//!
//! Corners are numbered clockwise from the top-left and packed into a 4-bit
//! case code, `tl << 3 | tr << 2 | br << 1 | bl`, where a bit is set when the
//! corner lies above the threshold. Each code maps to zero, one or two
//! edge pairs. Saddles (5 and 10) are not disambiguated with a center
//! sample; both always emit two segments that cut off the two corners below
//! the threshold.

use crate::sampler::ScalarSource;
use contour_field_core::geometry::Segment;
use glam::DVec2;

/// Edge-value differences below this use the midpoint instead of dividing.
pub const FLAT_EDGE_EPSILON: f64 = 1e-10;

/// Most cells walked along one axis. Larger counts are treated as empty.
pub const MAX_CELLS_PER_AXIS: usize = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

use Edge::{Bottom, Left, Right, Top};

/// Edge pairs crossed by the isoline, indexed by case code.
pub const CASES: [&[(Edge, Edge)]; 16] = [
    &[],
    &[(Left, Bottom)],
    &[(Bottom, Right)],
    &[(Left, Right)],
    &[(Top, Right)],
    &[(Left, Top), (Bottom, Right)],
    &[(Top, Bottom)],
    &[(Left, Top)],
    &[(Left, Top)],
    &[(Top, Bottom)],
    &[(Top, Right), (Left, Bottom)],
    &[(Top, Right)],
    &[(Left, Right)],
    &[(Bottom, Right)],
    &[(Left, Bottom)],
    &[],
];

/// Corner samples of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corners {
    pub tl: f64,
    pub tr: f64,
    pub br: f64,
    pub bl: f64,
}

impl Corners {
    /// 4-bit case code for `threshold`.
    pub fn case_code(&self, threshold: f64) -> u8 {
        let bit = |v: f64| u8::from(v > threshold);
        bit(self.tl) << 3 | bit(self.tr) << 2 | bit(self.br) << 1 | bit(self.bl)
    }
}

/// Position of the threshold crossing between `va` and `vb`, in [0, 1].
///
/// A nearly flat edge yields 0.5 instead of dividing by ~0.
pub fn edge_parameter(va: f64, vb: f64, threshold: f64) -> f64 {
    let dv = vb - va;
    if dv.abs() < FLAT_EDGE_EPSILON {
        return 0.5;
    }
    ((threshold - va) / dv).clamp(0.0, 1.0)
}

/// Crossing point on `edge` of the cell with top-left `origin` and side `size`.
///
/// Shared edges are interpolated in the same direction from both neighbors
/// (left to right, top to bottom), so adjacent cells produce bit-identical
/// points.
fn edge_point(edge: Edge, origin: DVec2, size: f64, c: &Corners, threshold: f64) -> DVec2 {
    match edge {
        Top => DVec2::new(origin.x + size * edge_parameter(c.tl, c.tr, threshold), origin.y),
        Bottom => DVec2::new(
            origin.x + size * edge_parameter(c.bl, c.br, threshold),
            origin.y + size,
        ),
        Left => DVec2::new(origin.x, origin.y + size * edge_parameter(c.tl, c.bl, threshold)),
        Right => DVec2::new(
            origin.x + size,
            origin.y + size * edge_parameter(c.tr, c.br, threshold),
        ),
    }
}

/// Appends the segments of one cell to `out`. Returns how many were added.
pub fn march_cell(
    origin: DVec2,
    size: f64,
    corners: &Corners,
    threshold: f64,
    out: &mut Vec<Segment>,
) -> usize {
    let pairs = CASES[corners.case_code(threshold) as usize];
    for &(e1, e2) in pairs {
        out.push(Segment::new(
            edge_point(e1, origin, size, corners, threshold),
            edge_point(e2, origin, size, corners, threshold),
        ));
    }
    pairs.len()
}

/// Walks the viewport in square cells and collects isoline segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourExtractor {
    resolution: f64,
    width: f64,
    height: f64,
}

impl ContourExtractor {
    /// `resolution` is the cell side in pixels and must be positive.
    pub fn new(resolution: f64, width: f64, height: f64) -> Self {
        Self {
            resolution,
            width,
            height,
        }
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Cell columns and rows covering the viewport.
    ///
    /// An axis needing more than [`MAX_CELLS_PER_AXIS`] cells counts as zero,
    /// so a degenerate resolution extracts nothing.
    pub fn cell_counts(&self) -> (usize, usize) {
        let count = |extent: f64| {
            if !(extent.is_finite() && extent > 0.0 && self.resolution > 0.0) {
                return 0;
            }
            let cells = (extent / self.resolution).ceil();
            if cells <= MAX_CELLS_PER_AXIS as f64 {
                cells as usize
            } else {
                0
            }
        };
        (count(self.width), count(self.height))
    }

    /// Segments approximating `source == threshold`, in cell scan order.
    pub fn extract<S: ScalarSource>(&self, source: &S, threshold: f64) -> Vec<Segment> {
        let mut out = Vec::new();
        self.extract_into(source, threshold, &mut out);
        out
    }

    /// Like [`extract`](Self::extract) but appends to a reused buffer.
    ///
    /// Node values are sampled once per row pair rather than four times per
    /// cell.
    pub fn extract_into<S: ScalarSource>(
        &self,
        source: &S,
        threshold: f64,
        out: &mut Vec<Segment>,
    ) {
        let (cols, rows) = self.cell_counts();
        if cols == 0 || rows == 0 {
            return;
        }
        let r = self.resolution;
        let sample_row = |j: usize, row: &mut Vec<f64>| {
            row.clear();
            let y = j as f64 * r;
            row.extend((0..=cols).map(|i| source.value_at(DVec2::new(i as f64 * r, y))));
        };

        let mut upper = Vec::with_capacity(cols + 1);
        let mut lower = Vec::with_capacity(cols + 1);
        sample_row(0, &mut upper);
        for j in 0..rows {
            sample_row(j + 1, &mut lower);
            let y = j as f64 * r;
            for i in 0..cols {
                let corners = Corners {
                    tl: upper[i],
                    tr: upper[i + 1],
                    br: lower[i + 1],
                    bl: lower[i],
                };
                march_cell(DVec2::new(i as f64 * r, y), r, &corners, threshold, out);
            }
            std::mem::swap(&mut upper, &mut lower);
        }
    }
}
