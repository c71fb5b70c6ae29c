//! Layered sinusoidal scalar field sampled onto the coarse grid.
//!
//! Each octave is `sin(a·p·s + t·fa + φa) · cos(b·p·s + t·fb + φb) · w`
//! with unit directions `a`, `b`. The weights sum to one, so the base field
//! always lies in [-1, 1] and needs no gradient noise to look organic.

use contour_field_core::error::FieldError;
use contour_field_core::field::Field;
use glam::DVec2;

struct Octave {
    dir_a: DVec2,
    dir_b: DVec2,
    spatial: f64,
    temporal_a: f64,
    temporal_b: f64,
    phase_a: f64,
    phase_b: f64,
    weight: f64,
}

const OCTAVES: [Octave; 4] = [
    Octave {
        dir_a: DVec2::new(1.0, 0.0),
        dir_b: DVec2::new(0.0, 1.0),
        spatial: 0.0068,
        temporal_a: 0.31,
        temporal_b: -0.23,
        phase_a: 0.0,
        phase_b: 0.0,
        weight: 0.45,
    },
    Octave {
        dir_a: DVec2::new(0.6, 0.8),
        dir_b: DVec2::new(0.8, -0.6),
        spatial: 0.0105,
        temporal_a: 0.47,
        temporal_b: -0.19,
        phase_a: 1.3,
        phase_b: 0.4,
        weight: 0.30,
    },
    Octave {
        dir_a: DVec2::new(-0.28, 0.96),
        dir_b: DVec2::new(0.96, 0.28),
        spatial: 0.0197,
        temporal_a: -0.61,
        temporal_b: 0.53,
        phase_a: 2.1,
        phase_b: 5.2,
        weight: 0.15,
    },
    Octave {
        dir_a: DVec2::new(0.707_106_781_186_547_6, -0.707_106_781_186_547_6),
        dir_b: DVec2::new(0.707_106_781_186_547_6, 0.707_106_781_186_547_6),
        spatial: 0.0311,
        temporal_a: 0.83,
        temporal_b: -0.71,
        phase_a: 0.7,
        phase_b: 3.9,
        weight: 0.10,
    },
];

/// Base field value at `p` (pixels) and simulated time `t` (seconds).
pub fn base_value(p: DVec2, t: f64) -> f64 {
    OCTAVES
        .iter()
        .map(|o| {
            let u = p.dot(o.dir_a) * o.spatial + t * o.temporal_a + o.phase_a;
            let v = p.dot(o.dir_b) * o.spatial + t * o.temporal_b + o.phase_b;
            u.sin() * v.cos() * o.weight
        })
        .sum()
}

/// Upper bound of `|base_value|`.
pub fn amplitude_bound() -> f64 {
    OCTAVES.iter().map(|o| o.weight).sum()
}

/// Owns the coarse grid and regenerates it in place every frame.
///
/// The grid has one node every `cell_size` pixels. It covers every corner the
/// contour extractor visits, which lie on a `resolution` lattice that may run
/// past the viewport, plus one spare node so the last cell interpolates
/// between real nodes.
#[derive(Debug, Clone)]
pub struct ScalarField {
    grid: Field,
    cell_size: f64,
    resolution: f64,
}

/// Node count needed along an axis of `extent` pixels.
fn node_count(extent: f64, cell_size: f64, resolution: f64) -> usize {
    if !(extent.is_finite() && extent > 0.0) {
        return 2;
    }
    let covered = (extent / resolution).ceil() * resolution;
    ((covered / cell_size).ceil() as usize).saturating_add(2)
}

fn check_spacing(name: &str, v: f64) -> Result<(), FieldError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(FieldError::invalid_param(name, "must be positive"))
    }
}

impl ScalarField {
    /// Creates a zeroed grid for a `width` x `height` viewport that is
    /// contoured in cells of `resolution` pixels.
    ///
    /// Returns `FieldError::InvalidParam` for a non-positive spacing.
    pub fn new(
        width: f64,
        height: f64,
        cell_size: f64,
        resolution: f64,
    ) -> Result<Self, FieldError> {
        check_spacing("cell_size", cell_size)?;
        check_spacing("resolution", resolution)?;
        let grid = Field::new(
            node_count(width, cell_size, resolution),
            node_count(height, cell_size, resolution),
        )?;
        Ok(Self {
            grid,
            cell_size,
            resolution,
        })
    }

    /// Adapts the grid to a new viewport; values are zeroed until the next
    /// [`regenerate`](Self::regenerate).
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), FieldError> {
        self.grid.reshape(
            node_count(width, self.cell_size, self.resolution),
            node_count(height, self.cell_size, self.resolution),
        )?;
        Ok(())
    }

    /// Overwrites every node with the base field at time `t`.
    pub fn regenerate(&mut self, t: f64) {
        let cell = self.cell_size;
        let w = self.grid.width();
        for (k, v) in self.grid.data_mut().iter_mut().enumerate() {
            let p = DVec2::new((k % w) as f64 * cell, (k / w) as f64 * cell);
            *v = base_value(p, t);
        }
    }

    pub fn grid(&self) -> &Field {
        &self.grid
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }
}
