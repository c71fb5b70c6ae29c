//! Continuous lookup into the coarse grid, plus the pointer ripple.

use contour_field_core::field::Field;
use glam::DVec2;

/// Anything that yields a scalar at an arbitrary viewport point.
///
/// The contour extractor only needs this, so tests can feed it closures.
pub trait ScalarSource {
    fn value_at(&self, p: DVec2) -> f64;
}

impl<F: Fn(DVec2) -> f64> ScalarSource for F {
    fn value_at(&self, p: DVec2) -> f64 {
        self(p)
    }
}

/// Hermite smoothstep: 0 at `edge0`, 1 at `edge1`, zero slope at both ends.
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Localized radial wave around the smoothed pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub center: DVec2,
    pub radius: f64,
    pub amplitude: f64,
    pub frequency: f64,
    pub speed: f64,
    pub time: f64,
}

impl Ripple {
    /// Envelope at distance `d`: 1 at the center, 0 from `radius` outward.
    pub fn falloff(&self, d: f64) -> f64 {
        if d >= self.radius {
            return 0.0;
        }
        1.0 - smoothstep(0.0, self.radius, d)
    }

    /// Perturbation at `p`. Exactly zero at distance `>= radius`, and never
    /// larger in magnitude than `amplitude * falloff`.
    pub fn contribution(&self, p: DVec2) -> f64 {
        let d = p.distance(self.center);
        if d.is_nan() || d >= self.radius {
            return 0.0;
        }
        let wave = (d * self.frequency - self.time * self.speed).sin();
        self.amplitude * self.falloff(d) * wave
    }
}

/// Bilinear view of a [`Field`] with an optional ripple on top.
#[derive(Debug, Clone, Copy)]
pub struct FieldSampler<'a> {
    grid: &'a Field,
    cell_size: f64,
    ripple: Option<Ripple>,
}

impl<'a> FieldSampler<'a> {
    pub fn new(grid: &'a Field, cell_size: f64) -> Self {
        Self {
            grid,
            cell_size,
            ripple: None,
        }
    }

    pub fn with_ripple(mut self, ripple: Option<Ripple>) -> Self {
        self.ripple = ripple;
        self
    }

    /// Bilinear interpolation of the four surrounding nodes.
    ///
    /// Nodes outside the grid read as 0. At an exact node position the
    /// stored value is returned unchanged.
    pub fn bilinear(&self, x: f64, y: f64) -> f64 {
        if !(x.is_finite() && y.is_finite()) {
            return 0.0;
        }
        let gx = x / self.cell_size;
        let gy = y / self.cell_size;
        let x0 = gx.floor();
        let y0 = gy.floor();
        let fx = gx - x0;
        let fy = gy - y0;
        let (i, j) = (x0 as isize, y0 as isize);

        let v00 = self.grid.get(i, j);
        let v10 = self.grid.get(i + 1, j);
        let v01 = self.grid.get(i, j + 1);
        let v11 = self.grid.get(i + 1, j + 1);

        let top = v00 + (v10 - v00) * fx;
        let bottom = v01 + (v11 - v01) * fx;
        top + (bottom - top) * fy
    }

    /// Field value at `(x, y)` including the ripple.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let base = self.bilinear(x, y);
        match &self.ripple {
            Some(r) => base + r.contribution(DVec2::new(x, y)),
            None => base,
        }
    }
}

impl ScalarSource for FieldSampler<'_> {
    fn value_at(&self, p: DVec2) -> f64 {
        self.sample(p.x, p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_grid() -> Field {
        // v(i, j) = i + 10 j
        let data = (0..4)
            .flat_map(|j| (0..5).map(move |i| i as f64 + 10.0 * j as f64))
            .collect();
        Field::from_data(5, 4, data).unwrap()
    }

    fn ripple_at(center: DVec2) -> Ripple {
        Ripple {
            center,
            radius: 50.0,
            amplitude: 0.8,
            frequency: 0.2,
            speed: 2.0,
            time: 1.3,
        }
    }

    #[test]
    fn exact_nodes_return_stored_values() {
        let grid = ramp_grid();
        let s = FieldSampler::new(&grid, 8.0);
        for j in 0..4 {
            for i in 0..5 {
                let got = s.sample(i as f64 * 8.0, j as f64 * 8.0);
                assert_eq!(got, grid.get(i, j), "node ({i}, {j})");
            }
        }
    }

    #[test]
    fn midpoint_interpolates_linear_ramp() {
        let grid = ramp_grid();
        let s = FieldSampler::new(&grid, 8.0);
        // between nodes (1,1)=11, (2,1)=12, (1,2)=21, (2,2)=22
        assert!((s.sample(12.0, 12.0) - 16.5).abs() < 1e-12);
        assert!((s.sample(10.0, 8.0) - 11.25).abs() < 1e-12);
    }

    #[test]
    fn outside_grid_reads_as_zero() {
        let grid = Field::filled(3, 3, 2.0).unwrap();
        let s = FieldSampler::new(&grid, 10.0);
        assert_eq!(s.sample(-50.0, -50.0), 0.0);
        assert_eq!(s.sample(500.0, 5.0), 0.0);
        // halfway between the last node (value 2) and the missing one (0)
        assert!((s.sample(25.0, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn non_finite_coordinates_read_as_zero() {
        let grid = Field::filled(3, 3, 2.0).unwrap();
        let s = FieldSampler::new(&grid, 10.0);
        assert_eq!(s.sample(f64::NAN, 0.0), 0.0);
        assert_eq!(s.sample(0.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn smoothstep_endpoints_and_midpoint() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        assert_eq!(smoothstep(0.0, 1.0, 1.0), 1.0);
        assert_eq!(smoothstep(0.0, 1.0, 3.0), 1.0);
    }

    #[test]
    fn falloff_is_one_at_center_and_zero_at_radius() {
        let r = ripple_at(DVec2::ZERO);
        assert_eq!(r.falloff(0.0), 1.0);
        assert_eq!(r.falloff(50.0), 0.0);
        assert_eq!(r.falloff(80.0), 0.0);
        assert!((r.falloff(25.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn ripple_adds_to_base_inside_radius_only() {
        let grid = Field::filled(20, 20, 0.25).unwrap();
        let center = DVec2::new(40.0, 40.0);
        let ripple = ripple_at(center);
        let s = FieldSampler::new(&grid, 8.0).with_ripple(Some(ripple));
        let near = DVec2::new(45.0, 40.0);
        let expected = 0.25 + ripple.contribution(near);
        assert!((s.sample(near.x, near.y) - expected).abs() < 1e-12);
        assert_eq!(s.sample(40.0, 96.0), 0.25);
    }

    #[test]
    fn ripple_is_exactly_zero_on_the_radius() {
        let r = ripple_at(DVec2::ZERO);
        assert_eq!(r.contribution(DVec2::new(50.0, 0.0)), 0.0);
        assert_eq!(r.contribution(DVec2::new(0.0, -50.0)), 0.0);
        assert_eq!(r.contribution(DVec2::new(30.0, 40.0)), 0.0);
    }

    #[test]
    fn zero_radius_ripple_contributes_nothing() {
        let r = Ripple {
            radius: 0.0,
            ..ripple_at(DVec2::ZERO)
        };
        assert_eq!(r.contribution(DVec2::ZERO), 0.0);
    }

    #[test]
    fn closures_are_scalar_sources() {
        let f = |p: DVec2| p.x * 2.0;
        assert_eq!(f.value_at(DVec2::new(3.0, 9.0)), 6.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ripple_is_zero_at_or_beyond_radius(
                angle in 0.0_f64..std::f64::consts::TAU,
                extra in 0.001_f64..500.0,
                cx in -200.0_f64..200.0,
                cy in -200.0_f64..200.0,
            ) {
                let center = DVec2::new(cx, cy);
                let r = ripple_at(center);
                let p = center + DVec2::from_angle(angle) * (r.radius + extra);
                prop_assert_eq!(r.contribution(p), 0.0);
            }

            #[test]
            fn ripple_stays_within_envelope(
                dx in -60.0_f64..60.0,
                dy in -60.0_f64..60.0,
                time in 0.0_f64..1.0e4,
            ) {
                let r = Ripple { time, ..ripple_at(DVec2::ZERO) };
                let p = DVec2::new(dx, dy);
                let envelope = r.amplitude * r.falloff(p.length());
                prop_assert!(r.contribution(p).abs() <= envelope + 1e-12);
            }

            #[test]
            fn bilinear_stays_within_corner_range(
                x in 0.0_f64..32.0,
                y in 0.0_f64..24.0,
            ) {
                let grid = ramp_grid();
                let s = FieldSampler::new(&grid, 8.0);
                let v = s.sample(x, y);
                prop_assert!((0.0..=34.0).contains(&v));
            }
        }
    }
}
