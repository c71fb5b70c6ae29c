//! Greedy stitching of marching-squares segments into polylines.
//!
//! Every extension step scans the whole pool of unused segments, so chaining
//! is O(n²) in the segment count. Segment counts stay in the low thousands
//! at the default resolution; a spatial hash keyed on rounded endpoints
//! would bound it near-linear if that stops holding.

use contour_field_core::geometry::{Path, Point, Segment};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathChainer {
    tolerance: f64,
}

impl PathChainer {
    /// `tolerance` is the endpoint matching distance in pixels.
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Chains `segments` into maximal paths.
    pub fn chain(&self, segments: &[Segment]) -> Vec<Path> {
        let mut pool = Vec::new();
        let mut out = Vec::new();
        self.chain_into(segments, &mut pool, &mut out);
        out
    }

    /// Like [`chain`](Self::chain) but reuses `pool` as scratch and appends
    /// to `out`.
    ///
    /// Seeds are taken in input order. Each path grows from its tail until
    /// nothing matches, then from its head, so the paths of a simple chain
    /// do not depend on which of its segments seeded them.
    pub fn chain_into(&self, segments: &[Segment], pool: &mut Vec<Segment>, out: &mut Vec<Path>) {
        pool.clear();
        pool.extend(segments.iter().rev().copied());

        while let Some(seed) = pool.pop() {
            let mut path = Path::from_segment(&seed);
            self.grow_tail(&mut path, pool);
            path.reverse();
            self.grow_tail(&mut path, pool);
            path.reverse();
            out.push(path);
        }
    }

    fn grow_tail(&self, path: &mut Path, pool: &mut Vec<Segment>) {
        while let Some((k, next)) = self.find_match(path.tail(), pool) {
            pool.remove(k);
            path.extend_tail(next);
        }
    }

    /// Index of an unused segment touching `tail`, and its far endpoint.
    fn find_match(&self, tail: Point, pool: &[Segment]) -> Option<(usize, Point)> {
        let tol2 = self.tolerance * self.tolerance;
        // Scan from the back: the pool is stored reversed, so this visits
        // segments in input order.
        pool.iter().enumerate().rev().find_map(|(k, s)| {
            if s.a.distance_squared(tail) <= tol2 {
                Some((k, s.b))
            } else if s.b.distance_squared(tail) <= tol2 {
                Some((k, s.a))
            } else {
                None
            }
        })
    }
}
