//! Damped pointer follower driving the ripple.

use glam::DVec2;

/// Far off-canvas position the follower drifts to when the pointer leaves.
pub const POINTER_SENTINEL: DVec2 = DVec2::new(-10_000.0, -10_000.0);

/// Raw pointer target, its exponentially smoothed follower, and whether the
/// pointer is over the surface.
///
/// Event handlers only touch `target` and `active`; `smoothed` changes once
/// per frame in [`follow`](Self::follow).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub target: DVec2,
    pub smoothed: DVec2,
    pub active: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            target: POINTER_SENTINEL,
            smoothed: POINTER_SENTINEL,
            active: false,
        }
    }
}

impl PointerState {
    pub fn moved(&mut self, x: f64, y: f64) {
        let p = DVec2::new(x, y);
        if !p.is_finite() {
            return;
        }
        self.target = p;
        self.active = true;
    }

    pub fn left(&mut self) {
        self.target = POINTER_SENTINEL;
        self.active = false;
    }

    /// Moves `smoothed` a fraction of the way toward `target`, using
    /// `active_k` while the pointer is present and `inactive_k` otherwise.
    pub fn follow(&mut self, active_k: f64, inactive_k: f64) {
        let k = if self.active { active_k } else { inactive_k };
        self.smoothed += (self.target - self.smoothed) * k.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_inactive_at_sentinel() {
        let p = PointerState::default();
        assert!(!p.active);
        assert_eq!(p.target, POINTER_SENTINEL);
        assert_eq!(p.smoothed, POINTER_SENTINEL);
    }

    #[test]
    fn events_only_touch_target_and_flag() {
        let mut p = PointerState::default();
        p.moved(120.0, 80.0);
        assert!(p.active);
        assert_eq!(p.target, DVec2::new(120.0, 80.0));
        assert_eq!(p.smoothed, POINTER_SENTINEL);
        p.left();
        assert!(!p.active);
        assert_eq!(p.target, POINTER_SENTINEL);
    }

    #[test]
    fn non_finite_move_is_ignored() {
        let mut p = PointerState::default();
        p.moved(f64::NAN, 3.0);
        assert!(!p.active);
        assert_eq!(p.target, POINTER_SENTINEL);
    }

    #[test]
    fn follow_uses_the_active_rate() {
        let mut p = PointerState {
            target: DVec2::new(100.0, 0.0),
            smoothed: DVec2::ZERO,
            active: true,
        };
        p.follow(0.25, 0.5);
        assert_eq!(p.smoothed, DVec2::new(25.0, 0.0));
        p.active = false;
        p.follow(0.25, 0.5);
        assert_eq!(p.smoothed, DVec2::new(62.5, 0.0));
    }

    #[test]
    fn follower_converges_without_snapping() {
        let mut p = PointerState::default();
        p.moved(200.0, 150.0);
        let mut last = p.smoothed.distance(p.target);
        for _ in 0..200 {
            p.follow(0.15, 0.04);
            let d = p.smoothed.distance(p.target);
            assert!(d < last);
            last = d;
        }
        assert!(last < 1.0);
    }
}
