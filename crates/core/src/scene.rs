//! The `Scene` trait every animated contour scene implements.
//!
//! The trait is object-safe so scenes can be driven as `dyn Scene`, and it
//! is split so simulation (`advance`) and drawing (`render`) can be tested
//! independently of any host.

use crate::canvas::Canvas2D;
use serde_json::Value;

/// A time-evolving picture drawn to a [`Canvas2D`].
pub trait Scene {
    /// Adapts internal buffers to a new logical viewport size.
    fn resize(&mut self, width: f64, height: f64);

    /// Advances simulated state by `dt` seconds (already clamped by the driver).
    fn advance(&mut self, dt: f64);

    /// Draws the current state. Scratch buffers may be reused, hence `&mut`.
    fn render(&mut self, canvas: &mut dyn Canvas2D);

    /// Records a pointer position in surface-local logical pixels.
    fn pointer_moved(&mut self, x: f64, y: f64);

    /// Records that the pointer left or the gesture was cancelled.
    fn pointer_left(&mut self);

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all parameters: type, default, range, description.
    fn param_schema(&self) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use serde_json::json;

    /// Counts calls; used to check object safety and dispatch.
    #[derive(Default)]
    struct CountingScene {
        elapsed: f64,
        pointer: Option<(f64, f64)>,
    }

    impl Scene for CountingScene {
        fn resize(&mut self, _width: f64, _height: f64) {}

        fn advance(&mut self, dt: f64) {
            self.elapsed += dt;
        }

        fn render(&mut self, canvas: &mut dyn Canvas2D) {
            canvas.clear();
        }

        fn pointer_moved(&mut self, x: f64, y: f64) {
            self.pointer = Some((x, y));
        }

        fn pointer_left(&mut self) {
            self.pointer = None;
        }

        fn params(&self) -> Value {
            json!({"elapsed": self.elapsed})
        }

        fn param_schema(&self) -> Value {
            json!({"elapsed": {"type": "number", "default": 0.0}})
        }
    }

    #[test]
    fn scene_trait_is_object_safe() {
        let mut scene: Box<dyn Scene> = Box::new(CountingScene::default());
        let mut canvas = RecordingCanvas::new(8.0, 8.0);
        scene.advance(0.25);
        scene.render(&mut canvas);
        assert_eq!(scene.params()["elapsed"], 0.25);
        assert_eq!(canvas.commands().len(), 1);
    }

    #[test]
    fn pointer_calls_dispatch_through_dyn() {
        let mut scene = CountingScene::default();
        {
            let s: &mut dyn Scene = &mut scene;
            s.pointer_moved(3.0, 4.0);
        }
        assert_eq!(scene.pointer, Some((3.0, 4.0)));
        scene.pointer_left();
        assert_eq!(scene.pointer, None);
    }

    #[test]
    fn schema_has_expected_structure() {
        let scene = CountingScene::default();
        assert_eq!(scene.param_schema()["elapsed"]["type"], "number");
    }
}
