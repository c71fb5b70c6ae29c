#![deny(unsafe_code)]
//! Scene registry, headless frame host and CPU-side rendering.
//!
//! This crate sits between `contour-field-core` (which defines the `Scene`
//! and `Canvas2D` traits) and the individual scene crates
//! (`contour-field-topo`). Both the CLI and the wasm host depend on it to
//! avoid duplicating dispatch logic.

pub mod headless;
pub mod pixmap;

#[cfg(feature = "png")]
pub mod snapshot;

use contour_field_core::canvas::Canvas2D;
use contour_field_core::error::FieldError;
use contour_field_core::Scene;
use contour_field_topo::TopoScene;
use serde_json::Value;

/// All available scene names.
const SCENE_NAMES: &[&str] = &["topo"];

/// Enumeration of all available scenes.
///
/// Wraps each scene implementation and delegates `Scene` trait methods.
/// Use [`SceneKind::from_name`] for string-based construction (CLI, wasm).
#[derive(Debug, Clone)]
pub enum SceneKind {
    /// Animated topographic contours.
    Topo(TopoScene),
}

impl SceneKind {
    /// Constructs a scene by name for a `width` x `height` viewport.
    ///
    /// Returns `FieldError::UnknownScene` if the name is not recognized.
    pub fn from_name(
        name: &str,
        width: f64,
        height: f64,
        params: &Value,
    ) -> Result<Self, FieldError> {
        match name {
            "topo" => Ok(SceneKind::Topo(TopoScene::from_json(width, height, params)?)),
            _ => Err(FieldError::UnknownScene(name.to_string())),
        }
    }

    /// Returns a slice of all recognized scene names.
    pub fn list_scenes() -> &'static [&'static str] {
        SCENE_NAMES
    }

    pub fn name(&self) -> &'static str {
        match self {
            SceneKind::Topo(_) => "topo",
        }
    }
}

impl Scene for SceneKind {
    fn resize(&mut self, width: f64, height: f64) {
        match self {
            SceneKind::Topo(s) => s.resize(width, height),
        }
    }

    fn advance(&mut self, dt: f64) {
        match self {
            SceneKind::Topo(s) => s.advance(dt),
        }
    }

    fn render(&mut self, canvas: &mut dyn Canvas2D) {
        match self {
            SceneKind::Topo(s) => s.render(canvas),
        }
    }

    fn pointer_moved(&mut self, x: f64, y: f64) {
        match self {
            SceneKind::Topo(s) => s.pointer_moved(x, y),
        }
    }

    fn pointer_left(&mut self) {
        match self {
            SceneKind::Topo(s) => s.pointer_left(),
        }
    }

    fn params(&self) -> Value {
        match self {
            SceneKind::Topo(s) => s.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            SceneKind::Topo(s) => s.param_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contour_field_core::canvas::RecordingCanvas;
    use serde_json::json;

    #[test]
    fn from_name_topo_succeeds() {
        let scene = SceneKind::from_name("topo", 400.0, 300.0, &json!({}));
        assert!(scene.is_ok());
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = SceneKind::from_name("nonexistent", 400.0, 300.0, &json!({}));
        assert!(matches!(result, Err(FieldError::UnknownScene(_))));
    }

    #[test]
    fn from_name_invalid_params_returns_error() {
        let result = SceneKind::from_name("topo", 400.0, 300.0, &json!({"tolerance": -1.0}));
        assert!(matches!(result, Err(FieldError::InvalidParam { .. })));
    }

    #[test]
    fn list_scenes_includes_topo() {
        assert!(SceneKind::list_scenes().contains(&"topo"));
        for name in SceneKind::list_scenes() {
            let scene = SceneKind::from_name(name, 64.0, 64.0, &json!({})).unwrap();
            assert_eq!(scene.name(), *name);
        }
    }

    #[test]
    fn trait_delegation_params_and_schema() {
        let scene = SceneKind::from_name("topo", 64.0, 64.0, &json!({"levels": 4})).unwrap();
        assert_eq!(scene.params()["levels"], 4);
        assert!(scene.param_schema().get("levels").is_some());
    }

    #[test]
    fn trait_delegation_advance_and_render() {
        let mut scene = SceneKind::from_name("topo", 200.0, 150.0, &json!({})).unwrap();
        let mut canvas = RecordingCanvas::new(200.0, 150.0);
        scene.pointer_moved(100.0, 75.0);
        scene.advance(0.05);
        scene.render(&mut canvas);
        scene.pointer_left();
        assert!(canvas.stroke_count() > 0);
    }

    #[test]
    fn determinism_same_inputs() {
        let mut a = SceneKind::from_name("topo", 160.0, 120.0, &json!({})).unwrap();
        let mut b = SceneKind::from_name("topo", 160.0, 120.0, &json!({})).unwrap();
        let mut ca = RecordingCanvas::new(160.0, 120.0);
        let mut cb = RecordingCanvas::new(160.0, 120.0);
        for _ in 0..10 {
            a.advance(1.0 / 60.0);
            b.advance(1.0 / 60.0);
        }
        a.render(&mut ca);
        b.render(&mut cb);
        assert_eq!(ca.commands(), cb.commands());
    }
}
