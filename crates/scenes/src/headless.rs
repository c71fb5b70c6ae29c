//! Offscreen frame host: drives a scene at a fixed simulated frame rate.

use contour_field_core::canvas::Canvas2D;
use contour_field_core::driver::{AnimationDriver, FrameHost, FrameRequest};
use contour_field_core::Scene;
use log::debug;

/// [`FrameHost`] with no display: every request is granted immediately and
/// fired by [`play`].
#[derive(Debug, Default)]
pub struct HeadlessHost {
    issued: i32,
    pending: Option<FrameRequest>,
    listening: bool,
}

impl HeadlessHost {
    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }
}

impl FrameHost for HeadlessHost {
    fn request_frame(&mut self) -> Option<FrameRequest> {
        self.issued += 1;
        let request = FrameRequest(self.issued);
        self.pending = Some(request);
        Some(request)
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }

    fn attach_listeners(&mut self) {
        self.listening = true;
    }

    fn detach_listeners(&mut self) {
        self.listening = false;
    }
}

/// How many frames to run, at what rate, and where the pointer rests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    pub frames: u32,
    pub fps: f64,
    pub pointer: Option<(f64, f64)>,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            frames: 120,
            fps: 60.0,
            pointer: None,
        }
    }
}

/// Runs `scene` on `canvas` for `playback.frames` frames, then stops.
///
/// Timestamps advance by `1000 / fps` ms. A non-positive or non-finite
/// `fps` falls back to 60.
pub fn play<S: Scene, C: Canvas2D>(
    scene: S,
    canvas: C,
    playback: &Playback,
) -> AnimationDriver<S, C, HeadlessHost> {
    let fps = if playback.fps.is_finite() && playback.fps > 0.0 {
        playback.fps
    } else {
        60.0
    };
    let frame_ms = 1000.0 / fps;
    let mut driver = AnimationDriver::new(scene, HeadlessHost::default());
    driver.start(Some(canvas));
    if let Some((x, y)) = playback.pointer {
        driver.pointer_move(x, y);
    }
    for k in 0..playback.frames {
        if driver.pending_request().is_none() {
            break;
        }
        driver.frame(f64::from(k) * frame_ms);
    }
    debug!("headless playback finished after {} frames", driver.frames());
    driver.stop();
    driver
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SceneKind;
    use contour_field_core::canvas::RecordingCanvas;
    use contour_field_core::driver::DriverState;
    use serde_json::json;

    fn topo() -> SceneKind {
        SceneKind::from_name("topo", 200.0, 150.0, &json!({})).unwrap()
    }

    #[test]
    fn play_runs_requested_frames_then_stops() {
        let playback = Playback {
            frames: 12,
            ..Playback::default()
        };
        let driver = play(topo(), RecordingCanvas::new(200.0, 150.0), &playback);
        assert_eq!(driver.frames(), 12);
        assert_eq!(driver.state(), DriverState::Stopped);
        assert!(driver.host().pending().is_none());
        assert!(!driver.host().is_listening());
        assert!(driver.canvas().unwrap().stroke_count() > 0);
    }

    #[test]
    fn zero_frames_leaves_canvas_untouched() {
        let playback = Playback {
            frames: 0,
            ..Playback::default()
        };
        let driver = play(topo(), RecordingCanvas::new(200.0, 150.0), &playback);
        assert_eq!(driver.frames(), 0);
        assert!(driver.canvas().unwrap().commands().is_empty());
    }

    #[test]
    fn pointer_is_forwarded_before_the_first_frame() {
        let playback = Playback {
            frames: 3,
            fps: 30.0,
            pointer: Some((100.0, 75.0)),
        };
        let driver = play(topo(), RecordingCanvas::new(200.0, 150.0), &playback);
        let SceneKind::Topo(scene) = driver.scene();
        assert!(scene.pointer().active);
        // two 1/30 s steps after the zero-length first frame
        let expected = 2.0 / 30.0 * scene.topo_params().speed;
        assert!((scene.time() - expected).abs() < 1e-9);
    }

    #[test]
    fn bad_fps_falls_back_to_sixty() {
        let playback = Playback {
            frames: 2,
            fps: f64::NAN,
            pointer: None,
        };
        let driver = play(topo(), RecordingCanvas::new(200.0, 150.0), &playback);
        let SceneKind::Topo(scene) = driver.scene();
        assert!((scene.time() - scene.topo_params().speed / 60.0).abs() < 1e-9);
    }
}
