//! Frame-loop state machine shared by every host.
//!
//! The driver owns a [`Scene`], an optional [`Canvas2D`] and a [`FrameHost`]
//! that knows how to schedule display-refresh callbacks and wire input
//! listeners. Hosts call [`AnimationDriver::frame`] from their refresh
//! callback; the driver re-requests the next frame itself, so withholding
//! that request (on [`AnimationDriver::stop`]) is what ends the loop.
//!
//! ```text
//!   Stopped --start(Some(canvas))--> Running --stop()--> Stopped
//!      ^                                |
//!      +------ start(None): stays ------+
//! ```

use crate::canvas::Canvas2D;
use crate::scene::Scene;
use log::{debug, info, trace, warn};

/// Largest simulated step per frame, in seconds.
///
/// Frames arriving after a long stall (backgrounded tab) advance by at most
/// this much.
pub const MAX_FRAME_DELTA: f64 = 0.1;

/// Opaque id of a pending refresh callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub i32);

/// Host-side scheduling and event plumbing.
pub trait FrameHost {
    /// Asks for one refresh callback. `None` if the host cannot schedule.
    fn request_frame(&mut self) -> Option<FrameRequest>;

    /// Cancels a pending refresh callback.
    fn cancel_frame(&mut self, request: FrameRequest);

    /// Installs pointer and resize listeners.
    fn attach_listeners(&mut self);

    /// Removes every listener installed by `attach_listeners`.
    fn detach_listeners(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Stopped,
    Running,
}

/// Runs a [`Scene`] on a [`Canvas2D`] at the host's refresh rate.
pub struct AnimationDriver<S: Scene, C: Canvas2D, H: FrameHost> {
    scene: S,
    canvas: Option<C>,
    host: H,
    state: DriverState,
    last_timestamp: Option<f64>,
    pending: Option<FrameRequest>,
    frames: u64,
}

impl<S: Scene, C: Canvas2D, H: FrameHost> AnimationDriver<S, C, H> {
    pub fn new(scene: S, host: H) -> Self {
        Self {
            scene,
            canvas: None,
            host,
            state: DriverState::Stopped,
            last_timestamp: None,
            pending: None,
            frames: 0,
        }
    }

    /// Starts the loop on `canvas`.
    ///
    /// With `None` (surface not mounted or no 2D context) the driver logs a
    /// warning and stays stopped. Returns whether the loop is running.
    pub fn start(&mut self, canvas: Option<C>) -> bool {
        if self.state == DriverState::Running {
            return true;
        }
        let Some(canvas) = canvas else {
            warn!("no drawing surface available; animation not started");
            return false;
        };
        let (width, height) = canvas.size();
        self.scene.resize(width, height);
        self.canvas = Some(canvas);
        self.state = DriverState::Running;
        self.last_timestamp = None;
        self.host.attach_listeners();
        self.pending = self.host.request_frame();
        info!("animation started at {width}x{height}");
        true
    }

    /// Runs one frame for a refresh callback fired at `timestamp_ms`.
    ///
    /// Does nothing once stopped, and in that case requests no further frame.
    pub fn frame(&mut self, timestamp_ms: f64) {
        if self.state != DriverState::Running {
            return;
        }
        self.pending = None;
        let dt = frame_delta(self.last_timestamp, timestamp_ms);
        self.last_timestamp = Some(timestamp_ms);

        self.scene.advance(dt);
        if let Some(canvas) = self.canvas.as_mut() {
            self.scene.render(canvas);
        }
        self.frames += 1;
        trace!("frame {} dt={dt:.4}", self.frames);

        self.pending = self.host.request_frame();
    }

    /// Applies a viewport change: resizes the surface and the scene buffers.
    pub fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) {
        debug!("resize to {width}x{height} @{pixel_ratio}x");
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.resize(width, height, pixel_ratio);
        }
        self.scene.resize(width, height);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.scene.pointer_moved(x, y);
    }

    pub fn pointer_leave(&mut self) {
        self.scene.pointer_left();
    }

    /// Cancels the pending frame and removes listeners. Idempotent.
    pub fn stop(&mut self) {
        if self.state != DriverState::Running {
            return;
        }
        if let Some(request) = self.pending.take() {
            self.host.cancel_frame(request);
        }
        self.host.detach_listeners();
        self.state = DriverState::Stopped;
        info!("animation stopped after {} frames", self.frames);
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    /// Frames rendered since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn pending_request(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn canvas(&self) -> Option<&C> {
        self.canvas.as_ref()
    }

    pub fn canvas_mut(&mut self) -> Option<&mut C> {
        self.canvas.as_mut()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

/// Seconds since the previous frame, clamped to `[0, MAX_FRAME_DELTA]`.
///
/// The first frame of a run has no predecessor and advances by zero.
pub fn frame_delta(previous_ms: Option<f64>, now_ms: f64) -> f64 {
    match previous_ms {
        Some(prev) => {
            let dt = (now_ms - prev) / 1000.0;
            if dt.is_finite() {
                dt.clamp(0.0, MAX_FRAME_DELTA)
            } else {
                0.0
            }
        }
        None => 0.0,
    }
}
