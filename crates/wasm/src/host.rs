//! [`FrameHost`] backed by `requestAnimationFrame` and DOM listeners.

use contour_field_core::driver::{FrameHost, FrameRequest};
use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, Window};

/// One DOM listener, kept so it can be removed again.
pub struct Listener {
    pub target: EventTarget,
    pub event: &'static str,
    pub callback: Closure<dyn FnMut(Event)>,
}

/// Schedules refresh callbacks on the window and owns every JS closure the
/// animation hands to the browser.
///
/// Dropping the host drops the closures, so the driver must be stopped
/// first; [`crate::TopoHandle`] takes care of that.
pub struct BrowserHost {
    window: Window,
    frame_callback: Option<Closure<dyn FnMut(f64)>>,
    listeners: Vec<Listener>,
    attached: bool,
}

impl BrowserHost {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            frame_callback: None,
            listeners: Vec::new(),
            attached: false,
        }
    }

    /// Installs the refresh callback and the listeners to attach on start.
    pub fn install(&mut self, frame_callback: Closure<dyn FnMut(f64)>, listeners: Vec<Listener>) {
        self.frame_callback = Some(frame_callback);
        self.listeners = listeners;
    }
}

impl FrameHost for BrowserHost {
    fn request_frame(&mut self) -> Option<FrameRequest> {
        let callback = self.frame_callback.as_ref()?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map(FrameRequest)
            .map_err(|e| warn!("requestAnimationFrame failed: {e:?}"))
            .ok()
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if let Err(e) = self.window.cancel_animation_frame(request.0) {
            warn!("cancelAnimationFrame failed: {e:?}");
        }
    }

    fn attach_listeners(&mut self) {
        if self.attached {
            return;
        }
        for l in &self.listeners {
            if let Err(e) = l
                .target
                .add_event_listener_with_callback(l.event, l.callback.as_ref().unchecked_ref())
            {
                warn!("could not listen for {}: {e:?}", l.event);
            }
        }
        self.attached = true;
    }

    fn detach_listeners(&mut self) {
        if !self.attached {
            return;
        }
        for l in &self.listeners {
            if let Err(e) = l
                .target
                .remove_event_listener_with_callback(l.event, l.callback.as_ref().unchecked_ref())
            {
                warn!("could not remove {} listener: {e:?}", l.event);
            }
        }
        self.attached = false;
    }
}
