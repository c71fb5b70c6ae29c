#![deny(unsafe_code)]
//! Browser bindings: runs the topographic scene on an HTML canvas.
//!
//! ```js
//! const handle = mount("topo-canvas", JSON.stringify({ levels: 10 }));
//! // ...
//! handle.destroy();
//! ```
//!
//! The driver lives in an `Rc<RefCell<..>>`. Every JS closure holds only a
//! `Weak` to it, and the closures themselves are owned by the driver's
//! [`BrowserHost`], so dropping the handle frees everything.

mod canvas;
mod host;

use canvas::{css_size, device_pixel_ratio, event_coordinate, WebCanvas};
use contour_field_core::driver::AnimationDriver;
use contour_field_core::Scene;
use contour_field_scenes::SceneKind;
use host::{BrowserHost, Listener};
use log::{info, warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

type Driver = AnimationDriver<SceneKind, WebCanvas, BrowserHost>;

fn init_logging() {
    console_error_panic_hook::set_once();
    // Already initialized on a second mount.
    console_log::init_with_level(log::Level::Info).ok();
}

/// Runs `f` on the driver if it is still alive and not already borrowed.
fn with_driver(driver: &Weak<RefCell<Driver>>, f: impl FnOnce(&mut Driver)) {
    if let Some(driver) = driver.upgrade() {
        if let Ok(mut d) = driver.try_borrow_mut() {
            f(&mut d);
        }
    }
}

/// Pointer position in CSS pixels relative to the canvas.
///
/// `offsetX`/`offsetY` are doubles in current browsers but `web-sys` exposes
/// them as integers, so the raw properties are read first.
fn pointer_offset(e: &MouseEvent) -> (f64, f64) {
    let read = |key: &str| {
        js_sys::Reflect::get(e, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_f64())
    };
    (
        event_coordinate(read("offsetX"), e.offset_x()),
        event_coordinate(read("offsetY"), e.offset_y()),
    )
}

fn listener(
    target: &EventTarget,
    event: &'static str,
    driver: &Weak<RefCell<Driver>>,
    handler: fn(&mut Driver, &Event),
) -> Listener {
    let driver = driver.clone();
    let callback = Closure::wrap(Box::new(move |e: Event| {
        with_driver(&driver, |d| handler(d, &e));
    }) as Box<dyn FnMut(Event)>);
    Listener {
        target: target.clone(),
        event,
        callback,
    }
}

/// Builds the refresh callback and the pointer/resize listeners.
fn wire(driver: &Rc<RefCell<Driver>>, canvas: &HtmlCanvasElement, window: &Window) {
    let weak = Rc::downgrade(driver);

    let frame_driver = weak.clone();
    let frame = Closure::wrap(Box::new(move |timestamp: f64| {
        with_driver(&frame_driver, |d| d.frame(timestamp));
    }) as Box<dyn FnMut(f64)>);

    let canvas_target: &EventTarget = canvas.as_ref();
    let window_target: &EventTarget = window.as_ref();
    let listeners = vec![
        listener(canvas_target, "pointermove", &weak, |d, e| {
            if let Some(m) = e.dyn_ref::<MouseEvent>() {
                let (x, y) = pointer_offset(m);
                d.pointer_move(x, y);
            }
        }),
        listener(canvas_target, "pointerleave", &weak, |d, _| d.pointer_leave()),
        listener(canvas_target, "pointercancel", &weak, |d, _| d.pointer_leave()),
        {
            let canvas = canvas.clone();
            let window = window.clone();
            let driver = weak.clone();
            let callback = Closure::wrap(Box::new(move |_: Event| {
                let (w, h) = css_size(&canvas);
                let dpr = device_pixel_ratio(&window);
                with_driver(&driver, |d| d.resize(w, h, dpr));
            }) as Box<dyn FnMut(Event)>);
            Listener {
                target: window_target.clone(),
                event: "resize",
                callback,
            }
        },
    ];

    driver.borrow_mut().host_mut().install(frame, listeners);
}

/// A running (or never started) topographic animation.
#[wasm_bindgen]
pub struct TopoHandle {
    driver: Option<Rc<RefCell<Driver>>>,
}

#[wasm_bindgen]
impl TopoHandle {
    /// Cancels the pending frame and removes every listener. Idempotent.
    pub fn destroy(&mut self) {
        if let Some(driver) = self.driver.take() {
            match driver.try_borrow_mut() {
                Ok(mut d) => d.stop(),
                Err(_) => warn!("destroy called from inside a frame; listeners may leak"),
            }
        }
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.driver
            .as_ref()
            .and_then(|d| d.try_borrow().ok().map(|d| d.is_running()))
            .unwrap_or(false)
    }

    /// Current scene parameters as a JSON string.
    pub fn params(&self) -> String {
        self.driver
            .as_ref()
            .and_then(|d| d.try_borrow().ok().map(|d| d.scene().params().to_string()))
            .unwrap_or_else(|| "{}".to_owned())
    }
}

impl Drop for TopoHandle {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Starts the animation on the `<canvas>` with id `canvas_id`.
///
/// `params_json` holds scene parameter overrides (`"{}"` for defaults).
/// A missing element or 2D context is not an error: the handle is returned
/// with the loop unstarted and a warning is logged.
#[wasm_bindgen]
pub fn mount(canvas_id: &str, params_json: &str) -> Result<TopoHandle, JsValue> {
    init_logging();
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let params: serde_json::Value = serde_json::from_str(params_json)
        .map_err(|e| JsValue::from_str(&format!("invalid params JSON: {e}")))?;

    let element = window
        .document()
        .and_then(|d| d.get_element_by_id(canvas_id))
        .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok());
    if element.is_none() {
        warn!("no <canvas id=\"{canvas_id}\"> found");
    }
    let surface = element
        .as_ref()
        .and_then(|c| WebCanvas::new(c.clone(), &window));

    let (width, height) = element.as_ref().map(css_size).unwrap_or((0.0, 0.0));
    let scene = SceneKind::from_name("topo", width, height, &params)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let driver = Rc::new(RefCell::new(AnimationDriver::new(
        scene,
        BrowserHost::new(window.clone()),
    )));
    if let Some(canvas) = &element {
        wire(&driver, canvas, &window);
    }
    if driver.borrow_mut().start(surface) {
        info!("mounted on #{canvas_id}");
    }
    Ok(TopoHandle {
        driver: Some(driver),
    })
}
