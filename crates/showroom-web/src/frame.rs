//! Per-frame session tick, driven by requestAnimationFrame.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use instant::Instant;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use showroom_core::{Camera, CameraRig, HeadSignal, ModelPlacement};

use crate::render::GpuState;
use crate::tracking::FaceTracker;

/// Owns every scene entity for the session; the tick reads and writes
/// through this instead of module-level globals.
pub struct FrameContext {
    pub gpu: GpuState<'static>,
    pub canvas: web::HtmlCanvasElement,
    pub camera: Camera,
    pub rig: CameraRig,
    pub signal: HeadSignal,
    /// `None` when the webcam was denied or absent; the eye stays at base.
    pub tracker: Option<FaceTracker>,
    pub placement: Rc<RefCell<ModelPlacement>>,
    pub pivot: Vec3,
    /// Session start; elapsed time feeds the detector's monotonic timestamp.
    pub started: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        // Keep the surface and projection in step with the canvas backing
        // size (the resize listener updates the canvas, we pick it up here).
        let w = self.canvas.width();
        let h = self.canvas.height();
        self.gpu.resize_if_needed(w, h);
        self.camera.set_viewport(w, h);

        if let Some(tracker) = &self.tracker {
            let timestamp_ms = self.started.elapsed().as_secs_f64() * 1000.0;
            // None (no face) holds the smoothed signal unchanged
            self.signal.observe(tracker.detect(timestamp_ms));
        }
        self.camera.eye = self.rig.eye(&self.signal);

        let model_matrix = self.placement.borrow().matrix(self.pivot);
        if let Err(e) = self.gpu.render(&self.camera, model_matrix) {
            log::error!("render error: {:?}", e);
        }
    }
}

/// Hand the context to a persistent self-rescheduling rAF closure.
pub fn register_frame_loop(mut ctx: FrameContext) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        ctx.frame();
        if let Some(w) = web::window() {
            let _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        let _ =
            w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}
