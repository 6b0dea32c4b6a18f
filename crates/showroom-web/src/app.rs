//! Session bootstrap: wasm entry point and async scene setup.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use instant::Instant;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

use showroom_core::constants::{
    CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, DEAD_ZONE, GROUND_Y, MAX_CAMERA_DISTANCE,
    MIN_CAMERA_DISTANCE, SMOOTHING_ALPHA, TARGET_SIZE,
};
use showroom_core::{
    camera_base_vec3, camera_target_vec3, fit_to_ground, Camera, CameraRig, HeadSignal,
    ModelPlacement, NormalizedPlacement,
};

use crate::{assets, dom, frame, render, tracking, ui};

const CANVAS_ID: &str = "viewer-canvas";
const MODEL_URL: &str = "/models/car.glb";
const BACKGROUND_URL: &str = "/textures/road.jpg";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("showroom-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{CANVAS_ID}"))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    dom::sync_canvas_backing_size(&canvas);
    dom::install_resize_listener(&canvas);

    // Leak a canvas clone to satisfy the 'static lifetime of the surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    let mut gpu = render::GpuState::new(leaked_canvas).await?;

    match dom::fetch_bytes(BACKGROUND_URL).await {
        Ok(bytes) => match assets::BackgroundImage::from_bytes(&bytes) {
            Ok(img) => gpu.set_background(&img),
            Err(e) => log::error!("[assets] background decode failed: {e:#}"),
        },
        Err(e) => log::error!("[assets] background fetch failed: {e:#}"),
    }

    // Model load failure leaves ground and lighting rendering on their own.
    let placement = Rc::new(RefCell::new(ModelPlacement::default()));
    let mut pivot = Vec3::ZERO;
    match load_car(&mut gpu).await {
        Ok(fitted) => {
            *placement.borrow_mut() = fitted.placement;
            pivot = fitted.pivot;
            log::info!(
                "[assets] model placed: scale {:.3}, bottom at y={:.2}",
                fitted.placement.scale,
                fitted.bottom_y()
            );
        }
        Err(e) => log::error!("[assets] model load failed; scene continues without it: {e:#}"),
    }

    ui::wire_placement_controls(&document, placement.clone());
    ui::sync_controls_to_placement(&document, &placement.borrow());

    let tracker = match tracking::acquire_webcam(&document).await {
        Ok(t) => Some(t),
        Err(e) => {
            log::warn!("[tracking] disabled for this session, camera stays at base pose: {e:#}");
            None
        }
    };

    let base = camera_base_vec3();
    let camera = Camera {
        eye: base,
        target: camera_target_vec3(),
        up: Vec3::Y,
        aspect: canvas.width() as f32 / canvas.height().max(1) as f32,
        fovy_radians: CAMERA_FOV_DEGREES.to_radians(),
        znear: CAMERA_NEAR,
        zfar: CAMERA_FAR,
    };

    frame::register_frame_loop(frame::FrameContext {
        gpu,
        canvas,
        camera,
        rig: CameraRig::new(base, MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE),
        signal: HeadSignal::new(SMOOTHING_ALPHA, DEAD_ZONE),
        tracker,
        placement,
        pivot,
        started: Instant::now(),
    });
    Ok(())
}

async fn load_car(gpu: &mut render::GpuState<'static>) -> anyhow::Result<NormalizedPlacement> {
    let bytes = dom::fetch_bytes(MODEL_URL).await?;
    let car = assets::CarModel::from_gltf_bytes(&bytes)?;
    let fitted = fit_to_ground(&car.bounds, TARGET_SIZE, GROUND_Y)?;
    gpu.set_model(&car);
    Ok(fitted)
}
