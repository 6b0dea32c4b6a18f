//! Webcam acquisition and the landmark-detector collaborator binding.
//!
//! The host page provides a global
//! `detectFaceLandmark(video, timestampMs, landmarkIndex)` wrapping its
//! pose-estimation session. Per call it returns `null` (no face this frame)
//! or a 3-element array with the requested landmark, x/y normalized to [0,1]
//! and z a small relative depth. The viewer always asks for
//! [`NOSE_LANDMARK_INDEX`].

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

use showroom_core::constants::NOSE_LANDMARK_INDEX;
use showroom_core::TrackingSample;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = detectFaceLandmark)]
    fn detect_face_landmark(
        video: &web::HtmlVideoElement,
        timestamp_ms: f64,
        landmark_index: u32,
    ) -> Result<JsValue, JsValue>;
}

pub struct FaceTracker {
    video: web::HtmlVideoElement,
}

/// Request the webcam and wire it to a hidden `<video>` element.
///
/// Permission denial or a missing device returns `Err`; the caller disables
/// tracking for the session and the camera stays at its base pose. There is
/// no retry loop.
pub async fn acquire_webcam(document: &web::Document) -> anyhow::Result<FaceTracker> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let media_devices = window
        .navigator()
        .media_devices()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let constraints = web::MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);
    let promise = media_devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    let stream: web::MediaStream = JsFuture::from(promise)
        .await
        .map_err(|e| anyhow::anyhow!(format!("camera permission denied or unavailable: {:?}", e)))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let video: web::HtmlVideoElement = document
        .create_element("video")
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    video.set_autoplay(true);
    video.set_muted(true);
    let _ = video.set_attribute("playsinline", "");
    let _ = video.set_attribute("style", "display:none");
    video.set_src_object(Some(&stream));
    let _ = video.play();

    if let Some(body) = document.body() {
        let _ = body.append_child(&video);
    }

    log::info!("[tracking] webcam stream attached");
    Ok(FaceTracker { video })
}

impl FaceTracker {
    /// Run the detector against the current video frame.
    ///
    /// Returns `None` while the video has no data yet, when no face is
    /// detected, or when the collaborator is missing; none of these are
    /// errors at tick granularity.
    pub fn detect(&self, timestamp_ms: f64) -> Option<TrackingSample> {
        // HAVE_CURRENT_DATA
        if self.video.ready_state() < 2 {
            return None;
        }
        let result =
            detect_face_landmark(&self.video, timestamp_ms, NOSE_LANDMARK_INDEX as u32).ok()?;
        if result.is_null() || result.is_undefined() {
            return None;
        }
        let arr = js_sys::Array::from(&result);
        if arr.length() < 3 {
            log::warn!("[tracking] malformed landmark result; ignoring frame");
            return None;
        }
        let x = arr.get(0).as_f64()? as f32;
        let y = arr.get(1).as_f64()? as f32;
        let z = arr.get(2).as_f64()? as f32;
        Some(TrackingSample { x, y, z })
    }
}
