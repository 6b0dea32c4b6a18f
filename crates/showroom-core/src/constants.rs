use glam::Vec3;

// Shared scene/tracking tuning constants used by the web frontend.

// Model placement
pub const TARGET_SIZE: f32 = 6.0; // largest model dimension after normalization
pub const GROUND_Y: f32 = -1.0; // y-level of the shadow-catcher plane
pub const GROUND_EXTENT: f32 = 50.0; // ground plane side length
pub const GROUND_SHADOW_OPACITY: f32 = 0.2;

// Camera
pub const CAMERA_FOV_DEGREES: f32 = 60.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_BASE: [f32; 3] = [0.0, 1.6, 5.0]; // fixed base eye position
pub const CAMERA_TARGET: [f32; 3] = [0.0, 2.2, 0.0]; // look-at, never moved per tick
pub const MIN_CAMERA_DISTANCE: f32 = 4.85; // lower bound on eye z
pub const MAX_CAMERA_DISTANCE: f32 = 5.57; // upper bound on eye z

// Head-tracking signal
pub const SMOOTHING_ALPHA: f32 = 0.15; // EWMA weight; smaller = smoother, laggier
pub const DEAD_ZONE: f32 = 0.03; // recentred values below this snap to zero
pub const NOSE_LANDMARK_INDEX: usize = 1; // Face Mesh nose tip, passed to the detector

// Rig offset mapping
pub const X_GAIN: f32 = 10.0;
pub const Y_GAIN: f32 = 6.0;
pub const X_OFFSET_CLAMP: f32 = 2.0;
pub const Y_OFFSET_CLAMP: f32 = 1.2;
pub const X_SCALE: f32 = 1.25; // applied after the clamp (see rig.rs)
pub const Y_SCALE: f32 = 0.8;
pub const DEPTH_GAIN: f32 = 12.0;

// Studio lighting (positions from the reference scene; directions toward origin)
pub const MAIN_LIGHT_POS: [f32; 3] = [2.0, 6.0, 10.0]; // casts shadows
pub const FILL_LIGHT_POS: [f32; 3] = [-1.0, 5.0, -5.0];
pub const MAIN_LIGHT_INTENSITY: f32 = 1.0;
pub const FILL_LIGHT_INTENSITY: f32 = 0.45;
pub const AMBIENT_INTENSITY: f32 = 0.25;

#[inline]
pub fn camera_base_vec3() -> Vec3 {
    Vec3::from_array(CAMERA_BASE)
}

#[inline]
pub fn camera_target_vec3() -> Vec3 {
    Vec3::from_array(CAMERA_TARGET)
}
