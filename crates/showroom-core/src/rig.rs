use glam::Vec3;

use crate::constants::{
    DEPTH_GAIN, X_GAIN, X_OFFSET_CLAMP, X_SCALE, Y_GAIN, Y_OFFSET_CLAMP, Y_SCALE,
};
use crate::signal::HeadSignal;

/// Gains and bounds mapping a smoothed head signal to camera displacement.
#[derive(Clone, Copy, Debug)]
pub struct RigTuning {
    pub x_gain: f32,
    pub y_gain: f32,
    pub x_clamp: f32,
    pub y_clamp: f32,
    pub x_scale: f32,
    pub y_scale: f32,
    pub depth_gain: f32,
}

impl Default for RigTuning {
    fn default() -> Self {
        Self {
            x_gain: X_GAIN,
            y_gain: Y_GAIN,
            x_clamp: X_OFFSET_CLAMP,
            y_clamp: Y_OFFSET_CLAMP,
            x_scale: X_SCALE,
            y_scale: Y_SCALE,
            depth_gain: DEPTH_GAIN,
        }
    }
}

/// Converts the smoothed head signal into a camera eye position offset from
/// a fixed base pose. The look-at target never moves; only the eye does.
#[derive(Clone, Copy, Debug)]
pub struct CameraRig {
    pub base: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    pub tuning: RigTuning,
}

impl CameraRig {
    pub fn new(base: Vec3, min_distance: f32, max_distance: f32) -> Self {
        Self {
            base,
            min_distance,
            max_distance,
            tuning: RigTuning::default(),
        }
    }

    /// Camera eye for the current smoothed signal.
    ///
    /// Note the x/y offsets are clamped BEFORE the final x_scale/y_scale
    /// multiply, so displacement can exceed the nominal clamp bound by the
    /// scale factor. Possibly a latent quirk in the inherited constants, but
    /// reordering would change the observable motion range; keep as-is.
    pub fn eye(&self, signal: &HeadSignal) -> Vec3 {
        let (sx, sy, sz) = signal.smoothed();
        let t = &self.tuning;

        let offset_x = (sx * t.x_gain).clamp(-t.x_clamp, t.x_clamp);
        // Image y grows downward; camera y is up.
        let offset_y = (-sy * t.y_gain).clamp(-t.y_clamp, t.y_clamp);
        let z = (self.base.z - sz * t.depth_gain).clamp(self.min_distance, self.max_distance);

        Vec3::new(
            self.base.x - offset_x * t.x_scale,
            self.base.y + offset_y * t.y_scale,
            z,
        )
    }
}
