use glam::{Mat4, Vec3};
use thiserror::Error;

use crate::bounds::Aabb;

/// Placement of the single model in the scene.
///
/// Written once by [`fit_to_ground`] when the asset finishes loading, then
/// field-wise by the slider override surface. Each field has exactly one
/// writer at a time; an override replaces the normalizer output for that
/// field going forward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelPlacement {
    pub position: Vec3,
    pub scale: f32,
    pub rotation_y: f32,
}

impl Default for ModelPlacement {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: 1.0,
            rotation_y: 0.0,
        }
    }
}

impl ModelPlacement {
    /// World transform for a model whose geometry is left in its original
    /// local frame. `pivot` is the vertical pivot recorded by the
    /// normalizer (the box center's y only): the x/z centering is already
    /// baked into `position`, so subtracting the full box center here would
    /// apply it twice and shove the model off-origin.
    pub fn matrix(&self, pivot: Vec3) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_y(self.rotation_y)
            * Mat4::from_scale(Vec3::splat(self.scale))
            * Mat4::from_translation(-pivot)
    }
}

/// Normalizer output: the placement plus the post-scale extents, so the
/// resting guarantee (`bottom_y() == ground`) stays checkable without
/// re-deriving the box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedPlacement {
    pub placement: ModelPlacement,
    pub post_scale_size: Vec3,
    /// Vertical pivot for [`ModelPlacement::matrix`]: only the y of the raw
    /// box center. x/z stay zero because `placement.position` already
    /// carries the horizontal/depth centering.
    pub pivot: Vec3,
}

impl NormalizedPlacement {
    /// World y of the model's lowest point under the placement.
    #[inline]
    pub fn bottom_y(&self) -> f32 {
        self.placement.position.y - self.post_scale_size.y * 0.5
    }
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Zero-size bounding box; scaling would divide by zero.
    #[error("asset has no renderable geometry")]
    UngeometricAsset,
}

/// Fit an arbitrary-sized model into the scene: center it at the origin,
/// scale its largest dimension to `target_size`, and rest its lowest point
/// on `ground_y`.
///
/// The resting offset is derived from the post-scale height; using the
/// pre-scale half-height would misplace the model by the scale factor's
/// error margin.
pub fn fit_to_ground(
    bounds: &Aabb,
    target_size: f32,
    ground_y: f32,
) -> Result<NormalizedPlacement, NormalizeError> {
    if bounds.is_degenerate() {
        return Err(NormalizeError::UngeometricAsset);
    }

    let size = bounds.size();
    let center = bounds.center();
    let scale = target_size / bounds.max_dimension();
    let post_scale_size = size * scale;

    let position = Vec3::new(
        -center.x,
        ground_y + post_scale_size.y * 0.5,
        -center.z,
    );

    Ok(NormalizedPlacement {
        placement: ModelPlacement {
            position,
            scale,
            rotation_y: 0.0,
        },
        post_scale_size,
        pivot: Vec3::new(0.0, center.y, 0.0),
    })
}
