//! Head-tracking signal conditioning.
//!
//! The landmark detector emits a noisy nose-tip position once per video
//! frame, or nothing when no face is visible. This module recenters it,
//! suppresses jitter near the frame center, and low-pass filters each axis.

/// One raw detector output: normalized landmark coordinates, x/y in [0,1]
/// with the frame center at 0.5, z a small relative depth.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackingSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Exponentially weighted moving average: `v = alpha * target + (1 - alpha) * v`.
#[derive(Clone, Copy, Debug)]
pub struct Ewma {
    value: f32,
    alpha: f32,
}

impl Ewma {
    pub fn new(alpha: f32, initial: f32) -> Self {
        Self {
            value: initial,
            alpha,
        }
    }

    /// Advance the filter one step toward `target` and return the new value.
    #[inline]
    pub fn update(&mut self, target: f32) -> f32 {
        self.value = self.alpha * target + (1.0 - self.alpha) * self.value;
        self.value
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }
}

/// Force values inside the dead zone to exactly zero.
#[inline]
pub fn apply_dead_zone(v: f32, zone: f32) -> f32 {
    if v.abs() < zone {
        0.0
    } else {
        v
    }
}

/// Per-axis smoothed head position, persisted across ticks.
#[derive(Clone, Copy, Debug)]
pub struct HeadSignal {
    x: Ewma,
    y: Ewma,
    z: Ewma,
    dead_zone: f32,
}

impl HeadSignal {
    pub fn new(alpha: f32, dead_zone: f32) -> Self {
        Self {
            x: Ewma::new(alpha, 0.0),
            y: Ewma::new(alpha, 0.0),
            z: Ewma::new(alpha, 0.0),
            dead_zone,
        }
    }

    /// Fold one detector result into the filters.
    ///
    /// `None` (no face this frame) holds the prior smoothed values exactly,
    /// with no convergence toward zero; this avoids a snap-back when
    /// tracking is momentarily lost.
    pub fn observe(&mut self, sample: Option<TrackingSample>) {
        let Some(s) = sample else {
            return;
        };
        // Map the frame center to 0 before the dead zone is applied.
        let centered_x = apply_dead_zone(s.x - 0.5, self.dead_zone);
        let centered_y = apply_dead_zone(s.y - 0.5, self.dead_zone);
        self.x.update(centered_x);
        self.y.update(centered_y);
        // Increasing detected depth pulls the camera back, not forward.
        self.z.update(-s.z);
    }

    /// Current smoothed (x, y, z) values.
    #[inline]
    pub fn smoothed(&self) -> (f32, f32, f32) {
        (self.x.value(), self.y.value(), self.z.value())
    }
}
