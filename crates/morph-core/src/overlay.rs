//! Per-frame presentation state for the connection overlay.
//!
//! The overlay fades in with the same progress signal that drives the particle
//! morph, with a dead zone at the low end so the lines do not flicker the
//! instant a transition starts. Its rotation runs on its own rates, decoupled
//! from the particle cloud.

use glam::{EulerRot, Mat4, Vec2};

use crate::constants::{OVERLAY_DEAD_ZONE, OVERLAY_OPACITY_GAIN, OVERLAY_SPIN_RATE};

/// Overlay opacity for the given progress signal: zero at or below the dead
/// zone, then `progress * 0.8`.
#[inline]
pub fn overlay_opacity(progress: f32) -> f32 {
    if progress > OVERLAY_DEAD_ZONE {
        progress * OVERLAY_OPACITY_GAIN
    } else {
        0.0
    }
}

/// Euler x/y angles of the overlay's continuous rotation, in radians.
#[inline]
pub fn overlay_rotation(elapsed_secs: f32) -> Vec2 {
    Vec2::new(
        elapsed_secs * OVERLAY_SPIN_RATE[0],
        elapsed_secs * OVERLAY_SPIN_RATE[1],
    )
}

/// The overlay rotation as a model matrix for the host's scene graph.
pub fn overlay_model_matrix(elapsed_secs: f32) -> Mat4 {
    let rotation = overlay_rotation(elapsed_secs);
    Mat4::from_euler(EulerRot::XYZ, rotation.x, rotation.y, 0.0)
}
