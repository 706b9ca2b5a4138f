//! Pointer normalization. Mapping raw cursor pixels into the core's signal
//! space is the host's job; the core only ever sees the normalized offset.

use glam::Vec2;

/// Map a cursor position in physical pixels to the `[-1, 1]²` offset the core
/// expects: x grows rightward, y grows upward, window center is the origin.
#[inline]
pub fn pointer_offset(x_px: f32, y_px: f32, width: u32, height: u32) -> Vec2 {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;
    Vec2::new((x_px / w) * 2.0 - 1.0, -((y_px / h) * 2.0 - 1.0))
}
