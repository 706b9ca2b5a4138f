//! Per-frame input snapshot supplied by the host.
//!
//! The host owns the raw signals (clock, scroll/hover progress, cursor) and
//! samples them into a [`FrameInput`] once per frame. The core only ever reads
//! the snapshot, so there is no shared mutable state between input events and
//! the animation tick.

use glam::Vec2;

/// Snapshot of the external animation signal for one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    /// Monotonically increasing time in seconds since the visualization mounted.
    pub elapsed_secs: f32,
    /// Morph factor in `[0, 1]`: 0 is pure chaos, 1 is the ordered lattice.
    /// Values outside the range extrapolate unless the cloud clamps them.
    pub morph: f32,
    /// Pointer offset in `[-1, 1]²` (x right, y up). `None` when no pointer
    /// data is available; treated as zero offset.
    pub pointer: Option<Vec2>,
}

impl FrameInput {
    pub fn new(elapsed_secs: f32, morph: f32) -> Self {
        Self {
            elapsed_secs,
            morph,
            pointer: None,
        }
    }

    pub fn with_pointer(mut self, pointer: Vec2) -> Self {
        self.pointer = Some(pointer);
        self
    }
}
