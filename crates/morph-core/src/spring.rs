//! Spring smoothing for the raw hover/scroll signal.
//!
//! A raw 0/1 hover flag fed straight into the morph factor snaps the cloud
//! between states; easing it through an overdamped spring makes it glide. The
//! host owns one of these, retargets it on input events and steps it once per
//! frame.

use crate::constants::{SPRING_DAMPING, SPRING_MAX_STEP_SEC, SPRING_REST_DELTA, SPRING_STIFFNESS};

/// Damped spring easing a scalar toward a target value.
#[derive(Clone, Copy, Debug)]
pub struct SpringSignal {
    value: f32,
    velocity: f32,
    target: f32,
    stiffness: f32,
    damping: f32,
}

impl SpringSignal {
    /// Spring with the default stiffness/damping, starting at rest.
    pub fn new(initial: f32) -> Self {
        Self::with_params(initial, SPRING_STIFFNESS, SPRING_DAMPING)
    }

    pub fn with_params(initial: f32, stiffness: f32, damping: f32) -> Self {
        Self {
            value: initial,
            velocity: 0.0,
            target: initial,
            stiffness,
            damping,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Advance the spring by `dt_secs` (semi-implicit Euler) and return the
    /// new value. Once value and velocity are both inside the rest delta the
    /// spring snaps exactly onto the target and stays there.
    pub fn step(&mut self, dt_secs: f32) -> f32 {
        let dt = dt_secs.clamp(0.0, SPRING_MAX_STEP_SEC);
        let accel = self.stiffness * (self.target - self.value) - self.damping * self.velocity;
        self.velocity += accel * dt;
        self.value += self.velocity * dt;
        if (self.target - self.value).abs() < SPRING_REST_DELTA
            && self.velocity.abs() < SPRING_REST_DELTA
        {
            self.value = self.target;
            self.velocity = 0.0;
        }
        self.value
    }
}
