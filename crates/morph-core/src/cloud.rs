//! Hero particle cloud: deterministic chaos/grid layouts and the per-frame
//! morph between them.
//!
//! Construction precomputes two immutable position arenas, `chaos_base` and
//! `grid_target`. Each [`ParticleCloud::tick`] rebuilds `current` by adding a
//! per-axis sinusoidal drift to the chaos base and blending the result toward
//! the grid target with the frame's morph factor. The whole-cloud rotation is
//! a rigid-body pose recomputed from scratch every tick; it composes with the
//! positions but never mutates them.

use glam::{EulerRot, Mat4, Vec2, Vec3};

use crate::constants::*;
use crate::error::{require_positive, ParamError};
use crate::seeded::scatter_position;
use crate::signal::FrameInput;

/// Construction parameters for [`ParticleCloud`].
#[derive(Clone, Copy, Debug)]
pub struct CloudParams {
    pub particle_count: usize,
    /// World-space extent of the scattered layout.
    pub chaos_spread: f32,
    /// Cell size of the ordered lattice.
    pub grid_spacing: f32,
    /// Clamp the morph factor to `[0, 1]` instead of extrapolating. Off by
    /// default: hosts with springy easing are allowed to overshoot.
    pub clamp_morph: bool,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            chaos_spread: CHAOS_SPREAD,
            grid_spacing: GRID_SPACING,
            clamp_morph: false,
        }
    }
}

impl CloudParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        require_positive("chaos_spread", self.chaos_spread)?;
        require_positive("grid_spacing", self.grid_spacing)?;
        Ok(())
    }
}

/// Cosmetic rendering preset, swapped by the emphasis flag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointMaterial {
    pub color: [f32; 3],
    pub size: f32,
}

/// Scattered baseline layout: each index maps through three consecutive seeds.
pub fn build_chaos_cloud(count: usize, spread: f32) -> Vec<Vec3> {
    (0..count)
        .map(|i| scatter_position(i, CHAOS_SEED_STRIDE, spread))
        .collect()
}

/// Ordered layout: a dense cubic lattice with `ceil(cbrt(count))` cells per
/// axis, recentred on the origin. Cells past `count` stay unused when the
/// count is not a perfect cube; the lattice is simply oversized.
pub fn build_grid_cloud(count: usize, spacing: f32) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    let grid_size = (count as f64).cbrt().ceil() as usize;
    let half = grid_size as f32 / 2.0;
    (0..count)
        .map(|i| {
            let x = (i % grid_size) as f32 - half;
            let y = ((i / grid_size) % grid_size) as f32 - half;
            let z = (i / (grid_size * grid_size)) as f32 - half;
            Vec3::new(x * spacing, y * spacing, z * spacing)
        })
        .collect()
}

// Endpoint-exact blend: collapses to `a` at 0 and to `b` at 1 with no
// floating-point residue, unlike the `a + (b - a) * s` form.
#[inline]
fn lerp3(a: Vec3, b: Vec3, s: f32) -> Vec3 {
    a * (1.0 - s) + b * s
}

/// The animated particle cloud.
pub struct ParticleCloud {
    params: CloudParams,
    chaos_base: Vec<Vec3>,
    grid_target: Vec<Vec3>,
    current: Vec<Vec3>,
    rotation: Vec2,
    emphasized: bool,
}

impl ParticleCloud {
    pub fn new(params: CloudParams) -> Result<Self, ParamError> {
        params.validate()?;
        let chaos_base = build_chaos_cloud(params.particle_count, params.chaos_spread);
        let grid_target = build_grid_cloud(params.particle_count, params.grid_spacing);
        let current = chaos_base.clone();
        log::debug!(
            "[cloud] particles={} spread={} spacing={}",
            params.particle_count,
            params.chaos_spread,
            params.grid_spacing
        );
        Ok(Self {
            params,
            chaos_base,
            grid_target,
            current,
            rotation: Vec2::ZERO,
            emphasized: false,
        })
    }

    /// Recompute every particle position and the rigid-body rotation for one
    /// frame. Runs synchronously inside the host's frame callback.
    pub fn tick(&mut self, input: &FrameInput) {
        let t = input.elapsed_secs;
        let morph = if self.params.clamp_morph {
            input.morph.clamp(0.0, 1.0)
        } else {
            input.morph
        };

        for i in 0..self.chaos_base.len() {
            let phase = i as f32;
            let drift = Vec3::new(
                (t * JITTER_FREQ[0] + phase * JITTER_PHASE_STEP[0]).sin(),
                (t * JITTER_FREQ[1] + phase * JITTER_PHASE_STEP[1]).cos(),
                (t * JITTER_FREQ[2] + phase * JITTER_PHASE_STEP[2]).sin(),
            ) * JITTER_AMPLITUDE;
            self.current[i] = lerp3(self.chaos_base[i] + drift, self.grid_target[i], morph);
        }

        let mut rotation = Vec2::new(t * CLOUD_SPIN_RATE[0], t * CLOUD_SPIN_RATE[1]);
        if let Some(pointer) = input.pointer {
            rotation.x += pointer.y * POINTER_SPIN_GAIN;
            rotation.y += pointer.x * POINTER_SPIN_GAIN;
        }
        self.rotation = rotation;
    }

    /// Positions computed by the latest tick (chaos base before the first one).
    pub fn positions(&self) -> &[Vec3] {
        &self.current
    }

    pub fn chaos_base(&self) -> &[Vec3] {
        &self.chaos_base
    }

    pub fn grid_target(&self) -> &[Vec3] {
        &self.grid_target
    }

    /// Euler x/y angles of the whole-cloud rotation, in radians.
    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    /// The rotation as a model matrix for the host's scene graph.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0)
    }

    /// Toggle the cosmetic emphasis state (hover, in the native host). Has
    /// no effect on positions.
    pub fn set_emphasis(&mut self, on: bool) {
        self.emphasized = on;
    }

    pub fn emphasized(&self) -> bool {
        self.emphasized
    }

    /// Rendering preset the host should draw with this frame.
    pub fn material(&self) -> PointMaterial {
        if self.emphasized {
            PointMaterial {
                color: POINT_COLOR_EMPHASIS,
                size: POINT_SIZE_EMPHASIS,
            }
        } else {
            PointMaterial {
                color: POINT_COLOR_BASE,
                size: POINT_SIZE_BASE,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn small_cloud(count: usize) -> ParticleCloud {
        ParticleCloud::new(CloudParams {
            particle_count: count,
            ..CloudParams::default()
        })
        .unwrap()
    }

    fn expected_drift(t: f32, i: usize) -> Vec3 {
        let phase = i as f32;
        Vec3::new(
            (t * JITTER_FREQ[0] + phase * JITTER_PHASE_STEP[0]).sin(),
            (t * JITTER_FREQ[1] + phase * JITTER_PHASE_STEP[1]).cos(),
            (t * JITTER_FREQ[2] + phase * JITTER_PHASE_STEP[2]).sin(),
        ) * JITTER_AMPLITUDE
    }

    #[test]
    fn chaos_cloud_is_reproducible() {
        let a = build_chaos_cloud(64, CHAOS_SPREAD);
        let b = build_chaos_cloud(64, CHAOS_SPREAD);
        assert_eq!(a, b);
    }

    #[test]
    fn chaos_cloud_matches_the_scatter_formula() {
        let cloud = build_chaos_cloud(32, CHAOS_SPREAD);
        for (i, p) in cloud.iter().enumerate() {
            assert_eq!(*p, scatter_position(i, CHAOS_SEED_STRIDE, CHAOS_SPREAD));
        }
    }

    #[test]
    fn generators_return_exactly_count_positions() {
        for n in [0, 1, 7, 8, 27, 100] {
            assert_eq!(build_chaos_cloud(n, 20.0).len(), n);
            assert_eq!(build_grid_cloud(n, 1.0).len(), n);
        }
    }

    #[test]
    fn grid_cloud_shapes_a_cubic_lattice() {
        // 8 particles fill a 2x2x2 lattice exactly, recentred by half a side.
        let grid = build_grid_cloud(8, 1.0);
        let expected = [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(0.0, -1.0, -1.0),
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
        ];
        assert_eq!(grid, expected);
    }

    #[test]
    fn grid_cloud_oversized_lattice_leaves_cells_unused() {
        // 10 particles need ceil(cbrt(10)) = 3 cells per axis; the half-offset
        // is 1.5 and every coordinate stays on the 3-cell lattice.
        let grid = build_grid_cloud(10, 2.0);
        for p in &grid {
            for c in [p.x, p.y, p.z] {
                let cell = c / 2.0 + 1.5;
                assert!((cell - cell.round()).abs() < 1e-6);
                assert!((0.0..3.0).contains(&cell.round()));
            }
        }
    }

    #[test]
    fn grid_cloud_scales_with_spacing() {
        let unit = build_grid_cloud(27, 1.0);
        let wide = build_grid_cloud(27, 2.5);
        for (a, b) in unit.iter().zip(&wide) {
            assert!((*a * 2.5 - *b).length() < 1e-5);
        }
    }

    #[test]
    fn zero_particles_is_a_noop() {
        let mut cloud = small_cloud(0);
        cloud.tick(&FrameInput::new(3.0, 0.5));
        assert!(cloud.is_empty());
        assert!(cloud.positions().is_empty());
    }

    #[test]
    fn tick_at_zero_morph_is_the_jittered_chaos_formula() {
        let mut cloud = small_cloud(50);
        let t = 2.75;
        cloud.tick(&FrameInput::new(t, 0.0));
        for i in 0..cloud.len() {
            let expected = cloud.chaos_base()[i] + expected_drift(t, i);
            assert_eq!(cloud.positions()[i], expected, "particle {i}");
        }
    }

    #[test]
    fn tick_at_full_morph_lands_exactly_on_the_grid() {
        let mut cloud = small_cloud(50);
        cloud.tick(&FrameInput::new(13.37, 1.0));
        for i in 0..cloud.len() {
            assert_eq!(cloud.positions()[i], cloud.grid_target()[i], "particle {i}");
        }
    }

    #[test]
    fn morph_sweep_is_continuous() {
        let mut cloud = small_cloud(20);
        let t = 1.0;
        let steps = 200;
        // The largest chaos-to-grid span bounds how far one sweep step can move
        // a particle.
        let max_span = cloud
            .chaos_base()
            .iter()
            .zip(cloud.grid_target())
            .map(|(c, g)| c.distance(*g) + JITTER_AMPLITUDE * 2.0)
            .fold(0.0f32, f32::max);
        let mut prev: Option<Vec<Vec3>> = None;
        for step in 0..=steps {
            let morph = step as f32 / steps as f32;
            cloud.tick(&FrameInput::new(t, morph));
            if let Some(prev) = &prev {
                for (a, b) in prev.iter().zip(cloud.positions()) {
                    assert!(a.distance(*b) <= max_span / steps as f32 + 1e-4);
                }
            }
            prev = Some(cloud.positions().to_vec());
        }
    }

    #[test]
    fn rotation_without_pointer_follows_elapsed_time() {
        let mut cloud = small_cloud(4);
        cloud.tick(&FrameInput::new(10.0, 0.0));
        let r = cloud.rotation();
        assert!((r.x - 0.5).abs() < 1e-6);
        assert!((r.y - 0.3).abs() < 1e-6);
    }

    #[test]
    fn pointer_offset_tilts_the_rotation() {
        let mut cloud = small_cloud(4);
        let input = FrameInput::new(10.0, 0.0).with_pointer(Vec2::new(1.0, -1.0));
        cloud.tick(&input);
        // Pointer y feeds the x axis and vice versa.
        assert!((cloud.rotation().x - (0.5 - POINTER_SPIN_GAIN)).abs() < 1e-7);
        assert!((cloud.rotation().y - (0.3 + POINTER_SPIN_GAIN)).abs() < 1e-7);
    }

    #[test]
    fn rotation_is_rigid_and_leaves_positions_alone() {
        let mut plain = small_cloud(10);
        plain.tick(&FrameInput::new(5.0, 0.25));
        let mut tilted = small_cloud(10);
        let with_pointer = FrameInput::new(5.0, 0.25).with_pointer(Vec2::new(0.8, 0.8));
        tilted.tick(&with_pointer);
        // Same time and morph: the pointer only changes the pose.
        assert_eq!(plain.positions(), tilted.positions());
        assert_ne!(plain.rotation(), tilted.rotation());
    }

    #[test]
    fn morph_extrapolates_unless_clamped() {
        let mut open = small_cloud(10);
        open.tick(&FrameInput::new(0.0, 1.5));
        let overshoot = open.positions().to_vec();
        assert_ne!(overshoot[0], open.grid_target()[0]);

        let mut clamped = ParticleCloud::new(CloudParams {
            particle_count: 10,
            clamp_morph: true,
            ..CloudParams::default()
        })
        .unwrap();
        clamped.tick(&FrameInput::new(0.0, 1.5));
        assert_eq!(clamped.positions(), clamped.grid_target());
    }

    #[test]
    fn emphasis_swaps_the_material_preset() {
        let mut cloud = small_cloud(1);
        assert_eq!(cloud.material().size, POINT_SIZE_BASE);
        assert_eq!(cloud.material().color, POINT_COLOR_BASE);
        cloud.set_emphasis(true);
        assert_eq!(cloud.material().size, POINT_SIZE_EMPHASIS);
        assert_eq!(cloud.material().color, POINT_COLOR_EMPHASIS);
        // Emphasis is cosmetic only.
        cloud.tick(&FrameInput::new(1.0, 0.0));
        let mut other = small_cloud(1);
        other.tick(&FrameInput::new(1.0, 0.0));
        assert_eq!(cloud.positions(), other.positions());
    }

    #[test]
    fn malformed_params_are_rejected() {
        let nan = CloudParams {
            chaos_spread: f32::NAN,
            ..CloudParams::default()
        };
        assert!(ParticleCloud::new(nan).is_err());
        let flat = CloudParams {
            grid_spacing: 0.0,
            ..CloudParams::default()
        };
        assert!(ParticleCloud::new(flat).is_err());
    }

    #[test]
    fn model_matrix_matches_euler_rotation() {
        let mut cloud = small_cloud(1);
        cloud.tick(&FrameInput::new(10.0, 0.0));
        let m = cloud.model_matrix();
        let expected = Mat4::from_euler(EulerRot::XYZ, 0.5, 0.3, 0.0);
        assert!((m.to_cols_array()
            .iter()
            .zip(expected.to_cols_array().iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max))
            < 1e-6);
    }
}
