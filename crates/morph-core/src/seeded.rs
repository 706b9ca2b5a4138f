//! Deterministic seed-to-unit mapping.
//!
//! Every generated point set in this crate flows through [`seeded_unit`], so a
//! given index always lands on the same position across re-renders and across
//! instances. That identity is what makes the chaos and grid layouts of the
//! *same* particle correspond during the morph.

use glam::Vec3;

/// Map a seed to a reproducible pseudo-random value in `[0, 1)`.
///
/// Computed as `frac(sin(seed) * 10000)`. Pure and side-effect free; identical
/// seeds always yield identical output.
#[inline]
pub fn seeded_unit(seed: f64) -> f64 {
    let x = seed.sin() * 10000.0;
    x - x.floor()
}

/// Scatter an index into a cube of `spread` world units centred on the origin.
///
/// Three consecutive seeds `stride*i .. stride*i+2` feed the three axes, each
/// shifted to `[-0.5, 0.5]` before scaling. Both the chaos cloud (stride 3,
/// spread 20) and the graph node set (stride 100, spread 15) use this mapping,
/// which keeps the two sets deterministically disjoint.
#[inline]
pub fn scatter_position(index: usize, seed_stride: f64, spread: f32) -> Vec3 {
    let base = index as f64 * seed_stride;
    let spread = spread as f64;
    Vec3::new(
        ((seeded_unit(base) - 0.5) * spread) as f32,
        ((seeded_unit(base + 1.0) - 0.5) * spread) as f32,
        ((seeded_unit(base + 2.0) - 0.5) * spread) as f32,
    )
}
