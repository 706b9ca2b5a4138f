// Shared tuning constants for the hero cloud and the connection overlay.

// Hero particle cloud
pub const PARTICLE_COUNT: usize = 2000;
pub const CHAOS_SPREAD: f32 = 20.0; // world-space extent of the scattered layout
pub const GRID_SPACING: f32 = 1.0; // lattice cell size of the ordered layout
pub const CHAOS_SEED_STRIDE: f64 = 3.0; // three consecutive seeds per particle

// Low-amplitude drift that keeps the scattered state alive
pub const JITTER_AMPLITUDE: f32 = 0.2;
pub const JITTER_FREQ: [f32; 3] = [0.5, 0.3, 0.4]; // rad/s per axis
pub const JITTER_PHASE_STEP: [f32; 3] = [0.01, 0.015, 0.02]; // per-index phase offset

// Whole-cloud rigid-body rotation
pub const CLOUD_SPIN_RATE: [f32; 2] = [0.05, 0.03]; // rad/s on x/y
pub const POINTER_SPIN_GAIN: f32 = 0.0003; // extra tilt per unit of pointer offset

// Point material presets (emphasis swaps between them)
pub const POINT_COLOR_BASE: [f32; 3] = [0.0, 0.898, 1.0]; // cyan
pub const POINT_COLOR_EMPHASIS: [f32; 3] = [0.482, 0.38, 1.0]; // violet
pub const POINT_SIZE_BASE: f32 = 0.05;
pub const POINT_SIZE_EMPHASIS: f32 = 0.08;

// Connection overlay
pub const NODE_COUNT: usize = 50;
pub const NODE_SPREAD: f32 = 15.0;
pub const NODE_SEED_STRIDE: f64 = 100.0; // keeps the node set disjoint from the cloud seeds
pub const LINK_DISTANCE_MAX: f32 = 5.0; // node pairs closer than this become edges
pub const LINK_COLOR: [f32; 3] = [0.0, 0.9, 1.0];
pub const OVERLAY_SPIN_RATE: [f32; 2] = [0.02, 0.03]; // rad/s, decoupled from the cloud
pub const OVERLAY_DEAD_ZONE: f32 = 0.1; // progress at or below this keeps the overlay invisible
pub const OVERLAY_OPACITY_GAIN: f32 = 0.8;

// Edge search switches from the pairwise scan to spatial buckets above this
pub const GRID_ACCEL_MIN_NODES: usize = 256;

// Spring that eases the raw hover/scroll signal into the morph factor
pub const SPRING_STIFFNESS: f32 = 60.0;
pub const SPRING_DAMPING: f32 = 40.0;
pub const SPRING_REST_DELTA: f32 = 1e-4;
pub const SPRING_MAX_STEP_SEC: f32 = 1.0 / 30.0; // a hitched frame integrates as if it ran at 30 fps
