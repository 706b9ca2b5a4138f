//! Connection overlay graph: a small deterministic node set linked wherever
//! two nodes sit closer than a fixed distance.
//!
//! Everything here runs once at construction. The edge list, the adjacency
//! lists and the drawable line vertices are immutable afterwards; per-frame
//! behavior (opacity, rotation) lives in [`crate::overlay`].

use fnv::FnvHashMap;
use glam::Vec3;
use smallvec::SmallVec;

use crate::constants::*;
use crate::error::{require_positive, ParamError};
use crate::seeded::scatter_position;

/// Construction parameters for [`ConnectionGraph`].
#[derive(Clone, Copy, Debug)]
pub struct GraphParams {
    pub node_count: usize,
    /// World-space extent of the node scattering.
    pub node_spread: f32,
    /// Node pairs strictly closer than this become edges.
    pub link_threshold: f32,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self {
            node_count: NODE_COUNT,
            node_spread: NODE_SPREAD,
            link_threshold: LINK_DISTANCE_MAX,
        }
    }
}

impl GraphParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        require_positive("node_spread", self.node_spread)?;
        require_positive("link_threshold", self.link_threshold)?;
        Ok(())
    }
}

/// One endpoint of a drawable line segment, laid out for direct upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Deterministic node scattering; stride 100 keeps this set independent of
/// the particle cloud's seeds.
pub fn build_graph_nodes(count: usize, spread: f32) -> Vec<Vec3> {
    (0..count)
        .map(|i| scatter_position(i, NODE_SEED_STRIDE, spread))
        .collect()
}

// Pairwise scan over all (i, j), i < j. Quadratic, fine at the default
// node count; emits edges in lexicographic order.
fn edges_brute(nodes: &[Vec3], threshold: f32) -> Vec<(u32, u32)> {
    let mut edges = Vec::new();
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if nodes[i].distance(nodes[j]) < threshold {
                edges.push((i as u32, j as u32));
            }
        }
    }
    edges
}

// Spatial-bucket scan for larger node sets: cells of side `threshold`, so a
// qualifying pair can only span adjacent cells. Selects the identical edge
// set as the pairwise scan, sorted to the same order.
fn edges_bucketed(nodes: &[Vec3], threshold: f32) -> Vec<(u32, u32)> {
    let inv = 1.0 / threshold;
    let cell_of = |p: Vec3| {
        (
            (p.x * inv).floor() as i32,
            (p.y * inv).floor() as i32,
            (p.z * inv).floor() as i32,
        )
    };
    let mut cells: FnvHashMap<(i32, i32, i32), Vec<u32>> = FnvHashMap::default();
    for (i, p) in nodes.iter().enumerate() {
        cells.entry(cell_of(*p)).or_default().push(i as u32);
    }
    let mut edges = Vec::new();
    for (i, p) in nodes.iter().enumerate() {
        let (cx, cy, cz) = cell_of(*p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &j in bucket {
                        if j as usize > i && p.distance(nodes[j as usize]) < threshold {
                            edges.push((i as u32, j));
                        }
                    }
                }
            }
        }
    }
    edges.sort_unstable();
    edges
}

/// Immutable node/edge set for the connection overlay.
pub struct ConnectionGraph {
    nodes: Vec<Vec3>,
    edges: Vec<(u32, u32)>,
    adjacency: Vec<SmallVec<[u32; 8]>>,
}

impl ConnectionGraph {
    /// Build the deterministic seeded node set and link it.
    pub fn new(params: GraphParams) -> Result<Self, ParamError> {
        params.validate()?;
        let nodes = build_graph_nodes(params.node_count, params.node_spread);
        Self::from_nodes(nodes, params.link_threshold)
    }

    /// Link an arbitrary node set with the same selection semantics.
    pub fn from_nodes(nodes: Vec<Vec3>, threshold: f32) -> Result<Self, ParamError> {
        require_positive("link_threshold", threshold)?;
        let edges = if nodes.len() >= GRID_ACCEL_MIN_NODES {
            edges_bucketed(&nodes, threshold)
        } else {
            edges_brute(&nodes, threshold)
        };
        let mut adjacency = vec![SmallVec::new(); nodes.len()];
        for &(a, b) in &edges {
            adjacency[a as usize].push(b);
            adjacency[b as usize].push(a);
        }
        log::debug!(
            "[graph] nodes={} edges={} threshold={}",
            nodes.len(),
            edges.len(),
            threshold
        );
        Ok(Self {
            nodes,
            edges,
            adjacency,
        })
    }

    pub fn nodes(&self) -> &[Vec3] {
        &self.nodes
    }

    /// Unordered node pairs `(i, j)` with `i < j`, in lexicographic order.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn neighbors(&self, node: usize) -> &[u32] {
        &self.adjacency[node]
    }

    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Flatten the edge list into line-segment endpoints, two vertices per
    /// edge, each carrying the fixed overlay color.
    pub fn line_vertices(&self) -> Vec<LineVertex> {
        let mut vertices = Vec::with_capacity(self.edges.len() * 2);
        for &(a, b) in &self.edges {
            for index in [a, b] {
                vertices.push(LineVertex {
                    position: self.nodes[index as usize].to_array(),
                    color: LINK_COLOR,
                });
            }
        }
        vertices
    }
}
