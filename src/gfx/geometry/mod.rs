//! # Procedural Geometry
//!
//! Generates primitive shapes in memory so sketches need no model files.
//!
//! ```no_run
//! use sketchbook::gfx::geometry::generate_icosahedron;
//!
//! let ico = generate_icosahedron(1.0, 0);
//! assert_eq!(ico.triangle_count(), 20);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Geometry ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Per-vertex normals, same length as `vertices`
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions and normals into the renderer's vertex format
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| {
                Vertex3D::new(
                    *position,
                    self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                )
            })
            .collect()
    }
}
