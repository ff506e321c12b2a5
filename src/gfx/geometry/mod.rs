//! # Procedural Geometry Generation
//!
//! This module generates the primitive shapes the scene is built from, so no model
//! files are needed.
//!
//! ## Supported Primitives
//!
//! - **Sphere**: UV sphere with configurable radius and tessellation
//! - **Box**: Axis-aligned box with per-face normals and UVs
//! - **Torus**: Ring with configurable tube radius and tessellation
//! - **Plane**: Flat XY plane facing +Z
//! - **Grid** and **wireframes**: line geometry for scene helpers
//!
//! All generators are pure: the same arguments always produce the same data.
//!
//! ## Usage
//!
//! ```rust
//! use scrollscape::gfx::geometry::{make_sphere, make_torus};
//!
//! let torus = make_torus(10.0, 3.0, 16, 100);
//! let star = make_sphere(0.25, 24, 24);
//! assert_eq!(torus.triangle_count(), 2 * 16 * 100);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// The parameters a [`GeometryData`] was generated from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Torus {
        radius: f32,
        tube_radius: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Plane {
        width: f32,
        height: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Grid {
        size: f32,
        divisions: u32,
    },
    /// Unique edges of another primitive
    Wireframe,
}

/// How indices are assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Every three indices form a counter-clockwise triangle
    Triangles,
    /// Every two indices form a line segment
    Lines,
}

/// Generated geometry ready for GPU upload
///
/// Immutable once handed to the scene; nodes share it through a `GeometryId`.
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// What this geometry was generated from
    pub primitive: Primitive,
    /// Index assembly mode
    pub topology: Topology,
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Primitive indices
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create an empty geometry for the given primitive
    pub fn new(primitive: Primitive, topology: Topology) -> Self {
        Self {
            primitive,
            topology,
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles (zero for line geometry)
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::Triangles => self.indices.len() / 3,
            Topology::Lines => 0,
        }
    }

    /// Get the number of line segments (zero for triangle geometry)
    pub fn line_count(&self) -> usize {
        match self.topology {
            Topology::Triangles => 0,
            Topology::Lines => self.indices.len() / 2,
        }
    }

    /// Interleave into the vertex format used by the renderer
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coord: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }
}
