//! # Scene Graph
//!
//! An ownership tree of renderable nodes under a single [`Scene`] root. Geometry and
//! materials are registered once and shared by ID; nodes carry a mutable
//! [`Transform`] and an immutable [`NodeKind`].
//!
//! ## Usage
//!
//! ```no_run
//! use scrollscape::gfx::geometry::make_torus;
//! use scrollscape::gfx::resources::Material;
//! use scrollscape::gfx::scene::{Scene, Transform};
//!
//! let mut scene = Scene::new();
//! let geometry = scene.add_geometry(make_torus(10.0, 3.0, 16, 100));
//! let material = scene.add_material(Material::standard("torus", 0xFF6347));
//! let torus = scene.add_mesh(None, geometry, material, Transform::default());
//! scene.transform_mut(torus).rotation.y += 0.005;
//! ```

pub mod node;
pub mod scene;
pub mod snapshot;
pub mod vertex;

// Re-export main types
pub use node::{
    Helper, HelperKind, Light, LightKind, NodeHandle, NodeKind, SceneId, SceneNode, Transform,
};
pub use scene::{GeometryId, Scene, SceneStatistics};
pub use snapshot::{NodeTransform, TransformSnapshot};
pub use vertex::Vertex3D;
