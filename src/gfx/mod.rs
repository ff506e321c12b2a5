//! # Graphics Module
//!
//! Everything between the scene description and the pixels:
//!
//! - **Geometry** ([`geometry`]) - sphere, box, torus, plane and grid mesh builders
//! - **Scene** ([`scene`]) - node tree with transforms, lights and helpers
//! - **Camera** ([`camera`]) - perspective camera, orbit controls and the scroll rig
//! - **Resources** ([`resources`]) - materials, textures and their loaders
//! - **Rendering** ([`rendering`]) - the [`Renderer`](rendering::Renderer) trait and
//!   the wgpu [`RenderEngine`]
//!
//! ## Usage
//!
//! ```no_run
//! use scrollscape::gfx::{geometry::make_sphere, resources::Material, scene::{Scene, Transform}};
//!
//! let mut scene = Scene::new();
//! let geometry = scene.add_geometry(make_sphere(3.0, 32, 32));
//! let material = scene.add_material(Material::standard("moon", 0xffffff));
//! scene.add_mesh(None, geometry, material, Transform::from_position(-10.0, 0.0, 30.0));
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{CameraRig, PerspectiveCamera};
pub use rendering::render_engine::RenderEngine;
